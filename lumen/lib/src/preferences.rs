//! Persisted theme preference.
//!
//! The viewer remembers the chosen color mode (and optionally theme pairs)
//! between runs in a small JSON file:
//!
//! ```json
//! { "color_mode": "light", "theme": "github", "code_theme": null }
//! ```

use crate::markdown::highlighting::{ColorMode, ThemePair};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable overriding the configuration directory.
pub const CONFIG_DIR_ENV: &str = "LUMEN_CONFIG_DIR";

const FILE_NAME: &str = "preferences.json";

#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid preferences file: {0}")]
    Json(#[from] serde_json::Error),
}

/// User preferences that survive between runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub color_mode: ColorMode,
    /// Prose theme pair, `None` to detect from the environment.
    pub theme: Option<ThemePair>,
    /// Code theme pair, `None` to follow the prose theme.
    pub code_theme: Option<ThemePair>,
}

/// Location of the preferences file.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// `$LUMEN_CONFIG_DIR/preferences.json`, else `lumen/preferences.json` under
    /// the platform config directory (`~/.config` on Linux).
    pub fn default_location() -> Self {
        let dir = match std::env::var(CONFIG_DIR_ENV) {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("lumen"),
        };
        Self::new(dir.join(FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the preferences; a missing file yields the defaults.
    pub fn load(&self) -> Result<Preferences, PreferenceError> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "No preferences file, using defaults");
            return Ok(Preferences::default());
        }
        let contents = std::fs::read_to_string(&self.path)?;
        let preferences: Preferences = serde_json::from_str(&contents)?;
        tracing::debug!(?preferences, "Loaded preferences");
        Ok(preferences)
    }

    /// Writes the preferences, creating the directory if needed.
    pub fn save(&self, preferences: &Preferences) -> Result<(), PreferenceError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(preferences)?)?;
        tracing::debug!(path = %self.path.display(), ?preferences, "Saved preferences");
        Ok(())
    }

    /// Loads, applies `change` and saves; returns the new preferences.
    pub fn update<F>(&self, change: F) -> Result<Preferences, PreferenceError>
    where
        F: FnOnce(&mut Preferences),
    {
        let mut preferences = self.load()?;
        change(&mut preferences);
        self.save(&preferences)?;
        Ok(preferences)
    }
}
