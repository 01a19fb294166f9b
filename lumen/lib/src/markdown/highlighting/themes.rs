//! Theme pairs, color modes and environment detection.
//!
//! A [`ThemePair`] names one light and one dark syntect theme (dark-only
//! themes use the same variant for both). Pages carry both stylesheets and
//! switch between them with the [`ColorMode`].

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use syntect::highlighting::Theme as SyntectTheme;
use thiserror::Error;
use two_face::theme::{EmbeddedLazyThemeSet, EmbeddedThemeName, extra as extra_themes};

/// Environment variable naming the prose theme.
pub const THEME_ENV: &str = "THEME";

/// Environment variable naming the code theme.
pub const CODE_THEME_ENV: &str = "CODE_THEME";

#[derive(Debug, Clone, Error)]
#[error(
    "Invalid theme name: '{0}'. Valid names: github, one-half, base16-ocean, gruvbox, solarized, nord, dracula, monokai, two-dark"
)]
pub struct InvalidThemeName(pub String);

#[derive(Debug, Clone, Error)]
#[error("Invalid color mode: '{0}'. Valid modes: light, dark")]
pub struct InvalidColorMode(pub String);

/// Light or dark presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    Light,
    #[default]
    Dark,
}

impl ColorMode {
    /// Returns the opposite color mode.
    ///
    /// ## Examples
    ///
    /// ```
    /// use lumen_lib::markdown::highlighting::ColorMode;
    ///
    /// assert_eq!(ColorMode::Dark.toggled(), ColorMode::Light);
    /// assert_eq!(ColorMode::Light.toggled(), ColorMode::Dark);
    /// ```
    pub const fn toggled(self) -> Self {
        match self {
            ColorMode::Light => ColorMode::Dark,
            ColorMode::Dark => ColorMode::Light,
        }
    }

    /// The name used in `data-theme` attributes and preference files.
    pub const fn as_str(self) -> &'static str {
        match self {
            ColorMode::Light => "light",
            ColorMode::Dark => "dark",
        }
    }
}

impl FromStr for ColorMode {
    type Err = InvalidColorMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(ColorMode::Light),
            "dark" => Ok(ColorMode::Dark),
            _ => Err(InvalidColorMode(s.to_string())),
        }
    }
}

impl std::fmt::Display for ColorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A light/dark pair of syntax themes selected by one name.
///
/// ## Examples
///
/// ```
/// use lumen_lib::markdown::highlighting::{ThemePair, ColorMode};
///
/// let theme = ThemePair::try_from("one-half").unwrap();
/// assert_eq!(theme, ThemePair::OneHalf);
/// assert!(theme.description(ColorMode::Light).contains("light"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum ThemePair {
    Base16Ocean,
    Github,
    Gruvbox,
    OneHalf,
    Solarized,
    /// Dark only.
    Nord,
    /// Dark only.
    Dracula,
    Monokai,
    /// Dark only.
    TwoDark,
}

/// One concrete theme: its embedded name and a description.
struct Variant {
    name: EmbeddedThemeName,
    description: &'static str,
}

const fn variant(name: EmbeddedThemeName, description: &'static str) -> Variant {
    Variant { name, description }
}

impl TryFrom<&str> for ThemePair {
    type Error = InvalidThemeName;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        if let Some(pair) = Self::all().iter().find(|p| p.kebab_name() == normalized) {
            return Ok(*pair);
        }
        match normalized.as_str() {
            "onehalf" => Ok(ThemePair::OneHalf),
            "base-16-ocean" => Ok(ThemePair::Base16Ocean),
            "twodark" => Ok(ThemePair::TwoDark),
            _ => Err(InvalidThemeName(s.to_string())),
        }
    }
}

impl ThemePair {
    /// Every theme pair, in listing order.
    pub fn all() -> &'static [ThemePair] {
        &[
            ThemePair::OneHalf,
            ThemePair::Github,
            ThemePair::Base16Ocean,
            ThemePair::Gruvbox,
            ThemePair::Solarized,
            ThemePair::Monokai,
            ThemePair::Nord,
            ThemePair::Dracula,
            ThemePair::TwoDark,
        ]
    }

    /// The kebab-case name accepted by `--theme` and stored in preferences.
    ///
    /// ```
    /// use lumen_lib::markdown::highlighting::ThemePair;
    ///
    /// assert_eq!(ThemePair::OneHalf.kebab_name(), "one-half");
    /// assert_eq!(ThemePair::Base16Ocean.kebab_name(), "base16-ocean");
    /// ```
    pub const fn kebab_name(self) -> &'static str {
        match self {
            ThemePair::Base16Ocean => "base16-ocean",
            ThemePair::Github => "github",
            ThemePair::Gruvbox => "gruvbox",
            ThemePair::OneHalf => "one-half",
            ThemePair::Solarized => "solarized",
            ThemePair::Nord => "nord",
            ThemePair::Dracula => "dracula",
            ThemePair::Monokai => "monokai",
            ThemePair::TwoDark => "two-dark",
        }
    }

    /// Whether light mode gets a different theme than dark mode.
    pub fn has_light_variant(self) -> bool {
        self.variant(ColorMode::Light).description != self.variant(ColorMode::Dark).description
    }

    pub fn description(self, mode: ColorMode) -> &'static str {
        self.variant(mode).description
    }

    fn variant(self, mode: ColorMode) -> Variant {
        use ColorMode::{Dark, Light};
        use EmbeddedThemeName as E;

        match (self, mode) {
            (ThemePair::Base16Ocean, Dark) => variant(E::Base16OceanDark, "Base16 Ocean dark, blue-green with strong contrast"),
            (ThemePair::Base16Ocean, Light) => variant(E::Base16OceanLight, "Base16 Ocean light, soft blue-green on white"),
            (ThemePair::Github, Dark) => variant(E::Github, "GitHub dark mode with blue accents"),
            (ThemePair::Github, Light) => variant(E::InspiredGithub, "GitHub light mode, clean and minimal"),
            (ThemePair::Gruvbox, Dark) => variant(E::GruvboxDark, "Gruvbox dark, warm retro palette"),
            (ThemePair::Gruvbox, Light) => variant(E::GruvboxLight, "Gruvbox light, retro palette on cream"),
            (ThemePair::OneHalf, Dark) => variant(E::OneHalfDark, "OneHalf dark, balanced palette after Atom's One Dark"),
            (ThemePair::OneHalf, Light) => variant(E::OneHalfLight, "OneHalf light, soft colors on a light background"),
            (ThemePair::Solarized, Dark) => variant(E::SolarizedDark, "Solarized dark, precision colors"),
            (ThemePair::Solarized, Light) => variant(E::SolarizedLight, "Solarized light, precision colors on a light background"),
            (ThemePair::Nord, _) => variant(E::Nord, "Nord, arctic north-bluish palette"),
            (ThemePair::Dracula, _) => variant(E::Dracula, "Dracula, dark with purple and pink accents"),
            (ThemePair::Monokai, _) => variant(E::MonokaiExtended, "Monokai Extended, the classic editor palette"),
            (ThemePair::TwoDark, _) => variant(E::TwoDark, "TwoDark, muted tones after Atom's One Dark syntax"),
        }
    }
}

lazy_static! {
    static ref THEME_SET: EmbeddedLazyThemeSet = extra_themes();
}

/// Loads the syntect theme for a pair in the given mode.
pub(crate) fn load_theme(theme_pair: ThemePair, color_mode: ColorMode) -> SyntectTheme {
    THEME_SET.get(theme_pair.variant(color_mode).name).clone()
}

/// Reads a theme pair from the environment variable `var`.
///
/// Unset yields `None`; an invalid name is logged and also yields `None`.
pub fn env_theme(var: &str) -> Option<ThemePair> {
    let value = std::env::var(var).ok()?;
    match ThemePair::try_from(value.as_str()) {
        Ok(theme) => {
            tracing::info!(var, theme = theme.kebab_name(), "Theme from environment");
            Some(theme)
        }
        Err(e) => {
            tracing::warn!(var, error = %e, "Ignoring invalid theme");
            None
        }
    }
}

/// The terminal's color mode, when the environment states one.
///
/// `NO_COLOR` means dark. Otherwise `COLORFGBG` ("fg;bg") is read and a
/// background below 7 means dark.
pub fn env_color_mode() -> Option<ColorMode> {
    if std::env::var_os("NO_COLOR").is_some() {
        tracing::info!(color_mode = "dark", source = "NO_COLOR", "Color mode from environment");
        return Some(ColorMode::Dark);
    }

    let colorfgbg = std::env::var("COLORFGBG").ok()?;
    let bg = colorfgbg.split(';').next_back()?.trim().parse::<u8>().ok()?;
    let mode = if bg < 7 { ColorMode::Dark } else { ColorMode::Light };
    tracing::info!(color_mode = %mode, source = "COLORFGBG", bg, "Color mode from environment");
    Some(mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScopedEnv;
    use serial_test::serial;

    #[test]
    fn test_color_mode_parse() {
        assert_eq!("light".parse::<ColorMode>().unwrap(), ColorMode::Light);
        assert_eq!(" DARK ".parse::<ColorMode>().unwrap(), ColorMode::Dark);
        assert!("dim".parse::<ColorMode>().is_err());
    }

    #[test]
    fn test_color_mode_serde_lowercase() {
        assert_eq!(serde_json::to_string(&ColorMode::Light).unwrap(), "\"light\"");
        let mode: ColorMode = serde_json::from_str("\"dark\"").unwrap();
        assert_eq!(mode, ColorMode::Dark);
    }

    #[test]
    fn test_try_from_aliases() {
        assert_eq!(ThemePair::try_from("ONE_HALF").unwrap(), ThemePair::OneHalf);
        assert_eq!(ThemePair::try_from("onehalf").unwrap(), ThemePair::OneHalf);
        assert_eq!(ThemePair::try_from("twodark").unwrap(), ThemePair::TwoDark);
        assert!(ThemePair::try_from("vs-dark").is_err());
        assert!(ThemePair::try_from("sepia").is_err());
    }

    #[test]
    fn test_kebab_name_round_trips() {
        for pair in ThemePair::all() {
            assert_eq!(ThemePair::try_from(pair.kebab_name()).unwrap(), *pair);
            let json = serde_json::to_string(pair).unwrap();
            assert_eq!(json, format!("\"{}\"", pair.kebab_name()));
        }
    }

    #[test]
    fn test_dark_only_pairs() {
        assert!(!ThemePair::Nord.has_light_variant());
        assert!(!ThemePair::Dracula.has_light_variant());
        assert!(!ThemePair::TwoDark.has_light_variant());
        assert!(ThemePair::Github.has_light_variant());
        assert_eq!(
            ThemePair::Nord.description(ColorMode::Light),
            ThemePair::Nord.description(ColorMode::Dark)
        );
    }

    #[test]
    fn test_all_themes_load() {
        for pair in ThemePair::all() {
            for mode in [ColorMode::Dark, ColorMode::Light] {
                assert!(load_theme(*pair, mode).settings.background.is_some(), "{pair:?} {mode}");
            }
        }
    }

    #[test]
    #[serial]
    fn test_env_theme() {
        let _theme = ScopedEnv::set(THEME_ENV, "dracula");
        assert_eq!(env_theme(THEME_ENV), Some(ThemePair::Dracula));

        let _code = ScopedEnv::remove(CODE_THEME_ENV);
        assert_eq!(env_theme(CODE_THEME_ENV), None);
    }

    #[test]
    #[serial]
    fn test_env_theme_ignores_invalid_name() {
        let _theme = ScopedEnv::set(THEME_ENV, "sepia");
        assert_eq!(env_theme(THEME_ENV), None);
    }

    #[test]
    #[serial]
    fn test_env_color_mode_from_colorfgbg() {
        let _no_color = ScopedEnv::remove("NO_COLOR");
        let _fgbg = ScopedEnv::set("COLORFGBG", "0;15");
        assert_eq!(env_color_mode(), Some(ColorMode::Light));

        let _fgbg = ScopedEnv::set("COLORFGBG", "15;default;0");
        assert_eq!(env_color_mode(), Some(ColorMode::Dark));
    }

    #[test]
    #[serial]
    fn test_no_color_forces_dark() {
        let _no_color = ScopedEnv::set("NO_COLOR", "1");
        let _fgbg = ScopedEnv::set("COLORFGBG", "0;15");
        assert_eq!(env_color_mode(), Some(ColorMode::Dark));
    }

    #[test]
    #[serial]
    fn test_env_color_mode_unset() {
        let _no_color = ScopedEnv::remove("NO_COLOR");
        let _fgbg = ScopedEnv::remove("COLORFGBG");
        assert_eq!(env_color_mode(), None);
    }
}
