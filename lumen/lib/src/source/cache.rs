//! On-disk cache of fetched documents.
//!
//! Each URL gets one JSON file named after the XXH64 hash of the URL. Entries
//! are written through a temporary file and renamed into place, so a reader
//! never sees a half-written entry.

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};
use tempfile::NamedTempFile;
use thiserror::Error;
use url::Url;
use xxhash_rust::xxh64::xxh64;

/// Default time-to-live of a cached document: 1 hour
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

/// Environment variable overriding the cache directory.
pub const CACHE_DIR_ENV: &str = "LUMEN_CACHE_DIR";

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to persist cache entry: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// A cached copy of a fetched document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedDocument {
    pub url: String,
    /// When the document was fetched
    pub fetched_at: SystemTime,
    pub content: String,
}

impl CachedDocument {
    /// Time since the document was fetched; zero if the clock went backwards.
    pub fn age(&self) -> Duration {
        SystemTime::now()
            .duration_since(self.fetched_at)
            .unwrap_or_default()
    }

    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.age() < ttl
    }
}

/// Directory of cached documents with a freshness window.
#[derive(Debug, Clone)]
pub struct DocumentCache {
    dir: PathBuf,
    ttl: Duration,
}

impl DocumentCache {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self {
            dir: dir.into(),
            ttl: DEFAULT_TTL,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// `$LUMEN_CACHE_DIR`, else `lumen` under the platform cache directory
    /// (`~/.cache/lumen` on Linux).
    pub fn default_location() -> Self {
        if let Ok(dir) = std::env::var(CACHE_DIR_ENV) {
            return Self::new(dir);
        }
        let base = dirs::cache_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::new(base.join("lumen"))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Path of the entry for `url`.
    pub fn entry_path(&self, url: &Url) -> PathBuf {
        self.dir
            .join(format!("{:016x}.json", xxh64(url.as_str().as_bytes(), 0)))
    }

    /// Reads the entry for `url`, fresh or not.
    pub fn get(&self, url: &Url) -> Result<Option<CachedDocument>, CacheError> {
        let path = self.entry_path(url);
        if !path.exists() {
            tracing::debug!(url = %url, "Cache miss");
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)?;
        let cached: CachedDocument = serde_json::from_str(&contents)?;
        tracing::debug!(
            url = %url,
            age = ?cached.age(),
            fresh = cached.is_fresh(self.ttl),
            "Cache hit"
        );
        Ok(Some(cached))
    }

    /// Stores `content` as the current copy of `url`.
    pub fn put(&self, url: &Url, content: &str) -> Result<CachedDocument, CacheError> {
        std::fs::create_dir_all(&self.dir)?;

        let cached = CachedDocument {
            url: url.to_string(),
            fetched_at: SystemTime::now(),
            content: content.to_string(),
        };

        let mut file = NamedTempFile::new_in(&self.dir)?;
        file.write_all(serde_json::to_string_pretty(&cached)?.as_bytes())?;
        let path = self.entry_path(url);
        file.persist(&path)?;

        tracing::debug!(url = %url, path = %path.display(), bytes = content.len(), "Wrote cache entry");
        Ok(cached)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScopedEnv;
    use serial_test::serial;
    use std::path::Path;

    fn url() -> Url {
        Url::parse("https://example.com/README.md").unwrap()
    }

    #[test]
    fn test_get_missing_entry() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DocumentCache::new(dir.path());
        assert!(cache.get(&url()).unwrap().is_none());
    }

    #[test]
    fn test_put_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DocumentCache::new(dir.path());

        cache.put(&url(), "# Cached").unwrap();
        let cached = cache.get(&url()).unwrap().unwrap();

        assert_eq!(cached.content, "# Cached");
        assert_eq!(cached.url, "https://example.com/README.md");
        assert!(cached.is_fresh(cache.ttl()));
    }

    #[test]
    fn test_put_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DocumentCache::new(dir.path().join("nested").join("cache"));
        cache.put(&url(), "x").unwrap();
        assert!(cache.entry_path(&url()).exists());
    }

    #[test]
    fn test_put_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DocumentCache::new(dir.path());
        cache.put(&url(), "old").unwrap();
        cache.put(&url(), "new").unwrap();
        assert_eq!(cache.get(&url()).unwrap().unwrap().content, "new");
        // no temporary files left behind
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_zero_ttl_is_never_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DocumentCache::new(dir.path()).with_ttl(Duration::ZERO);
        cache.put(&url(), "x").unwrap();
        assert!(!cache.get(&url()).unwrap().unwrap().is_fresh(cache.ttl()));
    }

    #[test]
    fn test_corrupt_entry_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DocumentCache::new(dir.path());
        std::fs::write(cache.entry_path(&url()), "not json").unwrap();
        assert!(matches!(cache.get(&url()), Err(CacheError::Json(_))));
    }

    #[test]
    fn test_entry_names_differ_per_url() {
        let cache = DocumentCache::new("/tmp/unused");
        let other = Url::parse("https://example.com/OTHER.md").unwrap();
        assert_ne!(cache.entry_path(&url()), cache.entry_path(&other));
    }

    #[test]
    #[serial]
    fn test_default_location_uses_env_override() {
        let _dir = ScopedEnv::set(CACHE_DIR_ENV, "/tmp/lumen-cache-test");
        let entry = DocumentCache::default_location().entry_path(&url());
        assert_eq!(entry.parent(), Some(Path::new("/tmp/lumen-cache-test")));
    }

    #[test]
    #[serial]
    fn test_default_location_under_platform_cache_dir() {
        let _dir = ScopedEnv::remove(CACHE_DIR_ENV);
        let entry = DocumentCache::default_location().entry_path(&url());
        let parent = entry.parent().unwrap();
        assert!(parent.ends_with("lumen"));
        if let Some(cache) = dirs::cache_dir() {
            assert_eq!(parent, cache.join("lumen"));
        }
    }
}
