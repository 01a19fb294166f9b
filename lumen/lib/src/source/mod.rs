//! Where documents come from.
//!
//! A [`DocumentSource`] is a URL, a file or standard input. URL sources go
//! through the [`DocumentCache`] according to a [`CachePolicy`]; when a fetch
//! fails, any cached copy is served instead, however old.

mod cache;

pub use cache::{CACHE_DIR_ENV, CacheError, CachedDocument, DEFAULT_TTL, DocumentCache};

use crate::markdown::{Markdown, MarkdownError};
use lazy_static::lazy_static;
use serde::Serialize;
use std::fmt;
use std::io::Read;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;
use url::Url;

/// The document shown when no source is given.
pub const DEFAULT_DOCUMENT_URL: &str =
    "https://raw.githubusercontent.com/g-h-0-S-t/JavaScript-Interview/main/README.md";

lazy_static! {
    static ref DEFAULT_URL: Url = Url::parse(DEFAULT_DOCUMENT_URL).unwrap();
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read standard input: {0}")]
    Stdin(#[source] std::io::Error),

    #[error(transparent)]
    Fetch(#[from] MarkdownError),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// A place to load a markdown document from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    Url(Url),
    File(PathBuf),
    Stdin,
}

impl Default for DocumentSource {
    fn default() -> Self {
        Self::Url(DEFAULT_URL.clone())
    }
}

impl FromStr for DocumentSource {
    type Err = SourceError;

    /// `-` is standard input, `http://` and `https://` are URLs, anything
    /// else is a file path.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "-" {
            return Ok(Self::Stdin);
        }
        let lower = s.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return Ok(Self::Url(Url::parse(s)?));
        }
        Ok(Self::File(PathBuf::from(s)))
    }
}

impl fmt::Display for DocumentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => write!(f, "{url}"),
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Stdin => write!(f, "<stdin>"),
        }
    }
}

/// How the cache is consulted for URL sources.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CachePolicy {
    /// Serve a fresh cached copy, otherwise fetch and store.
    #[default]
    Prefer,
    /// Always fetch, then store.
    Refresh,
    /// Neither read nor write the cache.
    Bypass,
}

/// Where a loaded document actually came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Origin {
    Network,
    Cache,
    /// Fetch failed; an expired cached copy was used.
    StaleCache,
    File,
    Stdin,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Network => "network",
            Self::Cache => "cache",
            Self::StaleCache => "stale cache",
            Self::File => "file",
            Self::Stdin => "stdin",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub markdown: Markdown,
    pub origin: Origin,
}

/// Loads a document from `source`.
///
/// `cache` is only used for URL sources and is ignored with
/// [`CachePolicy::Bypass`].
///
/// ## Errors
///
/// Returns an error if the file or stdin cannot be read, or if the fetch
/// fails and no cached copy exists.
#[tracing::instrument(skip(source, cache), fields(source = %source))]
pub async fn load(
    source: &DocumentSource,
    cache: Option<&DocumentCache>,
    policy: CachePolicy,
) -> Result<LoadedDocument, SourceError> {
    match source {
        DocumentSource::File(path) => {
            let content = std::fs::read_to_string(path).map_err(|source| SourceError::Read {
                path: path.clone(),
                source,
            })?;
            Ok(LoadedDocument {
                markdown: Markdown::new(content).with_origin(path.display().to_string()),
                origin: Origin::File,
            })
        }
        DocumentSource::Stdin => {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .map_err(SourceError::Stdin)?;
            Ok(LoadedDocument {
                markdown: Markdown::new(content).with_origin("<stdin>"),
                origin: Origin::Stdin,
            })
        }
        DocumentSource::Url(url) => {
            let cache = match policy {
                CachePolicy::Bypass => None,
                _ => cache,
            };
            load_url(url, cache, policy).await
        }
    }
}

async fn load_url(
    url: &Url,
    cache: Option<&DocumentCache>,
    policy: CachePolicy,
) -> Result<LoadedDocument, SourceError> {
    if let Some(cache) = cache
        && policy == CachePolicy::Prefer
    {
        match cache.get(url) {
            Ok(Some(cached)) if cached.is_fresh(cache.ttl()) => {
                tracing::info!(age = ?cached.age(), "Using cached document");
                return Ok(from_cache(url, cached, Origin::Cache));
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "Ignoring unreadable cache entry"),
        }
    }

    match Markdown::from_url(url).await {
        Ok(markdown) => {
            if let Some(cache) = cache
                && let Err(e) = cache.put(url, markdown.content())
            {
                tracing::warn!(error = %e, "Failed to cache fetched document");
            }
            Ok(LoadedDocument {
                markdown,
                origin: Origin::Network,
            })
        }
        Err(err) => {
            if let Some(cache) = cache
                && let Ok(Some(cached)) = cache.get(url)
            {
                tracing::warn!(error = %err, age = ?cached.age(), "Fetch failed, using cached copy");
                return Ok(from_cache(url, cached, Origin::StaleCache));
            }
            Err(err.into())
        }
    }
}

fn from_cache(url: &Url, cached: CachedDocument, origin: Origin) -> LoadedDocument {
    LoadedDocument {
        markdown: Markdown::new(cached.content).with_origin(url.as_str()),
        origin,
    }
}
