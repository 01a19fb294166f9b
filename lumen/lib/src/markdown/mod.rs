//! Markdown documents and their HTML output.
//!
//! This module provides a `Markdown` struct that holds the raw text of a
//! document together with a label describing where it came from. It supports:
//!
//! - Loading from strings, files, and URLs
//! - Parsing into a [`Document`](crate::document::Document) tree
//! - HTML fragment and standalone page output
//!
//! ## Examples
//!
//! ```
//! use lumen_lib::markdown::Markdown;
//! use lumen_lib::markdown::output::HtmlOptions;
//!
//! let md: Markdown = "# Hello\n\nWorld".into();
//! let html = md.as_html(HtmlOptions::default()).unwrap();
//! assert!(html.contains("<h1"));
//! ```

mod types;
pub mod dsl;
pub mod highlighting;
pub mod output;

pub use types::{MarkdownError, MarkdownResult};

use crate::document::{Document, ParseOptions};
use std::path::Path;
use url::Url;

/// A markdown document with an optional origin label.
#[derive(Debug, Clone, PartialEq)]
pub struct Markdown {
    content: String,
    origin: Option<String>,
}

impl Markdown {
    /// Creates a new markdown document without an origin label.
    pub fn new(content: String) -> Self {
        Self {
            content,
            origin: None,
        }
    }

    /// Sets the origin label (file path or URL) of the document.
    pub fn with_origin<S: Into<String>>(mut self, origin: S) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Loads a markdown document from a URL (async).
    ///
    /// Non-success HTTP statuses are reported as errors.
    ///
    /// ## Examples
    ///
    /// ```no_run
    /// # use lumen_lib::markdown::Markdown;
    /// # use url::Url;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let url = Url::parse("https://example.com/doc.md")?;
    /// let md = Markdown::from_url(&url).await?;
    /// # Ok(())
    /// # }
    /// ```
    #[tracing::instrument(fields(url = %url))]
    pub async fn from_url(url: &Url) -> MarkdownResult<Self> {
        let response = reqwest::get(url.as_str()).await?.error_for_status()?;
        let content = response.text().await?;
        tracing::info!(bytes = content.len(), "Fetched markdown document");
        Ok(Self::new(content).with_origin(url.as_str()))
    }

    /// Returns a reference to the raw markdown content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the origin label if one was set.
    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    /// Parses the markdown into a document tree.
    ///
    /// ## Errors
    ///
    /// Returns an error if syntax highlighting of a code block fails.
    pub fn as_document(&self, options: &ParseOptions) -> MarkdownResult<Document> {
        Document::parse(&self.content, options)
    }

    /// Converts the markdown document to an HTML fragment with syntax highlighting.
    ///
    /// ## Examples
    ///
    /// ```
    /// use lumen_lib::markdown::Markdown;
    /// use lumen_lib::markdown::output::HtmlOptions;
    ///
    /// let md = Markdown::new("# Hello\n\nWorld".to_string());
    /// let html = md.as_html(HtmlOptions::default()).unwrap();
    /// assert!(html.contains("World"));
    /// ```
    ///
    /// ## Errors
    ///
    /// Returns an error if highlighting encounters issues.
    pub fn as_html(&self, options: output::HtmlOptions) -> MarkdownResult<String> {
        output::as_html(self, options)
    }
}

impl From<String> for Markdown {
    fn from(content: String) -> Self {
        Self::new(content)
    }
}

impl From<&str> for Markdown {
    fn from(content: &str) -> Self {
        content.to_string().into()
    }
}

impl TryFrom<&Path> for Markdown {
    type Error = MarkdownError;

    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::new(content).with_origin(path.display().to_string()))
    }
}
