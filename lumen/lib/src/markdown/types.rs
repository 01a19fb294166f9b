//! Type definitions for the markdown module.

use thiserror::Error;

/// Errors that can occur when working with Markdown documents.
#[derive(Error, Debug)]
pub enum MarkdownError {
    /// Failed to load file.
    #[error("Failed to load file: {0}")]
    FileLoad(#[from] std::io::Error),

    /// Failed to fetch URL.
    #[error("Failed to fetch URL: {0}")]
    UrlFetch(#[from] reqwest::Error),

    /// Failed to load theme.
    #[error("Failed to load theme: {0}")]
    ThemeLoad(String),

    /// Syntax highlighting of a code block failed.
    #[error("Syntax highlighting failed: {0}")]
    Highlight(String),
}

/// Result type for markdown operations.
pub type MarkdownResult<T> = Result<T, MarkdownError>;
