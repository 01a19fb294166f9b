//! Markdown rendering to themed HTML with in-document search.
//!
//! This library loads a markdown document, renders it into a logical document
//! tree and then to a standalone HTML page with syntax highlighting, Mermaid
//! diagrams, theme switching and copy buttons. The search engine works on the
//! same tree, wrapping matches of a query in markers and cycling through them.
//!
//! ## Modules
//!
//! - [`markdown`] - Markdown documents, highlighting, and HTML output
//! - [`document`] - Logical document tree built from markdown
//! - [`search`] - Search-and-highlight engine over a document tree
//! - [`viewer`] - Event queue with debouncing and the viewer session state
//! - [`mermaid`] - Mermaid diagram blocks for HTML output
//! - [`source`] - Document sources and the on-disk document cache
//! - [`preferences`] - Persisted theme preference
//!
//! ## Examples
//!
//! ```
//! use lumen_lib::document::{Document, ParseOptions};
//! use lumen_lib::search::SearchEngine;
//!
//! let mut doc = Document::parse("Closures capture closures lazily.", &ParseOptions::default()).unwrap();
//! let mut engine = SearchEngine::new();
//! let summary = engine.apply_query(&mut doc, "closure");
//! assert_eq!(summary.count, 2);
//! ```

pub mod document;
pub mod markdown;
pub mod mermaid;
pub mod preferences;
pub mod search;
pub mod source;
pub mod viewer;

#[cfg(test)]
mod testing;
