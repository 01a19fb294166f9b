//! Output formatting for markdown documents.
//!
//! - [`as_html`] renders a markdown document to an HTML fragment
//! - [`render_document`] writes the body markup of a [`Document`](crate::document::Document),
//!   search markers included
//! - [`as_page`] wraps a document into a standalone viewer page with a search
//!   box, a theme toggle and copy buttons
//!
//! ## Examples
//!
//! ```
//! use lumen_lib::document::Document;
//! use lumen_lib::markdown::output::{HtmlOptions, as_page};
//!
//! let options = HtmlOptions::default();
//! let doc = Document::parse("# Notes\n\nHello", &options.parse_options()).unwrap();
//! let page = as_page(&doc, &options, None).unwrap();
//! assert!(page.starts_with("<!DOCTYPE html>"));
//! assert!(page.contains("<title>Notes</title>"));
//! ```

pub mod html;
pub mod page;

pub use html::{HtmlOptions, as_html, render_document};
pub use page::as_page;
