//! Search-and-highlight engine.
//!
//! [`SearchEngine`] finds case-insensitive matches of a query in the
//! searchable text of a [`Document`], wraps each one in a marker and keeps a
//! cursor over the markers in document order. Code blocks and diagram blocks
//! are never searched.
//!
//! ## Examples
//!
//! ```
//! use lumen_lib::document::{Document, ParseOptions};
//! use lumen_lib::search::{Direction, SearchEngine};
//!
//! let mut doc = Document::parse("one two one", &ParseOptions::default()).unwrap();
//! let mut engine = SearchEngine::new();
//!
//! let summary = engine.apply_query(&mut doc, "ONE");
//! assert_eq!(summary.count, 2);
//! assert_eq!(engine.cursor(), Some(0));
//!
//! engine.advance(&mut doc, Direction::Next);
//! assert_eq!(engine.cursor(), Some(1));
//!
//! engine.clear(&mut doc);
//! assert_eq!(doc.marker_count(), 0);
//! ```

mod highlight;
mod matcher;
mod types;

pub use matcher::find_matches;
pub use types::{Direction, Match, ScrollBehavior, ScrollBlock, ScrollRequest, SearchSummary};

use crate::document::Document;

/// Query, match list and cursor of one search session.
///
/// The engine never owns the document; every operation borrows it mutably,
/// so no one else can observe a half-updated tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchEngine {
    query: String,
    matches: Vec<Match>,
    cursor: Option<usize>,
}

impl SearchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current highlighting with the matches of `query`.
    ///
    /// Existing markers are removed first. The query is trimmed; an empty
    /// query leaves the document cleared. When there are matches the first
    /// one becomes active and a scroll request for it is returned.
    #[tracing::instrument(level = "debug", skip(self, document))]
    pub fn apply_query(&mut self, document: &mut Document, query: &str) -> SearchSummary {
        self.clear(document);

        let query = query.trim();
        if query.is_empty() {
            tracing::debug!("Empty query, nothing to highlight");
            return SearchSummary::default();
        }

        self.query = query.to_string();
        self.matches = highlight::wrap_matches(document.root_mut(), query);
        tracing::debug!(count = self.matches.len(), "Highlighted matches");

        if self.matches.is_empty() {
            return SearchSummary::default();
        }

        self.activate(document, 0);
        SearchSummary {
            count: self.matches.len(),
            scroll: Some(ScrollRequest::centered(0)),
        }
    }

    /// Removes all markers and resets the session. Idempotent.
    pub fn clear(&mut self, document: &mut Document) {
        let removed = highlight::unwrap_markers(document.root_mut());
        if removed > 0 {
            tracing::debug!(removed, "Cleared markers");
        }
        self.query.clear();
        self.matches.clear();
        self.cursor = None;
    }

    /// Moves the cursor one match forward or back, wrapping around.
    ///
    /// Returns a scroll request for the newly active marker, or `None` when
    /// there are no matches.
    pub fn advance(&mut self, document: &mut Document, direction: Direction) -> Option<ScrollRequest> {
        let count = self.matches.len();
        let current = self.cursor?;
        if count == 0 {
            return None;
        }

        let next = match direction {
            Direction::Next => (current + 1) % count,
            Direction::Previous => (current + count - 1) % count,
        };
        tracing::trace!(from = current, to = next, ?direction, "Advancing cursor");

        if let Some(marker) = document.marker_mut(current) {
            marker.active = false;
        }
        self.activate(document, next);
        Some(ScrollRequest::centered(next))
    }

    fn activate(&mut self, document: &mut Document, index: usize) {
        if let Some(marker) = document.marker_mut(index) {
            marker.active = true;
        }
        self.cursor = Some(index);
    }

    /// The trimmed query of the last non-empty search.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Matches in document order.
    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    /// Index of the active match, `None` without matches.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    /// The active match.
    pub fn current(&self) -> Option<&Match> {
        self.cursor.and_then(|index| self.matches.get(index))
    }
}
