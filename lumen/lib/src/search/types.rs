//! Types shared by the search engine and its callers.

use serde::{Deserialize, Serialize};

/// A half-open character range `[start, end)` within one text segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    /// Index into [`Document::segments`](crate::document::Document::segments).
    pub segment: usize,
    pub start: usize,
    pub end: usize,
}

/// Direction of cursor movement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Next,
    Previous,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBehavior {
    #[default]
    Smooth,
    Instant,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBlock {
    Start,
    #[default]
    Center,
    End,
    Nearest,
}

/// Request to bring a marker into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrollRequest {
    /// Ordinal of the marker to reveal.
    pub marker: usize,
    pub behavior: ScrollBehavior,
    pub block: ScrollBlock,
}

impl ScrollRequest {
    /// A smooth, centered scroll to `marker`.
    pub fn centered(marker: usize) -> Self {
        Self {
            marker,
            behavior: ScrollBehavior::Smooth,
            block: ScrollBlock::Center,
        }
    }
}

/// Result of applying a query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSummary {
    /// Number of matches, and of markers in the tree.
    pub count: usize,
    /// Scroll to the first match, when there is one.
    pub scroll: Option<ScrollRequest>,
}
