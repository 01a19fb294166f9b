//! Viewer session state and the events that drive it.
//!
//! A [`Viewer`] owns the rendered [`Document`], the [`SearchEngine`] working
//! on it and the active [`ColorMode`]. User input arrives as [`ViewerEvent`]s,
//! usually through an [`EventQueue`] that debounces query changes, and each
//! event produces one [`ViewerEffect`] for the presentation layer.

mod queue;

pub use queue::{DEFAULT_DEBOUNCE, EventQueue};

use serde::Serialize;

use crate::document::Document;
use crate::markdown::highlighting::ColorMode;
use crate::search::{Direction, ScrollRequest, SearchEngine};

/// Input to the viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerEvent {
    /// The search box text changed.
    QueryChanged(String),
    /// Move to the next or previous match.
    Advance(Direction),
    /// Reset the query and remove all markers.
    Clear,
    ToggleTheme,
}

/// What changed after handling one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum ViewerEffect {
    Matches {
        count: usize,
        scroll: Option<ScrollRequest>,
    },
    Scroll(ScrollRequest),
    Cleared,
    ThemeChanged {
        mode: ColorMode,
    },
    /// Nothing to present.
    Idle,
}

/// Text around the active match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchContext {
    pub before: String,
    pub matched: String,
    pub after: String,
}

/// A document being viewed, with its search session and theme.
///
/// ## Examples
///
/// ```
/// use lumen_lib::document::{Document, ParseOptions};
/// use lumen_lib::markdown::highlighting::ColorMode;
/// use lumen_lib::search::Direction;
/// use lumen_lib::viewer::{Viewer, ViewerEffect, ViewerEvent};
///
/// let doc = Document::parse("red green red", &ParseOptions::default()).unwrap();
/// let mut viewer = Viewer::new(doc, ColorMode::Dark);
///
/// let effect = viewer.dispatch(ViewerEvent::QueryChanged("red".into()));
/// assert!(matches!(effect, ViewerEffect::Matches { count: 2, .. }));
/// assert!(matches!(viewer.dispatch(ViewerEvent::Advance(Direction::Next)), ViewerEffect::Scroll(_)));
/// ```
#[derive(Debug, Clone)]
pub struct Viewer {
    document: Document,
    search: SearchEngine,
    color_mode: ColorMode,
}

impl Viewer {
    pub fn new(document: Document, color_mode: ColorMode) -> Self {
        Self {
            document,
            search: SearchEngine::new(),
            color_mode,
        }
    }

    /// Applies one event to the session.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn dispatch(&mut self, event: ViewerEvent) -> ViewerEffect {
        match event {
            ViewerEvent::QueryChanged(query) => {
                if query.trim().is_empty() {
                    self.search.clear(&mut self.document);
                    return ViewerEffect::Cleared;
                }
                let summary = self.search.apply_query(&mut self.document, &query);
                ViewerEffect::Matches {
                    count: summary.count,
                    scroll: summary.scroll,
                }
            }
            ViewerEvent::Advance(direction) => self
                .search
                .advance(&mut self.document, direction)
                .map_or(ViewerEffect::Idle, ViewerEffect::Scroll),
            ViewerEvent::Clear => {
                self.search.clear(&mut self.document);
                ViewerEffect::Cleared
            }
            ViewerEvent::ToggleTheme => {
                self.color_mode = self.color_mode.toggled();
                tracing::info!(mode = %self.color_mode, "Switched color mode");
                ViewerEffect::ThemeChanged {
                    mode: self.color_mode,
                }
            }
        }
    }

    /// Applies a batch of events and returns their effects in order.
    pub fn dispatch_all<I>(&mut self, events: I) -> Vec<ViewerEffect>
    where
        I: IntoIterator<Item = ViewerEvent>,
    {
        events.into_iter().map(|event| self.dispatch(event)).collect()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn search(&self) -> &SearchEngine {
        &self.search
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    pub fn set_color_mode(&mut self, color_mode: ColorMode) {
        self.color_mode = color_mode;
    }

    /// The active match with up to `radius` characters on either side.
    ///
    /// Line breaks are flattened to spaces.
    pub fn context(&self, radius: usize) -> Option<MatchContext> {
        let current = self.search.current()?;
        let segments = self.document.segments();
        let segment = segments.get(current.segment)?;
        let chars: Vec<char> = segment.text.chars().collect();
        if current.end > chars.len() {
            return None;
        }

        let slice = |from: usize, to: usize| -> String {
            chars[from..to]
                .iter()
                .map(|c| if c.is_whitespace() { ' ' } else { *c })
                .collect()
        };
        Some(MatchContext {
            before: slice(current.start.saturating_sub(radius), current.start),
            matched: slice(current.start, current.end),
            after: slice(current.end, (current.end + radius).min(chars.len())),
        })
    }
}
