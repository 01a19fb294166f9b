//! Line-driven search session for `lumen --interactive`.
//!
//! Each input line is one command. Queries go through the same
//! [`EventQueue`] and [`Viewer`] the page script mirrors, so match counts and
//! cycling behave exactly as in the browser.

use color_eyre::eyre::{Context, Result};
use lumen_lib::markdown::output::{HtmlOptions, as_page};
use lumen_lib::preferences::PreferenceStore;
use lumen_lib::search::Direction;
use lumen_lib::viewer::{EventQueue, MatchContext, Viewer, ViewerEffect, ViewerEvent};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

/// Characters of context shown on either side of a match.
const CONTEXT_RADIUS: usize = 30;

const HELP: &str = "\
/TEXT     search for TEXT
n, Enter  next match
p         previous match
esc       clear the search
t         toggle light/dark
o         open the current page in the browser
q         quit";

/// One line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    Next,
    Previous,
    Clear,
    ToggleTheme,
    Open,
    Quit,
    Help,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);
        if let Some(query) = line.strip_prefix('/') {
            return Self::Search(query.to_string());
        }
        match line.trim() {
            "" | "n" => Self::Next,
            "p" => Self::Previous,
            "esc" | "\u{1b}" => Self::Clear,
            "t" => Self::ToggleTheme,
            "o" => Self::Open,
            "q" | "quit" | "exit" => Self::Quit,
            "?" | "h" | "help" => Self::Help,
            other => Self::Unknown(other.to_string()),
        }
    }

    fn as_event(&self) -> Option<ViewerEvent> {
        match self {
            Self::Search(query) => Some(ViewerEvent::QueryChanged(query.clone())),
            Self::Next => Some(ViewerEvent::Advance(Direction::Next)),
            Self::Previous => Some(ViewerEvent::Advance(Direction::Previous)),
            Self::Clear => Some(ViewerEvent::Clear),
            Self::ToggleTheme => Some(ViewerEvent::ToggleTheme),
            _ => None,
        }
    }
}

/// Whether the session keeps reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// An interactive viewing session.
pub struct Session {
    viewer: Viewer,
    queue: EventQueue,
    options: HtmlOptions,
    preferences: Option<PreferenceStore>,
}

impl Session {
    pub fn new(viewer: Viewer, options: HtmlOptions) -> Self {
        Self {
            viewer,
            queue: EventQueue::new(),
            options,
            preferences: None,
        }
    }

    /// Persists theme toggles to `store`.
    pub fn with_preferences(mut self, store: PreferenceStore) -> Self {
        self.preferences = Some(store);
        self
    }

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    /// The page for the current search and color mode.
    pub fn page(&self) -> Result<String> {
        let mut options = self.options.clone();
        options.color_mode = self.viewer.color_mode();
        let query = self.viewer.search().query();
        let query = (!query.is_empty()).then_some(query);
        as_page(self.viewer.document(), &options, query).wrap_err("Failed to render page")
    }

    /// Runs one command, writing feedback to `out`.
    pub fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> Result<Flow> {
        match command {
            Command::Quit => return Ok(Flow::Quit),
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Unknown(input) => {
                writeln!(out, "Unknown command: {input} (type ? for help)")?;
            }
            Command::Open => self.open(out)?,
            command => {
                if let Some(event) = command.as_event() {
                    self.queue.push(event, Instant::now());
                }
                // a submitted line is final, no need to wait out the debounce
                for event in self.queue.flush() {
                    let effect = self.viewer.dispatch(event);
                    self.report(effect, out)?;
                }
            }
        }
        Ok(Flow::Continue)
    }

    fn report<W: Write>(&self, effect: ViewerEffect, out: &mut W) -> Result<()> {
        let search = self.viewer.search();
        match effect {
            ViewerEffect::Matches { count: 0, .. } => {
                writeln!(out, "No matches for '{}'", search.query().trim())?;
            }
            ViewerEffect::Matches { .. } | ViewerEffect::Scroll(_) => {
                let position = search.cursor().map_or(0, |c| c + 1);
                let context = self.viewer.context(CONTEXT_RADIUS);
                writeln!(
                    out,
                    "{position}/{}  {}",
                    search.match_count(),
                    context.as_ref().map(format_context).unwrap_or_default()
                )?;
            }
            ViewerEffect::Cleared => writeln!(out, "Search cleared")?,
            ViewerEffect::ThemeChanged { mode } => {
                writeln!(out, "Theme: {mode}")?;
                if let Some(store) = &self.preferences
                    && let Err(e) = store.update(|p| p.color_mode = mode)
                {
                    tracing::warn!(error = %e, "Failed to save color mode");
                    writeln!(out, "Could not save preference: {e}")?;
                }
            }
            ViewerEffect::Idle => writeln!(out, "No matches")?,
        }
        Ok(())
    }

    fn open<W: Write>(&self, out: &mut W) -> Result<()> {
        let path = preview_path();
        std::fs::write(&path, self.page()?).wrap_err("Failed to write temp HTML file")?;
        if let Err(e) = open::that(&path) {
            writeln!(out, "Failed to open browser: {e}")?;
        }
        writeln!(out, "Page written to {}", path.display())?;
        Ok(())
    }
}

/// Where preview pages are written before opening them.
pub fn preview_path() -> PathBuf {
    std::env::temp_dir().join("lumen-preview.html")
}

/// Renders a match as `…before[match]after…` on one line.
pub fn format_context(context: &MatchContext) -> String {
    format!("…{}[{}]{}…", context.before, context.matched, context.after)
}

/// Reads commands from `input` until `q` or end of input.
pub fn run<R: BufRead, W: Write>(session: &mut Session, input: R, mut output: W) -> Result<()> {
    writeln!(output, "Type /TEXT to search, ? for help.")?;
    write!(output, "> ")?;
    output.flush()?;

    for line in input.lines() {
        let line = line.wrap_err("Failed to read input")?;
        if session.execute(Command::parse(&line), &mut output)? == Flow::Quit {
            return Ok(());
        }
        write!(output, "> ")?;
        output.flush()?;
    }
    writeln!(output)?;
    Ok(())
}
