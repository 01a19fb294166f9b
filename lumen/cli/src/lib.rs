//! # Lumen CLI
//!
//! A themed markdown viewer for the browser with in-document search.
//!
//! Lumen renders a markdown document to a standalone HTML page with syntax
//! highlighted code, Mermaid diagrams, a light/dark theme toggle and a search
//! box that highlights every match outside code and diagram blocks.
//!
//! ## Usage
//!
//! ```bash
//! # View the default document in the browser
//! lumen
//!
//! # View a local file or a URL
//! lumen README.md
//! lumen https://example.com/guide.md
//!
//! # Pipe content from stdin
//! cat README.md | lumen - --html > page.html
//!
//! # Open with a search already applied
//! lumen README.md --search closure
//!
//! # List matches instead of rendering
//! lumen README.md --search closure --matches
//! lumen README.md --search closure --matches --json
//!
//! # Search interactively from the terminal
//! lumen README.md --interactive
//! ```
//!
//! ### Theming
//!
//! ```bash
//! lumen --list-themes
//! lumen README.md --theme nord --code-theme monokai
//!
//! # Persist the color mode used for new pages
//! lumen --color-mode light
//! lumen --toggle-theme
//! ```
//!
//! ### Fetching
//!
//! Remote documents are cached for an hour in the platform cache directory
//! (`~/.cache/lumen` on Linux, `LUMEN_CACHE_DIR` overrides). `--refresh` forces a fetch and
//! `--no-cache` skips the cache entirely.
//!
//! ## Library Usage
//!
//! Rendering and search live in the [`lumen_lib`] crate.
//!
//! ```rust,ignore
//! use lumen_lib::document::{Document, ParseOptions};
//! use lumen_lib::search::SearchEngine;
//!
//! let mut doc = Document::parse("red green red", &ParseOptions::default())?;
//! let summary = SearchEngine::new().apply_query(&mut doc, "red");
//! assert_eq!(summary.count, 2);
//! ```

pub mod repl;

// Re-export the CLI struct for programmatic access
pub use cli::Cli;

mod cli {
    use clap::{ArgGroup, Parser};
    use clap_complete::Shell;
    use lumen_lib::markdown::highlighting::{ColorMode, ThemePair};
    use std::path::PathBuf;

    /// Command-line interface for the lumen markdown viewer.
    ///
    /// Use `lumen --help` to see all available options.
    #[derive(Debug, Parser)]
    #[command(name = "lumen", about = "Markdown viewer with in-document search", version)]
    #[command(group = ArgGroup::new("output-mode")
        .args(["html", "show_html", "output", "matches", "interactive"])
        .multiple(false))]
    #[command(after_help = "\
KEYS (--interactive):
  /TEXT     search for TEXT
  n, Enter  next match
  p         previous match
  esc       clear the search
  t         toggle light/dark (persisted)
  o         open the current page in the browser
  q         quit

SHELL COMPLETIONS:
  Run 'lumen --completions <SHELL>' and source the output from your shell config.
")]
    pub struct Cli {
        /// Markdown file, http(s) URL, or "-" for stdin (defaults to the bundled README URL)
        pub source: Option<String>,

        /// Search query applied before rendering
        #[arg(short, long, value_name = "QUERY")]
        pub search: Option<String>,

        /// Write the page to stdout
        #[arg(long, group = "output-mode")]
        pub html: bool,

        /// Write the page to a temporary file and open it in the browser
        #[arg(long, group = "output-mode")]
        pub show_html: bool,

        /// Write the page to FILE
        #[arg(short, long, group = "output-mode", value_name = "FILE")]
        pub output: Option<PathBuf>,

        /// List the matches of --search instead of rendering
        #[arg(long, group = "output-mode", requires = "search")]
        pub matches: bool,

        /// Search the document from a line-driven prompt
        #[arg(short, long, group = "output-mode")]
        pub interactive: bool,

        /// Output as JSON (for --matches)
        #[arg(long)]
        pub json: bool,

        /// Theme for prose content (kebab-case name)
        #[arg(long, value_parser = super::parse_theme_name)]
        pub theme: Option<ThemePair>,

        /// Theme for code blocks (defaults to the prose theme)
        #[arg(long, value_parser = super::parse_theme_name)]
        pub code_theme: Option<ThemePair>,

        /// Color mode for the page (persisted for later runs)
        #[arg(long, value_name = "MODE")]
        pub color_mode: Option<ColorMode>,

        /// Flip the persisted color mode and exit
        #[arg(long)]
        pub toggle_theme: bool,

        /// List available themes
        #[arg(long)]
        pub list_themes: bool,

        /// Neither read nor write the document cache
        #[arg(long, conflicts_with = "refresh")]
        pub no_cache: bool,

        /// Fetch remote documents even when a fresh cached copy exists
        #[arg(long)]
        pub refresh: bool,

        /// Show mermaid blocks as code instead of diagrams
        #[arg(long)]
        pub no_mermaid: bool,

        /// Increase verbosity (-v INFO, -vv DEBUG, -vvv TRACE, -vvvv TRACE with file/line)
        #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
        pub verbose: u8,

        /// Generate shell completions for the specified shell
        #[arg(long, value_name = "SHELL")]
        pub completions: Option<Shell>,
    }
}

/// Parses a theme name string into ThemePair.
fn parse_theme_name(s: &str) -> Result<lumen_lib::markdown::highlighting::ThemePair, String> {
    lumen_lib::markdown::highlighting::ThemePair::try_from(s).map_err(|e| e.to_string())
}
