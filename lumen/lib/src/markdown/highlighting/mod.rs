//! Syntax highlighting infrastructure for markdown code blocks.
//!
//! This module provides theme enumeration, theme pairing (light/dark),
//! grammar loading, and class-based highlighting. Code is highlighted once
//! into `hl-` prefixed CSS classes; each theme then only contributes a
//! stylesheet, so switching between light and dark never re-renders code.

mod grammars;
mod themes;

pub use themes::{
    CODE_THEME_ENV, ColorMode, InvalidColorMode, InvalidThemeName, THEME_ENV, ThemePair,
    env_color_mode, env_theme,
};

use crate::markdown::{MarkdownError, MarkdownResult};
use syntect::highlighting::{Color, Theme as SyntectTheme};
use syntect::html::{ClassStyle, ClassedHTMLGenerator, css_for_theme_with_class_style};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

/// Class prefix for highlighted spans.
pub const CLASS_PREFIX: &str = "hl-";

const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed {
    prefix: CLASS_PREFIX,
};

/// Primary API for syntax highlighting with theme support.
///
/// ## Examples
///
/// ```
/// use lumen_lib::markdown::highlighting::{CodeHighlighter, ThemePair};
///
/// let highlighter = CodeHighlighter::new(ThemePair::Github);
/// let html = highlighter.highlight("fn main() {}\n", "rust").unwrap();
/// assert!(html.contains("hl-"));
/// ```
#[derive(Debug)]
pub struct CodeHighlighter {
    syntax_set: &'static SyntaxSet,
    theme_pair: ThemePair,
}

impl CodeHighlighter {
    /// Creates a new code highlighter for the given theme pair.
    pub fn new(theme_pair: ThemePair) -> Self {
        Self {
            syntax_set: grammars::syntax_set(),
            theme_pair,
        }
    }

    /// Returns the current theme pair.
    pub fn theme_pair(&self) -> ThemePair {
        self.theme_pair
    }

    /// Returns the syntect theme for the given color mode.
    pub fn theme(&self, color_mode: ColorMode) -> SyntectTheme {
        themes::load_theme(self.theme_pair, color_mode)
    }

    /// Highlights code into class-annotated HTML spans.
    ///
    /// Unknown or empty languages fall back to plain text, which still
    /// escapes the code.
    ///
    /// ## Errors
    ///
    /// Returns `MarkdownError::Highlight` if the grammar fails to parse a line.
    pub fn highlight(&self, code: &str, language: &str) -> MarkdownResult<String> {
        let syntax = if language.is_empty() {
            self.syntax_set.find_syntax_plain_text()
        } else {
            self.syntax_set
                .find_syntax_by_token(language)
                .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
        };
        tracing::trace!(language, syntax = %syntax.name, "Highlighting code block");

        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, self.syntax_set, CLASS_STYLE);
        for line in LinesWithEndings::from(code) {
            generator
                .parse_html_for_line_which_includes_newline(line)
                .map_err(|e| MarkdownError::Highlight(e.to_string()))?;
        }

        Ok(generator.finalize())
    }

    /// Renders the CSS rules for highlighted spans in the given color mode.
    ///
    /// ## Errors
    ///
    /// Returns `MarkdownError::ThemeLoad` if the theme cannot be expressed as CSS.
    pub fn stylesheet(&self, color_mode: ColorMode) -> MarkdownResult<String> {
        css_for_theme_with_class_style(&self.theme(color_mode), CLASS_STYLE)
            .map_err(|e| MarkdownError::ThemeLoad(e.to_string()))
    }
}

impl Default for CodeHighlighter {
    fn default() -> Self {
        Self::new(ThemePair::OneHalf)
    }
}

/// Background and foreground colors of a theme as CSS hex strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    /// Background color (`#rrggbb`).
    pub background: String,
    /// Foreground color (`#rrggbb`).
    pub foreground: String,
}

impl Palette {
    /// Derives the palette of a theme pair in the given color mode.
    ///
    /// ## Examples
    ///
    /// ```
    /// use lumen_lib::markdown::highlighting::{ColorMode, Palette, ThemePair};
    ///
    /// let palette = Palette::for_theme(ThemePair::Github, ColorMode::Light);
    /// assert!(palette.background.starts_with('#'));
    /// ```
    pub fn for_theme(theme_pair: ThemePair, color_mode: ColorMode) -> Self {
        let theme = themes::load_theme(theme_pair, color_mode);
        let (default_bg, default_fg) = match color_mode {
            ColorMode::Dark => (Color { r: 40, g: 44, b: 52, a: 255 }, Color { r: 220, g: 223, b: 228, a: 255 }),
            ColorMode::Light => (Color { r: 255, g: 255, b: 255, a: 255 }, Color { r: 36, g: 41, b: 46, a: 255 }),
        };

        Self {
            background: hex(theme.settings.background.unwrap_or(default_bg)),
            foreground: hex(theme.settings.foreground.unwrap_or(default_fg)),
        }
    }
}

fn hex(color: Color) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_highlighter_new() {
        let highlighter = CodeHighlighter::new(ThemePair::Github);
        assert_eq!(highlighter.theme_pair(), ThemePair::Github);
    }

    #[test]
    fn test_code_highlighter_default() {
        assert_eq!(CodeHighlighter::default().theme_pair(), ThemePair::OneHalf);
    }

    #[test]
    fn test_highlight_produces_classed_spans() {
        let highlighter = CodeHighlighter::default();
        let html = highlighter.highlight("let x = 5;\n", "rust").unwrap();
        assert!(html.contains("class=\"hl-"));
        assert!(html.contains("let"));
    }

    #[test]
    fn test_highlight_escapes_markup() {
        let highlighter = CodeHighlighter::default();
        let html = highlighter.highlight("<script>alert(1)</script>\n", "").unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_highlight_unknown_language_falls_back() {
        let highlighter = CodeHighlighter::default();
        let html = highlighter.highlight("plain words\n", "no-such-language").unwrap();
        assert!(html.contains("plain words"));
    }

    #[test]
    fn test_stylesheet_uses_prefix() {
        let highlighter = CodeHighlighter::new(ThemePair::Github);
        let css = highlighter.stylesheet(ColorMode::Dark).unwrap();
        assert!(css.contains(".hl-"));
    }

    #[test]
    fn test_light_and_dark_stylesheets_differ() {
        let highlighter = CodeHighlighter::new(ThemePair::Solarized);
        let dark = highlighter.stylesheet(ColorMode::Dark).unwrap();
        let light = highlighter.stylesheet(ColorMode::Light).unwrap();
        assert_ne!(dark, light);
    }

    #[test]
    fn test_palette_hex_format() {
        let palette = Palette::for_theme(ThemePair::Nord, ColorMode::Dark);
        assert_eq!(palette.background.len(), 7);
        assert_eq!(palette.foreground.len(), 7);
    }
}
