//! HTML output with class-based syntax highlighting.
//!
//! The document tree is written as plain semantic HTML. Code blocks carry
//! `hl-` classed spans and a copy button; diagrams become `<pre class="mermaid">`
//! blocks; search markers become `<mark class="search-hit">` elements.
//!
//! Styles cover both color modes at once. Everything theme dependent lives
//! under a `[data-theme="light"]` or `[data-theme="dark"]` scope, so changing
//! the attribute on an ancestor switches prose and code colors without
//! re-rendering.
//!
//! ## Examples
//!
//! ```
//! use lumen_lib::markdown::Markdown;
//! use lumen_lib::markdown::output::{HtmlOptions, as_html};
//!
//! let content = "# Hello World\n\n\
//!                ```rust\n\
//!                fn main() {\n    \
//!                    println!(\"Hello!\");\n\
//!                }\n\
//!                ```\n";
//!
//! let md: Markdown = content.into();
//! let html = as_html(&md, HtmlOptions::default()).unwrap();
//! assert!(html.contains("<code"));
//! assert!(html.contains("copy-btn"));
//! ```

use crate::document::{Document, Element, ElementKind, MermaidMode, Node, ParseOptions};
use crate::markdown::highlighting::{CodeHighlighter, ColorMode, Palette, ThemePair};
use crate::markdown::{Markdown, MarkdownResult};
use crate::mermaid::{MERMAID_MODULE_SCRIPT, Mermaid, mermaid_theme_name};
use html_escape::{encode_double_quoted_attribute, encode_text};

/// Options for HTML output with sensible defaults.
///
/// ## Examples
///
/// ```
/// use lumen_lib::markdown::output::HtmlOptions;
/// use lumen_lib::markdown::highlighting::{ThemePair, ColorMode};
///
/// let mut options = HtmlOptions::default();
/// options.code_theme = ThemePair::Github;
/// options.prose_theme = ThemePair::Github;
/// options.color_mode = ColorMode::Light;
/// options.include_styles = true;
/// ```
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct HtmlOptions {
    /// Theme pair for code blocks.
    pub code_theme: ThemePair,
    /// Theme pair for page colors.
    pub prose_theme: ThemePair,
    /// Initial color mode.
    pub color_mode: ColorMode,
    /// Include a `<style>` element.
    pub include_styles: bool,
    /// Controls how `mermaid` code blocks are rendered.
    pub mermaid_mode: MermaidMode,
    /// Render soft line breaks as `<br />`.
    pub hard_breaks: bool,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            code_theme: ThemePair::OneHalf,
            prose_theme: ThemePair::OneHalf,
            color_mode: ColorMode::Dark,
            include_styles: true,
            mermaid_mode: MermaidMode::default(),
            hard_breaks: true,
        }
    }
}

impl HtmlOptions {
    /// The parse options implied by these output options.
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            mermaid_mode: self.mermaid_mode,
            hard_breaks: self.hard_breaks,
        }
    }
}

/// Converts a markdown document to an HTML fragment.
///
/// The fragment is wrapped in a `<div class="lumen-document">` carrying the
/// color mode, preceded by the styles when requested and followed by the
/// mermaid.js scripts when the document has diagrams.
///
/// ## Errors
///
/// Returns an error if theme loading fails or highlighting encounters issues.
pub fn as_html(md: &Markdown, options: HtmlOptions) -> MarkdownResult<String> {
    let document = md.as_document(&options.parse_options())?;
    let mut output = String::new();

    if options.include_styles {
        output.push_str("<style>\n");
        output.push_str(&generate_styles(&options)?);
        output.push_str("</style>\n");
    }

    output.push_str(&format!(
        "<div class=\"lumen-document\" data-theme=\"{}\">\n",
        options.color_mode
    ));
    output.push_str(&render_document(&document));
    output.push_str("</div>\n");

    if document.has_diagrams() {
        output.push_str(&format!(
            "<script>document.addEventListener('lumen:mermaid-ready', () => {{ window.lumenMermaid.initialize({{ startOnLoad: false, theme: '{}' }}); window.lumenMermaid.run(); }});</script>\n",
            mermaid_theme_name(options.color_mode)
        ));
        output.push_str(MERMAID_MODULE_SCRIPT);
    }

    Ok(output)
}

/// Writes the body markup of a document.
pub fn render_document(document: &Document) -> String {
    let mut out = String::new();
    write_children(document.root(), &mut out);
    out
}

fn write_children(element: &Element, out: &mut String) {
    for child in &element.children {
        write_node(child, out);
    }
}

fn write_node(node: &Node, out: &mut String) {
    match node {
        Node::Text(text) => out.push_str(&encode_text(text)),
        Node::Marker(marker) => out.push_str(&format!(
            r#"<mark class="search-hit{}" data-match="{}">{}</mark>"#,
            if marker.active { " active" } else { "" },
            marker.ordinal,
            encode_text(&marker.text)
        )),
        Node::Element(element) => write_element(element, out),
    }
}

fn write_wrapped(tag: &str, element: &Element, out: &mut String) {
    out.push_str(&format!("<{tag}>"));
    write_children(element, out);
    out.push_str(&format!("</{tag}>"));
}

fn write_element(element: &Element, out: &mut String) {
    match &element.kind {
        ElementKind::Root | ElementKind::Group => write_children(element, out),
        ElementKind::Heading { level, id } => {
            out.push_str(&format!(
                "<h{level} id=\"{}\">",
                encode_double_quoted_attribute(id)
            ));
            write_children(element, out);
            out.push_str(&format!("</h{level}>\n"));
        }
        ElementKind::Paragraph => {
            write_wrapped("p", element, out);
            out.push('\n');
        }
        ElementKind::Emphasis => write_wrapped("em", element, out),
        ElementKind::Strong => write_wrapped("strong", element, out),
        ElementKind::Strikethrough => write_wrapped("del", element, out),
        ElementKind::InlineCode => write_wrapped("code", element, out),
        ElementKind::BlockQuote => {
            out.push_str("<blockquote>\n");
            write_children(element, out);
            out.push_str("</blockquote>\n");
        }
        ElementKind::List { start } => {
            let close = match start {
                Some(1) => {
                    out.push_str("<ol>\n");
                    "</ol>\n"
                }
                Some(n) => {
                    out.push_str(&format!("<ol start=\"{n}\">\n"));
                    "</ol>\n"
                }
                None => {
                    out.push_str("<ul>\n");
                    "</ul>\n"
                }
            };
            write_children(element, out);
            out.push_str(close);
        }
        ElementKind::Item => {
            write_wrapped("li", element, out);
            out.push('\n');
        }
        ElementKind::TaskMarker { checked } => out.push_str(if *checked {
            r#"<input type="checkbox" disabled checked /> "#
        } else {
            r#"<input type="checkbox" disabled /> "#
        }),
        ElementKind::Link { href, title } => {
            out.push_str(&format!(
                "<a href=\"{}\"{}>",
                encode_double_quoted_attribute(href),
                title_attr(title)
            ));
            write_children(element, out);
            out.push_str("</a>");
        }
        ElementKind::Image { src, alt, title } => out.push_str(&format!(
            "<img src=\"{}\" alt=\"{}\"{} />",
            encode_double_quoted_attribute(src),
            encode_double_quoted_attribute(alt),
            title_attr(title)
        )),
        ElementKind::CodeBlock {
            language,
            title,
            highlighted,
        } => {
            if let Some(title) = title {
                out.push_str(&format!(
                    "<div class=\"code-block-title\">{}</div>\n",
                    encode_text(title)
                ));
            }
            let class = match language {
                Some(lang) => format!(
                    " class=\"language-{}\"",
                    encode_double_quoted_attribute(lang)
                ),
                None => String::new(),
            };
            out.push_str(&format!(
                "<div class=\"code-block\"><button class=\"copy-btn\" type=\"button\" aria-label=\"Copy code\">Copy</button><pre><code{class}>{highlighted}</code></pre></div>\n"
            ));
        }
        ElementKind::Diagram { title } => {
            let mut diagram = Mermaid::new(element.text_content());
            if let Some(title) = title {
                diagram = diagram.with_title(title.as_str());
            }
            out.push_str(&diagram.render_for_html());
            out.push('\n');
        }
        ElementKind::Table { .. } => {
            out.push_str("<table>\n");
            let mut in_body = false;
            for child in &element.children {
                let is_row = matches!(
                    child,
                    Node::Element(Element {
                        kind: ElementKind::TableRow,
                        ..
                    })
                );
                if is_row && !in_body {
                    out.push_str("<tbody>\n");
                    in_body = true;
                }
                write_node(child, out);
            }
            if in_body {
                out.push_str("</tbody>\n");
            }
            out.push_str("</table>\n");
        }
        ElementKind::TableHead => {
            out.push_str("<thead><tr>");
            write_children(element, out);
            out.push_str("</tr></thead>\n");
        }
        ElementKind::TableRow => {
            out.push_str("<tr>");
            write_children(element, out);
            out.push_str("</tr>\n");
        }
        ElementKind::TableCell { header, align } => {
            let tag = if *header { "th" } else { "td" };
            match align.as_css() {
                Some(align) => out.push_str(&format!("<{tag} style=\"text-align: {align}\">")),
                None => out.push_str(&format!("<{tag}>")),
            }
            write_children(element, out);
            out.push_str(&format!("</{tag}>"));
        }
        ElementKind::Rule => out.push_str("<hr />\n"),
        ElementKind::LineBreak => out.push_str("<br />\n"),
    }
}

fn title_attr(title: &str) -> String {
    if title.is_empty() {
        String::new()
    } else {
        format!(" title=\"{}\"", encode_double_quoted_attribute(title))
    }
}

/// CSS for both color modes.
///
/// ## Errors
///
/// Returns `MarkdownError::ThemeLoad` if a code theme cannot be expressed as CSS.
pub(crate) fn generate_styles(options: &HtmlOptions) -> MarkdownResult<String> {
    let highlighter = CodeHighlighter::new(options.code_theme);
    let mut css = String::new();

    for mode in [ColorMode::Dark, ColorMode::Light] {
        let prose = Palette::for_theme(options.prose_theme, mode);
        let code = Palette::for_theme(options.code_theme, mode);
        let (mark_bg, mark_active_bg, border) = match mode {
            ColorMode::Dark => ("#6b5d1f", "#d19a66", "rgba(255, 255, 255, 0.12)"),
            ColorMode::Light => ("#fff3b8", "#ffb347", "rgba(0, 0, 0, 0.12)"),
        };
        css.push_str(&format!(
            r#"[data-theme="{mode}"] {{
    --bg: {};
    --fg: {};
    --code-bg: {};
    --code-fg: {};
    --border: {border};
    --mark-bg: {mark_bg};
    --mark-active-bg: {mark_active_bg};
}}

[data-theme="{mode}"] {{
{}
}}

"#,
            prose.background,
            prose.foreground,
            code.background,
            code.foreground,
            highlighter.stylesheet(mode)?
        ));
    }

    css.push_str(BASE_STYLES);
    Ok(css)
}

const BASE_STYLES: &str = r#".lumen-document {
    background-color: var(--bg);
    color: var(--fg);
    line-height: 1.6;
}

.code-block {
    position: relative;
    background-color: var(--code-bg);
    color: var(--code-fg);
    border-radius: 6px;
    margin: 1em 0;
    overflow-x: auto;
}

.code-block-title {
    background-color: var(--code-bg);
    color: var(--code-fg);
    border-bottom: 1px solid var(--border);
    padding: 0.5em 1em;
    font-weight: bold;
    border-radius: 6px 6px 0 0;
    margin-top: 1em;
}

.code-block-title + .code-block {
    margin-top: 0;
    border-radius: 0 0 6px 6px;
}

.copy-btn {
    position: absolute;
    top: 0.5em;
    right: 0.5em;
    padding: 0.2em 0.6em;
    font-size: 0.8em;
    border: 1px solid var(--border);
    border-radius: 4px;
    background: var(--bg);
    color: var(--fg);
    cursor: pointer;
    opacity: 0.7;
}

.copy-btn:hover {
    opacity: 1;
}

pre {
    margin: 0;
    padding: 1em;
}

code {
    font-family: 'Monaco', 'Menlo', 'Ubuntu Mono', monospace;
    font-size: 0.9em;
}

pre.mermaid {
    background: transparent;
    text-align: center;
}

table {
    border-collapse: collapse;
}

th, td {
    border: 1px solid var(--border);
    padding: 0.3em 0.7em;
}

mark.search-hit {
    background-color: var(--mark-bg);
    color: inherit;
    padding: 0.1em 0.2em;
    border-radius: 2px;
}

mark.search-hit.active {
    background-color: var(--mark-active-bg);
    color: #000;
}
"#;
