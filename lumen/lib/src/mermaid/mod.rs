//! Mermaid diagram blocks for HTML output.
//!
//! Diagrams are emitted as `<pre class="mermaid">` elements holding the
//! escaped diagram source; the browser renders them with mermaid.js. The
//! module script exposes mermaid to the page script, which picks the diagram
//! theme from the active color mode and re-renders on theme changes.

mod render_html;

pub use render_html::detect_diagram_type;

use crate::markdown::highlighting::ColorMode;
use xxhash_rust::xxh64::xxh64;

/// Module script that loads mermaid.js and hands it to the page script.
pub const MERMAID_MODULE_SCRIPT: &str = r#"<script type="module">
  import mermaid from 'https://cdn.jsdelivr.net/npm/mermaid@11/dist/mermaid.esm.min.mjs';
  window.lumenMermaid = mermaid;
  document.dispatchEvent(new Event('lumen:mermaid-ready'));
</script>
"#;

/// A Mermaid diagram with an optional title.
///
/// ## Examples
///
/// ```rust
/// use lumen_lib::mermaid::Mermaid;
///
/// let diagram = Mermaid::new("flowchart LR\n    A --> B").with_title("My Flowchart");
/// assert_eq!(diagram.alt_text(), "My Flowchart");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mermaid {
    instructions: String,
    title: Option<String>,
}

impl Mermaid {
    /// Creates a new Mermaid diagram with the given instructions.
    pub fn new<S: Into<String>>(instructions: S) -> Self {
        let instructions = instructions.into();
        tracing::trace!(instructions_len = instructions.len(), "Creating Mermaid diagram");
        Self {
            instructions,
            title: None,
        }
    }

    /// Sets the diagram title (also used for alt text).
    pub fn with_title<S: Into<String>>(mut self, title: S) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Returns the raw instructions.
    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    /// Returns the title if set.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Returns the XXH64 hash of the instructions with blank lines removed.
    pub fn hash(&self) -> u64 {
        let normalized: Vec<&str> = self
            .instructions
            .lines()
            .filter(|line| !line.trim().is_empty())
            .collect();
        xxh64(normalized.join("\n").as_bytes(), 0)
    }

    /// Returns alt text for accessibility.
    ///
    /// Uses the explicit title if set, otherwise detects the diagram type
    /// from the first line of instructions.
    pub fn alt_text(&self) -> String {
        match &self.title {
            Some(title) => title.clone(),
            None => detect_diagram_type(&self.instructions).to_string(),
        }
    }

    /// Renders the `<pre class="mermaid">` element with ARIA attributes.
    ///
    /// Pages holding diagrams also need [`MERMAID_MODULE_SCRIPT`] once.
    pub fn render_for_html(&self) -> String {
        use html_escape::{encode_double_quoted_attribute, encode_text};

        let alt = self.alt_text();
        let title_attr = match &self.title {
            Some(title) => format!(r#" title="{}""#, encode_double_quoted_attribute(title)),
            None => String::new(),
        };

        format!(
            r#"<pre class="mermaid" role="img" aria-label="{}" data-diagram="{:016x}"{}>{}</pre>"#,
            encode_double_quoted_attribute(&alt),
            self.hash(),
            title_attr,
            encode_text(&self.instructions)
        )
    }
}

/// Returns the mermaid.js theme name used for a color mode.
pub const fn mermaid_theme_name(mode: ColorMode) -> &'static str {
    match mode {
        ColorMode::Light => "default",
        ColorMode::Dark => "dark",
    }
}

impl From<&str> for Mermaid {
    fn from(instructions: &str) -> Self {
        Self::new(instructions)
    }
}

impl From<String> for Mermaid {
    fn from(instructions: String) -> Self {
        Self::new(instructions)
    }
}
