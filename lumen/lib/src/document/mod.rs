//! Logical document tree produced by the renderer pipeline.
//!
//! A [`Document`] is an ordered tree of [`Element`]s whose leaves are plain
//! text runs and search [`Marker`]s. Code blocks and diagram blocks are
//! *opaque*: their text is part of the document but never searched.
//!
//! Trees built by [`Document::parse`] are normalized: no text node is empty
//! and no two text nodes are adjacent. Every maximal run of adjacent leaves is
//! one [`TextSegment`], so segment indexes stay stable while markers are
//! inserted into and removed from the tree.

mod build;

pub use build::{MermaidMode, ParseOptions};

use pulldown_cmark::Alignment;

/// Horizontal alignment of a table column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CellAlign {
    #[default]
    None,
    Left,
    Center,
    Right,
}

impl CellAlign {
    /// CSS `text-align` value, if any.
    pub fn as_css(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Left => Some("left"),
            Self::Center => Some("center"),
            Self::Right => Some("right"),
        }
    }
}

impl From<Alignment> for CellAlign {
    fn from(alignment: Alignment) -> Self {
        match alignment {
            Alignment::None => Self::None,
            Alignment::Left => Self::Left,
            Alignment::Center => Self::Center,
            Alignment::Right => Self::Right,
        }
    }
}

/// The kind of a structural element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    /// Document root.
    Root,
    /// Transparent container for constructs without their own markup.
    Group,
    Heading {
        level: u8,
        id: String,
    },
    Paragraph,
    Emphasis,
    Strong,
    Strikethrough,
    BlockQuote,
    /// Ordered list when `start` is set, bullet list otherwise.
    List {
        start: Option<u64>,
    },
    Item,
    TaskMarker {
        checked: bool,
    },
    Link {
        href: String,
        title: String,
    },
    Image {
        src: String,
        alt: String,
        title: String,
    },
    InlineCode,
    /// Fenced or indented code; a single text child holds the source.
    CodeBlock {
        language: Option<String>,
        title: Option<String>,
        /// Class-annotated HTML of the source.
        highlighted: String,
    },
    /// Mermaid diagram; a single text child holds the diagram source.
    Diagram {
        title: Option<String>,
    },
    Table {
        alignments: Vec<CellAlign>,
    },
    TableHead,
    TableRow,
    TableCell {
        header: bool,
        align: CellAlign,
    },
    Rule,
    LineBreak,
}

impl ElementKind {
    /// Returns true for regions excluded from search.
    pub fn is_opaque(&self) -> bool {
        matches!(self, Self::CodeBlock { .. } | Self::Diagram { .. })
    }
}

/// A search marker wrapping one match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    /// Position of the match in document order.
    pub ordinal: usize,
    /// The matched text, exactly as it appears in the document.
    pub text: String,
    /// Whether this is the match under the cursor.
    pub active: bool,
}

/// A node of the document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    Marker(Marker),
}

/// A structural element and its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub kind: ElementKind,
    pub children: Vec<Node>,
}

impl Element {
    /// Creates an element without children.
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
        }
    }

    /// Creates an element with the given children.
    pub fn with_children(kind: ElementKind, children: Vec<Node>) -> Self {
        Self { kind, children }
    }

    /// Concatenated text of all leaves below this element.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }
}

fn collect_text(element: &Element, out: &mut String) {
    for child in &element.children {
        match child {
            Node::Element(inner) => collect_text(inner, out),
            Node::Text(text) => out.push_str(text),
            Node::Marker(marker) => out.push_str(&marker.text),
        }
    }
}

/// A maximal run of adjacent text leaves under one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSegment {
    pub text: String,
    /// True inside code blocks and diagram blocks.
    pub opaque: bool,
}

/// A rendered markdown document.
///
/// ## Examples
///
/// ```
/// use lumen_lib::document::{Document, ParseOptions};
///
/// let doc = Document::parse("# Guide\n\nSome *text*.", &ParseOptions::default()).unwrap();
/// assert_eq!(doc.title(), Some("Guide"));
/// assert_eq!(doc.segments().len(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Element,
    title: Option<String>,
    has_diagrams: bool,
}

impl Document {
    /// Wraps an already built root element.
    ///
    /// The title is taken from the first level-1 heading.
    pub fn from_root(root: Element) -> Self {
        let title = find_title(&root);
        let has_diagrams = contains_diagram(&root);
        Self {
            root,
            title,
            has_diagrams,
        }
    }

    /// The root element.
    pub fn root(&self) -> &Element {
        &self.root
    }

    pub(crate) fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    /// Text of the first level-1 heading.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Whether the document contains at least one diagram block.
    pub fn has_diagrams(&self) -> bool {
        self.has_diagrams
    }

    /// The full text of the document, opaque regions included.
    pub fn text_content(&self) -> String {
        self.root.text_content()
    }

    /// Text segments in document order.
    pub fn segments(&self) -> Vec<TextSegment> {
        let mut segments = Vec::new();
        collect_segments(&self.root, self.root.kind.is_opaque(), &mut segments);
        segments
    }

    /// All markers in document order.
    pub fn markers(&self) -> Vec<&Marker> {
        let mut markers = Vec::new();
        collect_markers(&self.root, &mut markers);
        markers
    }

    /// Number of markers in the tree.
    pub fn marker_count(&self) -> usize {
        self.markers().len()
    }

    /// The marker with the given ordinal, if present.
    pub fn marker_mut(&mut self, ordinal: usize) -> Option<&mut Marker> {
        find_marker_mut(&mut self.root, ordinal)
    }
}

fn collect_segments(element: &Element, opaque: bool, out: &mut Vec<TextSegment>) {
    let mut run: Option<String> = None;
    for child in &element.children {
        match child {
            Node::Element(inner) => {
                if let Some(text) = run.take() {
                    out.push(TextSegment { text, opaque });
                }
                collect_segments(inner, opaque || inner.kind.is_opaque(), out);
            }
            Node::Text(text) => run.get_or_insert_with(String::new).push_str(text),
            Node::Marker(marker) => run.get_or_insert_with(String::new).push_str(&marker.text),
        }
    }
    if let Some(text) = run {
        out.push(TextSegment { text, opaque });
    }
}

fn collect_markers<'a>(element: &'a Element, out: &mut Vec<&'a Marker>) {
    for child in &element.children {
        match child {
            Node::Element(inner) => collect_markers(inner, out),
            Node::Marker(marker) => out.push(marker),
            Node::Text(_) => {}
        }
    }
}

fn find_marker_mut(element: &mut Element, ordinal: usize) -> Option<&mut Marker> {
    for child in &mut element.children {
        match child {
            Node::Element(inner) => {
                if let Some(marker) = find_marker_mut(inner, ordinal) {
                    return Some(marker);
                }
            }
            Node::Marker(marker) if marker.ordinal == ordinal => return Some(marker),
            _ => {}
        }
    }
    None
}

fn find_title(element: &Element) -> Option<String> {
    for child in &element.children {
        if let Node::Element(inner) = child {
            if let ElementKind::Heading { level: 1, .. } = inner.kind {
                return Some(inner.text_content());
            }
            if let Some(title) = find_title(inner) {
                return Some(title);
            }
        }
    }
    None
}

fn contains_diagram(element: &Element) -> bool {
    element.children.iter().any(|child| match child {
        Node::Element(inner) => {
            matches!(inner.kind, ElementKind::Diagram { .. }) || contains_diagram(inner)
        }
        _ => false,
    })
}
