//! Builds a [`Document`] tree from markdown with pulldown-cmark.

use std::collections::HashMap;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use super::{CellAlign, Document, Element, ElementKind, Node};
use crate::markdown::MarkdownResult;
use crate::markdown::dsl::parse_code_info;
use crate::markdown::highlighting::CodeHighlighter;

/// How `mermaid` fenced code blocks are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MermaidMode {
    /// Render as diagrams in the browser.
    #[default]
    Diagram,
    /// Keep as highlighted code blocks.
    Code,
}

/// Options for building a document tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub mermaid_mode: MermaidMode,
    /// Render soft line breaks as hard breaks.
    pub hard_breaks: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            mermaid_mode: MermaidMode::Diagram,
            hard_breaks: true,
        }
    }
}

impl Document {
    /// Parses markdown into a document tree.
    ///
    /// Tables, strikethrough and task lists are enabled. Code blocks are
    /// syntax highlighted once, into theme independent CSS classes.
    ///
    /// ## Errors
    ///
    /// Returns `MarkdownError::Highlight` if a code block cannot be highlighted.
    ///
    /// ## Examples
    ///
    /// ```
    /// use lumen_lib::document::{Document, ParseOptions};
    ///
    /// let doc = Document::parse("```mermaid\nflowchart LR\n```", &ParseOptions::default()).unwrap();
    /// assert!(doc.has_diagrams());
    /// ```
    #[tracing::instrument(skip(content), fields(bytes = content.len()))]
    pub fn parse(content: &str, options: &ParseOptions) -> MarkdownResult<Document> {
        let mut parser_options = Options::empty();
        parser_options.insert(Options::ENABLE_TABLES);
        parser_options.insert(Options::ENABLE_STRIKETHROUGH);
        parser_options.insert(Options::ENABLE_TASKLISTS);

        let mut builder = TreeBuilder::new(*options);
        for event in Parser::new_ext(content, parser_options) {
            builder.event(event)?;
        }

        let document = builder.finish();
        tracing::debug!(
            segments = document.segments().len(),
            has_diagrams = document.has_diagrams(),
            "Built document tree"
        );
        Ok(document)
    }
}

struct PendingCode {
    info: Option<String>,
    source: String,
}

struct TreeBuilder {
    options: ParseOptions,
    highlighter: CodeHighlighter,
    stack: Vec<Element>,
    code: Option<PendingCode>,
    image_depth: usize,
    alt: String,
    alignments: Vec<CellAlign>,
    in_table_head: bool,
    column: usize,
    slugs: HashMap<String, usize>,
}

impl TreeBuilder {
    fn new(options: ParseOptions) -> Self {
        Self {
            options,
            highlighter: CodeHighlighter::default(),
            stack: vec![Element::new(ElementKind::Root)],
            code: None,
            image_depth: 0,
            alt: String::new(),
            alignments: Vec::new(),
            in_table_head: false,
            column: 0,
            slugs: HashMap::new(),
        }
    }

    fn event(&mut self, event: Event<'_>) -> MarkdownResult<()> {
        if self.code.is_some() {
            match event {
                Event::Text(text) => {
                    if let Some(code) = self.code.as_mut() {
                        code.source.push_str(&text);
                    }
                }
                Event::End(TagEnd::CodeBlock) => self.finish_code_block()?,
                _ => {}
            }
            return Ok(());
        }

        if self.image_depth > 0 {
            match event {
                Event::Start(Tag::Image { .. }) => self.image_depth += 1,
                Event::End(TagEnd::Image) => {
                    self.image_depth -= 1;
                    if self.image_depth == 0 {
                        self.finish_image();
                    }
                }
                Event::Text(text) | Event::Code(text) => self.alt.push_str(&text),
                _ => {}
            }
            return Ok(());
        }

        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) | Event::Html(text) | Event::InlineHtml(text) => {
                self.push_text(&text)
            }
            Event::InlineMath(text) | Event::DisplayMath(text) => self.push_text(&text),
            Event::Code(text) => {
                let mut code = Element::new(ElementKind::InlineCode);
                if !text.is_empty() {
                    code.children.push(Node::Text(text.to_string()));
                }
                self.append(Node::Element(code));
            }
            Event::FootnoteReference(label) => self.push_text(&format!("[{label}]")),
            Event::SoftBreak => {
                if self.options.hard_breaks {
                    self.append(Node::Element(Element::new(ElementKind::LineBreak)));
                } else {
                    self.push_text("\n");
                }
            }
            Event::HardBreak => self.append(Node::Element(Element::new(ElementKind::LineBreak))),
            Event::Rule => self.append(Node::Element(Element::new(ElementKind::Rule))),
            Event::TaskListMarker(checked) => {
                self.append(Node::Element(Element::new(ElementKind::TaskMarker { checked })))
            }
        }
        Ok(())
    }

    fn start(&mut self, tag: Tag<'_>) {
        let kind = match tag {
            Tag::Paragraph | Tag::HtmlBlock => ElementKind::Paragraph,
            Tag::Heading { level, id, .. } => ElementKind::Heading {
                level: heading_level(level),
                id: id.map(|id| id.to_string()).unwrap_or_default(),
            },
            Tag::BlockQuote(_) => ElementKind::BlockQuote,
            Tag::CodeBlock(kind) => {
                let info = match kind {
                    CodeBlockKind::Fenced(info) => Some(info.to_string()),
                    CodeBlockKind::Indented => None,
                };
                self.code = Some(PendingCode {
                    info,
                    source: String::new(),
                });
                return;
            }
            Tag::List(start) => ElementKind::List { start },
            Tag::Item => ElementKind::Item,
            Tag::Table(alignments) => {
                self.alignments = alignments.into_iter().map(CellAlign::from).collect();
                ElementKind::Table {
                    alignments: self.alignments.clone(),
                }
            }
            Tag::TableHead => {
                self.in_table_head = true;
                self.column = 0;
                ElementKind::TableHead
            }
            Tag::TableRow => {
                self.column = 0;
                ElementKind::TableRow
            }
            Tag::TableCell => ElementKind::TableCell {
                header: self.in_table_head,
                align: self.alignments.get(self.column).copied().unwrap_or_default(),
            },
            Tag::Emphasis => ElementKind::Emphasis,
            Tag::Strong => ElementKind::Strong,
            Tag::Strikethrough => ElementKind::Strikethrough,
            Tag::Link {
                dest_url, title, ..
            } => ElementKind::Link {
                href: dest_url.to_string(),
                title: title.to_string(),
            },
            Tag::Image {
                dest_url, title, ..
            } => {
                self.image_depth = 1;
                self.alt.clear();
                ElementKind::Image {
                    src: dest_url.to_string(),
                    alt: String::new(),
                    title: title.to_string(),
                }
            }
            _ => ElementKind::Group,
        };
        self.stack.push(Element::new(kind));
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::TableHead => {
                self.in_table_head = false;
                self.column = 0;
            }
            TagEnd::TableCell => self.column += 1,
            TagEnd::Table => self.alignments.clear(),
            _ => {}
        }
        self.close();
    }

    fn close(&mut self) {
        if self.stack.len() < 2 {
            return;
        }
        let Some(mut element) = self.stack.pop() else {
            return;
        };
        let needs_id = matches!(&element.kind, ElementKind::Heading { id, .. } if id.is_empty());
        if needs_id {
            let slug = self.unique_slug(slugify(&element.text_content()));
            if let ElementKind::Heading { id, .. } = &mut element.kind {
                *id = slug;
            }
        }
        self.append(Node::Element(element));
    }

    fn finish_image(&mut self) {
        if let Some(top) = self.stack.last_mut()
            && let ElementKind::Image { alt, .. } = &mut top.kind
        {
            *alt = std::mem::take(&mut self.alt);
        }
        self.close();
    }

    fn finish_code_block(&mut self) -> MarkdownResult<()> {
        let Some(code) = self.code.take() else {
            return Ok(());
        };
        let meta = code
            .info
            .as_deref()
            .map(parse_code_info)
            .unwrap_or_default();

        let kind = if meta.is_mermaid() && self.options.mermaid_mode == MermaidMode::Diagram {
            ElementKind::Diagram { title: meta.title }
        } else {
            let highlighted = self.highlighter.highlight(&code.source, &meta.language)?;
            ElementKind::CodeBlock {
                language: (!meta.language.is_empty()).then_some(meta.language),
                title: meta.title,
                highlighted,
            }
        };

        let mut element = Element::new(kind);
        if !code.source.is_empty() {
            element.children.push(Node::Text(code.source));
        }
        self.append(Node::Element(element));
        Ok(())
    }

    /// Appends text, merging it into a preceding text node.
    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let Some(top) = self.stack.last_mut() else {
            return;
        };
        if let Some(Node::Text(existing)) = top.children.last_mut() {
            existing.push_str(text);
        } else {
            top.children.push(Node::Text(text.to_string()));
        }
    }

    fn append(&mut self, node: Node) {
        if let Some(top) = self.stack.last_mut() {
            top.children.push(node);
        }
    }

    fn unique_slug(&mut self, base: String) -> String {
        let seen = self.slugs.entry(base.clone()).or_insert(0);
        let slug = match *seen {
            0 => base,
            n => format!("{base}-{n}"),
        };
        *seen += 1;
        slug
    }

    fn finish(mut self) -> Document {
        while self.stack.len() > 1 {
            self.close();
        }
        let root = self
            .stack
            .pop()
            .unwrap_or_else(|| Element::new(ElementKind::Root));
        Document::from_root(root)
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// GitHub-style heading anchor.
fn slugify(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            c if c.is_alphanumeric() || c == '-' || c == '_' => Some(c),
            c if c.is_whitespace() => Some('-'),
            _ => None,
        })
        .collect()
}
