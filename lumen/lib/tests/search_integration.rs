//! Integration tests for searching rendered documents.

mod common;

use common::{fixture_document, load_fixture};
use lumen_lib::document::{Document, MermaidMode, ParseOptions};
use lumen_lib::markdown::Markdown;
use lumen_lib::markdown::output::{HtmlOptions, as_page, render_document};
use lumen_lib::search::{Direction, ScrollRequest, SearchEngine};
use std::path::PathBuf;

fn searchable_occurrences(document: &Document, query: &str) -> usize {
    let needle = query.to_lowercase();
    document
        .segments()
        .iter()
        .filter(|segment| !segment.opaque)
        .map(|segment| segment.text.to_lowercase().matches(&needle).count())
        .sum()
}

#[test]
fn test_guide_matches_skip_code_and_diagrams() {
    let mut document = fixture_document("guide.md");
    let mut engine = SearchEngine::new();

    let summary = engine.apply_query(&mut document, "closure");

    // heading, two in the first paragraph, inline code, quote, two list items
    assert_eq!(summary.count, 7);
    assert_eq!(summary.count, searchable_occurrences(&document, "closure"));
    assert!(document.text_content().to_lowercase().matches("closure").count() > summary.count);
}

#[test]
fn test_guide_title_and_diagram() {
    let document = fixture_document("guide.md");
    assert_eq!(document.title(), Some("Closures Guide"));
    assert!(document.has_diagrams());
}

#[test]
fn test_diagram_text_is_searchable_when_rendered_as_code() {
    let options = ParseOptions {
        mermaid_mode: MermaidMode::Code,
        ..ParseOptions::default()
    };
    let mut document = Document::parse(&load_fixture("guide.md"), &options).unwrap();
    let mut engine = SearchEngine::new();

    // still a code block, still opaque
    assert_eq!(engine.apply_query(&mut document, "environment").count, 1);
}

#[test]
fn test_plain_fixture_positions() {
    let mut document = fixture_document("plain.md");
    let mut engine = SearchEngine::new();

    engine.apply_query(&mut document, "closure");

    let positions: Vec<(usize, usize)> = engine.matches().iter().map(|m| (m.start, m.end)).collect();
    assert_eq!(positions, vec![(0, 7), (17, 24)]);
    assert_eq!(engine.cursor(), Some(0));
}

#[test]
fn test_cycle_through_guide() {
    let mut document = fixture_document("guide.md");
    let mut engine = SearchEngine::new();
    let count = engine.apply_query(&mut document, "closure").count;

    let mut visited = vec![0];
    for _ in 0..count {
        let scroll = engine.advance(&mut document, Direction::Next).unwrap();
        visited.push(scroll.marker);
    }

    let expected: Vec<usize> = (0..count).chain([0]).collect();
    assert_eq!(visited, expected);
    assert_eq!(document.markers().iter().filter(|m| m.active).count(), 1);
}

#[test]
fn test_clear_restores_fixture() {
    let original = fixture_document("guide.md");
    let mut document = original.clone();
    let mut engine = SearchEngine::new();

    engine.apply_query(&mut document, "capture");
    engine.apply_query(&mut document, "a");
    engine.clear(&mut document);

    assert_eq!(document, original);
    assert_eq!(render_document(&document), render_document(&original));
}

#[test]
fn test_page_contains_markers() {
    let mut document = fixture_document("guide.md");
    let mut engine = SearchEngine::new();
    let summary = engine.apply_query(&mut document, "closure");
    assert_eq!(summary.scroll, Some(ScrollRequest::centered(0)));

    let page = as_page(&document, &HtmlOptions::default(), Some("closure")).unwrap();

    assert_eq!(page.matches("<mark class=\"search-hit").count(), 7);
    assert_eq!(page.matches("search-hit active").count(), 1);
    assert!(page.contains("1 / 7"));
    assert!(page.contains("<div class=\"code-block-title\">counter.js</div>"));
}

#[test]
fn test_markdown_from_path_to_document() {
    let path: PathBuf = [env!("CARGO_MANIFEST_DIR"), "tests", "fixtures", "guide.md"]
        .iter()
        .collect();
    let md = Markdown::try_from(path.as_path()).unwrap();
    let document = md.as_document(&ParseOptions::default()).unwrap();
    assert_eq!(document, fixture_document("guide.md"));
}
