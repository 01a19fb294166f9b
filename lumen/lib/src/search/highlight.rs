//! Marker insertion and removal on the document tree.

use super::matcher::find_matches;
use super::types::Match;
use crate::document::{Element, Marker, Node};

/// Replaces every marker with its text and re-normalizes the tree.
///
/// Adjacent text nodes are merged and empty ones dropped, which restores a
/// tree built by [`Document::parse`](crate::document::Document::parse) exactly.
/// Returns the number of markers removed.
pub(crate) fn unwrap_markers(element: &mut Element) -> usize {
    let mut removed = 0;
    let children = std::mem::take(&mut element.children);
    let mut normalized: Vec<Node> = Vec::with_capacity(children.len());

    for child in children {
        let child = match child {
            Node::Marker(marker) => {
                removed += 1;
                Node::Text(marker.text)
            }
            Node::Element(mut inner) => {
                removed += unwrap_markers(&mut inner);
                Node::Element(inner)
            }
            text => text,
        };

        if let Node::Text(text) = &child {
            if text.is_empty() {
                continue;
            }
            if let Some(Node::Text(previous)) = normalized.last_mut() {
                previous.push_str(text);
                continue;
            }
        }
        normalized.push(child);
    }

    element.children = normalized;
    removed
}

struct WrapState<'q> {
    needle: &'q str,
    segment: usize,
    matches: Vec<Match>,
}

/// Wraps every match of `needle` outside opaque regions in an inactive marker.
///
/// Segments are numbered exactly as [`Document::segments`] numbers them,
/// opaque ones included. Expects a tree without markers.
///
/// [`Document::segments`]: crate::document::Document::segments
pub(crate) fn wrap_matches(root: &mut Element, needle: &str) -> Vec<Match> {
    let mut state = WrapState {
        needle,
        segment: 0,
        matches: Vec::new(),
    };
    let opaque = root.kind.is_opaque();
    wrap_element(root, opaque, &mut state);
    state.matches
}

fn wrap_element(element: &mut Element, opaque: bool, state: &mut WrapState<'_>) {
    let children = std::mem::take(&mut element.children);
    let mut rebuilt = Vec::with_capacity(children.len());
    // (segment index, char offset of the next leaf within the segment)
    let mut run: Option<(usize, usize)> = None;

    for child in children {
        match child {
            Node::Element(mut inner) => {
                run = None;
                let inner_opaque = opaque || inner.kind.is_opaque();
                wrap_element(&mut inner, inner_opaque, state);
                rebuilt.push(Node::Element(inner));
            }
            leaf => {
                let (segment, offset) = *run.get_or_insert_with(|| {
                    let index = state.segment;
                    state.segment += 1;
                    (index, 0)
                });
                let consumed = match leaf {
                    Node::Text(text) if !opaque => {
                        split_text(text, segment, offset, state, &mut rebuilt)
                    }
                    Node::Text(text) => {
                        let len = text.chars().count();
                        rebuilt.push(Node::Text(text));
                        len
                    }
                    Node::Marker(marker) => {
                        let len = marker.text.chars().count();
                        rebuilt.push(Node::Marker(marker));
                        len
                    }
                    Node::Element(_) => 0,
                };
                run = Some((segment, offset + consumed));
            }
        }
    }

    element.children = rebuilt;
}

/// Splits one text leaf into fragments and markers; returns its char length.
fn split_text(
    text: String,
    segment: usize,
    offset: usize,
    state: &mut WrapState<'_>,
    out: &mut Vec<Node>,
) -> usize {
    let ranges = find_matches(&text, state.needle);
    if ranges.is_empty() {
        let len = text.chars().count();
        out.push(Node::Text(text));
        return len;
    }

    let mut cursor_bytes = 0;
    let mut cursor_chars = offset;
    for range in ranges {
        let before = &text[cursor_bytes..range.start];
        if !before.is_empty() {
            out.push(Node::Text(before.to_string()));
        }
        let start = cursor_chars + before.chars().count();
        let matched = &text[range.clone()];
        let end = start + matched.chars().count();

        out.push(Node::Marker(Marker {
            ordinal: state.matches.len(),
            text: matched.to_string(),
            active: false,
        }));
        state.matches.push(Match {
            segment,
            start,
            end,
        });

        cursor_bytes = range.end;
        cursor_chars = end;
    }

    let after = &text[cursor_bytes..];
    if !after.is_empty() {
        out.push(Node::Text(after.to_string()));
    }
    cursor_chars + after.chars().count() - offset
}
