//! Standalone viewer page.
//!
//! The page embeds the styles for both color modes, a toolbar with the search
//! box, match counter and theme toggle, and a small script that keeps the
//! browser behavior in line with [`SearchEngine`](crate::search::SearchEngine):
//! debounced case-insensitive search outside code and diagram blocks, Enter
//! and Shift+Enter to cycle, Escape to clear. The script also wires up the
//! copy buttons and persists the theme in `localStorage`.

use html_escape::{encode_double_quoted_attribute, encode_text};

use super::html::{HtmlOptions, generate_styles, render_document};
use crate::document::Document;
use crate::markdown::MarkdownResult;
use crate::mermaid::MERMAID_MODULE_SCRIPT;
use crate::viewer::DEFAULT_DEBOUNCE;

/// Renders a document as a complete HTML page.
///
/// Markers already present in the document are kept, and `query` prefills the
/// search box so the page opens in the same search state.
///
/// ## Errors
///
/// Returns an error if a code theme cannot be expressed as CSS.
#[tracing::instrument(level = "debug", skip(document, options))]
pub fn as_page(document: &Document, options: &HtmlOptions, query: Option<&str>) -> MarkdownResult<String> {
    let title = document.title().unwrap_or("Document");
    let styles = generate_styles(options)?;
    let query = query.unwrap_or("").trim();
    let markers = document.markers();
    let counter = match (query.is_empty(), markers.iter().position(|m| m.active)) {
        (true, _) => String::new(),
        (false, Some(active)) => format!("{} / {}", active + 1, markers.len()),
        (false, None) => "0 matches".to_string(),
    };
    let mermaid = if document.has_diagrams() {
        MERMAID_MODULE_SCRIPT
    } else {
        ""
    };
    let script = VIEWER_SCRIPT
        .replace("__DEBOUNCE_MS__", &DEFAULT_DEBOUNCE.as_millis().to_string())
        .replace("__OPAQUE__", OPAQUE_SELECTOR);

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en" data-theme="{mode}">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<script>document.documentElement.setAttribute('data-theme', localStorage.getItem('theme') || '{mode}');</script>
<style>
{styles}{PAGE_STYLES}</style>
</head>
<body class="lumen-document">
<header class="toolbar">
<input id="searchInput" type="search" placeholder="Search..." autocomplete="off" value="{value}">
<span id="searchCount" aria-live="polite">{counter}</span>
<button id="themeToggle" type="button" aria-label="Toggle theme">Toggle theme</button>
</header>
<main id="content">
{body}</main>
<script>
{script}</script>
{mermaid}</body>
</html>
"#,
        mode = options.color_mode,
        title = encode_text(title),
        value = encode_double_quoted_attribute(query),
        body = render_document(document),
    ))
}

/// Elements whose text the page script never searches. Mirrors the leaves
/// `Document::segments` treats as opaque, plus the rendered code titles.
const OPAQUE_SELECTOR: &str = ".code-block, .code-block-title, .mermaid, pre, mark";

const PAGE_STYLES: &str = r#"
body {
    margin: 0;
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
}

.toolbar {
    position: sticky;
    top: 0;
    z-index: 10;
    display: flex;
    gap: 0.5em;
    align-items: center;
    padding: 0.6em 1em;
    background-color: var(--bg);
    border-bottom: 1px solid var(--border);
}

#searchInput {
    flex: 1;
    max-width: 24em;
    padding: 0.3em 0.6em;
    background: var(--code-bg);
    color: var(--fg);
    border: 1px solid var(--border);
    border-radius: 4px;
}

#searchCount {
    min-width: 6em;
    font-size: 0.85em;
    opacity: 0.8;
}

#themeToggle {
    margin-left: auto;
    padding: 0.3em 0.8em;
    background: var(--code-bg);
    color: var(--fg);
    border: 1px solid var(--border);
    border-radius: 4px;
    cursor: pointer;
}

#content {
    max-width: 56em;
    margin: 0 auto;
    padding: 1em 2em 4em;
}
"#;

const VIEWER_SCRIPT: &str = r#"(() => {
  const content = document.getElementById('content');
  const searchInput = document.getElementById('searchInput');
  const searchCount = document.getElementById('searchCount');
  const themeToggle = document.getElementById('themeToggle');
  const skipped = '__OPAQUE__';

  let matches = Array.from(content.querySelectorAll('mark.search-hit'));
  let cursor = matches.findIndex(m => m.classList.contains('active'));
  let timer = null;

  function currentTheme() {
    return document.documentElement.getAttribute('data-theme') === 'light' ? 'light' : 'dark';
  }

  function renderDiagrams() {
    const mermaid = window.lumenMermaid;
    if (!mermaid) return;
    const blocks = content.querySelectorAll('pre.mermaid');
    blocks.forEach(block => {
      if (block.dataset.source === undefined) block.dataset.source = block.textContent;
      block.removeAttribute('data-processed');
      block.textContent = block.dataset.source;
    });
    mermaid.initialize({ startOnLoad: false, theme: currentTheme() === 'light' ? 'default' : 'dark' });
    mermaid.run({ nodes: blocks });
  }

  function applyTheme(theme) {
    document.documentElement.setAttribute('data-theme', theme);
    localStorage.setItem('theme', theme);
  }

  themeToggle.addEventListener('click', () => {
    applyTheme(currentTheme() === 'dark' ? 'light' : 'dark');
    renderDiagrams();
  });
  document.addEventListener('lumen:mermaid-ready', renderDiagrams);
  applyTheme(currentTheme());

  content.querySelectorAll('.copy-btn').forEach(button => {
    button.addEventListener('click', () => {
      const code = button.parentElement.querySelector('code');
      if (!code) return;
      navigator.clipboard.writeText(code.innerText);
      button.textContent = 'Copied!';
      setTimeout(() => { button.textContent = 'Copy'; }, 1200);
    });
  });

  function updateCount() {
    if (!searchInput.value.trim()) searchCount.textContent = '';
    else if (matches.length === 0) searchCount.textContent = '0 matches';
    else searchCount.textContent = (cursor + 1) + ' / ' + matches.length;
  }

  function clearMarks() {
    content.querySelectorAll('mark.search-hit').forEach(mark => {
      const parent = mark.parentNode;
      parent.replaceChild(document.createTextNode(mark.textContent), mark);
      parent.normalize();
    });
    matches = [];
    cursor = -1;
  }

  function lowerChars(text) {
    return Array.from(text).flatMap(c => Array.from(c.toLowerCase()));
  }

  function matchSpan(chars, start, needle) {
    let pending = 0;
    let units = 0;
    for (let i = start; i < chars.length; i++) {
      for (const lower of lowerChars(chars[i])) {
        if (lower !== needle[pending]) return null;
        pending += 1;
      }
      units += chars[i].length;
      if (pending === needle.length) return { units, count: i - start + 1 };
    }
    return null;
  }

  // Offsets are UTF-16 units into `text`; lowercasing is per character so a
  // length-changing fold never shifts later ranges.
  function findRanges(text, needle) {
    const chars = Array.from(text);
    const ranges = [];
    let offset = 0;
    let i = 0;
    while (needle.length > 0 && i < chars.length) {
      const span = matchSpan(chars, i, needle);
      if (span) {
        ranges.push([offset, offset + span.units]);
        offset += span.units;
        i += span.count;
      } else {
        offset += chars[i].length;
        i += 1;
      }
    }
    return ranges;
  }

  function wrapMatches(needle) {
    const walker = document.createTreeWalker(content, NodeFilter.SHOW_TEXT, {
      acceptNode: node => node.parentElement.closest(skipped)
        ? NodeFilter.FILTER_REJECT
        : NodeFilter.FILTER_ACCEPT
    });
    const nodes = [];
    while (walker.nextNode()) nodes.push(walker.currentNode);

    nodes.forEach(node => {
      const text = node.nodeValue;
      const ranges = findRanges(text, needle);
      if (ranges.length === 0) return;
      const fragment = document.createDocumentFragment();
      let last = 0;
      ranges.forEach(([start, end]) => {
        if (start > last) fragment.appendChild(document.createTextNode(text.slice(last, start)));
        const mark = document.createElement('mark');
        mark.className = 'search-hit';
        mark.textContent = text.slice(start, end);
        fragment.appendChild(mark);
        last = end;
      });
      if (last < text.length) fragment.appendChild(document.createTextNode(text.slice(last)));
      node.parentNode.replaceChild(fragment, node);
    });
  }

  function activate(index) {
    if (cursor >= 0 && matches[cursor]) matches[cursor].classList.remove('active');
    cursor = index;
    matches[cursor].classList.add('active');
    matches[cursor].scrollIntoView({ behavior: 'smooth', block: 'center' });
    updateCount();
  }

  function applyQuery() {
    clearMarks();
    const term = lowerChars(searchInput.value.trim());
    if (term.length > 0) {
      wrapMatches(term);
      matches = Array.from(content.querySelectorAll('mark.search-hit'));
      matches.forEach((mark, i) => { mark.dataset.match = String(i); });
    }
    if (matches.length > 0) activate(0);
    else updateCount();
  }

  function advance(step) {
    if (matches.length === 0) return;
    activate((cursor + step + matches.length) % matches.length);
  }

  searchInput.addEventListener('input', () => {
    clearTimeout(timer);
    timer = setTimeout(applyQuery, __DEBOUNCE_MS__);
  });

  searchInput.addEventListener('keydown', event => {
    if (event.key === 'Enter') {
      event.preventDefault();
      if (timer !== null) {
        clearTimeout(timer);
        timer = null;
        applyQuery();
        if (!event.shiftKey) return;
      }
      advance(event.shiftKey ? -1 : 1);
    } else if (event.key === 'Escape') {
      clearTimeout(timer);
      timer = null;
      searchInput.value = '';
      clearMarks();
      updateCount();
    }
  });

  if (cursor >= 0) matches[cursor].scrollIntoView({ behavior: 'smooth', block: 'center' });
})();
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::highlighting::ColorMode;
    use crate::search::SearchEngine;

    fn document(content: &str) -> Document {
        Document::parse(content, &HtmlOptions::default().parse_options()).unwrap()
    }

    #[test]
    fn test_page_has_toolbar_and_content() {
        let page = as_page(&document("# Guide\n\nBody"), &HtmlOptions::default(), None).unwrap();
        assert!(page.contains(r#"id="searchInput""#));
        assert!(page.contains(r#"id="searchCount""#));
        assert!(page.contains(r#"id="themeToggle""#));
        assert!(page.contains(r#"<main id="content">"#));
        assert!(page.contains("<title>Guide</title>"));
    }

    #[test]
    fn test_page_uses_initial_color_mode() {
        let mut options = HtmlOptions::default();
        options.color_mode = ColorMode::Light;
        let page = as_page(&document("text"), &options, None).unwrap();
        assert!(page.contains(r#"<html lang="en" data-theme="light">"#));
        assert!(page.contains("localStorage.getItem('theme') || 'light'"));
    }

    #[test]
    fn test_page_untitled_document() {
        let page = as_page(&document("no heading"), &HtmlOptions::default(), None).unwrap();
        assert!(page.contains("<title>Document</title>"));
    }

    #[test]
    fn test_page_keeps_search_state() {
        let mut doc = document("find me, find me");
        SearchEngine::new().apply_query(&mut doc, "find");
        let page = as_page(&doc, &HtmlOptions::default(), Some("find")).unwrap();
        assert!(page.contains(r#"value="find""#));
        assert!(page.contains(r#"<span id="searchCount" aria-live="polite">1 / 2</span>"#));
        assert!(page.contains(r#"class="search-hit active""#));
    }

    #[test]
    fn test_page_reports_zero_matches() {
        let mut doc = document("nothing");
        SearchEngine::new().apply_query(&mut doc, "zzz");
        let page = as_page(&doc, &HtmlOptions::default(), Some("zzz")).unwrap();
        assert!(page.contains(">0 matches</span>"));
    }

    #[test]
    fn test_query_value_is_escaped() {
        let page = as_page(&document("x"), &HtmlOptions::default(), Some("\"><script>")).unwrap();
        assert!(!page.contains("value=\"\"><script>"));
    }

    #[test]
    fn test_script_debounce_is_filled_in() {
        let page = as_page(&document("x"), &HtmlOptions::default(), None).unwrap();
        assert!(page.contains("setTimeout(applyQuery, 180)"));
        assert!(!page.contains("__DEBOUNCE_MS__"));
        assert!(!page.contains("__OPAQUE__"));
    }

    #[test]
    fn test_code_block_title_is_not_searchable() {
        let mut doc = document("```rust title=\"needle\"\nfn main() {}\n```\n\nneedle");
        let summary = SearchEngine::new().apply_query(&mut doc, "needle");
        assert_eq!(summary.count, 1);

        let page = as_page(&doc, &HtmlOptions::default(), Some("needle")).unwrap();
        assert!(page.contains(r#"<div class="code-block-title">needle</div>"#));
        assert!(OPAQUE_SELECTOR.split(", ").any(|s| s == ".code-block-title"));
        assert!(page.contains(&format!("const skipped = '{OPAQUE_SELECTOR}';")));
        assert!(page.contains("1 / 1"));
    }

    #[test]
    fn test_script_folds_case_per_character() {
        let page = as_page(&document("x"), &HtmlOptions::default(), None).unwrap();
        assert!(page.contains("const term = lowerChars(searchInput.value.trim());"));
        assert!(page.contains("for (const lower of lowerChars(chars[i]))"));
        assert!(!page.contains("text.toLowerCase()"));
    }

    #[test]
    fn test_mermaid_script_only_with_diagrams() {
        let plain = as_page(&document("x"), &HtmlOptions::default(), None).unwrap();
        assert!(!plain.contains("mermaid.esm.min.mjs"));

        let diagram = document("```mermaid\nflowchart LR\n    A --> B\n```");
        let page = as_page(&diagram, &HtmlOptions::default(), None).unwrap();
        assert!(page.contains("mermaid.esm.min.mjs"));
    }
}
