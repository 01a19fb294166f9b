//! Code block info-string parsing.
//!
//! The info string is the text after the opening backticks of a fenced code
//! block. Its first token is the language; the rest is a list of `key=value`
//! pairs of which `title` is understood:
//!
//! ````markdown
//! ```rust title="Main function"
//! fn main() {}
//! ```
//! ````

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Matches key="value", key='value' and key=value pairs.
    static ref KV_PATTERN: Regex = Regex::new(
        r#"([\w-]+)=(?:"([^"]*)"|'([^']*)'|(\S+))"#
    ).unwrap();
}

/// Metadata extracted from a code block's info string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeBlockMeta {
    /// Language identifier (first token), empty when absent.
    pub language: String,
    /// Optional title for the code block.
    pub title: Option<String>,
}

impl CodeBlockMeta {
    /// Returns true when the block declares a Mermaid diagram.
    pub fn is_mermaid(&self) -> bool {
        self.language.eq_ignore_ascii_case("mermaid")
    }
}

/// Parses a code block info string into metadata.
///
/// ## Examples
///
/// ```
/// use lumen_lib::markdown::dsl::parse_code_info;
///
/// let meta = parse_code_info("rust");
/// assert_eq!(meta.language, "rust");
/// assert!(meta.title.is_none());
///
/// let meta = parse_code_info(r#"ts title="Main function""#);
/// assert_eq!(meta.language, "ts");
/// assert_eq!(meta.title.as_deref(), Some("Main function"));
/// ```
pub fn parse_code_info(info_string: &str) -> CodeBlockMeta {
    let info_string = info_string.trim();
    if info_string.is_empty() {
        return CodeBlockMeta::default();
    }

    let (language, remainder) = info_string
        .split_once(char::is_whitespace)
        .unwrap_or((info_string, ""));

    let mut meta = CodeBlockMeta {
        language: language.to_string(),
        title: None,
    };

    for captures in KV_PATTERN.captures_iter(remainder) {
        let Some(key) = captures.get(1) else {
            continue;
        };
        let value = captures
            .get(2)
            .or_else(|| captures.get(3))
            .or_else(|| captures.get(4))
            .map(|m| m.as_str());

        if key.as_str() == "title"
            && let Some(value) = value
        {
            meta.title = Some(value.to_string());
        }
    }

    meta
}
