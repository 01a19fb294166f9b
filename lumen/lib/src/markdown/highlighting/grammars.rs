//! Grammar loading utilities for syntax highlighting.
//!
//! Provides the syntax set from two-face, which extends syntect's default
//! grammars with the languages curated by the bat project.

use lazy_static::lazy_static;
use syntect::parsing::SyntaxSet;
use two_face::syntax::extra_newlines as extra_syntax_set;

lazy_static! {
    /// Lazily loaded syntax set from two-face with extended grammars.
    static ref SYNTAX_SET: SyntaxSet = extra_syntax_set();
}

/// Returns the shared syntax set with extended grammars.
pub(super) fn syntax_set() -> &'static SyntaxSet {
    &SYNTAX_SET
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_set_not_empty() {
        assert!(!syntax_set().syntaxes().is_empty());
    }

    #[test]
    fn test_find_rust_syntax() {
        let syntax = syntax_set().find_syntax_by_extension("rs");
        assert_eq!(syntax.map(|s| s.name.as_str()), Some("Rust"));
    }

    #[test]
    fn test_find_javascript_by_token() {
        assert!(syntax_set().find_syntax_by_token("js").is_some());
        assert!(syntax_set().find_syntax_by_token("javascript").is_some());
    }

    #[test]
    fn test_find_typescript_syntax() {
        assert!(syntax_set().find_syntax_by_extension("ts").is_some());
    }
}
