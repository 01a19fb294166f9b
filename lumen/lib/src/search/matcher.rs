//! Case-insensitive, non-overlapping substring matching.

use std::ops::Range;

/// Finds all non-overlapping case-insensitive occurrences of `needle`.
///
/// Scans left to right and resumes immediately after each match, so `"aa"`
/// occurs twice in `"aaaa"`. Ranges are byte offsets into `haystack` on char
/// boundaries. An empty needle never matches.
///
/// ## Examples
///
/// ```
/// use lumen_lib::search::find_matches;
///
/// assert_eq!(find_matches("aaaa", "aa"), vec![0..2, 2..4]);
/// assert_eq!(find_matches("Closures capture closures", "CLOSURE"), vec![0..7, 17..24]);
/// ```
pub fn find_matches(haystack: &str, needle: &str) -> Vec<Range<usize>> {
    let needle: Vec<char> = needle.chars().flat_map(char::to_lowercase).collect();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut matches = Vec::new();
    let mut start = 0;
    while let Some(first) = haystack[start..].chars().next() {
        match match_len(&haystack[start..], &needle) {
            Some(len) => {
                matches.push(start..start + len);
                start += len;
            }
            None => start += first.len_utf8(),
        }
    }
    matches
}

/// Byte length of the prefix of `rest` equal to `needle` ignoring case.
///
/// A match must end on a char boundary of `rest`.
fn match_len(rest: &str, needle: &[char]) -> Option<usize> {
    let mut pending = needle;
    for (offset, c) in rest.char_indices() {
        for lower in c.to_lowercase() {
            match pending.split_first() {
                Some((expected, tail)) if *expected == lower => pending = tail,
                _ => return None,
            }
        }
        if pending.is_empty() {
            return Some(offset + c.len_utf8());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_overlap() {
        assert_eq!(find_matches("aaaa", "aa"), vec![0..2, 2..4]);
        assert_eq!(find_matches("aaa", "aa"), vec![0..2]);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(find_matches("Rust rust RUST", "rUsT").len(), 3);
    }

    #[test]
    fn test_empty_needle_or_haystack() {
        assert!(find_matches("text", "").is_empty());
        assert!(find_matches("", "text").is_empty());
    }

    #[test]
    fn test_needle_longer_than_haystack() {
        assert!(find_matches("ab", "abc").is_empty());
    }

    #[test]
    fn test_multibyte_offsets() {
        let haystack = "crème brûlée, Crème";
        let matches = find_matches(haystack, "CRÈME");
        assert_eq!(matches.len(), 2);
        for range in matches {
            assert_eq!(haystack[range].to_lowercase(), "crème");
        }
    }

    #[test]
    fn test_no_partial_char_match() {
        // 'İ' lowercases to two chars; matching only the first is not a match
        assert!(find_matches("İ", "i").is_empty());
    }
}
