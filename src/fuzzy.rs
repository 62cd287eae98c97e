//! Subsequence fuzzy matching.
//!
//! A needle matches when enough of its characters appear in the haystack in
//! needle order. Extra characters in the haystack are free; out-of-order
//! needle characters are not. One left-to-right scan, no edit distance.
//!
//! Matching is case-sensitive here; callers wanting case-insensitive
//! behavior normalize both sides first.

/// Fraction of `needle` found in `haystack` as an in-order subsequence,
/// in `0.0..=1.0`. An empty needle scores 0.
pub fn fuzzy_score(haystack: &str, needle: &str) -> f64 {
    let needle_len = needle.chars().count();
    if needle_len == 0 {
        return 0.0;
    }

    let mut pending = needle.chars().peekable();
    let mut matched = 0usize;
    for ch in haystack.chars() {
        if pending.peek() == Some(&ch) {
            pending.next();
            matched += 1;
            if pending.peek().is_none() {
                break;
            }
        }
    }

    matched as f64 / needle_len as f64
}

/// True when the subsequence score of `needle` against `haystack` exceeds
/// `threshold`. A score exactly equal to `threshold` is not a match.
pub fn fuzzy_match(haystack: &str, needle: &str, threshold: f64) -> bool {
    fuzzy_score(haystack, needle) > threshold
}
