//! Grapheme cluster segmentation.
//!
//! A grapheme cluster is the unit of substitution: an ideograph followed by
//! a variation selector, a base letter with combining marks, or a ZWJ/flag
//! emoji sequence each count as one character. Boundaries follow the
//! extended grapheme cluster rules of UAX #29, which are locale neutral.
//!
//! Every function here borrows from the input, so concatenating the
//! clusters of `split_graphemes(text)` reproduces `text` exactly.

use unicode_segmentation::UnicodeSegmentation;

/// Iterate over the extended grapheme clusters of `text`.
pub fn graphemes(text: &str) -> impl Iterator<Item = &str> {
    text.graphemes(true)
}

/// Split `text` into grapheme clusters, in order.
///
/// Each returned slice is non-empty.
pub fn split_graphemes(text: &str) -> Vec<&str> {
    // ASCII fast path; CR LF is a single cluster so it takes the slow path.
    if text.is_ascii() && !text.contains('\r') {
        return (0..text.len()).map(|i| &text[i..=i]).collect();
    }
    graphemes(text).collect()
}

/// Number of grapheme clusters in `text`.
pub fn grapheme_count(text: &str) -> usize {
    if text.is_ascii() && !text.contains('\r') {
        return text.len();
    }
    graphemes(text).count()
}

/// The cluster at a 0-based position, or `None` when the index is negative
/// or past the end.
pub fn grapheme_at(text: &str, index: i64) -> Option<&str> {
    let index = usize::try_from(index).ok()?;
    graphemes(text).nth(index)
}

/// Concatenate clusters back into a string.
pub fn join_graphemes<S: AsRef<str>>(parts: &[S]) -> String {
    let capacity = parts.iter().map(|part| part.as_ref().len()).sum();
    let mut joined = String::with_capacity(capacity);
    for part in parts {
        joined.push_str(part.as_ref());
    }
    joined
}
