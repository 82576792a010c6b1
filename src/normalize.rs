//! Comparison normalization for classification values.
//!
//! Classification rules never compare raw cataloguing strings. Values are
//! reduced to a canonical compare form first: Unicode NFD decomposition,
//! removal of combining diacritical marks, lowercasing, and a final filter
//! keeping only `[a-z0-9æøå]`. The filter also drops whitespace, brackets
//! and the `¤` sort marker, so `"¤Hatten [bd. 1]"` and `"hattenbd1"` compare
//! equal.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Reduce a value to its canonical compare form.
///
/// # Examples
///
/// ```
/// use opencat_rules::normalize::strip;
///
/// assert_eq!(strip("Det lille ¤Hus"), "detlillehus");
/// assert_eq!(strip("São Paulo"), "saopaulo");
/// assert_eq!(strip("[Søen]"), "søen");
/// ```
#[must_use]
pub fn strip(value: &str) -> String {
    value
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .filter(|c| matches!(c, 'a'..='z' | '0'..='9' | 'æ' | 'ø' | 'å'))
        .collect()
}

/// Reduce a value to its compare form truncated to `cut` characters.
#[must_use]
pub fn strip_cut(value: &str, cut: usize) -> String {
    strip(value).chars().take(cut).collect()
}
