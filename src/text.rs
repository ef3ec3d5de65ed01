//! Text normalization shared by documents and queries.
//!
//! Both the lexical index and the embedding matrix are built from the output
//! of [`normalize`], and every query goes through the same function, so the
//! two sides always agree on what a token is.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref POSSESSIVE: Regex = Regex::new(r"'s\b").expect("valid possessive regex");
    static ref WHITESPACE: Regex = Regex::new(r"\s+").expect("valid whitespace regex");
    static ref DISALLOWED: Regex = Regex::new(r"[^a-z0-9 ]+").expect("valid filter regex");
    static ref SPACES: Regex = Regex::new(r" {2,}").expect("valid spaces regex");
}

/// Normalize free text into the searchable form.
///
/// Lowercases, strips a trailing possessive `'s`, drops every character
/// outside `[a-z0-9 ]`, collapses whitespace and trims. The function is total
/// and idempotent.
///
/// ```
/// use catalog_search::text::normalize;
///
/// assert_eq!(normalize("Women's COTTON shirt!!"), "women cotton shirt");
/// ```
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped = POSSESSIVE.replace_all(&lowered, "");
    // Tabs and newlines separate words, so they become spaces before filtering.
    let spaced = WHITESPACE.replace_all(&stripped, " ");
    let filtered = DISALLOWED.replace_all(&spaced, "");
    SPACES.replace_all(&filtered, " ").trim().to_string()
}

/// Normalize and split into tokens. Empty input yields an empty list.
pub fn tokenize(text: &str) -> Vec<String> {
    normalize(text)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}
