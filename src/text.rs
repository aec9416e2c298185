//! Text normalization shared by article derivation and cleanup.

use regex::Regex;
use std::sync::LazyLock;

static WHITESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->|<!\[CDATA\[|\]\]>").unwrap());

static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[a-zA-Z][^>]*>").unwrap());

/// Collapse every whitespace run to a single space and trim the ends.
pub fn squish(text: &str) -> String {
    WHITESPACE_REGEX.replace_all(text.trim(), " ").into_owned()
}

/// Remove HTML comment and CDATA markers, then squish.
pub fn strip_markers(text: &str) -> String {
    squish(&MARKER_REGEX.replace_all(text, ""))
}

/// Whether the text carries embedded markup (as opposed to plain prose).
pub fn contains_markup(text: &str) -> bool {
    TAG_REGEX.is_match(text)
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
