//! Whitespace normalization and tokenization.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static RE_NUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\p{Nd}+$").unwrap());

/// Collapse whitespace runs into single spaces and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    RE_WHITESPACE.replace_all(text, " ").trim().to_string()
}

/// Replace every whitespace run, newlines included, with one space. Unlike
/// [`collapse_whitespace`] the ends are kept so inline fragments still join.
pub fn flatten_whitespace(text: &str) -> String {
    RE_WHITESPACE.replace_all(text, " ").into_owned()
}

/// NFC-compose `text`, then collapse its whitespace.
pub fn normalize(text: &str) -> String {
    let nfc: String = text.nfc().collect();
    collapse_whitespace(&nfc)
}

/// Split normalized text into words, dropping empty tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    normalize(text)
        .split(' ')
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

pub fn is_numeric(text: &str) -> bool {
    RE_NUMERIC.is_match(text)
}
