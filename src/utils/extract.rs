//! Field extractors that pull comparable values out of raw reference fields.
//!
//! None of these fail: absence, ambiguity, and unparseable input all come
//! back as `None` so the calling stage can treat the field as inconclusive.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::config::Patterns;
use crate::models::{FieldValue, Reference};

// ASCII digits and ASCII word boundaries only
static TITLE_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u:\b)[0-9]{4}(?-u:\b)").expect("year pattern is valid")
});

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Find the DOI of a reference
///
/// The `doi` field wins when it matches the DOI pattern. Otherwise the URLs
/// are searched, and a DOI is returned only if exactly one URL carries one.
pub fn find_doi(reference: &Reference, patterns: &Patterns) -> Option<String> {
    if let Some(doi) = reference
        .doi
        .as_deref()
        .and_then(|field| extract_doi(field, &patterns.doi))
    {
        return Some(doi);
    }

    let mut found = reference
        .urls
        .iter()
        .filter_map(|url| extract_doi(url, &patterns.doi));

    match (found.next(), found.next()) {
        (Some(doi), None) => Some(doi),
        _ => None,
    }
}

/// Extract a DOI from free text, preferring the first capture group
fn extract_doi(text: &str, pattern: &Regex) -> Option<String> {
    let captures = pattern.captures(text)?;
    captures
        .get(1)
        .or_else(|| captures.get(0))
        .map(|m| m.as_str().to_string())
}

/// Convert a loosely formatted numeric-looking value to an integer
///
/// Numbers are returned as-is (floats truncated, and `None` when outside the
/// `i64` range). Strings must look numeric
/// once whitespace is removed; the non-numeric characters are then stripped
/// and the leading digit run is parsed, so `"10-20"` becomes `1020` and
/// `"12.7"` becomes `12`.
pub fn get_numeric(value: &FieldValue, patterns: &Patterns) -> Option<i64> {
    match value {
        FieldValue::Integer(n) => Some(*n),
        FieldValue::Float(n) => float_to_i64(*n),
        FieldValue::Text(text) => {
            let compact = patterns.looks_numeric_whitespace.replace_all(text, "");
            if !patterns.looks_numeric.is_match(&compact) {
                return None;
            }

            let digits = patterns.only_numeric.replace_all(&compact, "");
            let integer_part = digits.split('.').next().unwrap_or_default();
            if integer_part.is_empty() {
                return None;
            }

            integer_part.parse::<i64>().ok()
        }
    }
}

fn float_to_i64(n: f64) -> Option<i64> {
    let n = n.trunc();
    // i64::MAX as f64 rounds up to 2^63, which is itself out of range
    (n.is_finite() && n >= i64::MIN as f64 && n < i64::MAX as f64).then_some(n as i64)
}

/// Every word-bounded four digit number in a title, in order of appearance
pub fn title_years(title: &str) -> Vec<&str> {
    TITLE_YEAR.find_iter(title).map(|m| m.as_str()).collect()
}

/// Whether the years embedded in two titles disagree
///
/// Every year token of the longer list must also appear in the other list.
/// A lone year on one side is therefore enough to disagree.
pub fn title_years_conflict(years_a: &[&str], years_b: &[&str]) -> bool {
    if years_a.is_empty() && years_b.is_empty() {
        return false;
    }

    let set_b: HashSet<&str> = years_b.iter().copied().collect();
    let shared: HashSet<&str> = years_a
        .iter()
        .copied()
        .filter(|year| set_b.contains(year))
        .collect();

    shared.len() < years_a.len().max(years_b.len())
}

/// Remove filler words from a title and collapse the leftover whitespace
pub fn strip_junk_words(title: &str, patterns: &Patterns) -> String {
    let stripped = patterns.junk_words.replace_all(title, " ");
    WHITESPACE.replace_all(stripped.trim(), " ").into_owned()
}
