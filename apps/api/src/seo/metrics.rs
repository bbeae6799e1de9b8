//! Text metrics: primitive counts over markup-bearing article text.
//!
//! Tags are matched with regexes, not parsed. Malformed or self-closing tags get
//! no special treatment, and stripped tags are replaced by nothing (adjacent text
//! runs are glued together).

use once_cell::sync::Lazy;
use regex::Regex;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());
static SENTENCE_BREAK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").unwrap());
static NON_LETTER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z]").unwrap());
static VOWEL_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[aeiouy]+").unwrap());
static H1_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<h1[^>]*>").unwrap());
static H2_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<h2[^>]*>").unwrap());
static H3_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<h3[^>]*>").unwrap());
static ANCHOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<a[^>]*href=[^>]*>").unwrap());

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeadingCounts {
    pub h1: usize,
    pub h2: usize,
    pub h3: usize,
}

pub fn strip_tags(text: &str) -> String {
    TAG_RE.replace_all(text, "").into_owned()
}

/// Whitespace-separated tokens of the tag-stripped text.
pub fn words(text: &str) -> Vec<String> {
    strip_tags(text)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

pub fn word_count(text: &str) -> usize {
    strip_tags(text).split_whitespace().count()
}

pub fn sentence_count(text: &str) -> usize {
    let plain = strip_tags(text);
    SENTENCE_BREAK_RE
        .split(&plain)
        .filter(|s| !s.trim().is_empty())
        .count()
}

/// Heuristic syllable estimate over the whole text.
///
/// Lower-cases, drops everything but ASCII letters, collapses each vowel run
/// (`aeiouy`) to one marker, drops a trailing marker, and counts what remains.
/// Consonants are counted too. This is deliberately not a dictionary lookup:
/// the readability bands are calibrated against exactly this estimate.
/// Never returns less than 1.
pub fn syllable_count(text: &str) -> usize {
    let lower = text.to_lowercase();
    let letters = NON_LETTER_RE.replace_all(&lower, "");
    let collapsed = VOWEL_RUN_RE.replace_all(&letters, "a");
    let trimmed = collapsed.strip_suffix('a').unwrap_or(&collapsed);
    trimmed.len().max(1)
}

pub fn heading_counts(text: &str) -> HeadingCounts {
    HeadingCounts {
        h1: H1_RE.find_iter(text).count(),
        h2: H2_RE.find_iter(text).count(),
        h3: H3_RE.find_iter(text).count(),
    }
}

/// Anchors whose tag text has no `http` (relative links) or points at `localhost`.
pub fn internal_link_count(text: &str) -> usize {
    ANCHOR_RE
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|tag| !tag.contains("http") || tag.contains("localhost"))
        .count()
}

/// Percentage of tag-stripped words containing `keyword` (case-insensitive).
///
/// Returns `None` when the text has no words, since the ratio is undefined.
pub fn keyword_density(text: &str, keyword: &str) -> Option<f64> {
    let words = words(text);
    if words.is_empty() {
        return None;
    }
    let needle = keyword.to_lowercase();
    let hits = words
        .iter()
        .filter(|w| w.to_lowercase().contains(&needle))
        .count();
    Some(hits as f64 / words.len() as f64 * 100.0)
}
