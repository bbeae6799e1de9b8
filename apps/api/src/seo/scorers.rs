//! Sub-scorers. Each maps one aspect of a draft to an integer in 0–100.
//!
//! Bands overlap on purpose: they are checked top to bottom and the first
//! match wins, so narrower (better) bands take precedence.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::seo::metrics::{
    heading_counts, keyword_density, sentence_count, strip_tags, syllable_count, word_count,
};

static CALL_TO_ACTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(learn|discover|find|get|download|try|start|explore)\b").unwrap()
});

/// Neutral keyword score used when the draft has no target keyword.
pub const NEUTRAL_KEYWORD_SCORE: u8 = 50;

/// Readability never drops below this band, however dense the prose.
pub const READABILITY_FLOOR: u8 = 50;

/// Character index of `needle` in `haystack`, both compared lower-cased.
fn find_case_insensitive(haystack: &str, needle: &str) -> Option<usize> {
    let haystack = haystack.to_lowercase();
    let needle = needle.to_lowercase();
    haystack
        .find(&needle)
        .map(|byte_idx| haystack[..byte_idx].chars().count())
}

pub fn title_score(title: &str, keyword: Option<&str>) -> u8 {
    if title.is_empty() {
        return 0;
    }

    let len = title.chars().count();
    let mut score: u32 = if (50..=60).contains(&len) {
        40
    } else if (40..=70).contains(&len) {
        30
    } else if len >= 30 {
        20
    } else {
        0
    };

    if let Some(index) = keyword.and_then(|kw| find_case_insensitive(title, kw)) {
        score += 40;
        if index <= 10 {
            score += 20;
        } else if index <= 30 {
            score += 10;
        }
    }

    score.min(100) as u8
}

pub fn meta_description_score(meta_description: Option<&str>, keyword: Option<&str>) -> u8 {
    let meta = match meta_description {
        Some(m) if !m.is_empty() => m,
        _ => return 0,
    };

    let len = meta.chars().count();
    let mut score: u32 = if (150..=160).contains(&len) {
        50
    } else if (120..=170).contains(&len) {
        40
    } else if len >= 100 {
        30
    } else {
        0
    };

    if keyword.is_some_and(|kw| find_case_insensitive(meta, kw).is_some()) {
        score += 30;
    }

    if CALL_TO_ACTION_RE.is_match(meta) {
        score += 20;
    }

    score.min(100) as u8
}

pub fn keyword_density_score(body: &str, keyword: Option<&str>) -> u8 {
    let keyword = match keyword {
        Some(kw) => kw,
        None => return NEUTRAL_KEYWORD_SCORE,
    };

    // A body without words has no defined density and lands in the bottom band.
    let density = keyword_density(body, keyword).unwrap_or(0.0);

    if (1.0..=2.0).contains(&density) {
        100
    } else if (0.5..=3.0).contains(&density) {
        80
    } else if (0.2..=4.0).contains(&density) {
        60
    } else if density > 0.0 && density <= 5.0 {
        40
    } else {
        20
    }
}

/// Flesch Reading Ease over the tag-stripped body, or `None` when there are no
/// sentences or no words to measure.
pub fn flesch_reading_ease(body: &str) -> Option<f64> {
    let sentences = sentence_count(body);
    let words = word_count(body);
    if sentences == 0 || words == 0 {
        return None;
    }

    let avg_words_per_sentence = words as f64 / sentences as f64;
    let syllables = syllable_count(&strip_tags(body)) as f64;
    Some(206.835 - 1.015 * avg_words_per_sentence - 84.6 * (syllables / words as f64))
}

pub fn readability_score(body: &str) -> u8 {
    let flesch = match flesch_reading_ease(body) {
        Some(f) => f,
        None => return 0,
    };

    if flesch >= 80.0 {
        100
    } else if flesch >= 70.0 {
        90
    } else if flesch >= 60.0 {
        80
    } else if flesch >= 50.0 {
        70
    } else if flesch >= 40.0 {
        60
    } else {
        READABILITY_FLOOR
    }
}

pub fn heading_score(body: &str) -> u8 {
    let counts = heading_counts(body);
    let mut score: u32 = match counts.h1 {
        0 => 0,
        1 => 30,
        _ => 10,
    };

    if (2..=8).contains(&counts.h2) {
        score += 40;
    } else if counts.h2 >= 1 {
        score += 30;
    }

    if counts.h3 > 0 {
        score += 30;
    }

    score.min(100) as u8
}

pub fn length_score(body: &str) -> u8 {
    match word_count(body) {
        1500..=3000 => 100,
        1000..=4000 => 90,
        n if n >= 800 => 80,
        n if n >= 500 => 70,
        n if n >= 300 => 60,
        _ => 40,
    }
}
