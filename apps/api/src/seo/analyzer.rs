//! Aggregation and suggestions: turns a `ContentRecord` into an `SeoAnalysis`.
//!
//! Pure and synchronous: no I/O, no shared state, safe to call on every edit.
//! Callers are expected to debounce (around 500 ms after the last keystroke).

use crate::content::models::ContentRecord;
use crate::seo::metrics::{heading_counts, internal_link_count, keyword_density};
use crate::seo::models::{
    HeadingStructure, Priority, Recommendation, RecommendationType, SeoAnalysis, SeoMetrics,
};
use crate::seo::scorers::{
    heading_score, keyword_density_score, length_score, meta_description_score,
    readability_score, title_score,
};

/// Aggregation weights in hundredths. Must sum to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreWeights {
    pub title: u32,
    pub meta: u32,
    pub keyword: u32,
    pub readability: u32,
    pub heading: u32,
    pub length: u32,
}

pub const WEIGHTS: ScoreWeights = ScoreWeights {
    title: 20,
    meta: 15,
    keyword: 20,
    readability: 15,
    heading: 15,
    length: 15,
};

impl ScoreWeights {
    pub const fn total(&self) -> u32 {
        self.title + self.meta + self.keyword + self.readability + self.heading + self.length
    }
}

/// The six sub-scores, before aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubScores {
    pub title: u8,
    pub meta: u8,
    pub keyword: u8,
    pub readability: u8,
    pub heading: u8,
    pub length: u8,
}

/// Weighted sum rounded half-up to the nearest integer.
pub fn overall_score(scores: &SubScores, weights: &ScoreWeights) -> u8 {
    let weighted = scores.title as u32 * weights.title
        + scores.meta as u32 * weights.meta
        + scores.keyword as u32 * weights.keyword
        + scores.readability as u32 * weights.readability
        + scores.heading as u32 * weights.heading
        + scores.length as u32 * weights.length;
    let total = weights.total().max(1);
    ((weighted + total / 2) / total).min(100) as u8
}

fn heading_structure(body: &str) -> HeadingStructure {
    let counts = heading_counts(body);
    match (counts.h1, counts.h2) {
        (1, h2) if h2 >= 2 => HeadingStructure::Good,
        (1, h2) if h2 >= 1 => HeadingStructure::Fair,
        _ => HeadingStructure::Poor,
    }
}

fn recommendation(
    kind: RecommendationType,
    priority: Priority,
    title: &str,
    description: &str,
) -> Recommendation {
    Recommendation {
        kind,
        title: title.to_string(),
        description: description.to_string(),
        priority,
    }
}

/// Rule list evaluated in a fixed order. Each rule is gated on its own, so
/// several can fire; output order is rule order, not severity.
pub fn generate_suggestions(scores: &SubScores, metrics: &SeoMetrics) -> Vec<Recommendation> {
    let mut suggestions = Vec::new();

    if scores.title < 80 {
        suggestions.push(recommendation(
            RecommendationType::Warning,
            Priority::High,
            "Optimize Title Tag",
            "Include your target keyword near the beginning and keep it between 50-60 characters.",
        ));
    }

    if scores.meta < 80 {
        suggestions.push(recommendation(
            RecommendationType::Warning,
            Priority::High,
            "Improve Meta Description",
            "Write a compelling meta description (150-160 characters) that includes your target keyword.",
        ));
    }

    if scores.keyword < 80 {
        suggestions.push(recommendation(
            RecommendationType::Info,
            Priority::Medium,
            "Adjust Keyword Density",
            "Aim for 1-2% keyword density throughout your content.",
        ));
    }

    if metrics.internal_links == 0 {
        suggestions.push(recommendation(
            RecommendationType::Error,
            Priority::Medium,
            "Add Internal Links",
            "Include 2-3 internal links to related content to improve SEO and user experience.",
        ));
    }

    if scores.readability < 70 {
        suggestions.push(recommendation(
            RecommendationType::Info,
            Priority::Low,
            "Improve Readability",
            "Use shorter sentences and simpler vocabulary to improve readability score.",
        ));
    }

    suggestions
}

/// Scores a content record. Never fails: empty or missing fields fall into
/// the zero/neutral bands instead.
pub fn analyze(record: &ContentRecord) -> SeoAnalysis {
    let body = record.body();
    let keyword = record.target_keyword();

    let scores = SubScores {
        title: title_score(&record.title, keyword),
        meta: meta_description_score(record.meta_description.as_deref(), keyword),
        keyword: keyword_density_score(body, keyword),
        readability: readability_score(body),
        heading: heading_score(body),
        length: length_score(body),
    };

    let metrics = SeoMetrics {
        keyword_density: keyword
            .and_then(|kw| keyword_density(body, kw))
            .unwrap_or(0.0),
        heading_structure: heading_structure(body),
        internal_links: internal_link_count(body),
        readability_score: scores.readability,
    };

    let suggestions = generate_suggestions(&scores, &metrics);

    SeoAnalysis {
        overall_score: overall_score(&scores, &WEIGHTS),
        title_score: scores.title,
        meta_score: scores.meta,
        keyword_score: scores.keyword,
        readability_score: scores.readability,
        heading_score: scores.heading,
        length_score: scores.length,
        metrics,
        suggestions,
    }
}
