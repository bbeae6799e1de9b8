use serde::{Deserialize, Serialize};

/// Coarse verdict on the document outline, reported alongside the numeric heading score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeadingStructure {
    Good,
    Fair,
    Poor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationType {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// A single actionable hint rendered verbatim by clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationType,
    pub title: String,
    pub description: String,
    pub priority: Priority,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoMetrics {
    /// Percentage of words containing the keyword (0.0 without a keyword or without words).
    pub keyword_density: f64,
    pub heading_structure: HeadingStructure,
    pub internal_links: usize,
    pub readability_score: u8,
}

/// Full scoring result. Derived from a `ContentRecord` on demand and never stored on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoAnalysis {
    pub overall_score: u8,
    pub title_score: u8,
    pub meta_score: u8,
    pub keyword_score: u8,
    pub readability_score: u8,
    pub heading_score: u8,
    pub length_score: u8,
    pub metrics: SeoMetrics,
    pub suggestions: Vec<Recommendation>,
}
