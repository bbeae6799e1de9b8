use axum::Json;
use serde::Deserialize;

use crate::content::models::{ContentRecord, ContentType};
use crate::errors::AppError;
use crate::seo::{analyze, SeoAnalysis};

/// Unsaved draft fields needed for scoring.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub keyword: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
}

/// POST /api/v1/seo/analyze
///
/// Scores a draft without persisting it. Clients call this on a debounce timer while editing.
pub async fn handle_analyze(
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<SeoAnalysis>, AppError> {
    let mut record = ContentRecord::new(
        request.title,
        request.content,
        request.keyword,
        ContentType::Article,
    );
    record.meta_title = request.meta_title;
    record.meta_description = request.meta_description;

    Ok(Json(analyze(&record)))
}
