//! Axum route handlers for the Content API. Every route is scoped to the signed-in user.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::content::models::{ContentPatch, ContentRecord, ContentType};
use crate::errors::AppError;
use crate::seo::{analyze, SeoAnalysis};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateContentRequest {
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub keyword: Option<String>,
    #[serde(default)]
    pub content_type: ContentType,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
}

/// GET /api/v1/content
pub async fn handle_list_content(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<Vec<ContentRecord>>, AppError> {
    let records = state.content().list(current.user.id).await?;
    Ok(Json(records))
}

/// POST /api/v1/content
pub async fn handle_create_content(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(request): Json<CreateContentRequest>,
) -> Result<(StatusCode, Json<ContentRecord>), AppError> {
    if request.title.trim().is_empty() {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }

    let mut record = ContentRecord::new(
        request.title,
        request.content,
        request.keyword.filter(|k| !k.trim().is_empty()),
        request.content_type,
    );
    record.meta_title = request.meta_title;
    record.meta_description = request.meta_description;

    let saved = state.content().save(current.user.id, record).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

/// GET /api/v1/content/:id
pub async fn handle_get_content(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<ContentRecord>, AppError> {
    let record = state.content().load(current.user.id, &id).await?;
    Ok(Json(record))
}

/// PATCH /api/v1/content/:id
///
/// Applies editor changes. Word count and SEO score are recomputed on save.
pub async fn handle_update_content(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
    Json(patch): Json<ContentPatch>,
) -> Result<Json<ContentRecord>, AppError> {
    let repo = state.content();
    let mut record = repo.load(current.user.id, &id).await?;
    record.apply(patch);
    let saved = repo.save(current.user.id, record).await?;
    Ok(Json(saved))
}

/// DELETE /api/v1/content/:id
pub async fn handle_delete_content(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.content().delete(current.user.id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/content/:id/seo
pub async fn handle_content_seo(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<SeoAnalysis>, AppError> {
    let record = state.content().load(current.user.id, &id).await?;
    Ok(Json(analyze(&record)))
}
