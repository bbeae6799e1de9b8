//! Axum route handlers for WordPress connections and publishing.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::CurrentUser;
use crate::content::models::ContentRecord;
use crate::errors::AppError;
use crate::state::AppState;
use crate::wordpress::client::Term;
use crate::wordpress::models::{ConnectionSummary, NewConnection, PublishOptions, PublishResult};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestConnectionResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub connection: ConnectionSummary,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishRequest {
    pub connection_id: String,
    #[serde(flatten)]
    pub options: PublishOptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishResponse {
    pub content: ContentRecord,
    pub result: PublishResult,
}

// ────────────────────────────────────────────────────────────────────────────
// Connections
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/wordpress/connections
pub async fn handle_list_connections(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<Vec<ConnectionSummary>>, AppError> {
    let connections = state.connections().list(current.user.id).await?;
    Ok(Json(connections.iter().map(ConnectionSummary::from).collect()))
}

/// POST /api/v1/wordpress/connections
pub async fn handle_add_connection(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(request): Json<NewConnection>,
) -> Result<(StatusCode, Json<ConnectionSummary>), AppError> {
    let request = request.validate().map_err(AppError::Validation)?;
    let connection = state.connections().add(current.user.id, request).await?;
    Ok((StatusCode::CREATED, Json(ConnectionSummary::from(&connection))))
}

/// DELETE /api/v1/wordpress/connections/:id
pub async fn handle_remove_connection(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.connections().remove(current.user.id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/wordpress/connections/:id/test
///
/// A rejected test is reported in the body, not as an HTTP error.
pub async fn handle_test_connection(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<TestConnectionResponse>, AppError> {
    let repo = state.connections();
    let connection = repo.get(current.user.id, &id).await?;

    let outcome = state.publisher.test_connection(&connection).await;
    if let Err(e) = &outcome {
        warn!("Connection test failed for {}: {}", connection.url, e);
    }

    let connection = repo
        .record_test(current.user.id, &id, outcome.is_ok())
        .await?;

    Ok(Json(TestConnectionResponse {
        success: outcome.is_ok(),
        error: outcome.err().map(|e| e.to_string()),
        connection: ConnectionSummary::from(&connection),
    }))
}

/// GET /api/v1/wordpress/connections/:id/categories
pub async fn handle_list_categories(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<Term>>, AppError> {
    let connection = state.connections().get(current.user.id, &id).await?;
    let terms = state
        .publisher
        .categories(&connection)
        .await
        .map_err(|e| AppError::Upstream(e.to_string()))?;
    Ok(Json(terms))
}

/// GET /api/v1/wordpress/connections/:id/tags
pub async fn handle_list_tags(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<Term>>, AppError> {
    let connection = state.connections().get(current.user.id, &id).await?;
    let terms = state
        .publisher
        .tags(&connection)
        .await
        .map_err(|e| AppError::Upstream(e.to_string()))?;
    Ok(Json(terms))
}

// ────────────────────────────────────────────────────────────────────────────
// Publishing
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/content/:id/publish
///
/// Publishes a saved record. The record is only marked published (and its post
/// URL recorded) after the site accepts the post; on failure it is left as it was.
pub async fn handle_publish(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
    Json(request): Json<PublishRequest>,
) -> Result<Json<PublishResponse>, AppError> {
    let user_id = current.user.id;
    let content_repo = state.content();

    let mut record = content_repo.load(user_id, &id).await?;
    let connection = state
        .connections()
        .get(user_id, &request.connection_id)
        .await?;

    let result = state
        .publisher
        .publish(&connection, &record, &request.options)
        .await?;

    record.mark_published(result.url.clone());
    let content = content_repo.save(user_id, record).await?;
    info!("Content {} published to {}", id, connection.url);

    Ok(Json(PublishResponse { content, result }))
}
