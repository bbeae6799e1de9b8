//! Axum route handlers for the Generation API.

use axum::{extract::State, Json};
use serde::Serialize;
use tracing::info;

use crate::auth::CurrentUser;
use crate::content::models::ContentRecord;
use crate::errors::AppError;
use crate::generation::brief::ContentBrief;
use crate::generation::generator::{generate_content, GeneratedDraft, AVAILABLE_MODELS};
use crate::preferences::load_stored_preferences;
use crate::seo::SeoAnalysis;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub content: ContentRecord,
    pub analysis: SeoAnalysis,
    pub model: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelsResponse {
    pub models: Vec<&'static str>,
    pub default_model: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/generate
///
/// Generates an article from the brief and saves it as a draft.
/// When the brief names no model, the user's saved preference is used, then
/// the configured default. Nothing is saved if generation fails.
pub async fn handle_generate(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(mut brief): Json<ContentBrief>,
) -> Result<Json<GenerateResponse>, AppError> {
    if brief.ai_model.as_deref().map_or(true, |m| m.trim().is_empty()) {
        brief.ai_model = load_stored_preferences(state.kv.as_ref(), current.user.id)
            .await?
            .map(|prefs| prefs.default_ai_model);
    }

    let GeneratedDraft {
        content,
        analysis,
        model,
    } = generate_content(
        state.generator.as_ref(),
        &state.config.generation_settings(),
        &brief,
    )
    .await?;

    let content = state.content().save(current.user.id, content).await?;
    info!(
        "Generated content {:?} for user {}",
        content.id, current.user.id
    );

    Ok(Json(GenerateResponse {
        content,
        analysis,
        model,
    }))
}

/// GET /api/v1/generate/models
pub async fn handle_list_models(State(state): State<AppState>) -> Json<ModelsResponse> {
    Json(ModelsResponse {
        models: AVAILABLE_MODELS.to_vec(),
        default_model: state.config.generation_model.clone(),
    })
}
