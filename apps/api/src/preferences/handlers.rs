use axum::{extract::State, Json};

use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::preferences::{load_preferences, save_preferences, PreferencesPatch, UserPreferences};
use crate::state::AppState;

/// GET /api/v1/preferences
pub async fn handle_get_preferences(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<UserPreferences>, AppError> {
    let prefs = load_preferences(state.kv.as_ref(), current.user.id).await?;
    Ok(Json(prefs))
}

/// PATCH /api/v1/preferences
pub async fn handle_update_preferences(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(patch): Json<PreferencesPatch>,
) -> Result<Json<UserPreferences>, AppError> {
    let mut prefs = load_preferences(state.kv.as_ref(), current.user.id).await?;
    prefs.apply(patch)?;
    save_preferences(state.kv.as_ref(), current.user.id, &prefs).await?;
    Ok(Json(prefs))
}
