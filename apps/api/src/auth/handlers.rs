use axum::{extract::State, http::StatusCode, Json};

use crate::auth::{CurrentUser, Session, SignInRequest, User};
use crate::errors::AppError;
use crate::state::AppState;

/// POST /api/v1/auth/sign-in
pub async fn handle_sign_in(
    State(state): State<AppState>,
    Json(request): Json<SignInRequest>,
) -> Result<Json<Session>, AppError> {
    let session = state.identity.sign_in(request).await?;
    Ok(Json(session))
}

/// POST /api/v1/auth/sign-out
pub async fn handle_sign_out(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<StatusCode, AppError> {
    state.identity.sign_out(current.token).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/me
pub async fn handle_me(current: CurrentUser) -> Json<User> {
    Json(current.user)
}
