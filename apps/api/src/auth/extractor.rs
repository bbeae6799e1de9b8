use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::auth::User;
use crate::errors::AppError;
use crate::state::AppState;

/// The signed-in user, resolved from `Authorization: Bearer <session token>`.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub token: Uuid,
}

/// Parses the session token out of an `Authorization` header value.
pub fn bearer_token(header: &str) -> Option<Uuid> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    Uuid::parse_str(token.trim()).ok()
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(bearer_token)
            .ok_or(AppError::Unauthorized)?;

        let user = state
            .identity
            .get_user(token)
            .await?
            .ok_or(AppError::Unauthorized)?;

        Ok(CurrentUser { user, token })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token_parsing() {
        let token = Uuid::new_v4();
        assert_eq!(bearer_token(&format!("Bearer {token}")), Some(token));
        assert_eq!(bearer_token(&format!("bearer   {token}")), Some(token));
        assert_eq!(bearer_token(&format!("Basic {token}")), None);
        assert_eq!(bearer_token("Bearer not-a-uuid"), None);
        assert_eq!(bearer_token(""), None);
    }
}
