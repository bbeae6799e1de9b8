//! Identity: who is calling. Sign-in issues an opaque bearer token; every
//! user-scoped route resolves it through the `CurrentUser` extractor.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

pub mod extractor;
pub mod handlers;
pub mod memory;
pub mod postgres;

pub use extractor::CurrentUser;
pub use memory::InMemoryIdentityProvider;
pub use postgres::PgIdentityProvider;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub external_id: String,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: Uuid,
    pub user: User,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    pub username: String,
    pub email: String,
    /// Stable id from the upstream identity source; defaults to the lower-cased email.
    pub external_id: Option<String>,
}

impl SignInRequest {
    pub fn validate(&self) -> Result<(), IdentityError> {
        if self.username.trim().is_empty() {
            return Err(IdentityError::Invalid("username cannot be empty".to_string()));
        }
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(IdentityError::Invalid(format!(
                "'{}' is not a valid email address",
                self.email
            )));
        }
        Ok(())
    }

    pub fn resolved_external_id(&self) -> String {
        self.external_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| self.email.trim().to_lowercase())
    }
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Invalid sign-in request: {0}")]
    Invalid(String),

    #[error("Identity store error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Authentication collaborator.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Creates or refreshes the user and opens a new session.
    async fn sign_in(&self, request: SignInRequest) -> Result<Session, IdentityError>;

    /// Ends a session. Unknown tokens are ignored.
    async fn sign_out(&self, token: Uuid) -> Result<(), IdentityError>;

    /// Resolves a live session token to its user.
    async fn get_user(&self, token: Uuid) -> Result<Option<User>, IdentityError>;
}
