use async_trait::async_trait;
use chrono::{Duration, Utc};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::auth::{IdentityError, IdentityProvider, Session, SignInRequest, User};

/// Identity provider on PostgreSQL: `users` upserted by external id, `sessions`
/// holding opaque tokens with an expiry.
#[derive(Clone)]
pub struct PgIdentityProvider {
    pool: PgPool,
    session_ttl: Duration,
}

impl PgIdentityProvider {
    pub fn new(pool: PgPool, session_ttl: Duration) -> Self {
        Self { pool, session_ttl }
    }
}

#[async_trait]
impl IdentityProvider for PgIdentityProvider {
    async fn sign_in(&self, request: SignInRequest) -> Result<Session, IdentityError> {
        request.validate()?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (external_id, username, email)
            VALUES ($1, $2, $3)
            ON CONFLICT (external_id)
            DO UPDATE SET username = EXCLUDED.username, email = EXCLUDED.email
            RETURNING id, external_id, username, email, created_at
            "#,
        )
        .bind(request.resolved_external_id())
        .bind(request.username.trim())
        .bind(request.email.trim())
        .fetch_one(&self.pool)
        .await?;

        sqlx::query("DELETE FROM sessions WHERE expires_at <= now()")
            .execute(&self.pool)
            .await?;

        let token = Uuid::new_v4();
        let expires_at = Utc::now() + self.session_ttl;

        sqlx::query("INSERT INTO sessions (token, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(token)
            .bind(user.id)
            .bind(expires_at)
            .execute(&self.pool)
            .await?;

        info!("User {} signed in", user.id);

        Ok(Session {
            token,
            user,
            expires_at,
        })
    }

    async fn sign_out(&self, token: Uuid) -> Result<(), IdentityError> {
        sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn get_user(&self, token: Uuid) -> Result<Option<User>, IdentityError> {
        Ok(sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.external_id, u.username, u.email, u.created_at
            FROM sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.token = $1 AND s.expires_at > now()
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?)
    }
}
