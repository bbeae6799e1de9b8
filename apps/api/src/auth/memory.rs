use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::{IdentityError, IdentityProvider, Session, SignInRequest, User};

#[derive(Default)]
struct Inner {
    users_by_external_id: HashMap<String, User>,
    sessions: HashMap<Uuid, (String, DateTime<Utc>)>,
}

/// Process-local identity provider for development and tests.
pub struct InMemoryIdentityProvider {
    inner: RwLock<Inner>,
    session_ttl: Duration,
}

impl InMemoryIdentityProvider {
    pub fn new(session_ttl: Duration) -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            session_ttl,
        }
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn sign_in(&self, request: SignInRequest) -> Result<Session, IdentityError> {
        request.validate()?;
        let external_id = request.resolved_external_id();

        let mut inner = self.inner.write().await;
        let user = inner
            .users_by_external_id
            .entry(external_id.clone())
            .and_modify(|u| {
                u.username = request.username.trim().to_string();
                u.email = request.email.trim().to_string();
            })
            .or_insert_with(|| User {
                id: Uuid::new_v4(),
                external_id: external_id.clone(),
                username: request.username.trim().to_string(),
                email: request.email.trim().to_string(),
                created_at: Utc::now(),
            })
            .clone();

        let now = Utc::now();
        inner.sessions.retain(|_, (_, expires_at)| *expires_at > now);

        let token = Uuid::new_v4();
        let expires_at = now + self.session_ttl;
        inner.sessions.insert(token, (external_id, expires_at));

        Ok(Session {
            token,
            user,
            expires_at,
        })
    }

    async fn sign_out(&self, token: Uuid) -> Result<(), IdentityError> {
        self.inner.write().await.sessions.remove(&token);
        Ok(())
    }

    async fn get_user(&self, token: Uuid) -> Result<Option<User>, IdentityError> {
        let inner = self.inner.read().await;
        Ok(inner
            .sessions
            .get(&token)
            .filter(|(_, expires_at)| *expires_at > Utc::now())
            .and_then(|(external_id, _)| inner.users_by_external_id.get(external_id))
            .cloned())
    }
}
