use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::storage::{get_json, set_json, KvStore, StorageError};
use crate::wordpress::models::{NewConnection, WordPressConnection};

/// Saved WordPress sites, one KV entry per connection at
/// `users/<uid>/wp_connections/<id>`.
#[derive(Clone)]
pub struct ConnectionRepository {
    kv: Arc<dyn KvStore>,
}

fn connections_prefix(user_id: Uuid) -> String {
    format!("users/{user_id}/wp_connections/")
}

fn connection_key(user_id: Uuid, id: &str) -> String {
    format!("{}{id}", connections_prefix(user_id))
}

impl ConnectionRepository {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    pub async fn add(
        &self,
        user_id: Uuid,
        new: NewConnection,
    ) -> Result<WordPressConnection, StorageError> {
        let connection = WordPressConnection {
            id: format!("wp_{}", Uuid::new_v4().simple()),
            name: new.name,
            url: new.url,
            auth: new.auth,
            is_active: true,
            last_test_at: None,
            created_at: Utc::now(),
        };
        self.put(user_id, &connection).await?;
        info!("Added WordPress connection {} ({})", connection.id, connection.url);
        Ok(connection)
    }

    pub async fn get(
        &self,
        user_id: Uuid,
        id: &str,
    ) -> Result<WordPressConnection, StorageError> {
        get_json(self.kv.as_ref(), &connection_key(user_id, id))
            .await?
            .ok_or_else(|| StorageError::NotFound(format!("WordPress connection {id}")))
    }

    /// All connections, oldest first. Unreadable entries are skipped.
    pub async fn list(&self, user_id: Uuid) -> Result<Vec<WordPressConnection>, StorageError> {
        let keys = self.kv.keys(&connections_prefix(user_id)).await?;

        let mut connections = Vec::with_capacity(keys.len());
        for key in keys {
            match get_json::<WordPressConnection>(self.kv.as_ref(), &key).await {
                Ok(Some(connection)) => connections.push(connection),
                Ok(None) => {}
                Err(e) => warn!("Skipping unreadable connection {}: {}", key, e),
            }
        }

        connections.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(connections)
    }

    pub async fn remove(&self, user_id: Uuid, id: &str) -> Result<(), StorageError> {
        // Surfaces NotFound for unknown ids.
        self.get(user_id, id).await?;
        self.kv.delete(&connection_key(user_id, id)).await?;
        info!("Removed WordPress connection {}", id);
        Ok(())
    }

    /// Stamps `last_test_at` and stores the outcome as `is_active`.
    pub async fn record_test(
        &self,
        user_id: Uuid,
        id: &str,
        success: bool,
    ) -> Result<WordPressConnection, StorageError> {
        let mut connection = self.get(user_id, id).await?;
        connection.last_test_at = Some(Utc::now());
        connection.is_active = success;
        self.put(user_id, &connection).await?;
        Ok(connection)
    }

    async fn put(
        &self,
        user_id: Uuid,
        connection: &WordPressConnection,
    ) -> Result<(), StorageError> {
        set_json(
            self.kv.as_ref(),
            &connection_key(user_id, &connection.id),
            connection,
        )
        .await
    }
}
