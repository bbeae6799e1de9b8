use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client as RedisClient};

use crate::storage::{KvStore, StorageError};

/// Key-value store on Redis. Opens a multiplexed connection per call; the
/// client itself is cheap to clone and holds no socket.
#[derive(Clone)]
pub struct RedisKvStore {
    client: RedisClient,
}

impl RedisKvStore {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    async fn connection(&self) -> Result<MultiplexedConnection, StorageError> {
        self.client
            .get_multiplexed_tokio_connection()
            .await
            .map_err(backend)
    }
}

fn backend(e: redis::RedisError) -> StorageError {
    StorageError::Backend(format!("Redis error: {e}"))
}

/// Escapes glob metacharacters so a prefix can be used in a `KEYS` pattern.
fn glob_escape(prefix: &str) -> String {
    let mut escaped = String::with_capacity(prefix.len());
    for c in prefix.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[async_trait]
impl KvStore for RedisKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut conn = self.connection().await?;
        conn.get(key).await.map_err(backend)
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let mut conn = self.connection().await?;
        conn.set(key, value).await.map_err(backend)
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let mut conn = self.connection().await?;
        conn.del(key).await.map_err(backend)
    }

    async fn keys(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let mut conn = self.connection().await?;
        let pattern = format!("{}*", glob_escape(prefix));
        let mut keys: Vec<String> = conn.keys(pattern).await.map_err(backend)?;
        keys.sort();
        Ok(keys)
    }
}
