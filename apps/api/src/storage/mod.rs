//! Storage collaborators: a file-like blob store for documents and a key-value
//! store for small settings. Handlers only see the traits; `main` picks the backend.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

pub mod memory;
pub mod redis_kv;
pub mod s3;

pub use memory::{InMemoryBlobStore, InMemoryKvStore};
pub use redis_kv::RedisKvStore;
pub use s3::S3BlobStore;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Path-addressed document storage.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn read_blob(&self, path: &str) -> Result<Bytes, StorageError>;

    async fn write_blob(&self, path: &str, data: Bytes) -> Result<(), StorageError>;

    /// Full paths of every blob under `prefix`, in lexicographic order.
    async fn list_blobs(&self, prefix: &str) -> Result<Vec<String>, StorageError>;

    async fn delete_blob(&self, path: &str) -> Result<(), StorageError>;
}

/// String-valued key-value storage.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError>;

    async fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// Every key starting with `prefix`, sorted.
    async fn keys(&self, prefix: &str) -> Result<Vec<String>, StorageError>;
}

/// Reads and decodes a JSON value, `None` when the key is absent.
pub async fn get_json<T: DeserializeOwned>(
    kv: &dyn KvStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match kv.get(key).await? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

pub async fn set_json<T: Serialize>(
    kv: &dyn KvStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    kv.set(key, serde_json::to_string(value)?).await
}
