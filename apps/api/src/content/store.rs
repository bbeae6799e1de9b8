use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::content::models::ContentRecord;
use crate::seo::analyze;
use crate::storage::{BlobStore, StorageError};

/// Per-user content documents, one JSON blob per record at
/// `users/<uid>/content/<id>.json`.
#[derive(Clone)]
pub struct ContentRepository {
    blobs: Arc<dyn BlobStore>,
}

fn content_prefix(user_id: Uuid) -> String {
    format!("users/{user_id}/content/")
}

fn content_path(user_id: Uuid, id: &str) -> String {
    format!("{}{id}.json", content_prefix(user_id))
}

/// Ids come from URL paths; anything outside `[A-Za-z0-9_-]` cannot name a stored record.
fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn new_content_id() -> String {
    format!("content_{}", Utc::now().timestamp_millis())
}

impl ContentRepository {
    pub fn new(blobs: Arc<dyn BlobStore>) -> Self {
        Self { blobs }
    }

    /// Writes the record, assigning an id when it has none and refreshing `seo_score`.
    pub async fn save(
        &self,
        user_id: Uuid,
        mut record: ContentRecord,
    ) -> Result<ContentRecord, StorageError> {
        let id = match record.id.as_deref().filter(|id| is_valid_id(id)) {
            Some(id) => id.to_string(),
            None => {
                let mut id = new_content_id();
                while self.exists(user_id, &id).await? {
                    id = format!("{id}_{}", &Uuid::new_v4().simple().to_string()[..6]);
                }
                id
            }
        };
        record.id = Some(id.clone());
        record.seo_score = Some(analyze(&record).overall_score);

        let data = serde_json::to_vec(&record)?;
        self.blobs
            .write_blob(&content_path(user_id, &id), Bytes::from(data))
            .await?;

        info!("Saved content {} for user {}", id, user_id);
        Ok(record)
    }

    pub async fn load(&self, user_id: Uuid, id: &str) -> Result<ContentRecord, StorageError> {
        if !is_valid_id(id) {
            return Err(StorageError::NotFound(id.to_string()));
        }
        let data = self.blobs.read_blob(&content_path(user_id, id)).await?;
        Ok(serde_json::from_slice(&data)?)
    }

    /// Every readable record, newest `updated_at` first.
    pub async fn list(&self, user_id: Uuid) -> Result<Vec<ContentRecord>, StorageError> {
        let paths = self.blobs.list_blobs(&content_prefix(user_id)).await?;

        let mut records = Vec::with_capacity(paths.len());
        for path in paths.iter().filter(|p| p.ends_with(".json")) {
            let data = match self.blobs.read_blob(path).await {
                Ok(data) => data,
                Err(e) => {
                    warn!("Skipping unreadable content blob {}: {}", path, e);
                    continue;
                }
            };
            match serde_json::from_slice::<ContentRecord>(&data) {
                Ok(record) => records.push(record),
                Err(e) => warn!("Skipping malformed content blob {}: {}", path, e),
            }
        }

        records.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(records)
    }

    pub async fn delete(&self, user_id: Uuid, id: &str) -> Result<(), StorageError> {
        // S3 deletes succeed for missing keys, so check first.
        if !is_valid_id(id) || !self.exists(user_id, id).await? {
            return Err(StorageError::NotFound(id.to_string()));
        }
        self.blobs.delete_blob(&content_path(user_id, id)).await?;
        info!("Deleted content {} for user {}", id, user_id);
        Ok(())
    }

    async fn exists(&self, user_id: Uuid, id: &str) -> Result<bool, StorageError> {
        match self.blobs.read_blob(&content_path(user_id, id)).await {
            Ok(_) => Ok(true),
            Err(StorageError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
