use std::sync::Arc;

use crate::auth::IdentityProvider;
use crate::config::Config;
use crate::content::ContentRepository;
use crate::llm_client::TextGenerator;
use crate::storage::{BlobStore, KvStore};
use crate::wordpress::{ConnectionRepository, WordPressClient};

/// Shared application state injected into all route handlers via Axum extractors.
/// Collaborators are trait objects so `main` can pick remote or in-memory backends.
#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<dyn IdentityProvider>,
    pub blobs: Arc<dyn BlobStore>,
    pub kv: Arc<dyn KvStore>,
    pub generator: Arc<dyn TextGenerator>,
    pub publisher: WordPressClient,
    pub config: Config,
}

impl AppState {
    pub fn content(&self) -> ContentRepository {
        ContentRepository::new(self.blobs.clone())
    }

    pub fn connections(&self) -> ConnectionRepository {
        ConnectionRepository::new(self.kv.clone())
    }
}
