mod auth;
mod config;
mod content;
mod db;
mod errors;
mod generation;
mod llm_client;
mod preferences;
mod routes;
mod seo;
mod state;
mod storage;
mod wordpress;

use anyhow::{Context, Result};
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::{IdentityProvider, InMemoryIdentityProvider, PgIdentityProvider};
use crate::config::{Config, RemoteConfig, StorageBackend};
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::{
    BlobStore, InMemoryBlobStore, InMemoryKvStore, KvStore, RedisKvStore, S3BlobStore,
};
use crate::wordpress::WordPressClient;

type Backends = (
    Arc<dyn IdentityProvider>,
    Arc<dyn BlobStore>,
    Arc<dyn KvStore>,
);

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SEOForge API v{}", env!("CARGO_PKG_VERSION"));

    let session_ttl = chrono::Duration::hours(config.session_ttl_hours);
    let (identity, blobs, kv): Backends = match (config.storage_backend, &config.remote) {
        (StorageBackend::Remote, Some(remote)) => remote_backends(remote, session_ttl).await?,
        (StorageBackend::Remote, None) => {
            anyhow::bail!("remote storage selected without connection settings")
        }
        (StorageBackend::Memory, _) => {
            warn!("Using in-memory storage; all data is lost on restart");
            let identity: Arc<dyn IdentityProvider> =
                Arc::new(InMemoryIdentityProvider::new(session_ttl));
            let blobs: Arc<dyn BlobStore> = Arc::new(InMemoryBlobStore::new());
            let kv: Arc<dyn KvStore> = Arc::new(InMemoryKvStore::new());
            (identity, blobs, kv)
        }
    };

    // Initialize generation client
    let generator = LlmClient::new(
        config.generation_api_url.clone(),
        config.generation_api_key.clone(),
    )
    .context("failed to build generation client")?;
    info!(
        "Generation client initialized (default model: {})",
        config.generation_model
    );

    let publisher = WordPressClient::new(Duration::from_secs(config.publish_timeout_secs))
        .context("failed to build WordPress client")?;

    // Build app state
    let state = AppState {
        identity,
        blobs,
        kv,
        generator: Arc::new(generator),
        publisher,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Postgres for identity, S3 for content documents, Redis for small settings.
async fn remote_backends(remote: &RemoteConfig, session_ttl: chrono::Duration) -> Result<Backends> {
    let db = create_pool(&remote.database_url).await?;
    info!("PostgreSQL pool initialized");

    let redis = redis::Client::open(remote.redis_url.clone())?;
    info!("Redis client initialized");

    let s3 = build_s3_client(remote).await;
    info!("S3 client initialized (bucket: {})", remote.s3_bucket);

    let identity: Arc<dyn IdentityProvider> = Arc::new(PgIdentityProvider::new(db, session_ttl));
    let blobs: Arc<dyn BlobStore> = Arc::new(S3BlobStore::new(s3, remote.s3_bucket.clone()));
    let kv: Arc<dyn KvStore> = Arc::new(RedisKvStore::new(redis));
    Ok((identity, blobs, kv))
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(remote: &RemoteConfig) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &remote.aws_access_key_id,
        &remote.aws_secret_access_key,
        None,
        None,
        "seoforge-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&remote.s3_endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}
