use anyhow::{bail, Context, Result};

use crate::generation::generator::GenerationSettings;

/// Where records, settings and sessions live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Postgres, Redis and S3.
    Remote,
    /// Everything in-process; data is lost on restart.
    Memory,
}

/// Connection settings for the remote backend.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub database_url: String,
    pub redis_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub storage_backend: StorageBackend,
    pub remote: Option<RemoteConfig>,
    pub generation_api_url: String,
    pub generation_api_key: Option<String>,
    pub generation_model: String,
    pub generation_max_tokens: u32,
    pub generation_temperature: f32,
    pub publish_timeout_secs: u64,
    pub session_ttl_hours: i64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let storage_backend = match optional_env("STORAGE_BACKEND").as_deref() {
            None | Some("remote") => StorageBackend::Remote,
            Some("memory") => StorageBackend::Memory,
            Some(other) => bail!("STORAGE_BACKEND must be 'remote' or 'memory', got '{other}'"),
        };

        let remote = match storage_backend {
            StorageBackend::Remote => Some(RemoteConfig {
                database_url: require_env("DATABASE_URL")?,
                redis_url: require_env("REDIS_URL")?,
                s3_bucket: require_env("S3_BUCKET")?,
                s3_endpoint: require_env("S3_ENDPOINT")?,
                aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
                aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            }),
            StorageBackend::Memory => None,
        };

        Ok(Config {
            storage_backend,
            remote,
            generation_api_url: require_env("GENERATION_API_URL")?,
            generation_api_key: optional_env("GENERATION_API_KEY"),
            generation_model: optional_env("GENERATION_MODEL")
                .unwrap_or_else(|| "claude-3-5-sonnet".to_string()),
            generation_max_tokens: parse_env("GENERATION_MAX_TOKENS", 4000)?,
            generation_temperature: parse_env("GENERATION_TEMPERATURE", 0.7)?,
            publish_timeout_secs: parse_env("PUBLISH_TIMEOUT_SECS", 30)?,
            session_ttl_hours: parse_env("SESSION_TTL_HOURS", 720)?,
            port: parse_env("PORT", 8080).context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    pub fn generation_settings(&self) -> GenerationSettings {
        GenerationSettings {
            default_model: self.generation_model.clone(),
            max_tokens: self.generation_max_tokens,
            temperature: self.generation_temperature,
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        None => Ok(default),
    }
}
