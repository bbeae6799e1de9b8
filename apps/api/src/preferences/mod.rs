//! Per-user dashboard preferences, stored as one JSON value in the KV store.

use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::brief::{MAX_TARGET_LENGTH, MIN_TARGET_LENGTH};
use crate::generation::generator::resolve_model;
use crate::storage::{get_json, set_json, KvStore, StorageError};

pub mod handlers;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPreferences {
    pub theme: Theme,
    #[serde(alias = "defaultAIModel")]
    pub default_ai_model: String,
    pub default_word_count: u32,
    /// Seconds between editor auto-saves.
    pub auto_save_interval: u32,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            default_ai_model: "claude-3-5-sonnet".to_string(),
            default_word_count: 2000,
            auto_save_interval: 30,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesPatch {
    pub theme: Option<Theme>,
    #[serde(alias = "defaultAIModel")]
    pub default_ai_model: Option<String>,
    pub default_word_count: Option<u32>,
    pub auto_save_interval: Option<u32>,
}

impl UserPreferences {
    /// Applies a patch, validating every provided field before changing anything.
    pub fn apply(&mut self, patch: PreferencesPatch) -> Result<(), AppError> {
        let model = patch
            .default_ai_model
            .as_deref()
            .map(|m| resolve_model(Some(m), &self.default_ai_model))
            .transpose()?;

        if let Some(words) = patch.default_word_count {
            if !(MIN_TARGET_LENGTH..=MAX_TARGET_LENGTH).contains(&words) {
                return Err(AppError::Validation(format!(
                    "defaultWordCount must be between {MIN_TARGET_LENGTH} and {MAX_TARGET_LENGTH}"
                )));
            }
        }
        if patch.auto_save_interval == Some(0) {
            return Err(AppError::Validation(
                "autoSaveInterval must be at least 1 second".to_string(),
            ));
        }

        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(model) = model {
            self.default_ai_model = model;
        }
        if let Some(words) = patch.default_word_count {
            self.default_word_count = words;
        }
        if let Some(interval) = patch.auto_save_interval {
            self.auto_save_interval = interval;
        }
        Ok(())
    }
}

fn preferences_key(user_id: Uuid) -> String {
    format!("users/{user_id}/preferences")
}

/// Preferences the user has actually saved; `None` when missing or unreadable.
pub async fn load_stored_preferences(
    kv: &dyn KvStore,
    user_id: Uuid,
) -> Result<Option<UserPreferences>, StorageError> {
    match get_json::<UserPreferences>(kv, &preferences_key(user_id)).await {
        Err(StorageError::Serialization(e)) => {
            warn!("Unreadable preferences for user {}: {}", user_id, e);
            Ok(None)
        }
        other => other,
    }
}

/// Stored preferences, or defaults when missing or unreadable.
pub async fn load_preferences(
    kv: &dyn KvStore,
    user_id: Uuid,
) -> Result<UserPreferences, StorageError> {
    Ok(load_stored_preferences(kv, user_id)
        .await?
        .unwrap_or_default())
}

pub async fn save_preferences(
    kv: &dyn KvStore,
    user_id: Uuid,
    prefs: &UserPreferences,
) -> Result<(), StorageError> {
    set_json(kv, &preferences_key(user_id), prefs).await
}
