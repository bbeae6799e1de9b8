use serde::{Deserialize, Serialize};

use crate::content::models::ContentType;
use crate::errors::AppError;

pub const MIN_TARGET_LENGTH: u32 = 300;
pub const MAX_TARGET_LENGTH: u32 = 10_000;

fn default_target_length() -> u32 {
    2000
}

fn default_tone() -> String {
    "professional".to_string()
}

fn default_audience() -> String {
    "general".to_string()
}

/// User-supplied parameters that drive one generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentBrief {
    pub keyword: String,
    #[serde(default)]
    pub content_type: ContentType,
    #[serde(default = "default_target_length")]
    pub target_length: u32,
    #[serde(default = "default_tone")]
    pub tone: String,
    #[serde(default = "default_audience")]
    pub audience: String,
    /// Model id or UI alias; falls back to the configured default.
    pub ai_model: Option<String>,
    pub custom_prompt: Option<String>,
    pub affiliate_links: Option<String>,
}

impl ContentBrief {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.keyword.trim().is_empty() {
            return Err(AppError::Validation("keyword cannot be empty".to_string()));
        }
        if !(MIN_TARGET_LENGTH..=MAX_TARGET_LENGTH).contains(&self.target_length) {
            return Err(AppError::Validation(format!(
                "targetLength must be between {MIN_TARGET_LENGTH} and {MAX_TARGET_LENGTH} words, got {}",
                self.target_length
            )));
        }
        Ok(())
    }

    pub fn keyword(&self) -> &str {
        self.keyword.trim()
    }
}
