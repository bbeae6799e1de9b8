use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Credentials for one of the four WordPress authentication schemes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "authType", rename_all = "snake_case")]
pub enum WordPressAuth {
    Oauth2 {
        #[serde(rename = "accessToken")]
        access_token: String,
    },
    Jwt {
        token: String,
    },
    Basic {
        username: String,
        password: String,
    },
    ApplicationPassword {
        username: String,
        password: String,
    },
}

impl WordPressAuth {
    pub fn auth_type(&self) -> &'static str {
        match self {
            WordPressAuth::Oauth2 { .. } => "oauth2",
            WordPressAuth::Jwt { .. } => "jwt",
            WordPressAuth::Basic { .. } => "basic",
            WordPressAuth::ApplicationPassword { .. } => "application_password",
        }
    }

    /// Value for the `Authorization` header.
    pub fn header_value(&self) -> String {
        match self {
            WordPressAuth::Oauth2 { access_token } => format!("Bearer {access_token}"),
            WordPressAuth::Jwt { token } => format!("Bearer {token}"),
            WordPressAuth::Basic { username, password }
            | WordPressAuth::ApplicationPassword { username, password } => {
                format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
            }
        }
    }

    fn has_blank_secret(&self) -> bool {
        match self {
            WordPressAuth::Oauth2 { access_token } => access_token.trim().is_empty(),
            WordPressAuth::Jwt { token } => token.trim().is_empty(),
            WordPressAuth::Basic { username, password }
            | WordPressAuth::ApplicationPassword { username, password } => {
                username.trim().is_empty() || password.is_empty()
            }
        }
    }
}

/// A saved WordPress site. Stored with credentials; never returned to clients as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordPressConnection {
    pub id: String,
    pub name: String,
    /// Site root without a trailing slash.
    pub url: String,
    pub auth: WordPressAuth,
    pub is_active: bool,
    pub last_test_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Client-facing view of a connection, without credentials.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionSummary {
    pub id: String,
    pub name: String,
    pub url: String,
    pub auth_type: &'static str,
    pub is_active: bool,
    pub last_test_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<&WordPressConnection> for ConnectionSummary {
    fn from(c: &WordPressConnection) -> Self {
        Self {
            id: c.id.clone(),
            name: c.name.clone(),
            url: c.url.clone(),
            auth_type: c.auth.auth_type(),
            is_active: c.is_active,
            last_test_at: c.last_test_at,
            created_at: c.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewConnection {
    pub name: String,
    pub url: String,
    pub auth: WordPressAuth,
}

impl NewConnection {
    /// Checks the fields and normalises the site URL.
    pub fn validate(mut self) -> Result<Self, String> {
        self.name = self.name.trim().to_string();
        if self.name.is_empty() {
            return Err("name cannot be empty".to_string());
        }

        let url = self.url.trim().trim_end_matches('/');
        let host = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"));
        if host.map_or(true, |h| h.is_empty() || h.starts_with('/')) {
            return Err(format!("'{}' is not a valid site URL", self.url));
        }
        self.url = url.to_string();

        if self.auth.has_blank_secret() {
            return Err(format!(
                "missing credentials for {} authentication",
                self.auth.auth_type()
            ));
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Publish,
    Future,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishOptions {
    #[serde(default)]
    pub status: PostStatus,
    /// Category name.
    pub category: Option<String>,
    /// Comma-separated tag names.
    pub tags: Option<String>,
    pub scheduled_date: Option<DateTime<Utc>>,
}

impl PublishOptions {
    pub fn categories(&self) -> Vec<String> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(|c| vec![c.to_string()])
            .unwrap_or_default()
    }

    pub fn tag_list(&self) -> Vec<String> {
        self.tags
            .as_deref()
            .map(|tags| {
                tags.split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishResult {
    pub post_id: u64,
    pub url: Option<String>,
}
