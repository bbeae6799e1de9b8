use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::seo::metrics::word_count;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    #[default]
    Article,
    Guide,
    Review,
    Listicle,
    Tutorial,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Article => "article",
            ContentType::Guide => "guide",
            ContentType::Review => "review",
            ContentType::Listicle => "listicle",
            ContentType::Tutorial => "tutorial",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    #[default]
    Draft,
    Published,
}

/// A draft or published article.
///
/// The body is private so that `word_count` can never go stale: it is recomputed
/// on construction, on deserialization, and on every body change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredContentRecord")]
pub struct ContentRecord {
    pub id: Option<String>,
    pub title: String,
    #[serde(rename = "content")]
    body: String,
    pub keyword: Option<String>,
    pub content_type: ContentType,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    word_count: usize,
    pub status: ContentStatus,
    pub seo_score: Option<u8>,
    pub published_to: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Wire/storage shape. Any `wordCount` present in the document is ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredContentRecord {
    id: Option<String>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
    keyword: Option<String>,
    #[serde(default)]
    content_type: ContentType,
    meta_title: Option<String>,
    meta_description: Option<String>,
    #[serde(default)]
    status: ContentStatus,
    seo_score: Option<u8>,
    #[serde(default)]
    published_to: Vec<String>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl From<StoredContentRecord> for ContentRecord {
    fn from(stored: StoredContentRecord) -> Self {
        let now = Utc::now();
        let created_at = stored.created_at.unwrap_or(now);
        Self {
            id: stored.id,
            title: stored.title,
            word_count: word_count(&stored.content),
            body: stored.content,
            keyword: stored.keyword,
            content_type: stored.content_type,
            meta_title: stored.meta_title,
            meta_description: stored.meta_description,
            status: stored.status,
            seo_score: stored.seo_score,
            published_to: stored.published_to,
            created_at,
            updated_at: stored.updated_at.unwrap_or(created_at),
        }
    }
}

impl ContentRecord {
    /// A fresh, unsaved draft.
    pub fn new(
        title: String,
        body: String,
        keyword: Option<String>,
        content_type: ContentType,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            title,
            word_count: word_count(&body),
            body,
            keyword,
            content_type,
            meta_title: None,
            meta_description: None,
            status: ContentStatus::Draft,
            seo_score: None,
            published_to: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }

    pub fn set_body(&mut self, body: String) {
        self.word_count = word_count(&body);
        self.body = body;
        self.updated_at = Utc::now();
    }

    /// The keyword to optimise for; an empty string counts as no keyword.
    pub fn target_keyword(&self) -> Option<&str> {
        self.keyword.as_deref().filter(|k| !k.is_empty())
    }

    pub fn apply(&mut self, patch: ContentPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(body) = patch.content {
            self.set_body(body);
        }
        if let Some(keyword) = patch.keyword {
            self.keyword = Some(keyword).filter(|k| !k.is_empty());
        }
        if let Some(content_type) = patch.content_type {
            self.content_type = content_type;
        }
        if let Some(meta_title) = patch.meta_title {
            self.meta_title = Some(meta_title);
        }
        if let Some(meta_description) = patch.meta_description {
            self.meta_description = Some(meta_description);
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        self.updated_at = Utc::now();
    }

    /// Records a successful publish to `post_url`.
    pub fn mark_published(&mut self, post_url: Option<String>) {
        self.status = ContentStatus::Published;
        if let Some(url) = post_url {
            if !self.published_to.contains(&url) {
                self.published_to.push(url);
            }
        }
        self.updated_at = Utc::now();
    }

    /// Excerpt sent to publishing targets: the first 200 characters plus an ellipsis.
    pub fn excerpt(&self) -> String {
        let head: String = self.body.chars().take(200).collect();
        format!("{head}...")
    }
}

/// Partial update from the editor. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub keyword: Option<String>,
    pub content_type: Option<ContentType>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub status: Option<ContentStatus>,
}
