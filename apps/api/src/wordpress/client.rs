//! WordPress REST API client. One attempt per call; failures are returned, never retried.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::content::models::ContentRecord;
use crate::wordpress::models::{PostStatus, PublishOptions, PublishResult, WordPressConnection};

#[derive(Debug, Error)]
pub enum WordPressError {
    #[error("Could not reach WordPress: {0}")]
    Http(#[from] reqwest::Error),

    #[error("WordPress API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected WordPress response: {0}")]
    Parse(#[from] serde_json::Error),
}

impl WordPressError {
    /// Upstream HTTP status, when the site answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            WordPressError::Api { status, .. } => Some(*status),
            WordPressError::Http(e) => e.status().map(|s| s.as_u16()),
            WordPressError::Parse(_) => None,
        }
    }
}

#[derive(Debug, Serialize)]
struct SeoMeta<'a> {
    #[serde(rename = "_yoast_wpseo_title")]
    title: &'a str,
    #[serde(rename = "_yoast_wpseo_metadesc")]
    description: &'a str,
}

#[derive(Debug, Serialize)]
struct PostPayload<'a> {
    title: &'a str,
    content: &'a str,
    excerpt: String,
    status: PostStatus,
    categories: Vec<String>,
    tags: Vec<String>,
    meta: SeoMeta<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreatedPost {
    id: u64,
    link: Option<String>,
}

/// A category or tag as listed by the site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

#[derive(Clone)]
pub struct WordPressClient {
    client: Client,
}

impl WordPressClient {
    pub fn new(timeout: Duration) -> Result<Self, WordPressError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
        })
    }

    fn get(&self, connection: &WordPressConnection, endpoint: &str) -> RequestBuilder {
        self.client
            .get(format!("{}/wp-json/wp/v2/{endpoint}", connection.url))
            .header(reqwest::header::AUTHORIZATION, connection.auth.header_value())
    }

    /// Creates a post from the record on the connection's site.
    pub async fn publish(
        &self,
        connection: &WordPressConnection,
        record: &ContentRecord,
        options: &PublishOptions,
    ) -> Result<PublishResult, WordPressError> {
        let date = match (options.status, options.scheduled_date) {
            (PostStatus::Future, Some(when)) => Some(when.format("%Y-%m-%dT%H:%M:%S").to_string()),
            _ => None,
        };

        let payload = PostPayload {
            title: &record.title,
            content: record.body(),
            excerpt: record.excerpt(),
            status: options.status,
            categories: options.categories(),
            tags: options.tag_list(),
            meta: SeoMeta {
                title: record
                    .meta_title
                    .as_deref()
                    .filter(|t| !t.is_empty())
                    .unwrap_or(&record.title),
                description: record.meta_description.as_deref().unwrap_or(""),
            },
            date,
        };

        let response = self
            .client
            .post(format!("{}/wp-json/wp/v2/posts", connection.url))
            .header(reqwest::header::AUTHORIZATION, connection.auth.header_value())
            .json(&payload)
            .send()
            .await?;

        let post: CreatedPost = serde_json::from_str(&success_body(response).await?)?;
        info!("Published post {} to {}", post.id, connection.url);

        Ok(PublishResult {
            post_id: post.id,
            url: post.link,
        })
    }

    /// Checks that the credentials are accepted (`GET /users/me`).
    pub async fn test_connection(
        &self,
        connection: &WordPressConnection,
    ) -> Result<(), WordPressError> {
        let response = self.get(connection, "users/me").send().await?;
        success_body(response).await?;
        Ok(())
    }

    pub async fn categories(
        &self,
        connection: &WordPressConnection,
    ) -> Result<Vec<Term>, WordPressError> {
        let response = self.get(connection, "categories").send().await?;
        Ok(serde_json::from_str(&success_body(response).await?)?)
    }

    pub async fn tags(&self, connection: &WordPressConnection) -> Result<Vec<Term>, WordPressError> {
        let response = self.get(connection, "tags").send().await?;
        Ok(serde_json::from_str(&success_body(response).await?)?)
    }
}

/// Returns the body of a 2xx response, or an `Api` error carrying the site's message.
async fn success_body(response: Response) -> Result<String, WordPressError> {
    let status = response.status();
    let body = response.text().await?;
    if status.is_success() {
        return Ok(body);
    }

    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        });
    warn!("WordPress returned {}: {}", status, message);

    Err(WordPressError::Api {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::models::ContentType;
    use crate::wordpress::models::WordPressAuth;
    use chrono::{TimeZone, Utc};
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn connection(url: String) -> WordPressConnection {
        WordPressConnection {
            id: "wp_1".to_string(),
            name: "Blog".to_string(),
            url,
            auth: WordPressAuth::ApplicationPassword {
                username: "admin".to_string(),
                password: "secret".to_string(),
            },
            is_active: true,
            last_test_at: None,
            created_at: Utc::now(),
        }
    }

    fn record() -> ContentRecord {
        let mut record = ContentRecord::new(
            "Indoor Cats".to_string(),
            "<p>All about cats.</p>".to_string(),
            Some("cats".to_string()),
            ContentType::Guide,
        );
        record.meta_description = Some("Cats, indoors.".to_string());
        record
    }

    fn client() -> WordPressClient {
        WordPressClient::new(Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_publish_sends_post_payload() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/wp-json/wp/v2/posts")
            .match_header("authorization", "Basic YWRtaW46c2VjcmV0")
            .match_body(Matcher::Json(json!({
                "title": "Indoor Cats",
                "content": "<p>All about cats.</p>",
                "excerpt": "<p>All about cats.</p>...",
                "status": "publish",
                "categories": ["Pets"],
                "tags": ["cats", "indoor"],
                "meta": {
                    "_yoast_wpseo_title": "Indoor Cats",
                    "_yoast_wpseo_metadesc": "Cats, indoors."
                }
            })))
            .with_status(201)
            .with_body(r#"{"id": 42, "link": "https://blog.test/?p=42"}"#)
            .create_async()
            .await;

        let options = PublishOptions {
            status: PostStatus::Publish,
            category: Some("Pets".to_string()),
            tags: Some("cats, indoor".to_string()),
            scheduled_date: None,
        };
        let result = client()
            .publish(&connection(server.url()), &record(), &options)
            .await
            .unwrap();

        assert_eq!(result.post_id, 42);
        assert_eq!(result.url.as_deref(), Some("https://blog.test/?p=42"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_scheduled_publish_includes_date() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/wp-json/wp/v2/posts")
            .match_body(Matcher::PartialJson(json!({
                "status": "future",
                "date": "2026-03-01T09:30:00"
            })))
            .with_status(201)
            .with_body(r#"{"id": 7}"#)
            .create_async()
            .await;

        let options = PublishOptions {
            status: PostStatus::Future,
            scheduled_date: Some(Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap()),
            ..Default::default()
        };
        let result = client()
            .publish(&connection(server.url()), &record(), &options)
            .await
            .unwrap();

        assert_eq!(result.post_id, 7);
        assert_eq!(result.url, None);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_publish_failure_carries_server_message() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/wp-json/wp/v2/posts")
            .with_status(401)
            .with_body(r#"{"code": "rest_cannot_create", "message": "Sorry, you are not allowed to create posts as this user."}"#)
            .expect(1)
            .create_async()
            .await;

        let err = client()
            .publish(&connection(server.url()), &record(), &PublishOptions::default())
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(401));
        assert!(err.to_string().contains("not allowed to create posts"));
    }

    #[tokio::test]
    async fn test_non_json_error_falls_back_to_status_text() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/wp-json/wp/v2/users/me")
            .with_status(502)
            .with_body("<html>bad gateway</html>")
            .create_async()
            .await;

        let err = client()
            .test_connection(&connection(server.url()))
            .await
            .unwrap_err();
        match err {
            WordPressError::Api { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "Bad Gateway");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_categories_and_tags() {
        let mut server = Server::new_async().await;
        let _categories = server
            .mock("GET", "/wp-json/wp/v2/categories")
            .with_status(200)
            .with_body(r#"[{"id": 1, "name": "Pets", "slug": "pets", "count": 3}]"#)
            .create_async()
            .await;
        let _tags = server
            .mock("GET", "/wp-json/wp/v2/tags")
            .with_status(200)
            .with_body(r#"[]"#)
            .create_async()
            .await;

        let conn = connection(server.url());
        let categories = client().categories(&conn).await.unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name, "Pets");
        assert!(client().tags(&conn).await.unwrap().is_empty());
    }
}
