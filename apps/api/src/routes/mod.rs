pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::auth::handlers as auth;
use crate::content::handlers as content;
use crate::generation::handlers as generation;
use crate::preferences::handlers as preferences;
use crate::seo::handlers as seo;
use crate::state::AppState;
use crate::wordpress::handlers as wordpress;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Identity
        .route("/api/v1/auth/sign-in", post(auth::handle_sign_in))
        .route("/api/v1/auth/sign-out", post(auth::handle_sign_out))
        .route("/api/v1/auth/me", get(auth::handle_me))
        // Content
        .route(
            "/api/v1/content",
            get(content::handle_list_content).post(content::handle_create_content),
        )
        .route(
            "/api/v1/content/:id",
            get(content::handle_get_content)
                .patch(content::handle_update_content)
                .delete(content::handle_delete_content),
        )
        .route("/api/v1/content/:id/seo", get(content::handle_content_seo))
        .route("/api/v1/content/:id/publish", post(wordpress::handle_publish))
        // SEO scoring
        .route("/api/v1/seo/analyze", post(seo::handle_analyze))
        // Generation
        .route("/api/v1/generate", post(generation::handle_generate))
        .route("/api/v1/generate/models", get(generation::handle_list_models))
        // WordPress
        .route(
            "/api/v1/wordpress/connections",
            get(wordpress::handle_list_connections).post(wordpress::handle_add_connection),
        )
        .route(
            "/api/v1/wordpress/connections/:id",
            axum::routing::delete(wordpress::handle_remove_connection),
        )
        .route(
            "/api/v1/wordpress/connections/:id/test",
            post(wordpress::handle_test_connection),
        )
        .route(
            "/api/v1/wordpress/connections/:id/categories",
            get(wordpress::handle_list_categories),
        )
        .route(
            "/api/v1/wordpress/connections/:id/tags",
            get(wordpress::handle_list_tags),
        )
        // Preferences
        .route(
            "/api/v1/preferences",
            get(preferences::handle_get_preferences).patch(preferences::handle_update_preferences),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use mockito::Server;
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::auth::InMemoryIdentityProvider;
    use crate::config::{Config, StorageBackend};
    use crate::llm_client::{GenerationOptions, LlmError, TextGenerator};
    use crate::storage::{InMemoryBlobStore, InMemoryKvStore};
    use crate::wordpress::WordPressClient;

    /// Answers every prompt with the same text, or fails when `text` is `None`.
    struct CannedGenerator {
        text: Option<String>,
    }

    #[async_trait]
    impl TextGenerator for CannedGenerator {
        async fn generate_text(
            &self,
            _prompt: &str,
            _options: &GenerationOptions,
        ) -> Result<String, LlmError> {
            self.text.clone().ok_or(LlmError::Api {
                status: 503,
                message: "backend unavailable".to_string(),
            })
        }
    }

    fn test_config() -> Config {
        Config {
            storage_backend: StorageBackend::Memory,
            remote: None,
            generation_api_url: "http://generation.invalid".to_string(),
            generation_api_key: None,
            generation_model: "claude-3-5-sonnet".to_string(),
            generation_max_tokens: 4000,
            generation_temperature: 0.7,
            publish_timeout_secs: 5,
            session_ttl_hours: 1,
            port: 0,
            rust_log: "info".to_string(),
        }
    }

    fn app_with(generated: Option<&str>) -> Router {
        app_with_config(generated, test_config())
    }

    fn app_with_config(generated: Option<&str>, config: Config) -> Router {
        build_router(AppState {
            identity: Arc::new(InMemoryIdentityProvider::new(chrono::Duration::hours(1))),
            blobs: Arc::new(InMemoryBlobStore::new()),
            kv: Arc::new(InMemoryKvStore::new()),
            generator: Arc::new(CannedGenerator {
                text: generated.map(str::to_string),
            }),
            publisher: WordPressClient::new(Duration::from_secs(5)).unwrap(),
            config,
        })
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn sign_in(app: &Router, email: &str) -> String {
        let (status, body) = send(
            app,
            Method::POST,
            "/api/v1/auth/sign-in",
            None,
            Some(json!({"username": "writer", "email": email})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let app = app_with(None);
        let (status, body) = send(&app, Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "seoforge-api");
    }

    #[tokio::test]
    async fn test_user_routes_require_session() {
        let app = app_with(None);
        for uri in ["/api/v1/content", "/api/v1/preferences", "/api/v1/auth/me"] {
            let (status, body) = send(&app, Method::GET, uri, None, None).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
            assert_eq!(body["error"]["code"], "UNAUTHORIZED");
        }

        let bogus = Uuid::new_v4().to_string();
        let (status, _) = send(&app, Method::GET, "/api/v1/content", Some(&bogus), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_sign_out_ends_session() {
        let app = app_with(None);
        let token = sign_in(&app, "a@example.com").await;

        let (status, me) = send(&app, Method::GET, "/api/v1/auth/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(me["email"], "a@example.com");

        let (status, _) =
            send(&app, Method::POST, "/api/v1/auth/sign-out", Some(&token), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, Method::GET, "/api/v1/auth/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_content_lifecycle() {
        let app = app_with(None);
        let token = sign_in(&app, "a@example.com").await;
        let auth = Some(token.as_str());

        let (status, created) = send(
            &app,
            Method::POST,
            "/api/v1/content",
            auth,
            Some(json!({
                "title": "Indoor Cats",
                "content": "<h1>Indoor Cats</h1><p>cats cats</p>",
                "keyword": "cats",
                "contentType": "guide"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["wordCount"], 3);
        assert!(created["seoScore"].is_u64());
        let id = created["id"].as_str().unwrap().to_string();

        let (status, patched) = send(
            &app,
            Method::PATCH,
            &format!("/api/v1/content/{id}"),
            auth,
            Some(json!({"content": "<p>one two three four five six</p>"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(patched["wordCount"], 6);
        assert_eq!(patched["title"], "Indoor Cats");

        let (status, analysis) = send(
            &app,
            Method::GET,
            &format!("/api/v1/content/{id}/seo"),
            auth,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(analysis["overallScore"], patched["seoScore"]);

        let (_, list) = send(&app, Method::GET, "/api/v1/content", auth, None).await;
        assert_eq!(list.as_array().unwrap().len(), 1);

        let (status, _) = send(
            &app,
            Method::DELETE,
            &format!("/api/v1/content/{id}"),
            auth,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(
            &app,
            Method::GET,
            &format!("/api/v1/content/{id}"),
            auth,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_content_is_private_to_its_owner() {
        let app = app_with(None);
        let alice = sign_in(&app, "alice@example.com").await;
        let bob = sign_in(&app, "bob@example.com").await;

        let (_, created) = send(
            &app,
            Method::POST,
            "/api/v1/content",
            Some(&alice),
            Some(json!({"title": "Private", "content": "secret"})),
        )
        .await;
        let id = created["id"].as_str().unwrap();

        let (status, _) = send(
            &app,
            Method::GET,
            &format!("/api/v1/content/{id}"),
            Some(&bob),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_analyze_needs_no_session() {
        let app = app_with(None);
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/seo/analyze",
            None,
            Some(json!({"title": "", "content": ""})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["lengthScore"], 40);
        assert_eq!(body["readabilityScore"], 0);
        assert_eq!(body["headingScore"], 0);
        assert_eq!(body["keywordScore"], 50);
    }

    #[tokio::test]
    async fn test_generate_saves_draft_on_success() {
        let app = app_with(Some("<h1>Indoor Cats</h1><p>Indoor cats live longer.</p>"));
        let token = sign_in(&app, "a@example.com").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/generate",
            Some(&token),
            Some(json!({"keyword": "indoor cats", "contentType": "guide"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["content"]["title"], "Indoor Cats");
        assert_eq!(body["content"]["status"], "draft");
        assert_eq!(body["model"], "claude-3-5-sonnet");
        assert_eq!(body["content"]["seoScore"], body["analysis"]["overallScore"]);

        let (_, list) = send(&app, Method::GET, "/api/v1/content", Some(&token), None).await;
        assert_eq!(list.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_generate_uses_preferred_model() {
        let app = app_with(Some("<h1>T</h1>"));
        let token = sign_in(&app, "a@example.com").await;

        let (status, _) = send(
            &app,
            Method::PATCH,
            "/api/v1/preferences",
            Some(&token),
            Some(json!({"defaultAiModel": "gpt-4o-mini"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(
            &app,
            Method::POST,
            "/api/v1/generate",
            Some(&token),
            Some(json!({"keyword": "cats"})),
        )
        .await;
        assert_eq!(body["model"], "gpt-4o-mini");
    }

    #[tokio::test]
    async fn test_generate_falls_back_to_configured_model() {
        let config = Config {
            generation_model: "gpt-4o".to_string(),
            ..test_config()
        };
        let app = app_with_config(Some("<h1>T</h1>"), config);
        let token = sign_in(&app, "a@example.com").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/generate",
            Some(&token),
            Some(json!({"keyword": "cats"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["model"], "gpt-4o");
    }

    #[tokio::test]
    async fn test_generate_failure_keeps_nothing() {
        let app = app_with(None);
        let token = sign_in(&app, "a@example.com").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/generate",
            Some(&token),
            Some(json!({"keyword": "indoor cats"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "GENERATION_ERROR");

        let (_, list) = send(&app, Method::GET, "/api/v1/content", Some(&token), None).await;
        assert!(list.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_generate_rejects_invalid_brief() {
        let app = app_with(Some("unused"));
        let token = sign_in(&app, "a@example.com").await;

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/v1/generate",
            Some(&token),
            Some(json!({"keyword": "cats", "targetLength": 100})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_models_listing() {
        let app = app_with(None);
        let (status, body) =
            send(&app, Method::GET, "/api/v1/generate/models", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["defaultModel"], "claude-3-5-sonnet");
        assert!(body["models"]
            .as_array()
            .unwrap()
            .contains(&json!("gpt-4o")));
    }

    #[tokio::test]
    async fn test_preferences_defaults_and_patch() {
        let app = app_with(None);
        let token = sign_in(&app, "a@example.com").await;

        let (_, prefs) = send(&app, Method::GET, "/api/v1/preferences", Some(&token), None).await;
        assert_eq!(
            prefs,
            json!({
                "theme": "light",
                "defaultAiModel": "claude-3-5-sonnet",
                "defaultWordCount": 2000,
                "autoSaveInterval": 30
            })
        );

        let (status, _) = send(
            &app,
            Method::PATCH,
            "/api/v1/preferences",
            Some(&token),
            Some(json!({"defaultAiModel": "not-a-model"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, prefs) = send(
            &app,
            Method::PATCH,
            "/api/v1/preferences",
            Some(&token),
            Some(json!({"theme": "dark", "autoSaveInterval": 60})),
        )
        .await;
        assert_eq!(prefs["theme"], "dark");
        assert_eq!(prefs["autoSaveInterval"], 60);
    }

    async fn create_connection(app: &Router, token: &str, url: &str) -> String {
        let (status, body) = send(
            app,
            Method::POST,
            "/api/v1/wordpress/connections",
            Some(token),
            Some(json!({
                "name": "Blog",
                "url": url,
                "auth": {"authType": "basic", "username": "admin", "password": "secret"}
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["authType"], "basic");
        assert!(body.get("auth").is_none(), "credentials must not be returned");
        body["id"].as_str().unwrap().to_string()
    }

    async fn create_content(app: &Router, token: &str) -> String {
        let (_, created) = send(
            app,
            Method::POST,
            "/api/v1/content",
            Some(token),
            Some(json!({"title": "Indoor Cats", "content": "<p>cats</p>"})),
        )
        .await;
        created["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_publish_success_marks_record_published() {
        let mut server = Server::new_async().await;
        let _post = server
            .mock("POST", "/wp-json/wp/v2/posts")
            .with_status(201)
            .with_body(r#"{"id": 9, "link": "https://blog.test/?p=9"}"#)
            .create_async()
            .await;

        let app = app_with(None);
        let token = sign_in(&app, "a@example.com").await;
        let connection_id = create_connection(&app, &token, &server.url()).await;
        let content_id = create_content(&app, &token).await;

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/v1/content/{content_id}/publish"),
            Some(&token),
            Some(json!({"connectionId": connection_id, "status": "publish", "tags": "cats"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"]["postId"], 9);
        assert_eq!(body["content"]["status"], "published");
        assert_eq!(body["content"]["publishedTo"], json!(["https://blog.test/?p=9"]));
    }

    #[tokio::test]
    async fn test_publish_failure_leaves_draft_untouched() {
        let mut server = Server::new_async().await;
        let _post = server
            .mock("POST", "/wp-json/wp/v2/posts")
            .with_status(403)
            .with_body(r#"{"message": "Sorry, you are not allowed to create posts."}"#)
            .create_async()
            .await;

        let app = app_with(None);
        let token = sign_in(&app, "a@example.com").await;
        let connection_id = create_connection(&app, &token, &server.url()).await;
        let content_id = create_content(&app, &token).await;

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/v1/content/{content_id}/publish"),
            Some(&token),
            Some(json!({"connectionId": connection_id})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "PUBLISH_ERROR");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("not allowed to create posts"));

        let (_, record) = send(
            &app,
            Method::GET,
            &format!("/api/v1/content/{content_id}"),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(record["status"], "draft");
        assert_eq!(record["publishedTo"], json!([]));
    }

    #[tokio::test]
    async fn test_connection_test_records_outcome() {
        let mut server = Server::new_async().await;
        let _me = server
            .mock("GET", "/wp-json/wp/v2/users/me")
            .with_status(401)
            .with_body(r#"{"message": "Invalid credentials"}"#)
            .create_async()
            .await;

        let app = app_with(None);
        let token = sign_in(&app, "a@example.com").await;
        let connection_id = create_connection(&app, &token, &server.url()).await;

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/v1/wordpress/connections/{connection_id}/test"),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], false);
        assert_eq!(body["connection"]["isActive"], false);
        assert!(body["connection"]["lastTestAt"].is_string());

        let (status, _) = send(
            &app,
            Method::DELETE,
            &format!("/api/v1/wordpress/connections/{connection_id}"),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, list) = send(
            &app,
            Method::GET,
            "/api/v1/wordpress/connections",
            Some(&token),
            None,
        )
        .await;
        assert!(list.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_taxonomy_failure_is_an_upstream_error() {
        let mut server = Server::new_async().await;
        let _categories = server
            .mock("GET", "/wp-json/wp/v2/categories")
            .with_status(500)
            .with_body(r#"{"message": "boom"}"#)
            .create_async()
            .await;

        let app = app_with(None);
        let token = sign_in(&app, "a@example.com").await;
        let connection_id = create_connection(&app, &token, &server.url()).await;

        let (status, body) = send(
            &app,
            Method::GET,
            &format!("/api/v1/wordpress/connections/{connection_id}/categories"),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "UPSTREAM_ERROR");
    }
}
