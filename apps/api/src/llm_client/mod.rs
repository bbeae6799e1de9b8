/// LLM Client: the single point of entry for text-generation calls.
///
/// Other modules depend on the `TextGenerator` trait, never on the HTTP client,
/// so generation can be exercised against fakes.
///
/// The backend accepts a chat-style request and may answer in several shapes
/// (a bare string, `{text}`, `{content}`, `{message: {content}}`). The shape is
/// resolved once here and callers only ever see a `String`.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unexpected response format from AI service")]
    UnexpectedShape,

    #[error("AI service returned empty content")]
    EmptyContent,
}

/// Per-call generation settings.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOptions {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub system: Option<String>,
}

/// Text-generation collaborator.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Sends one prompt and returns the normalised, non-empty response text.
    async fn generate_text(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

/// Message body: either a string or a list of typed content blocks.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

impl MessageContent {
    fn into_text(self) -> String {
        match self {
            MessageContent::Text(text) => text,
            MessageContent::Blocks(blocks) => blocks
                .into_iter()
                .filter(|b| b.block_type == "text")
                .filter_map(|b| b.text)
                .collect::<Vec<_>>()
                .join(""),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct WrappedMessage {
    pub content: MessageContent,
}

/// Every response shape the backend is known to produce. Variant order is
/// resolution priority.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum GenerationResponse {
    PlainText(String),
    MessageWrapped { message: WrappedMessage },
    TextWrapped { text: String },
    ContentWrapped { content: MessageContent },
}

impl GenerationResponse {
    pub fn into_text(self) -> String {
        match self {
            GenerationResponse::PlainText(text) => text,
            GenerationResponse::MessageWrapped { message } => message.content.into_text(),
            GenerationResponse::TextWrapped { text } => text,
            GenerationResponse::ContentWrapped { content } => content.into_text(),
        }
    }

    /// Resolves a raw response body. Bodies that are not JSON are taken as plain text.
    pub fn from_body(body: &str) -> Result<Self, LlmError> {
        let value: Value = match serde_json::from_str(body) {
            Ok(v) => v,
            Err(_) => return Ok(GenerationResponse::PlainText(body.to_string())),
        };

        if let Some(message) = failure_message(&value) {
            return Err(LlmError::Api {
                status: 200,
                message,
            });
        }

        serde_json::from_value(value).map_err(|_| LlmError::UnexpectedShape)
    }
}

/// Detects `{success: false, error: {message}}` style envelopes.
fn failure_message(value: &Value) -> Option<String> {
    let has_payload = ["message", "text", "content"]
        .iter()
        .any(|k| value.get(k).is_some());
    let failed = value.get("success") == Some(&Value::Bool(false));
    let error = value.get("error")?;

    if !failed && has_payload {
        return None;
    }

    Some(
        error
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| error.as_str().map(str::to_string))
            .unwrap_or_else(|| error.to_string()),
    )
}

/// Extracts a readable message from a non-2xx body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message").or(Some(e)))
                .or_else(|| v.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string())
}

/// HTTP client for the text-generation backend. One attempt per call.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_url: String,
    api_key: Option<String>,
}

impl LlmClient {
    pub fn new(api_url: String, api_key: Option<String>) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()?,
            api_url,
            api_key,
        })
    }
}

#[async_trait]
impl TextGenerator for LlmClient {
    async fn generate_text(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, LlmError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = options.system.as_deref() {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: prompt,
        });

        let request_body = ChatRequest {
            model: &options.model,
            messages,
            max_tokens: options.max_tokens,
            temperature: options.temperature,
            stream: false,
        };

        let mut request = self.client.post(&self.api_url).json(&request_body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("Generation API returned {}", status);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let text = GenerationResponse::from_body(&body)?.into_text();
        let text = strip_code_fences(&text);

        if text.is_empty() {
            return Err(LlmError::EmptyContent);
        }

        debug!(
            "Generation call succeeded: model={}, chars={}",
            options.model,
            text.chars().count()
        );

        Ok(text.to_string())
    }
}

/// Strips a code fence (```html, ```markdown, ```md or bare ```) wrapping the whole output.
pub fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = ["html", "markdown", "md"]
        .iter()
        .find_map(|tag| rest.strip_prefix(tag))
        .unwrap_or(rest)
        .trim_start();
    rest.strip_suffix("```").map(str::trim).unwrap_or(rest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn options() -> GenerationOptions {
        GenerationOptions {
            model: "claude-3-5-sonnet".to_string(),
            max_tokens: 4000,
            temperature: 0.7,
            system: None,
        }
    }

    #[test]
    fn test_strip_code_fences_with_html_tag() {
        let input = "```html\n<h1>Hi</h1>\n```";
        assert_eq!(strip_code_fences(input), "<h1>Hi</h1>");
    }

    #[test]
    fn test_strip_code_fences_without_tag() {
        assert_eq!(strip_code_fences("```\n# Title\n```"), "# Title");
    }

    #[test]
    fn test_strip_code_fences_no_fences() {
        assert_eq!(strip_code_fences("  <p>x</p> "), "<p>x</p>");
    }

    #[test]
    fn test_response_shapes_resolve_to_text() {
        let cases = [
            (r#""plain""#, "plain"),
            (r#"{"message": {"content": "wrapped"}}"#, "wrapped"),
            (r#"{"text": "texty"}"#, "texty"),
            (r#"{"content": "contenty"}"#, "contenty"),
            (
                r#"{"message": {"content": [{"type": "text", "text": "a"}, {"type": "text", "text": "b"}]}}"#,
                "ab",
            ),
            (r#"{"message": {"content": "first"}, "text": "second"}"#, "first"),
            ("not json at all", "not json at all"),
        ];
        for (body, expected) in cases {
            let text = GenerationResponse::from_body(body).unwrap().into_text();
            assert_eq!(text, expected, "body: {body}");
        }
    }

    #[test]
    fn test_unknown_shape_is_rejected() {
        let result = GenerationResponse::from_body(r#"{"choices": []}"#);
        assert!(matches!(result, Err(LlmError::UnexpectedShape)));
    }

    #[test]
    fn test_failure_envelope_is_api_error() {
        let result = GenerationResponse::from_body(
            r#"{"success": false, "error": {"message": "insufficient funds"}}"#,
        );
        match result {
            Err(LlmError::Api { message, .. }) => assert_eq!(message, "insufficient funds"),
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(error_message(r#"{"error": {"message": "bad key"}}"#), "bad key");
        assert_eq!(error_message(r#"{"message": "nope"}"#), "nope");
        assert_eq!(error_message("gateway timeout"), "gateway timeout");
    }

    #[tokio::test]
    async fn test_generate_text_sends_chat_request() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat")
            .match_header("authorization", "Bearer secret")
            .match_body(Matcher::PartialJson(json!({
                "model": "claude-3-5-sonnet",
                "stream": false,
                "messages": [{"role": "user", "content": "Write about cats"}]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message": {"content": "```html\n<h1>Cats</h1>\n```"}}"#)
            .create_async()
            .await;

        let client =
            LlmClient::new(format!("{}/chat", server.url()), Some("secret".to_string())).unwrap();
        let text = client
            .generate_text("Write about cats", &options())
            .await
            .unwrap();

        assert_eq!(text, "<h1>Cats</h1>");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_text_surfaces_api_errors_without_retry() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat")
            .with_status(503)
            .with_body(r#"{"error": {"message": "overloaded"}}"#)
            .expect(1)
            .create_async()
            .await;

        let client = LlmClient::new(format!("{}/chat", server.url()), None).unwrap();
        let result = client.generate_text("x", &options()).await;

        match result {
            Err(LlmError::Api { status, message }) => {
                assert_eq!(status, 503);
                assert_eq!(message, "overloaded");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_text_rejects_empty_content() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat")
            .with_status(200)
            .with_body(r#"{"text": "   "}"#)
            .create_async()
            .await;

        let client = LlmClient::new(format!("{}/chat", server.url()), None).unwrap();
        let result = client.generate_text("x", &options()).await;
        assert!(matches!(result, Err(LlmError::EmptyContent)));
    }
}
