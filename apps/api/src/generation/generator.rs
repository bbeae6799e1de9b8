//! Content generation: turns a brief into a scored draft.
//!
//! Flow: validate brief → resolve model → build prompt → generate text →
//!       extract title → build draft record → analyze.
//!
//! Nothing is persisted here. A failed generation leaves no partial draft behind;
//! the handler saves the draft only once this returns `Ok`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::info;

use crate::content::models::ContentRecord;
use crate::errors::AppError;
use crate::generation::brief::ContentBrief;
use crate::generation::prompts::build_prompt;
use crate::llm_client::prompts::ARTICLE_WRITER_SYSTEM;
use crate::llm_client::{GenerationOptions, TextGenerator};
use crate::seo::{analyze, SeoAnalysis};

static HTML_H1_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<h1[^>]*>(.*?)</h1>").unwrap());
static MARKDOWN_H1_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^# (.+)$").unwrap());

/// Model ids the generation backend is known to serve.
pub const AVAILABLE_MODELS: &[&str] = &[
    "gpt-4o-mini",
    "gpt-4o",
    "o1",
    "o1-mini",
    "o3-mini",
    "gpt-4.1",
    "gpt-4.1-mini",
    "claude-sonnet-4",
    "claude-opus-4",
    "claude-3-7-sonnet",
    "claude-3-5-sonnet",
    "deepseek-chat",
    "deepseek-reasoner",
    "gemini-2.0-flash",
    "gemini-1.5-flash",
    "mistral-large-latest",
];

/// Short names offered by the dashboard, mapped to concrete model ids.
const MODEL_ALIASES: &[(&str, &str)] = &[
    ("claude", "claude-3-5-sonnet"),
    ("gpt-4", "gpt-4o"),
    ("gemini", "gemini-2.0-flash"),
];

/// Titles longer than this are not taken from the first line.
const MAX_FIRST_LINE_TITLE_CHARS: usize = 200;

/// Generation defaults from configuration.
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub default_model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedDraft {
    pub content: ContentRecord,
    pub analysis: SeoAnalysis,
    pub model: String,
}

/// Resolves a requested model (id or alias) against the allow-list.
pub fn resolve_model(requested: Option<&str>, default_model: &str) -> Result<String, AppError> {
    let requested = match requested.map(str::trim).filter(|m| !m.is_empty()) {
        Some(m) => m,
        None => return Ok(default_model.to_string()),
    };

    if let Some((_, id)) = MODEL_ALIASES.iter().find(|(alias, _)| *alias == requested) {
        return Ok(id.to_string());
    }

    if AVAILABLE_MODELS.contains(&requested) {
        Ok(requested.to_string())
    } else {
        Err(AppError::Validation(format!(
            "Unknown AI model '{requested}'"
        )))
    }
}

/// Picks a title from generated text: the first `<h1>`, else a markdown `# ` line,
/// else a short first line.
pub fn extract_title(text: &str) -> Option<String> {
    let strip = |s: &str| crate::seo::metrics::strip_tags(s).trim().to_string();

    if let Some(caps) = HTML_H1_RE.captures(text) {
        let title = strip(&caps[1]);
        if !title.is_empty() {
            return Some(title);
        }
    }

    if let Some(caps) = MARKDOWN_H1_RE.captures(text) {
        let title = caps[1].trim().to_string();
        if !title.is_empty() {
            return Some(title);
        }
    }

    let first_line = text.lines().next()?;
    if first_line.chars().count() < MAX_FIRST_LINE_TITLE_CHARS {
        let title = strip(first_line);
        if !title.is_empty() {
            return Some(title);
        }
    }

    None
}

/// Runs one generation request and returns the scored, unsaved draft.
pub async fn generate_content(
    generator: &dyn TextGenerator,
    settings: &GenerationSettings,
    brief: &ContentBrief,
) -> Result<GeneratedDraft, AppError> {
    brief.validate()?;

    let model = resolve_model(brief.ai_model.as_deref(), &settings.default_model)?;
    let options = GenerationOptions {
        model: model.clone(),
        max_tokens: settings.max_tokens,
        temperature: settings.temperature,
        system: Some(ARTICLE_WRITER_SYSTEM.to_string()),
    };

    info!(
        "Generating {} about '{}' with model {}",
        brief.content_type.as_str(),
        brief.keyword(),
        model
    );

    let prompt = build_prompt(brief);
    let text = generator.generate_text(&prompt, &options).await?;

    if text.trim().is_empty() {
        return Err(AppError::Generation(
            "AI service returned empty content".to_string(),
        ));
    }

    let title = extract_title(&text)
        .unwrap_or_else(|| format!("Complete Guide to {}", brief.keyword()));

    let mut content = ContentRecord::new(
        title,
        text,
        Some(brief.keyword().to_string()),
        brief.content_type,
    );
    let analysis = analyze(&content);
    content.seo_score = Some(analysis.overall_score);

    info!(
        "Generated draft: {} words, SEO score {}",
        content.word_count(),
        analysis.overall_score
    );

    Ok(GeneratedDraft {
        content,
        analysis,
        model,
    })
}
