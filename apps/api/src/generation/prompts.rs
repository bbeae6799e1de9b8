// Prompt text for article generation.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::generation::brief::ContentBrief;
use crate::generation::tone::{get_tone_guide, Tone};
use crate::llm_client::prompts::SEO_STRUCTURE_INSTRUCTION;

/// Article prompt template. Placeholders are filled by `build_prompt`.
pub const ARTICLE_PROMPT_TEMPLATE: &str = r#"Create a comprehensive {content_type} about "{keyword}".

Requirements:
- Target length: {target_length} words
- Content type: {content_type}
- Target audience: {audience}
- Write in a {tone_description} tone
{structure}
- Ensure content is original, informative, and valuable to readers
- Use bullet points and numbered lists where appropriate
- Include relevant examples and actionable tips

Style cues:
{tone_cues}

Avoid: {tone_avoid}

Structure the content with:
1. Engaging introduction that hooks the reader
2. Clear main sections with descriptive subheadings
3. Practical examples and tips throughout
4. Strong conclusion with clear next steps

Focus on providing genuine value while naturally incorporating the target keyword."#;

pub fn build_prompt(brief: &ContentBrief) -> String {
    let guide = get_tone_guide(Tone::from_label(&brief.tone));
    let tone_cues = guide
        .cues
        .iter()
        .map(|c| format!("- {c}"))
        .collect::<Vec<_>>()
        .join("\n");

    let mut prompt = ARTICLE_PROMPT_TEMPLATE
        .replace("{content_type}", brief.content_type.as_str())
        .replace("{keyword}", brief.keyword())
        .replace("{target_length}", &brief.target_length.to_string())
        .replace("{audience}", brief.audience.trim())
        .replace("{tone_description}", guide.description)
        .replace("{structure}", SEO_STRUCTURE_INSTRUCTION)
        .replace("{tone_cues}", &tone_cues)
        .replace("{tone_avoid}", &guide.avoid.join(", "));

    if let Some(links) = brief
        .affiliate_links
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
    {
        prompt.push_str(
            "\n\nWork these affiliate links into the article where they are genuinely relevant:\n",
        );
        prompt.push_str(links);
    }

    if let Some(custom) = brief
        .custom_prompt
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
    {
        prompt.push_str("\n\nAdditional instructions:\n");
        prompt.push_str(custom);
    }

    prompt
}
