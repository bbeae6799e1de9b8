// Cross-cutting prompt fragments shared by every generation prompt.
// Feature-specific prompt text lives next to the feature (see generation::prompts).

/// System prompt for long-form article generation.
pub const ARTICLE_WRITER_SYSTEM: &str = "You are an expert SEO content writer. \
    You write original, accurate, well-structured long-form web content. \
    Respond with the article only: no preamble, no commentary, no apologies. \
    Format the article as HTML using <h1>, <h2>, <h3>, <p>, <ul>, <ol> and <a> tags.";

/// Structural requirements the scoring engine rewards.
pub const SEO_STRUCTURE_INSTRUCTION: &str = "\
- Include exactly one H1 heading, between two and eight H2 headings, and H3 subheadings where useful
- Optimize for SEO with keyword density between 1-2%
- Include a compelling introduction and conclusion with call-to-action
- Link to related content on the same site with relative links where natural
- Keep sentences short and vocabulary simple";
