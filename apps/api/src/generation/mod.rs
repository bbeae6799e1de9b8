// Content generation: brief validation, prompt building, the generation call,
// title extraction and scoring of the resulting draft.
// All model calls go through the TextGenerator collaborator in llm_client.

pub mod brief;
pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod tone;
