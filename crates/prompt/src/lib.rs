//! Prompt system for the scripture chat service.
//!
//! Prompts are YAML definitions rendered with Handlebars. The three prompts
//! the chat pipeline needs are built in and can be overridden per workspace.

pub mod builder;
pub mod loader;
pub mod types;

pub use builder::build_prompt;
pub use loader::{load_prompt, ANSWER_PROMPT_ID, FROM_PIVOT_PROMPT_ID, TO_PIVOT_PROMPT_ID};
pub use types::{
    BuiltPrompt, BuiltPromptMetadata, PromptBehavior, PromptDefinition, PromptOutputSpec,
};
