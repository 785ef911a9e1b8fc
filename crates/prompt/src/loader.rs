//! Prompt loader.
//!
//! The service ships its prompts built in. A workspace may override any of
//! them by dropping `<id>.yml` into its prompt directory (`.verse/prompts/`).

use crate::types::PromptDefinition;
use std::path::Path;
use verse_core::{AppError, AppResult};

/// Prompt used for grounded answering.
pub const ANSWER_PROMPT_ID: &str = "chat.answer.grounded";

/// Prompt used to translate user text into the pivot language.
pub const TO_PIVOT_PROMPT_ID: &str = "chat.translate.to_pivot";

/// Prompt used to translate replies out of the pivot language.
pub const FROM_PIVOT_PROMPT_ID: &str = "chat.translate.from_pivot";

const BUILTIN_PROMPTS: [(&str, &str); 3] = [
    (
        ANSWER_PROMPT_ID,
        include_str!("../prompts/chat.answer.grounded.yml"),
    ),
    (
        TO_PIVOT_PROMPT_ID,
        include_str!("../prompts/chat.translate.to_pivot.yml"),
    ),
    (
        FROM_PIVOT_PROMPT_ID,
        include_str!("../prompts/chat.translate.from_pivot.yml"),
    ),
];

/// Load a prompt definition by ID.
///
/// Looks for `<prompts_dir>/<id>.yml` first and falls back to the built-in
/// definition.
///
/// # Example
/// ```no_run
/// use verse_prompt::{load_prompt, ANSWER_PROMPT_ID};
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let prompt = load_prompt(Some(Path::new(".verse/prompts")), ANSWER_PROMPT_ID)?;
/// println!("Loaded prompt: {}", prompt.title);
/// # Ok(())
/// # }
/// ```
pub fn load_prompt(prompts_dir: Option<&Path>, prompt_id: &str) -> AppResult<PromptDefinition> {
    if let Some(dir) = prompts_dir {
        let prompt_file = dir.join(format!("{}.yml", prompt_id));
        if prompt_file.exists() {
            tracing::debug!("Loading prompt override from: {:?}", prompt_file);

            let contents = std::fs::read_to_string(&prompt_file).map_err(|e| {
                AppError::Prompt(format!(
                    "Failed to read prompt file {:?}: {}",
                    prompt_file, e
                ))
            })?;

            let definition = parse_prompt(&contents)
                .map_err(|e| AppError::Prompt(format!("{:?}: {}", prompt_file, e)))?;

            if definition.id != prompt_id {
                return Err(AppError::Prompt(format!(
                    "Prompt file {:?} declares id '{}', expected '{}'",
                    prompt_file, definition.id, prompt_id
                )));
            }

            tracing::info!("Loaded prompt override: {} ({})", definition.id, definition.title);
            return Ok(definition);
        }
    }

    let (_, contents) = BUILTIN_PROMPTS
        .iter()
        .find(|(id, _)| *id == prompt_id)
        .ok_or_else(|| AppError::Prompt(format!("Unknown prompt: {}", prompt_id)))?;

    parse_prompt(contents)
}

fn parse_prompt(contents: &str) -> AppResult<PromptDefinition> {
    let definition: PromptDefinition = serde_yaml::from_str(contents)
        .map_err(|e| AppError::Prompt(format!("Failed to parse prompt YAML: {}", e)))?;

    validate_prompt(&definition)?;
    Ok(definition)
}

/// Validate a prompt definition.
fn validate_prompt(def: &PromptDefinition) -> AppResult<()> {
    if def.id.is_empty() {
        return Err(AppError::Prompt("Prompt ID cannot be empty".to_string()));
    }

    if def.title.is_empty() {
        return Err(AppError::Prompt("Prompt title cannot be empty".to_string()));
    }

    if def.template.trim().is_empty() {
        return Err(AppError::Prompt(
            "Prompt template cannot be empty".to_string(),
        ));
    }

    if !def.api_version.contains('.') {
        return Err(AppError::Prompt(format!(
            "Invalid apiVersion format: {}. Expected format: 'x.y'",
            def.api_version
        )));
    }

    for variable in &def.variables {
        if !def.template.contains(&format!("{{{{{}}}}}", variable)) {
            return Err(AppError::Prompt(format!(
                "Prompt '{}' declares variable '{}' but its template never uses it",
                def.id, variable
            )));
        }
    }

    Ok(())
}
