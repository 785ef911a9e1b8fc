//! Prompt builder for rendering templates.

use crate::types::{BuiltPrompt, PromptDefinition};
use handlebars::Handlebars;
use std::collections::HashMap;
use verse_core::{AppError, AppResult};

/// Build a prompt from a definition and input variables.
///
/// Every variable the definition declares must be supplied. The template is
/// rendered in strict mode without HTML escaping, so scripture text and user
/// questions reach the model verbatim.
///
/// # Example
/// ```no_run
/// use verse_prompt::{build_prompt, load_prompt, TO_PIVOT_PROMPT_ID};
/// use std::collections::HashMap;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let def = load_prompt(None, TO_PIVOT_PROMPT_ID)?;
/// let mut vars = HashMap::new();
/// vars.insert("text".to_string(), "Qu'est-ce que la patience ?".to_string());
/// vars.insert("targetLanguage".to_string(), "English".to_string());
///
/// let built = build_prompt(&def, vars)?;
/// println!("User prompt: {}", built.user);
/// # Ok(())
/// # }
/// ```
pub fn build_prompt(
    definition: &PromptDefinition,
    variables: HashMap<String, String>,
) -> AppResult<BuiltPrompt> {
    tracing::debug!("Building prompt: {}", definition.id);

    let missing: Vec<&str> = definition
        .variables
        .iter()
        .filter(|name| !variables.contains_key(name.as_str()))
        .map(String::as_str)
        .collect();

    if !missing.is_empty() {
        return Err(AppError::Prompt(format!(
            "Prompt '{}' is missing variables: {}",
            definition.id,
            missing.join(", ")
        )));
    }

    let user = render_template(&definition.template, &variables)?;

    Ok(BuiltPrompt::new(user, definition.id.clone(), variables))
}

/// Render a Handlebars template with variables.
fn render_template(template: &str, variables: &HashMap<String, String>) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Plain text out, no HTML entities
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars.set_strict_mode(true);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    handlebars
        .render("prompt", variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{load_prompt, ANSWER_PROMPT_ID, FROM_PIVOT_PROMPT_ID};
    use crate::types::{PromptBehavior, PromptOutputSpec};

    fn create_test_definition(template: &str, variables: &[&str]) -> PromptDefinition {
        PromptDefinition {
            id: "test.prompt".to_string(),
            title: "Test".to_string(),
            api_version: "1.0".to_string(),
            created_by: "test".to_string(),
            behavior: PromptBehavior {
                tone: "neutral".to_string(),
                style: "literal".to_string(),
            },
            variables: variables.iter().map(|v| v.to_string()).collect(),
            template: template.to_string(),
            output: PromptOutputSpec {
                format: "text".to_string(),
            },
        }
    }

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_render_simple_template() {
        let result = render_template("Question: {{prompt}}", &vars(&[("prompt", "Hello")]));
        assert_eq!(result.unwrap(), "Question: Hello");
    }

    #[test]
    fn test_render_does_not_escape() {
        let result = render_template("{{text}}", &vars(&[("text", "<b>\"love\" & 'mercy'</b>")]));
        assert_eq!(result.unwrap(), "<b>\"love\" & 'mercy'</b>");
    }

    #[test]
    fn test_render_missing_variable_is_error() {
        let result = render_template("Question: {{missing}}", &HashMap::new());
        assert!(matches!(result, Err(AppError::Prompt(_))));
    }

    #[test]
    fn test_build_prompt_reports_missing_declared_variables() {
        let def = create_test_definition("{{a}} {{b}}", &["a", "b"]);
        let err = build_prompt(&def, vars(&[("a", "x")])).unwrap_err();
        assert!(err.to_string().contains("b"));
    }

    #[test]
    fn test_build_prompt_metadata() {
        let def = create_test_definition("Q: {{q}}", &["q"]);
        let built = build_prompt(&def, vars(&[("q", "Why?")])).unwrap();

        assert_eq!(built.user, "Q: Why?");
        assert_eq!(built.metadata.source_prompt_id, "test.prompt");
        assert_eq!(built.metadata.resolved_variables["q"], "Why?");
    }

    #[test]
    fn test_answer_prompt_renders_context_and_question() {
        let def = load_prompt(None, ANSWER_PROMPT_ID).unwrap();
        let built = build_prompt(
            &def,
            vars(&[
                ("context", "\nGITA:\nDo your duty without attachment."),
                ("question", "Is this claim supported by the provided texts: what is duty?"),
                ("pivotLanguage", "English"),
            ]),
        )
        .unwrap();

        assert!(built.user.contains("GITA:\nDo your duty without attachment."));
        assert!(built.user.contains("QUESTION:\nIs this claim supported"));
        assert!(built.user.contains("ALWAYS reply in English"));
    }

    #[test]
    fn test_from_pivot_prompt_renders() {
        let def = load_prompt(None, FROM_PIVOT_PROMPT_ID).unwrap();
        let built = build_prompt(
            &def,
            vars(&[("text", "Be patient."), ("targetLanguage", "French")]),
        )
        .unwrap();

        assert!(built.user.starts_with("Translate the following text to French."));
        assert!(built.user.contains("Keep it natural and simple."));
        assert!(built.user.trim_end().ends_with("Be patient."));
    }
}
