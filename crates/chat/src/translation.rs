//! Translation between the user's language and the pivot language.

use crate::language::Language;
use crate::model::GenerationModel;
use std::collections::HashMap;
use verse_core::AppResult;
use verse_prompt::PromptDefinition;

/// Model-backed translation in both directions.
#[derive(Debug, Clone)]
pub struct TranslationBridge {
    model: GenerationModel,
    pivot: Language,
    to_pivot_prompt: PromptDefinition,
    from_pivot_prompt: PromptDefinition,
}

impl TranslationBridge {
    pub fn new(
        model: GenerationModel,
        pivot: Language,
        to_pivot_prompt: PromptDefinition,
        from_pivot_prompt: PromptDefinition,
    ) -> Self {
        Self {
            model,
            pivot,
            to_pivot_prompt,
            from_pivot_prompt,
        }
    }

    pub fn pivot(&self) -> Language {
        self.pivot
    }

    /// Translate user text into the pivot language.
    pub async fn to_pivot(&self, text: &str) -> AppResult<String> {
        tracing::debug!(target_language = self.pivot.code, "Translating to pivot");
        self.model
            .run(&self.to_pivot_prompt, variables(text, self.pivot))
            .await
    }

    /// Translate pivot-language text into `target`. Identity for the pivot itself.
    pub async fn from_pivot(&self, text: &str, target: Language) -> AppResult<String> {
        if target.code == self.pivot.code {
            return Ok(text.to_string());
        }

        tracing::debug!(target_language = target.code, "Translating from pivot");
        self.model
            .run(&self.from_pivot_prompt, variables(text, target))
            .await
    }
}

fn variables(text: &str, target: Language) -> HashMap<String, String> {
    HashMap::from([
        ("text".to_string(), text.to_string()),
        ("targetLanguage".to_string(), target.name.to_string()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{bridge, ScriptedLlm, HINDI};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_from_pivot_identity_makes_no_call() {
        let llm = Arc::new(ScriptedLlm::new(vec![]));
        let bridge = bridge(llm.clone());

        let out = bridge
            .from_pivot("Do not fear.", Language::ENGLISH)
            .await
            .unwrap();

        assert_eq!(out, "Do not fear.");
        assert!(llm.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_to_pivot_trims_and_names_language() {
        let llm = Arc::new(ScriptedLlm::new(vec!["  Why should I not fear?\n"]));
        let bridge = bridge(llm.clone());

        let out = bridge.to_pivot("मुझे डर क्यों नहीं?").await.unwrap();
        assert_eq!(out, "Why should I not fear?");

        let prompts = llm.prompts();
        assert!(prompts[0].starts_with("Translate the following text to English."));
        assert!(prompts[0].contains("मुझे डर क्यों नहीं?"));
    }

    #[tokio::test]
    async fn test_from_pivot_uses_target_name() {
        let llm = Arc::new(ScriptedLlm::new(vec!["डरो मत।"]));
        let bridge = bridge(llm.clone());

        let out = bridge.from_pivot("Do not fear.", HINDI).await.unwrap();
        assert_eq!(out, "डरो मत।");
        assert!(llm.prompts()[0].contains("to Hindi."));
        assert!(llm.prompts()[0].contains("Keep it natural and simple."));
    }

    #[tokio::test]
    async fn test_failure_propagates() {
        let llm = Arc::new(ScriptedLlm::failing());
        let bridge = bridge(llm);

        assert!(bridge.to_pivot("hola").await.is_err());
    }
}
