//! Grounded answer generation.

use crate::language::Language;
use crate::model::GenerationModel;
use std::collections::HashMap;
use verse_core::AppResult;
use verse_prompt::PromptDefinition;

/// Reply used when retrieval finds nothing in any corpus.
pub const NOT_ANSWERED: &str = "The provided texts do not clearly answer this question.";

/// Answers a question strictly from retrieved context.
#[derive(Debug, Clone)]
pub struct GroundedAnswerGenerator {
    model: GenerationModel,
    pivot: Language,
    prompt: PromptDefinition,
}

impl GroundedAnswerGenerator {
    pub fn new(model: GenerationModel, pivot: Language, prompt: PromptDefinition) -> Self {
        Self {
            model,
            pivot,
            prompt,
        }
    }

    /// Produce a pivot-language answer to `question` using only `context`.
    pub async fn answer(&self, context: &str, question: &str) -> AppResult<String> {
        let variables = HashMap::from([
            ("context".to_string(), context.to_string()),
            ("question".to_string(), question.to_string()),
            ("pivotLanguage".to_string(), self.pivot.name.to_string()),
        ]);

        self.model.run(&self.prompt, variables).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{generator, ScriptedLlm};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_prompt_carries_context_and_rules() {
        let llm = Arc::new(ScriptedLlm::new(vec![" Trust and keep going. "]));
        let generator = generator(llm.clone());

        let answer = generator
            .answer("BIBLE:\nFear not, for I am with you.", "Why should I not fear?")
            .await
            .unwrap();

        assert_eq!(answer, "Trust and keep going.");

        let prompt = &llm.prompts()[0];
        assert!(prompt.contains("Use ONLY the text provided below"));
        assert!(prompt.contains("Do NOT mention verse numbers"));
        assert!(prompt.contains("ALWAYS reply in English"));
        assert!(prompt.contains("TEXT:\nBIBLE:\nFear not, for I am with you."));
        assert!(prompt.contains("QUESTION:\nWhy should I not fear?"));
    }
}
