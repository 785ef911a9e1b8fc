//! Generation-model handle shared by translation and answering.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use verse_core::AppResult;
use verse_llm::{complete_with_timeout, LlmClient, LlmRequest};
use verse_prompt::{build_prompt, PromptDefinition};

/// A generation client bound to one model and a per-call timeout.
#[derive(Clone)]
pub struct GenerationModel {
    client: Arc<dyn LlmClient>,
    model: String,
    timeout: Duration,
}

impl std::fmt::Debug for GenerationModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationModel")
            .field("provider", &self.client.provider_name())
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GenerationModel {
    pub fn new(client: Arc<dyn LlmClient>, model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            model: model.into(),
            timeout,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Render `prompt` with `variables`, run it and return the trimmed text.
    pub async fn run(
        &self,
        prompt: &PromptDefinition,
        variables: HashMap<String, String>,
    ) -> AppResult<String> {
        let built = build_prompt(prompt, variables)?;

        let request = LlmRequest::new(built.user, self.model.clone());

        let response = complete_with_timeout(self.client.as_ref(), &request, self.timeout).await?;

        tracing::debug!(
            prompt = %prompt.id,
            tokens = response.usage.total_tokens,
            "Generation complete"
        );

        Ok(response.content.trim().to_string())
    }
}
