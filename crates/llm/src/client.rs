//! LLM client abstraction and request/response types.
//!
//! Every generation-model call in the service (translation in both
//! directions and grounded answering) goes through [`LlmClient::complete`].

use serde::{Deserialize, Serialize};
use std::time::Duration;
use verse_core::{AppError, AppResult};

/// LLM completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmRequest {
    /// The prompt text to send to the LLM
    pub prompt: String,

    /// Model identifier (e.g., "models/gemini-flash-latest", "llama3.2")
    pub model: String,
}

impl LlmRequest {
    /// Create a new LLM request with required fields.
    pub fn new(prompt: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into(),
        }
    }
}

/// LLM completion response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    /// The generated text
    pub content: String,

    /// Model that generated the response
    pub model: String,

    /// Usage statistics
    pub usage: LlmUsage,
}

/// Token usage statistics.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LlmUsage {
    #[serde(default)]
    pub prompt_tokens: u32,

    #[serde(default)]
    pub completion_tokens: u32,

    #[serde(default)]
    pub total_tokens: u32,
}

impl LlmUsage {
    /// Create usage stats from prompt and completion token counts.
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Trait for LLM providers.
///
/// Implementations are shared by every concurrent request, so they must be
/// safe to call through `&self` without locking.
#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    /// Get the provider name (e.g., "gemini", "ollama").
    fn provider_name(&self) -> &str;

    /// Perform a non-streaming completion.
    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse>;
}

/// Run a completion with an upper bound on its duration.
///
/// Elapsing is reported as an [`AppError::Llm`], the same class as any
/// other generation failure.
pub async fn complete_with_timeout(
    client: &dyn LlmClient,
    request: &LlmRequest,
    timeout: Duration,
) -> AppResult<LlmResponse> {
    match tokio::time::timeout(timeout, client.complete(request)).await {
        Ok(result) => result,
        Err(_) => Err(AppError::Llm(format!(
            "{} request timed out after {}s",
            client.provider_name(),
            timeout.as_secs_f64()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SlowClient;

    #[async_trait::async_trait]
    impl LlmClient for SlowClient {
        fn provider_name(&self) -> &str {
            "slow"
        }

        async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(LlmResponse {
                content: "late".to_string(),
                model: request.model.clone(),
                usage: LlmUsage::default(),
            })
        }
    }

    #[test]
    fn test_usage_totals() {
        let usage = LlmUsage::new(12, 30);
        assert_eq!(usage.total_tokens, 42);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_llm_error() {
        let request = LlmRequest::new("Hello", "m");
        let result = complete_with_timeout(&SlowClient, &request, Duration::from_secs(1)).await;

        match result {
            Err(AppError::Llm(msg)) => assert!(msg.contains("timed out")),
            other => panic!("expected timeout error, got {:?}", other.map(|r| r.content)),
        }
    }
}
