//! LLM provider factory.
//!
//! Resolves a provider name to a client, injecting the endpoint, the
//! credential and the per-call HTTP timeout.

use crate::client::LlmClient;
use crate::providers::{gemini::DEFAULT_GEMINI_URL, ollama::DEFAULT_OLLAMA_URL};
use crate::providers::{GeminiClient, OllamaClient};
use crate::types::ProviderType;
use std::sync::Arc;
use std::time::Duration;
use verse_core::{AppError, AppResult};

/// Create an LLM client based on the provider name.
///
/// # Errors
/// Returns `AppError::Config` if the provider is unknown or a required
/// credential is missing; `AppError::Llm` if the HTTP client cannot be built.
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
    timeout: Duration,
) -> AppResult<Arc<dyn LlmClient>> {
    let provider_type = ProviderType::parse(provider)
        .ok_or_else(|| AppError::Config(format!("Unknown provider: {}", provider)))?;

    match provider_type {
        ProviderType::Ollama => {
            let base_url = endpoint.unwrap_or(DEFAULT_OLLAMA_URL);
            Ok(Arc::new(OllamaClient::with_timeout(base_url, timeout)?))
        }
        ProviderType::Gemini => {
            let api_key = api_key
                .filter(|key| !key.trim().is_empty())
                .ok_or_else(|| AppError::Config("Gemini provider requires API key".to_string()))?;
            let base_url = endpoint.unwrap_or(DEFAULT_GEMINI_URL);
            Ok(Arc::new(GeminiClient::with_timeout(base_url, api_key, timeout)?))
        }
    }
}
