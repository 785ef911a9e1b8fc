//! Process-wide handles, built in a fixed order: LLM client, embedding
//! provider, corpus store, engine.

use std::sync::Arc;
use verse_chat::{ChatEngine, WhatlangDetector};
use verse_core::{config::AppConfig, AppResult};
use verse_knowledge::{create_provider, CorpusStore};
use verse_llm::create_client;

pub async fn build_engine(config: &AppConfig) -> AppResult<ChatEngine> {
    let api_key = config.resolve_api_key(&config.provider);
    let endpoint = config.provider_endpoint(&config.provider);
    let llm = create_client(
        &config.provider,
        endpoint.as_deref(),
        api_key.as_deref(),
        config.generation_timeout(),
    )?;
    tracing::info!(provider = %config.provider, model = %config.model, "Generation model ready");

    let ollama_endpoint = config.provider_endpoint("ollama");
    let embedder = create_provider(&config.embedding, ollama_endpoint.as_deref()).await?;
    tracing::info!(
        provider = embedder.provider_name(),
        model = embedder.model_name(),
        dimensions = embedder.dimensions(),
        "Embedding model ready"
    );

    let store = Arc::new(CorpusStore::load(config)?);
    tracing::info!(corpora = store.len(), "Corpus store ready");

    ChatEngine::new(
        config,
        llm,
        embedder,
        store,
        Arc::new(WhatlangDetector::default()),
    )
}
