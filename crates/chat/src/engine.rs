//! The chat request pipeline.

use crate::formatter::{ChatReply, ResponseFormatter, Sources};
use crate::generator::{GroundedAnswerGenerator, NOT_ANSWERED};
use crate::language::LanguageDetector;
use crate::model::GenerationModel;
use crate::normalizer::normalize;
use crate::translation::TranslationBridge;
use std::sync::Arc;
use verse_core::{AppConfig, AppError, AppResult};
use verse_knowledge::{assemble_context, CorpusStore, EmbeddingProvider, Retriever};
use verse_llm::LlmClient;
use verse_prompt::{load_prompt, ANSWER_PROMPT_ID, FROM_PIVOT_PROMPT_ID, TO_PIVOT_PROMPT_ID};

/// Process-wide pipeline state, built once at startup and shared read-only.
pub struct ChatEngine {
    detector: Arc<dyn LanguageDetector>,
    translator: TranslationBridge,
    retriever: Retriever,
    generator: GroundedAnswerGenerator,
    formatter: ResponseFormatter,
}

impl ChatEngine {
    /// Assemble the pipeline from startup handles.
    ///
    /// Prompts are read from `.verse/prompts/` when overridden there,
    /// otherwise the built-in set is used. Fails when a corpus index was
    /// built with a different embedding dimension than `embedder` produces.
    pub fn new(
        config: &AppConfig,
        llm: Arc<dyn LlmClient>,
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<CorpusStore>,
        detector: Arc<dyn LanguageDetector>,
    ) -> AppResult<Self> {
        check_dimensions(&store, embedder.as_ref())?;

        let prompts_dir = config.verse_dir().join("prompts");
        let prompts_dir = Some(prompts_dir.as_path());
        let pivot = detector.pivot();

        let model = GenerationModel::new(llm, config.model.clone(), config.generation_timeout());

        let translator = TranslationBridge::new(
            model.clone(),
            pivot,
            load_prompt(prompts_dir, TO_PIVOT_PROMPT_ID)?,
            load_prompt(prompts_dir, FROM_PIVOT_PROMPT_ID)?,
        );
        let generator =
            GroundedAnswerGenerator::new(model, pivot, load_prompt(prompts_dir, ANSWER_PROMPT_ID)?);

        Ok(Self {
            detector,
            formatter: ResponseFormatter::new(translator.clone()),
            translator,
            retriever: Retriever::new(store, embedder, config.retrieval.top_k),
            generator,
        })
    }

    /// Loaded corpora.
    pub fn corpora(&self) -> &CorpusStore {
        self.retriever.store()
    }

    /// Answer one user message.
    pub async fn handle(&self, message: &str) -> AppResult<ChatReply> {
        let language = self.detector.detect(message);
        let pivot = self.detector.pivot();
        let is_pivot = language.code == pivot.code;

        let mut question = normalize(message);
        if !is_pivot {
            question = self.translator.to_pivot(&question).await?;
        }

        let results = self.retriever.search_all(&question).await?;
        tracing::info!(
            language = language.code,
            hits = results.total_hits(),
            corpora = results.non_empty().count(),
            "Retrieved verses"
        );

        if results.is_empty() {
            let reply = self.translator.from_pivot(NOT_ANSWERED, language).await?;
            return Ok(ChatReply {
                reply,
                sources: Sources::default(),
            });
        }

        let context = assemble_context(&results);
        let answer = self.generator.answer(&context, &question).await?;

        self.formatter.format(&answer, language, &results).await
    }
}

fn check_dimensions(store: &CorpusStore, embedder: &dyn EmbeddingProvider) -> AppResult<()> {
    let expected = embedder.dimensions();
    for summary in store.summaries() {
        if summary.dimension != expected {
            return Err(AppError::Config(format!(
                "Corpus '{}' index has dimension {}, but embedding model '{}' produces {}",
                summary.name,
                summary.dimension,
                embedder.model_name(),
                expected
            )));
        }
    }
    Ok(())
}
