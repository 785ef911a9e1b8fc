//! Fakes shared by the pipeline tests.

use crate::engine::ChatEngine;
use crate::generator::GroundedAnswerGenerator;
use crate::language::{Language, LanguageDetector};
use crate::model::GenerationModel;
use crate::translation::TranslationBridge;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use verse_core::{AppConfig, AppError, AppResult};
use verse_knowledge::{Corpus, CorpusStore, EmbeddingProvider, FlatIndex, VerseRecord};
use verse_llm::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use verse_prompt::{load_prompt, ANSWER_PROMPT_ID, FROM_PIVOT_PROMPT_ID, TO_PIVOT_PROMPT_ID};

pub const HINDI: Language = Language {
    code: "hi",
    name: "Hindi",
};

/// Replies with scripted responses in order and records every prompt.
pub struct ScriptedLlm {
    responses: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
    fail: bool,
}

impl ScriptedLlm {
    pub fn new(responses: Vec<&str>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().map(String::from).collect()),
            prompts: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(vec![])
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl LlmClient for ScriptedLlm {
    fn provider_name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        self.prompts.lock().unwrap().push(request.prompt.clone());

        if self.fail {
            return Err(AppError::Llm("quota exceeded".to_string()));
        }

        let content = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| AppError::Llm("unexpected generation call".to_string()))?;

        Ok(LlmResponse {
            content,
            model: request.model.clone(),
            usage: LlmUsage::default(),
        })
    }
}

/// Detector that always answers the same language.
pub struct FixedDetector(pub Language);

impl LanguageDetector for FixedDetector {
    fn detect(&self, _text: &str) -> Language {
        self.0
    }

    fn pivot(&self) -> Language {
        Language::ENGLISH
    }
}

/// Embeds every text to the same unit vector.
#[derive(Debug)]
pub struct UnitEmbedder;

#[async_trait::async_trait]
impl EmbeddingProvider for UnitEmbedder {
    fn provider_name(&self) -> &str {
        "unit"
    }

    fn model_name(&self) -> &str {
        "unit"
    }

    fn dimensions(&self) -> usize {
        1
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|_| vec![1.0]).collect())
    }
}

fn model(llm: Arc<dyn LlmClient>) -> GenerationModel {
    GenerationModel::new(llm, "test-model", Duration::from_secs(5))
}

pub fn bridge(llm: Arc<dyn LlmClient>) -> TranslationBridge {
    TranslationBridge::new(
        model(llm),
        Language::ENGLISH,
        load_prompt(None, TO_PIVOT_PROMPT_ID).unwrap(),
        load_prompt(None, FROM_PIVOT_PROMPT_ID).unwrap(),
    )
}

pub fn generator(llm: Arc<dyn LlmClient>) -> GroundedAnswerGenerator {
    GroundedAnswerGenerator::new(
        model(llm),
        Language::ENGLISH,
        load_prompt(None, ANSWER_PROMPT_ID).unwrap(),
    )
}

/// Build a corpus of `rows` verses with descending scores against [`UnitEmbedder`].
pub fn corpus(name: &str, rows: usize) -> Corpus {
    let vectors = (0..rows).map(|i| vec![1.0 - i as f32 * 0.1]).collect();
    let records = (0..rows)
        .map(|i| VerseRecord::new(format!("{}-{}", name, i), format!("{} verse {}", name, i)))
        .collect();

    Corpus::new(name, FlatIndex::from_vectors(1, vectors).unwrap(), records)
}

pub fn store(corpora: &[(&str, usize)]) -> Arc<CorpusStore> {
    Arc::new(
        CorpusStore::from_corpora(
            corpora
                .iter()
                .map(|(name, rows)| corpus(name, *rows))
                .collect(),
        )
        .unwrap(),
    )
}

pub fn engine(
    llm: Arc<dyn LlmClient>,
    detector: FixedDetector,
    corpora: &[(&str, usize)],
) -> ChatEngine {
    let temp = tempfile::tempdir().unwrap();
    let config = AppConfig {
        workspace: temp.path().to_path_buf(),
        ..AppConfig::default()
    };

    ChatEngine::new(
        &config,
        llm,
        Arc::new(UnitEmbedder),
        store(corpora),
        Arc::new(detector),
    )
    .unwrap()
}
