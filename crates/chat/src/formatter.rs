//! Reply packaging: back-translation plus per-corpus source ids.

use crate::language::Language;
use crate::translation::TranslationBridge;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use verse_core::AppResult;
use verse_knowledge::RetrievalResults;

/// Source ids per corpus, in corpus store order. Only corpora with hits appear.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sources(Vec<(String, Vec<String>)>);

impl Sources {
    pub fn from_results(results: &RetrievalResults) -> Self {
        Self(
            results
                .non_empty()
                .map(|group| {
                    (
                        group.corpus.clone(),
                        group.hits.iter().map(|h| h.record.id.clone()).collect(),
                    )
                })
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, corpus: &str) -> Option<&[String]> {
        self.0
            .iter()
            .find(|(name, _)| name == corpus)
            .map(|(_, ids)| ids.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(name, ids)| (name.as_str(), ids.as_slice()))
    }
}

impl Serialize for Sources {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (corpus, ids) in &self.0 {
            map.serialize_entry(corpus, ids)?;
        }
        map.end()
    }
}

/// Final answer for one chat request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatReply {
    pub reply: String,
    pub sources: Sources,
}

/// Turns a pivot-language answer into the reply the user sees.
#[derive(Debug, Clone)]
pub struct ResponseFormatter {
    translator: TranslationBridge,
}

impl ResponseFormatter {
    pub fn new(translator: TranslationBridge) -> Self {
        Self { translator }
    }

    pub async fn format(
        &self,
        pivot_answer: &str,
        language: Language,
        results: &RetrievalResults,
    ) -> AppResult<ChatReply> {
        let reply = self.translator.from_pivot(pivot_answer, language).await?;

        Ok(ChatReply {
            reply,
            sources: Sources::from_results(results),
        })
    }
}
