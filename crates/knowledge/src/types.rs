//! Core types for scripture corpora.

use serde::{Deserialize, Serialize};

/// One retrievable unit of scripture text.
///
/// Every artifact key besides `id` and `content` (book, chapter, surah, topic
/// tags, ...) lands in `metadata` and is written back out unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerseRecord {
    /// Corpus-scoped identifier, e.g. `Q2.153`
    pub id: String,

    /// Embedding-ready display text
    pub content: String,

    /// Provenance fields, untouched by retrieval
    #[serde(flatten)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl VerseRecord {
    /// Create a record without metadata.
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            metadata: serde_json::Map::new(),
        }
    }
}

/// A verse matched by the retriever.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    /// The matched record
    pub record: VerseRecord,

    /// Inner-product similarity (cosine for normalized vectors)
    pub score: f32,
}

/// Hits for one corpus, best first.
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusHits {
    /// Corpus name
    pub corpus: String,

    /// At most top-K hits, in descending score order
    pub hits: Vec<SearchHit>,
}

/// Retrieval output across every loaded corpus, in corpus store order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetrievalResults {
    pub corpora: Vec<CorpusHits>,
}

impl RetrievalResults {
    /// Total number of hits across all corpora.
    pub fn total_hits(&self) -> usize {
        self.corpora.iter().map(|c| c.hits.len()).sum()
    }

    /// True when no corpus produced a hit.
    pub fn is_empty(&self) -> bool {
        self.total_hits() == 0
    }

    /// Corpora with at least one hit.
    pub fn non_empty(&self) -> impl Iterator<Item = &CorpusHits> {
        self.corpora.iter().filter(|c| !c.hits.is_empty())
    }

    /// Hits for a corpus by name.
    pub fn get(&self, corpus: &str) -> Option<&[SearchHit]> {
        self.corpora
            .iter()
            .find(|c| c.corpus == corpus)
            .map(|c| c.hits.as_slice())
    }
}
