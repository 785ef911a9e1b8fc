//! Multi-corpus retrieval.

use crate::corpus::CorpusStore;
use crate::embeddings::EmbeddingProvider;
use crate::types::{CorpusHits, RetrievalResults, SearchHit};
use crate::vector_index::VectorIndex;
use std::sync::Arc;
use verse_core::AppResult;

/// Searches every loaded corpus with one query embedding.
#[derive(Debug, Clone)]
pub struct Retriever {
    store: Arc<CorpusStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    top_k: usize,
}

impl Retriever {
    pub fn new(store: Arc<CorpusStore>, embedder: Arc<dyn EmbeddingProvider>, top_k: usize) -> Self {
        Self {
            store,
            embedder,
            top_k,
        }
    }

    pub fn store(&self) -> &CorpusStore {
        &self.store
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Return up to `top_k` hits per corpus for a pivot-language query.
    ///
    /// The result lists corpora in store order, including those without hits.
    /// Index rows beyond a corpus's record count are dropped.
    pub async fn search_all(&self, query: &str) -> AppResult<RetrievalResults> {
        let embedding = self.embedder.embed(query).await?;
        let mut corpora = Vec::with_capacity(self.store.len());

        for corpus in self.store.corpora() {
            let mut hits = Vec::with_capacity(self.top_k);

            for (row, score) in corpus.index().search(&embedding, self.top_k)? {
                match corpus.record(row) {
                    Some(record) => hits.push(SearchHit {
                        record: record.clone(),
                        score,
                    }),
                    None => tracing::debug!(
                        corpus = corpus.name(),
                        row,
                        records = corpus.records().len(),
                        "Dropping out-of-range index row"
                    ),
                }
            }

            tracing::debug!(
                corpus = corpus.name(),
                hits = hits.len(),
                best = hits.first().map(|h| h.score),
                "Searched corpus"
            );

            corpora.push(CorpusHits {
                corpus: corpus.name().to_string(),
                hits,
            });
        }

        Ok(RetrievalResults { corpora })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Corpus;
    use crate::flat_index::FlatIndex;
    use crate::types::VerseRecord;
    use verse_core::AppError;

    /// Embeds every query to the same fixed vector.
    #[derive(Debug)]
    struct FixedEmbedder(Vec<f32>);

    #[async_trait::async_trait]
    impl EmbeddingProvider for FixedEmbedder {
        fn provider_name(&self) -> &str {
            "fixed"
        }

        fn model_name(&self) -> &str {
            "fixed"
        }

        fn dimensions(&self) -> usize {
            self.0.len()
        }

        async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|_| self.0.clone()).collect())
        }
    }

    fn corpus(name: &str, vectors: Vec<Vec<f32>>, records: usize) -> Corpus {
        let dimension = vectors[0].len();
        Corpus::new(
            name,
            FlatIndex::from_vectors(dimension, vectors).unwrap(),
            (0..records)
                .map(|i| VerseRecord::new(format!("{}{}", name, i), format!("{} verse {}", name, i)))
                .collect(),
        )
    }

    fn retriever(corpora: Vec<Corpus>, query: Vec<f32>, top_k: usize) -> Retriever {
        Retriever::new(
            Arc::new(CorpusStore::from_corpora(corpora).unwrap()),
            Arc::new(FixedEmbedder(query)),
            top_k,
        )
    }

    #[tokio::test]
    async fn test_top_k_per_corpus_in_score_order() {
        let retriever = retriever(
            vec![
                corpus(
                    "gita",
                    vec![vec![0.0, 1.0], vec![1.0, 0.0], vec![0.8, 0.6], vec![0.6, 0.8]],
                    4,
                ),
                corpus("bible", vec![vec![1.0, 0.0]], 1),
            ],
            vec![1.0, 0.0],
            3,
        );

        let results = retriever.search_all("why fear").await.unwrap();
        let gita = results.get("gita").unwrap();
        let ids: Vec<&str> = gita.iter().map(|h| h.record.id.as_str()).collect();

        assert_eq!(ids, vec!["gita1", "gita2", "gita3"]);
        assert!(gita.windows(2).all(|w| w[0].score >= w[1].score));
        assert_eq!(results.get("bible").unwrap().len(), 1);
        assert_eq!(results.total_hits(), 4);
    }

    #[tokio::test]
    async fn test_preserves_store_order() {
        let retriever = retriever(
            vec![
                corpus("quran", vec![vec![1.0]], 1),
                corpus("gita", vec![vec![1.0]], 1),
                corpus("bible", vec![vec![1.0]], 1),
            ],
            vec![1.0],
            3,
        );

        let results = retriever.search_all("q").await.unwrap();
        let names: Vec<&str> = results.corpora.iter().map(|c| c.corpus.as_str()).collect();
        assert_eq!(names, vec!["quran", "gita", "bible"]);
    }

    #[tokio::test]
    async fn test_out_of_range_rows_dropped() {
        // Stale index: three rows, only one record
        let retriever = retriever(
            vec![corpus("quran", vec![vec![0.1], vec![0.9], vec![0.5]], 1)],
            vec![1.0],
            3,
        );

        let results = retriever.search_all("q").await.unwrap();
        let quran = results.get("quran").unwrap();
        assert_eq!(quran.len(), 1);
        assert_eq!(quran[0].record.id, "quran0");
    }

    #[tokio::test]
    async fn test_empty_store_yields_no_hits() {
        let retriever = retriever(vec![], vec![1.0], 3);
        let results = retriever.search_all("q").await.unwrap();
        assert!(results.is_empty());
        assert!(results.corpora.is_empty());
    }

    #[tokio::test]
    async fn test_dimension_mismatch_propagates() {
        let retriever = retriever(vec![corpus("gita", vec![vec![1.0, 0.0]], 1)], vec![1.0], 3);
        let err = retriever.search_all("q").await.unwrap_err();
        assert!(matches!(err, AppError::Knowledge(_)));
    }
}
