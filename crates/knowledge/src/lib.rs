//! Scripture corpora and retrieval.
//!
//! Loads per-corpus vector indexes and verse records once at startup, embeds
//! queries and searches every corpus with exact inner-product search.

pub mod context;
pub mod corpus;
pub mod embeddings;
pub mod flat_index;
pub mod records;
pub mod retriever;
pub mod types;
pub mod vector_index;

pub use context::assemble_context;
pub use corpus::{Corpus, CorpusStore, CorpusSummary};
pub use embeddings::{create_provider, EmbeddingProvider};
pub use flat_index::FlatIndex;
pub use records::load_records;
pub use retriever::Retriever;
pub use types::{CorpusHits, RetrievalResults, SearchHit, VerseRecord};
pub use vector_index::VectorIndex;
