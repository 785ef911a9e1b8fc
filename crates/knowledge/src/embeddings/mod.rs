//! Query embedding.
//!
//! The embedding model must be the one the offline builder used for the
//! corpus indexes; only the query side is embedded at request time.

pub mod provider;
pub mod providers;

pub use provider::{create_provider, normalize, EmbeddingProvider};
