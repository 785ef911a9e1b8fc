//! Vector index abstraction for corpus rows.

use verse_core::AppResult;

/// Trait for read-only vector index backends.
///
/// Row `i` of the index corresponds to verse record `i` of its corpus.
pub trait VectorIndex: Send + Sync {
    /// Dimension of every stored vector.
    fn dimension(&self) -> usize;

    /// Number of stored rows.
    fn len(&self) -> usize;

    /// Whether the index holds no rows.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Search for the `top_k` rows most similar to `query`.
    ///
    /// Returns `(row, score)` pairs ordered by descending score. Errors if
    /// the query dimension differs from the index dimension.
    fn search(&self, query: &[f32], top_k: usize) -> AppResult<Vec<(usize, f32)>>;
}
