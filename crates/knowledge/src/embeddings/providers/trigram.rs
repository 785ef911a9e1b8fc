//! Offline trigram embedding provider.
//!
//! Feature-hashes padded character trigrams of each lower-cased word into a
//! fixed number of buckets. Deterministic and dependency-free, so it serves
//! local development and test corpora built with the same provider. It has no
//! semantic understanding; production indexes use a neural model.

use crate::embeddings::provider::{normalize, EmbeddingProvider};
use verse_core::AppResult;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0100_0000_01b3;

/// Trigram feature-hashing provider.
#[derive(Debug)]
pub struct TrigramProvider {
    dimensions: usize,
}

impl TrigramProvider {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0; self.dimensions];
        if self.dimensions == 0 {
            return embedding;
        }

        let lower = text.to_lowercase();
        for word in lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            // Pad so short words still yield boundary trigrams
            let chars: Vec<char> = std::iter::once('^')
                .chain(word.chars())
                .chain(std::iter::once('$'))
                .collect();

            for window in chars.windows(3) {
                let hash = fnv1a(window);
                let bucket = (hash % self.dimensions as u64) as usize;
                // High bit picks the sign to spread collisions around zero
                let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
                embedding[bucket] += sign;
            }
        }

        normalize(&mut embedding);
        embedding
    }
}

fn fnv1a(chars: &[char]) -> u64 {
    let mut buf = [0u8; 4];
    chars.iter().fold(FNV_OFFSET, |hash, c| {
        c.encode_utf8(&mut buf)
            .bytes()
            .fold(hash, |h, b| (h ^ b as u64).wrapping_mul(FNV_PRIME))
    })
}

#[async_trait::async_trait]
impl EmbeddingProvider for TrigramProvider {
    fn provider_name(&self) -> &str {
        "trigram"
    }

    fn model_name(&self) -> &str {
        "trigram-v1"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.embed_text(text)).collect())
    }
}
