//! Exact inner-product index.
//!
//! Two artifact formats are read, chosen by extension:
//! - `.index`: a FAISS `IndexFlatIP` as written by `faiss.write_index`
//! - `.json`: `{"dimension": 768, "vectors": [[...], ...]}`
//!
//! Rows are L2-normalized by the offline builder, so inner product equals
//! cosine similarity. Search is a brute-force scan.

use crate::vector_index::VectorIndex;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use verse_core::{AppError, AppResult};

/// FAISS fourcc for a flat index with the inner-product metric.
const FAISS_FLAT_IP: &[u8; 4] = b"IxFI";

/// FAISS `MetricType::METRIC_INNER_PRODUCT`.
const FAISS_METRIC_INNER_PRODUCT: i32 = 0;

#[derive(Debug, Deserialize)]
struct IndexArtifact {
    dimension: usize,
    vectors: Vec<Vec<f32>>,
}

/// Flat (exhaustive) inner-product index.
#[derive(Debug, Clone)]
pub struct FlatIndex {
    dimension: usize,
    data: Vec<f32>,
}

impl FlatIndex {
    /// Build an index from rows, validating that every row has `dimension` values.
    pub fn from_vectors(dimension: usize, vectors: Vec<Vec<f32>>) -> AppResult<Self> {
        if dimension == 0 {
            return Err(AppError::Knowledge(
                "Index dimension must be greater than zero".to_string(),
            ));
        }

        let mut data = Vec::with_capacity(dimension * vectors.len());
        for (row, vector) in vectors.into_iter().enumerate() {
            if vector.len() != dimension {
                return Err(AppError::Knowledge(format!(
                    "Index row {} has {} values, expected {}",
                    row,
                    vector.len(),
                    dimension
                )));
            }
            data.extend(vector);
        }

        Ok(Self { dimension, data })
    }

    /// Load an index artifact from disk, picking the format by extension.
    pub fn load(path: &Path) -> AppResult<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        let index = match extension.as_deref() {
            Some("index") | Some("faiss") => Self::load_faiss(path)?,
            Some("json") => Self::load_json(path)?,
            _ => {
                return Err(AppError::Config(format!(
                    "Unsupported vector index format {:?}: expected .index or .json",
                    path
                )))
            }
        };

        tracing::debug!(
            "Loaded vector index {:?}: {} rows, dimension {}",
            path,
            index.len(),
            index.dimension
        );

        Ok(index)
    }

    /// Load the JSON artifact form.
    pub fn load_json(path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            AppError::Knowledge(format!("Failed to read vector index {:?}: {}", path, e))
        })?;

        let artifact: IndexArtifact = serde_json::from_str(&contents).map_err(|e| {
            AppError::Knowledge(format!("Invalid vector index {:?}: {}", path, e))
        })?;

        Self::from_vectors(artifact.dimension, artifact.vectors)
            .map_err(|e| AppError::Knowledge(format!("Invalid vector index {:?}: {}", path, e)))
    }

    /// Load a FAISS `IndexFlatIP` file.
    pub fn load_faiss(path: &Path) -> AppResult<Self> {
        let bytes = fs::read(path).map_err(|e| {
            AppError::Knowledge(format!("Failed to read vector index {:?}: {}", path, e))
        })?;

        Self::from_faiss_bytes(&bytes)
            .map_err(|e| AppError::Knowledge(format!("Invalid vector index {:?}: {}", path, e)))
    }

    /// Parse the little-endian layout `faiss.write_index` produces for a flat index:
    /// fourcc, header (d, ntotal, two reserved i64, is_trained, metric), then
    /// the row data as a length-prefixed f32 vector.
    pub fn from_faiss_bytes(bytes: &[u8]) -> AppResult<Self> {
        let mut reader = ByteReader::new(bytes);

        let fourcc = reader.take(4)?;
        if fourcc != FAISS_FLAT_IP {
            return Err(AppError::Knowledge(format!(
                "Unsupported FAISS index type {:?}, only IndexFlatIP is supported",
                String::from_utf8_lossy(fourcc)
            )));
        }

        let dimension = reader.read_i32()?;
        let ntotal = reader.read_i64()?;
        reader.take(16)?;
        reader.take(1)?;
        let metric = reader.read_i32()?;
        if metric != FAISS_METRIC_INNER_PRODUCT {
            return Err(AppError::Knowledge(format!(
                "Unsupported FAISS metric {}, expected inner product",
                metric
            )));
        }

        if dimension <= 0 || ntotal < 0 {
            return Err(AppError::Knowledge(format!(
                "Invalid FAISS header: dimension {}, rows {}",
                dimension, ntotal
            )));
        }
        let dimension = dimension as usize;
        let ntotal = ntotal as usize;

        let count = reader.read_u64()? as usize;
        let expected = dimension.checked_mul(ntotal).ok_or_else(|| {
            AppError::Knowledge("FAISS header row count overflows".to_string())
        })?;
        if count != expected {
            return Err(AppError::Knowledge(format!(
                "FAISS index holds {} values, expected {} rows of {}",
                count, ntotal, dimension
            )));
        }

        let byte_len = count
            .checked_mul(4)
            .ok_or_else(|| AppError::Knowledge("FAISS index size overflows".to_string()))?;
        let raw = reader.take(byte_len)?;
        let data = raw
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();

        Ok(Self { dimension, data })
    }

    fn row(&self, row: usize) -> &[f32] {
        let start = row * self.dimension;
        &self.data[start..start + self.dimension]
    }
}

impl VectorIndex for FlatIndex {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn len(&self) -> usize {
        self.data.len() / self.dimension
    }

    fn search(&self, query: &[f32], top_k: usize) -> AppResult<Vec<(usize, f32)>> {
        if query.len() != self.dimension {
            return Err(AppError::Knowledge(format!(
                "Query dimension {} does not match index dimension {}",
                query.len(),
                self.dimension
            )));
        }

        let mut scored: Vec<(usize, f32)> = (0..self.len())
            .map(|row| (row, dot(self.row(row), query)))
            .collect();

        // Stable sort keeps lower row first on equal scores
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(top_k);

        Ok(scored)
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

struct ByteReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn take(&mut self, n: usize) -> AppResult<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|end| *end <= self.bytes.len())
            .ok_or_else(|| {
                AppError::Knowledge(format!("Truncated FAISS index at byte {}", self.pos))
            })?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn read_i32(&mut self) -> AppResult<i32> {
        let b = self.take(4)?;
        Ok(i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn read_i64(&mut self) -> AppResult<i64> {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(self.take(8)?);
        Ok(i64::from_le_bytes(buf))
    }

    fn read_u64(&mut self) -> AppResult<u64> {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(self.take(8)?);
        Ok(u64::from_le_bytes(buf))
    }
}
