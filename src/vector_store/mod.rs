//! In-memory vector store with flat-file snapshots.
//!
//! Records are kept in insertion order and searched with a full linear scan
//! by cosine similarity. The corpus is expected to fit in memory.

mod memory;
mod snapshot;

pub use memory::VectorStore;
pub use snapshot::{read_snapshot, snapshot_path, write_snapshot, SNAPSHOT_FILE};

use crate::chunking::TextChunk;
use crate::error::{QaError, Result};
use serde::{Deserialize, Serialize};

/// One chunk with its embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    chunk: TextChunk,
    embedding: Vec<f32>,
}

impl VectorRecord {
    pub fn new(chunk: TextChunk, embedding: Vec<f32>) -> Self {
        Self { chunk, embedding }
    }

    pub fn chunk(&self) -> &TextChunk {
        &self.chunk
    }

    pub fn embedding(&self) -> &[f32] {
        &self.embedding
    }
}

/// A search hit borrowed from the store.
#[derive(Debug, Clone, Copy)]
pub struct SearchResult<'a> {
    /// The matched chunk.
    pub chunk: &'a TextChunk,
    /// Cosine similarity to the query, in [-1, 1].
    pub score: f32,
    /// 1-based position in the result list.
    pub rank: usize,
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0 when either vector has zero norm. Vectors of different lengths
/// are an error: `expected` is the stored vector's length, `actual` the query's.
pub fn cosine_similarity(query: &[f32], stored: &[f32]) -> Result<f32> {
    if query.len() != stored.len() {
        return Err(QaError::DimensionMismatch {
            expected: stored.len(),
            actual: query.len(),
        });
    }

    let dot_product: f32 = query.iter().zip(stored.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = query.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = stored.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok(dot_product / (norm_a * norm_b))
}
