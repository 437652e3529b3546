//! Text chunking for breaking transcripts into searchable segments.
//!
//! Transcripts are split into overlapping windows of bounded length,
//! preferring sentence and word boundaries over mid-word cuts.

mod window;

pub use window::TextChunker;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A bounded excerpt of a source text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextChunk {
    content: String,
    chunk_index: usize,
    source_id: String,
    #[serde(default)]
    metadata: BTreeMap<String, String>,
}

impl TextChunk {
    /// Create a new chunk.
    pub fn new(
        content: impl Into<String>,
        chunk_index: usize,
        source_id: impl Into<String>,
        metadata: BTreeMap<String, String>,
    ) -> Self {
        Self {
            content: content.into(),
            chunk_index,
            source_id: source_id.into(),
            metadata,
        }
    }

    /// Trimmed text of this chunk.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Position of this chunk within its source, starting at 0.
    pub fn chunk_index(&self) -> usize {
        self.chunk_index
    }

    /// ID of the source this chunk was cut from.
    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    /// Provenance metadata (offsets, title, url).
    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    /// Character offset of the chunk window within its source.
    pub fn start_position(&self) -> Option<usize> {
        self.metadata.get("start_position")?.parse().ok()
    }

    /// Character offset just past the chunk window.
    pub fn end_position(&self) -> Option<usize> {
        self.metadata.get("end_position")?.parse().ok()
    }

    /// Copy of this chunk with extra metadata entries.
    pub(crate) fn with_metadata<I>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.metadata.extend(entries);
        self
    }
}
