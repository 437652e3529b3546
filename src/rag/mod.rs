//! RAG (Retrieval-Augmented Generation) for question answering with sources.
//!
//! Provides the ability to ask questions and get grounded answers from the
//! transcript knowledge base.

pub mod context;
mod response;

pub use response::RagEngine;

use crate::ingest::reference_url;
use crate::vector_store::SearchResult;
use serde::{Deserialize, Serialize};

/// Longest source excerpt kept in a response, in characters.
pub const MAX_EXCERPT_CHARS: usize = 200;

/// A retrieved chunk cited by an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceReference {
    pub source_id: String,
    pub chunk_index: usize,
    /// Chunk text, cut to 200 characters plus "..." when longer.
    pub content: String,
    /// Cosine similarity to the question.
    pub similarity: f32,
}

impl SourceReference {
    /// Canonical link to the source video.
    pub fn url(&self) -> String {
        reference_url(&self.source_id)
    }
}

impl From<&SearchResult<'_>> for SourceReference {
    fn from(result: &SearchResult<'_>) -> Self {
        Self {
            source_id: result.chunk.source_id().to_string(),
            chunk_index: result.chunk.chunk_index(),
            content: context::excerpt(result.chunk.content(), MAX_EXCERPT_CHARS),
            similarity: result.score,
        }
    }
}

/// A RAG response with answer and sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// The generated answer.
    pub answer: String,
    /// Retrieved chunks, best match first.
    pub sources: Vec<SourceReference>,
}

impl ChatResponse {
    /// Format the answer followed by its citation block, if any.
    pub fn format_for_display(&self) -> String {
        if self.sources.is_empty() {
            return self.answer.clone();
        }
        format!(
            "{}\n\n{}",
            self.answer,
            context::format_sources(&self.sources)
        )
    }
}
