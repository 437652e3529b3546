//! Embedding generation for semantic search and retrieval.

mod huggingface;
mod openai;

pub use huggingface::HuggingFaceEmbedder;
pub use openai::OpenAIEmbedder;

use crate::config::{ProviderKind, Settings};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Trait for embedding generation.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for multiple texts, in input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed(text).await?);
        }
        Ok(embeddings)
    }

    /// Get the embedding dimensions.
    fn dimensions(&self) -> usize;
}

/// Create the embedder for the configured provider.
pub fn create_embedder(settings: &Settings) -> Result<Arc<dyn Embedder>> {
    let embedder: Arc<dyn Embedder> = match settings.provider.kind {
        ProviderKind::OpenAI => Arc::new(OpenAIEmbedder::with_config(
            &settings.openai.embedding_model,
            settings.openai.dimensions as usize,
        )?),
        ProviderKind::HuggingFace => {
            Arc::new(HuggingFaceEmbedder::from_settings(&settings.huggingface)?)
        }
    };
    Ok(embedder)
}
