//! Hugging Face feature-extraction embeddings.

use super::Embedder;
use crate::config::HuggingFaceSettings;
use crate::error::{QaError, Result};
use crate::huggingface::HuggingFaceClient;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

/// The feature-extraction pipeline answers with either a pooled vector or
/// one vector per token.
#[derive(Deserialize)]
#[serde(untagged)]
enum FeatureResponse {
    Pooled(Vec<f32>),
    PerToken(Vec<Vec<f32>>),
}

/// Embedder backed by the Hugging Face inference API.
pub struct HuggingFaceEmbedder {
    client: HuggingFaceClient,
    model: String,
    dimensions: usize,
}

impl HuggingFaceEmbedder {
    pub fn new(client: HuggingFaceClient, model: &str, dimensions: usize) -> Self {
        Self {
            client,
            model: model.to_string(),
            dimensions,
        }
    }

    pub fn from_settings(settings: &HuggingFaceSettings) -> Result<Self> {
        Ok(Self::new(
            HuggingFaceClient::from_settings(settings)?,
            &settings.embedding_model,
            settings.dimensions as usize,
        ))
    }
}

/// Average token vectors into one.
fn mean_pool(rows: Vec<Vec<f32>>) -> Vec<f32> {
    let Some(width) = rows.first().map(Vec::len) else {
        return Vec::new();
    };
    let mut pooled = vec![0.0f32; width];
    for row in &rows {
        for (acc, v) in pooled.iter_mut().zip(row) {
            *acc += v;
        }
    }
    let n = rows.len() as f32;
    pooled.iter_mut().for_each(|v| *v /= n);
    pooled
}

#[async_trait]
impl Embedder for HuggingFaceEmbedder {
    #[instrument(skip(self, text), fields(model = %self.model))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let response: FeatureResponse = self
            .client
            .post(&self.model, &json!({ "inputs": text }))
            .await?;

        let embedding = match response {
            FeatureResponse::Pooled(v) => v,
            FeatureResponse::PerToken(rows) => mean_pool(rows),
        };

        if embedding.is_empty() {
            return Err(QaError::provider(format!(
                "Received empty embedding from {}",
                self.model
            )));
        }

        Ok(embedding)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
