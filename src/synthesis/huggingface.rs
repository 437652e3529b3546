//! Hugging Face text generation.

use super::Synthesizer;
use crate::config::HuggingFaceSettings;
use crate::error::{QaError, Result};
use crate::huggingface::HuggingFaceClient;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

#[derive(Deserialize)]
struct Generation {
    generated_text: String,
}

/// Synthesizer backed by a hosted text-generation model.
pub struct HuggingFaceSynthesizer {
    client: HuggingFaceClient,
    model: String,
}

impl HuggingFaceSynthesizer {
    pub fn new(client: HuggingFaceClient, model: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
        }
    }

    pub fn from_settings(settings: &HuggingFaceSettings) -> Result<Self> {
        Ok(Self::new(
            HuggingFaceClient::from_settings(settings)?,
            &settings.chat_model,
        ))
    }
}

#[async_trait]
impl Synthesizer for HuggingFaceSynthesizer {
    #[instrument(skip(self, prompt), fields(model = %self.model))]
    async fn complete(&self, prompt: &str, temperature: f32, max_tokens: u32) -> Result<String> {
        let body = json!({
            "inputs": prompt,
            "parameters": {
                "temperature": temperature,
                "max_new_tokens": max_tokens,
                "return_full_text": false,
            }
        });

        let generations: Vec<Generation> = self.client.post(&self.model, &body).await?;

        generations
            .into_iter()
            .next()
            .map(|g| g.generated_text.trim().to_string())
            .ok_or_else(|| QaError::provider(format!("Empty generation from {}", self.model)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_generation_sends_parameters() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/mistral"))
            .and(body_partial_json(json!({
                "inputs": "Question?",
                "parameters": { "max_new_tokens": 250, "return_full_text": false }
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([{ "generated_text": " The answer. " }])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client =
            HuggingFaceClient::new(&format!("{}/models", server.uri()), "hf_test").unwrap();
        let synthesizer = HuggingFaceSynthesizer::new(client, "mistral");

        let answer = synthesizer.complete("Question?", 0.7, 250).await.unwrap();
        assert_eq!(answer, "The answer.");
    }

    #[tokio::test]
    async fn test_empty_generation_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let client = HuggingFaceClient::new(&server.uri(), "hf_test").unwrap();
        let synthesizer = HuggingFaceSynthesizer::new(client, "mistral");

        assert!(matches!(
            synthesizer.complete("Question?", 0.7, 250).await,
            Err(QaError::Provider { .. })
        ));
    }
}
