//! OpenAI chat completions.

use super::Synthesizer;
use crate::error::{QaError, Result};
use crate::openai::{create_client, provider_error};
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Synthesizer backed by an OpenAI chat model.
pub struct OpenAISynthesizer {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
}

impl OpenAISynthesizer {
    pub fn new(model: &str) -> Result<Self> {
        Ok(Self {
            client: create_client()?,
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl Synthesizer for OpenAISynthesizer {
    #[instrument(skip(self, prompt), fields(model = %self.model))]
    async fn complete(&self, prompt: &str, temperature: f32, max_tokens: u32) -> Result<String> {
        let message = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|e| provider_error("Failed to build message", e))?;
        let messages: Vec<ChatCompletionRequestMessage> = vec![message.into()];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(temperature)
            .max_completion_tokens(max_tokens)
            .build()
            .map_err(|e| provider_error("Failed to build request", e))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| provider_error("Failed to generate response", e))?;

        let answer = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| QaError::provider("Empty response from LLM"))?;

        debug!("Generated {} characters", answer.len());
        Ok(answer)
    }
}
