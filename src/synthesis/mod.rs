//! Answer synthesis: turning a grounded prompt into natural-language text.

mod huggingface;
mod openai;

pub use huggingface::HuggingFaceSynthesizer;
pub use openai::OpenAISynthesizer;

use crate::config::{ProviderKind, Settings};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Trait for language-model completion backends.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Complete `prompt` and return the generated text.
    async fn complete(&self, prompt: &str, temperature: f32, max_tokens: u32) -> Result<String>;
}

/// Create the synthesizer for the configured provider.
pub fn create_synthesizer(settings: &Settings) -> Result<Arc<dyn Synthesizer>> {
    let synthesizer: Arc<dyn Synthesizer> = match settings.provider.kind {
        ProviderKind::OpenAI => Arc::new(OpenAISynthesizer::new(&settings.openai.chat_model)?),
        ProviderKind::HuggingFace => {
            Arc::new(HuggingFaceSynthesizer::from_settings(&settings.huggingface)?)
        }
    };
    Ok(synthesizer)
}
