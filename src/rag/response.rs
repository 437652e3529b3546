//! RAG response generation.

use super::context::format_context_for_prompt;
use super::{ChatResponse, SourceReference};
use crate::config::{Prompts, RagSettings};
use crate::error::{QaError, Result};
use crate::progress::{AskState, ProgressEvent, ProgressSink, TracingProgress};
use crate::synthesis::Synthesizer;
use crate::vector_store::VectorStore;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// RAG engine for question answering.
pub struct RagEngine {
    store: Arc<VectorStore>,
    synthesizer: Arc<dyn Synthesizer>,
    prompts: Prompts,
    top_k: usize,
    temperature: f32,
    max_tokens: u32,
    progress: Arc<dyn ProgressSink>,
}

impl RagEngine {
    /// Create a new RAG engine with the default retrieval policy.
    pub fn new(store: Arc<VectorStore>, synthesizer: Arc<dyn Synthesizer>) -> Self {
        let defaults = RagSettings::default();
        Self {
            store,
            synthesizer,
            prompts: Prompts::default(),
            top_k: defaults.top_k,
            temperature: defaults.temperature,
            max_tokens: defaults.max_tokens,
            progress: Arc::new(TracingProgress),
        }
    }

    /// Apply top-k, temperature, and token limits from settings.
    pub fn with_settings(mut self, settings: &RagSettings) -> Self {
        self.top_k = settings.top_k;
        self.temperature = settings.temperature;
        self.max_tokens = settings.max_tokens;
        self
    }

    /// Set the number of chunks retrieved per question.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Set custom prompts (with user-defined variables).
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    fn transition(&self, state: AskState) {
        self.progress.emit(&ProgressEvent::Ask(state));
    }

    /// Ask a single question and get a grounded response.
    #[instrument(skip(self), fields(question = %question))]
    pub async fn ask(&self, question: &str) -> Result<ChatResponse> {
        info!("Processing question: {}", question);
        self.transition(AskState::Idle);

        self.transition(AskState::Retrieving);
        let results = self.store.search(question, self.top_k).await?;

        if results.is_empty() {
            self.transition(AskState::NoContext);
            return Ok(ChatResponse {
                answer: self.prompts.rag.no_context_answer.clone(),
                sources: Vec::new(),
            });
        }

        self.transition(AskState::ContextBuilt);
        let mut vars = HashMap::new();
        vars.insert("question".to_string(), question.to_string());
        vars.insert("context".to_string(), format_context_for_prompt(&results));
        let prompt = self.prompts.render_with_custom(&self.prompts.rag.grounded, &vars);

        self.transition(AskState::Synthesizing);
        let answer = self
            .synthesizer
            .complete(&prompt, self.temperature, self.max_tokens)
            .await
            .map_err(|e| QaError::Synthesis(Box::new(e)))?;

        let sources: Vec<SourceReference> = results.iter().map(SourceReference::from).collect();
        debug!("Generated response with {} sources", sources.len());

        self.transition(AskState::Responded);
        Ok(ChatResponse { answer, sources })
    }

    /// Ask a question and return the answer, optionally with a citation block.
    pub async fn chat(&self, question: &str, include_sources: bool) -> Result<String> {
        let response = self.ask(question).await?;

        if include_sources {
            Ok(response.format_for_display())
        } else {
            Ok(response.answer)
        }
    }
}
