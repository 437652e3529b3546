//! Provider doubles shared by unit tests.

use crate::chunking::TextChunk;
use crate::embedding::Embedder;
use crate::error::{QaError, Result};
use crate::progress::{ProgressEvent, ProgressSink};
use crate::synthesis::Synthesizer;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Embedder answering from a fixed table; unknown texts fail.
pub struct StubEmbedder {
    vectors: HashMap<String, Vec<f32>>,
    delays: HashMap<String, u64>,
    dimensions: usize,
    calls: AtomicUsize,
}

impl StubEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            vectors: HashMap::new(),
            delays: HashMap::new(),
            dimensions,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.vectors.insert(text.to_string(), vector);
        self
    }

    /// Make the embedding of `text` take `millis` to arrive.
    pub fn delayed(mut self, text: &str, millis: u64) -> Self {
        self.delays.insert(text.to_string(), millis);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Embedder for StubEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(millis) = self.delays.get(text) {
            tokio::time::sleep(Duration::from_millis(*millis)).await;
        }
        self.vectors.get(text).cloned().ok_or_else(|| QaError::Provider {
            status: Some(500),
            message: format!("no embedding for {:?}", text),
        })
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// Synthesizer that records prompts and returns a canned answer or failure.
pub struct StubSynthesizer {
    answer: Option<String>,
    prompts: Mutex<Vec<(String, f32, u32)>>,
}

impl StubSynthesizer {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: Some(answer.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            answer: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn last_call(&self) -> Option<(String, f32, u32)> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Synthesizer for StubSynthesizer {
    async fn complete(&self, prompt: &str, temperature: f32, max_tokens: u32) -> Result<String> {
        self.prompts
            .lock()
            .unwrap()
            .push((prompt.to_string(), temperature, max_tokens));
        self.answer.clone().ok_or_else(|| QaError::Provider {
            status: Some(401),
            message: "invalid api key".to_string(),
        })
    }
}

/// Sink that keeps every event.
#[derive(Default)]
pub struct RecordingProgress {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingProgress {
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl ProgressSink for RecordingProgress {
    fn emit(&self, event: &ProgressEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

/// A chunk with no metadata.
pub fn chunk(content: &str, source_id: &str, index: usize) -> TextChunk {
    TextChunk::new(content, index, source_id, BTreeMap::new())
}
