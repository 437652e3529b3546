//! Pipeline orchestrator for transcript-qa.
//!
//! Coordinates ingestion (load transcripts, chunk, embed, snapshot) and opens
//! the snapshot again for question answering.

use crate::chunking::TextChunker;
use crate::config::{Prompts, Settings};
use crate::embedding::{create_embedder, Embedder};
use crate::error::{QaError, Result};
use crate::ingest::{load_transcripts, TranscriptSource};
use crate::progress::{ProgressEvent, ProgressSink, TracingProgress};
use crate::rag::RagEngine;
use crate::synthesis::{create_synthesizer, Synthesizer};
use crate::vector_store::VectorStore;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument};

/// The main orchestrator for the transcript-qa pipeline.
pub struct Orchestrator {
    settings: Settings,
    prompts: Prompts,
    embedder: Arc<dyn Embedder>,
    synthesizer: Arc<dyn Synthesizer>,
    progress: Arc<dyn ProgressSink>,
}

impl Orchestrator {
    /// Create an orchestrator with providers chosen from the settings.
    pub fn new(settings: Settings) -> Result<Self> {
        info!("Using {} provider", settings.provider.kind);
        let embedder = create_embedder(&settings)?;
        let synthesizer = create_synthesizer(&settings)?;
        Self::with_components(settings, embedder, synthesizer)
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        settings: Settings,
        embedder: Arc<dyn Embedder>,
        synthesizer: Arc<dyn Synthesizer>,
    ) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        Ok(Self {
            settings,
            prompts,
            embedder,
            synthesizer,
            progress: Arc::new(TracingProgress),
        })
    }

    /// Report progress to `progress` instead of the log.
    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    /// Get the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// An empty store wired to this orchestrator's embedder.
    pub fn new_store(&self) -> VectorStore {
        VectorStore::new(Arc::clone(&self.embedder))
            .with_max_concurrent(self.settings.ingestion.max_concurrent)
            .with_progress(Arc::clone(&self.progress))
    }

    /// Build the vector database from the configured transcript directory.
    #[instrument(skip(self))]
    pub async fn setup(&self) -> Result<SetupResult> {
        let sources = load_transcripts(&self.settings.transcript_dir())?;
        self.setup_from(&sources).await
    }

    /// Chunk, embed, and snapshot `sources`, replacing any previous database.
    pub async fn setup_from(&self, sources: &[TranscriptSource]) -> Result<SetupResult> {
        if sources.is_empty() {
            return Err(QaError::InvalidInput(format!(
                "No transcripts to index in {}",
                self.settings.transcript_dir().display()
            )));
        }

        let chunker = TextChunker::from_settings(&self.settings.chunking);
        let chunks = chunker.chunk_multiple(sources);
        for source in sources {
            self.progress.emit(&ProgressEvent::SourceChunked {
                source_id: source.source_id.clone(),
                chunks: chunks
                    .iter()
                    .filter(|c| c.source_id() == source.source_id)
                    .count(),
            });
        }

        if chunks.is_empty() {
            return Err(QaError::InvalidInput(
                "Transcripts produced no chunks; are they empty?".to_string(),
            ));
        }

        let mut store = self.new_store();
        store.initialize();
        let chunks_indexed = store.add_chunks(chunks).await?;
        let snapshot_path = store.save(&self.settings.vector_db_dir())?;

        Ok(SetupResult {
            sources: sources.len(),
            chunks_indexed,
            snapshot_path,
        })
    }

    /// Load the saved vector database.
    pub fn open_store(&self) -> Result<VectorStore> {
        let mut store = self.new_store();
        store.load(&self.settings.vector_db_dir())?;
        Ok(store)
    }

    /// A RAG engine over `store` using the configured synthesizer and policy.
    pub fn engine(&self, store: Arc<VectorStore>) -> RagEngine {
        RagEngine::new(store, Arc::clone(&self.synthesizer))
            .with_settings(&self.settings.rag)
            .with_prompts(self.prompts.clone())
            .with_progress(Arc::clone(&self.progress))
    }
}

/// Result of building the vector database.
#[derive(Debug)]
pub struct SetupResult {
    /// Number of transcripts read.
    pub sources: usize,
    /// Number of chunks embedded and stored.
    pub chunks_indexed: usize,
    /// Where the snapshot was written.
    pub snapshot_path: PathBuf,
}
