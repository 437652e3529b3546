//! Progress reporting for long-running operations.
//!
//! The store, the ingestion pipeline, and the RAG engine report what they are
//! doing through a [`ProgressSink`] instead of writing to the console.

use std::fmt;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// States a single `ask` request moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AskState {
    Idle,
    Retrieving,
    NoContext,
    ContextBuilt,
    Synthesizing,
    Responded,
}

impl fmt::Display for AskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AskState::Idle => "idle",
            AskState::Retrieving => "retrieving",
            AskState::NoContext => "no-context",
            AskState::ContextBuilt => "context-built",
            AskState::Synthesizing => "synthesizing",
            AskState::Responded => "responded",
        };
        f.write_str(name)
    }
}

/// Something worth reporting.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    StoreInitialized,
    SourceChunked { source_id: String, chunks: usize },
    EmbeddingStarted { total: usize },
    ChunkEmbedded { done: usize, total: usize },
    ChunksAdded { count: usize },
    Searching { records: usize },
    EmptyStore,
    SnapshotSaved { path: PathBuf, records: usize },
    SnapshotLoaded { path: PathBuf, records: usize },
    Ask(AskState),
}

/// Receiver for progress events.
pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: &ProgressEvent);
}

/// Default sink: forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn emit(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::StoreInitialized => info!("Vector database initialized"),
            ProgressEvent::SourceChunked { source_id, chunks } => {
                info!("Chunked {}: {} chunks", source_id, chunks)
            }
            ProgressEvent::EmbeddingStarted { total } => {
                info!("Adding {} chunks to vector database", total)
            }
            ProgressEvent::ChunkEmbedded { done, total } => debug!("Embedded {}/{}", done, total),
            ProgressEvent::ChunksAdded { count } => {
                info!("Added {} chunks to vector database", count)
            }
            ProgressEvent::Searching { records } => debug!("Searching {} chunks", records),
            ProgressEvent::EmptyStore => warn!("Vector store is empty"),
            ProgressEvent::SnapshotSaved { path, records } => {
                info!("Vector database saved to {} ({} chunks)", path.display(), records)
            }
            ProgressEvent::SnapshotLoaded { path, records } => {
                info!("Vector database loaded from {} ({} chunks)", path.display(), records)
            }
            ProgressEvent::Ask(state) => debug!(state = %state, "ask"),
        }
    }
}

/// Sink that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn emit(&self, _event: &ProgressEvent) {}
}
