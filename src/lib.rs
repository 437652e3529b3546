//! transcript-qa - Question answering over video transcripts
//!
//! A CLI tool and library that chunks transcripts, embeds them into an
//! in-memory vector store, and answers questions grounded in the retrieved
//! excerpts with citations back to the source videos.
//!
//! # Architecture
//!
//! - `config` - Settings and prompt templates
//! - `ingest` - Transcript sources on disk
//! - `chunking` - Overlapping boundary-aware text chunking
//! - `embedding` - Embedding providers (OpenAI, Hugging Face)
//! - `synthesis` - Answer generation providers
//! - `vector_store` - In-memory similarity search with JSON snapshots
//! - `rag` - Grounded question answering with sources
//! - `orchestrator` - Pipeline coordination
//! - `progress` - Observable pipeline events
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use transcript_qa::config::Settings;
//! use transcript_qa::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(settings)?;
//!
//!     let result = orchestrator.setup().await?;
//!     println!("Indexed {} chunks", result.chunks_indexed);
//!
//!     let engine = orchestrator.engine(Arc::new(orchestrator.open_store()?));
//!     println!("{}", engine.chat("What is this video about?", true).await?);
//!
//!     Ok(())
//! }
//! ```

pub mod chunking;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod huggingface;
pub mod ingest;
pub mod openai;
pub mod orchestrator;
pub mod progress;
pub mod rag;
pub mod synthesis;
pub mod vector_store;

#[cfg(test)]
mod test_support;

pub use error::{QaError, Result};
