//! Error types for transcript-qa.

use std::path::PathBuf;
use thiserror::Error;

/// Library-level error type for transcript-qa operations.
#[derive(Error, Debug)]
pub enum QaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Provider error{}: {message}", status.map(|s| format!(" ({})", s)).unwrap_or_default())]
    Provider {
        /// HTTP status, when the failure came back from the API.
        status: Option<u16>,
        message: String,
    },

    #[error("Embedding generation failed for {source_id} chunk {chunk_index}: {source}")]
    EmbeddingGeneration {
        source_id: String,
        chunk_index: usize,
        #[source]
        source: Box<QaError>,
    },

    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Vector database snapshot not found: {}. Run setup first.", .0.display())]
    SnapshotNotFound(PathBuf),

    #[error("Answer synthesis failed: {0}")]
    Synthesis(#[source] Box<QaError>),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl QaError {
    /// Shorthand for a provider failure without an HTTP status.
    pub fn provider(message: impl Into<String>) -> Self {
        QaError::Provider {
            status: None,
            message: message.into(),
        }
    }
}

/// Result type alias for transcript-qa operations.
pub type Result<T> = std::result::Result<T, QaError>;
