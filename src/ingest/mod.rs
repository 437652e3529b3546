//! Transcript sources feeding the ingestion pipeline.
//!
//! Transcripts live as files in a directory: plain `.txt` files named after
//! their source ID, or `.json` files holding a serialized [`TranscriptSource`].

mod youtube;

pub use youtube::{extract_video_id, reference_url};

use crate::error::{QaError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

/// Full text of one source together with its provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSource {
    /// Stable ID (the video ID for YouTube transcripts).
    pub source_id: String,
    /// Full transcript text.
    pub text: String,
    #[serde(default)]
    pub title: String,
    /// Human-readable duration, e.g. "00:12:34".
    #[serde(default)]
    pub duration_label: String,
    /// When the transcript was fetched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetched_at: Option<DateTime<Utc>>,
}

impl TranscriptSource {
    pub fn new(
        source_id: impl Into<String>,
        text: impl Into<String>,
        title: impl Into<String>,
        duration_label: impl Into<String>,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            text: text.into(),
            title: title.into(),
            duration_label: duration_label.into(),
            fetched_at: None,
        }
    }
}

/// Load every transcript in `dir`, ordered by file name.
pub fn load_transcripts(dir: &Path) -> Result<Vec<TranscriptSource>> {
    if !dir.is_dir() {
        return Err(QaError::InvalidInput(format!(
            "Transcript directory not found: {}",
            dir.display()
        )));
    }

    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file())
        .collect();
    paths.sort();

    let mut sources = Vec::new();
    for path in paths {
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();

        match extension {
            "txt" => {
                let text = std::fs::read_to_string(&path)?;
                sources.push(TranscriptSource::new(normalize_source_id(&stem), text, stem, ""));
            }
            "json" => {
                let content = std::fs::read_to_string(&path)?;
                let mut source: TranscriptSource = serde_json::from_str(&content)?;
                source.source_id = normalize_source_id(&source.source_id);
                sources.push(source);
            }
            _ => {
                debug!("Skipping non-transcript file {}", path.display());
                continue;
            }
        }
    }

    if sources.is_empty() {
        warn!("No transcripts found in {}", dir.display());
    }

    Ok(sources)
}

/// Reduce YouTube links to their video ID; other IDs pass through unchanged.
fn normalize_source_id(id: &str) -> String {
    extract_video_id(id).unwrap_or_else(|| id.to_string())
}

/// Write a transcript as `<dir>/<source_id>.json`, returning the path.
///
/// IDs that are not a single plain file name are rejected.
pub fn save_transcript(source: &TranscriptSource, dir: &Path) -> Result<PathBuf> {
    let id = source.source_id.as_str();
    let mut components = Path::new(id).components();
    let plain_name = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if !plain_name || id.contains(['/', '\\']) {
        return Err(QaError::InvalidInput(format!(
            "Source ID is not a valid file name: {:?}",
            id
        )));
    }

    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.json", source.source_id));
    let json = serde_json::to_string_pretty(source)?;
    std::fs::write(&path, json)?;
    Ok(path)
}
