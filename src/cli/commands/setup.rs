//! Setup command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::{BarProgress, Output};
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;
use std::sync::Arc;

/// Run the setup command.
pub async fn run_setup(transcripts: Option<String>, mut settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Setup, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    if let Some(dir) = transcripts {
        settings.storage.transcript_dir = dir;
    }

    Output::info(&format!(
        "Indexing transcripts from {}",
        settings.transcript_dir().display()
    ));

    let orchestrator =
        Orchestrator::new(settings)?.with_progress(Arc::new(BarProgress::new()));

    match orchestrator.setup().await {
        Ok(result) => {
            Output::success(&format!(
                "Indexed {} chunks from {} transcripts",
                result.chunks_indexed, result.sources
            ));
            Output::kv("Snapshot", &result.snapshot_path.display().to_string());
            Ok(())
        }
        Err(e) => {
            Output::error(&format!("Setup failed: {}", e));
            Err(e.into())
        }
    }
}
