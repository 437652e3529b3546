//! Info command implementation.

use super::open_store;
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::vector_store::{snapshot_path, VectorRecord};
use anyhow::Result;
use std::collections::BTreeMap;

/// Run the info command.
pub fn run_info(settings: Settings) -> Result<()> {
    let orchestrator = Orchestrator::new(settings)?;
    let store = open_store(&orchestrator)?;

    Output::header("Vector database");
    Output::kv(
        "Snapshot",
        &snapshot_path(&orchestrator.settings().vector_db_dir())
            .display()
            .to_string(),
    );
    Output::kv("Provider", &orchestrator.settings().provider.kind.to_string());
    Output::kv("Dimensions", &store.dimensions().to_string());
    Output::kv("Chunks", &store.count().to_string());

    let sources = chunks_per_source(store.records());
    Output::header(&format!("Sources ({})", sources.len()));
    for (source_id, (title, chunks)) in &sources {
        if title.is_empty() || title == source_id {
            Output::list_item(&format!("{} ({} chunks)", source_id, chunks));
        } else {
            Output::list_item(&format!("{} - {} ({} chunks)", source_id, title, chunks));
        }
    }

    Ok(())
}

/// Group records by source ID, keeping each source's title.
fn chunks_per_source(records: &[VectorRecord]) -> BTreeMap<String, (String, usize)> {
    let mut sources: BTreeMap<String, (String, usize)> = BTreeMap::new();
    for record in records {
        let chunk = record.chunk();
        let entry = sources
            .entry(chunk.source_id().to_string())
            .or_insert_with(|| {
                let title = chunk.metadata().get("title").cloned().unwrap_or_default();
                (title, 0)
            });
        entry.1 += 1;
    }
    sources
}
