//! CLI command implementations.

mod ask;
mod chat;
mod config;
mod info;
mod search;
mod setup;

pub use ask::run_ask;
pub use chat::run_chat;
pub use config::run_config;
pub use info::run_info;
pub use search::run_search;
pub use setup::run_setup;

use crate::cli::Output;
use crate::error::QaError;
use crate::orchestrator::Orchestrator;
use crate::vector_store::VectorStore;

/// Load the vector database, pointing at `tqa setup` when it is missing.
fn open_store(orchestrator: &Orchestrator) -> anyhow::Result<VectorStore> {
    match orchestrator.open_store() {
        Ok(store) => Ok(store),
        Err(e @ QaError::SnapshotNotFound(_)) => {
            Output::error(&format!("{}", e));
            Output::info("Run 'tqa setup' to index your transcripts first.");
            Err(e.into())
        }
        Err(e) => Err(e.into()),
    }
}
