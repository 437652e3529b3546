//! Ask command implementation.

use super::open_store;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;
use std::sync::Arc;

/// Run the ask command.
pub async fn run_ask(
    question: &str,
    top_k: Option<usize>,
    no_sources: bool,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Ask, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let orchestrator = Orchestrator::new(settings)?;
    let store = open_store(&orchestrator)?;

    let mut engine = orchestrator.engine(Arc::new(store));
    if let Some(k) = top_k {
        engine = engine.with_top_k(k);
    }

    let spinner = Output::spinner("Searching transcripts...");

    match engine.ask(question).await {
        Ok(response) => {
            spinner.finish_and_clear();

            println!("\n{}\n", response.answer);

            if !no_sources && !response.sources.is_empty() {
                Output::header("Sources");
                for (i, source) in response.sources.iter().enumerate() {
                    Output::search_result(
                        i + 1,
                        &source.source_id,
                        source.chunk_index,
                        source.similarity,
                        &source.content,
                        &source.url(),
                    );
                }
            }
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to generate answer: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
