//! Interactive chat command.

use super::open_store;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;
use console::style;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

/// Run the interactive chat command.
///
/// Each question is answered independently against the indexed transcripts.
pub async fn run_chat(top_k: Option<usize>, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Ask, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let orchestrator = Orchestrator::new(settings)?;
    let store = open_store(&orchestrator)?;
    let chunks = store.count();

    let mut engine = orchestrator.engine(Arc::new(store));
    if let Some(k) = top_k {
        engine = engine.with_top_k(k);
    }

    println!("\n{}", style("Transcript Q&A").bold().cyan());
    println!(
        "{}\n",
        style(format!("{} chunks indexed. Type your questions, or 'exit' to quit.", chunks)).dim()
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", style("You:").green().bold());
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }

        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            Output::info("Goodbye!");
            break;
        }

        let spinner = Output::spinner("Thinking...");
        let reply = engine.chat(input, true).await;
        spinner.finish_and_clear();

        match reply {
            Ok(text) => println!("\n{} {}\n", style("Assistant:").cyan().bold(), text),
            // A failed question should not end the session
            Err(e) => Output::error(&format!("Failed to answer: {}", e)),
        }
    }

    Ok(())
}
