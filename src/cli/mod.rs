//! CLI module for transcript-qa.

pub mod commands;
mod output;
pub mod preflight;

pub use output::{BarProgress, Output};

use clap::{Parser, Subcommand};

/// transcript-qa - Ask questions about video transcripts
///
/// Indexes a directory of transcripts into a vector database and answers
/// questions grounded in the indexed content, citing the source videos.
#[derive(Parser, Debug)]
#[command(name = "tqa")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Chunk, embed, and index every transcript in the transcript directory
    Setup {
        /// Read transcripts from this directory instead of the configured one
        #[arg(short, long)]
        transcripts: Option<String>,
    },

    /// Ask a single question about the indexed transcripts
    Ask {
        /// The question to ask
        question: String,

        /// Number of transcript chunks to retrieve
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// Print only the answer, without the sources block
        #[arg(long)]
        no_sources: bool,
    },

    /// Start an interactive question-and-answer session
    Chat {
        /// Number of transcript chunks to retrieve per question
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },

    /// Search for the transcript chunks most similar to a query
    Search {
        /// Search query
        query: String,

        /// Maximum number of results
        #[arg(short, long, default_value = "5")]
        limit: usize,
    },

    /// Show what the vector database contains
    Info,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Write the current configuration to the config file
    Init,

    /// Show configuration file path
    Path,
}
