//! Pre-flight checks before expensive operations.
//!
//! Validates that provider credentials are available before starting
//! operations that would otherwise fail midway.

use crate::config::{ProviderKind, Settings};
use crate::error::{QaError, Result};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Indexing embeds every chunk.
    Setup,
    /// Asking embeds the question and synthesizes an answer.
    Ask,
    /// Search embeds the query.
    Search,
    /// Info only reads the snapshot.
    Info,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Setup | Operation::Ask | Operation::Search => check_api_key(settings),
        Operation::Info => Ok(()),
    }
}

/// Check that the selected provider has an API key.
fn check_api_key(settings: &Settings) -> Result<()> {
    match settings.provider.kind {
        ProviderKind::OpenAI => check_env("OPENAI_API_KEY", "sk-..."),
        ProviderKind::HuggingFace => {
            let configured = settings
                .huggingface
                .api_key
                .as_deref()
                .is_some_and(|key| !key.is_empty());
            if configured {
                Ok(())
            } else {
                check_env("HF_API_KEY", "hf_...")
            }
        }
    }
}

fn check_env(name: &str, example: &str) -> Result<()> {
    match std::env::var(name) {
        Ok(key) if !key.is_empty() => Ok(()),
        Ok(_) => Err(QaError::Config(format!(
            "{name} is empty. Set it with: export {name}='{example}'"
        ))),
        Err(_) => Err(QaError::Config(format!(
            "{name} not set. Set it with: export {name}='{example}'"
        ))),
    }
}
