//! Configuration module for transcript-qa.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{Prompts, RagPrompts};
pub use settings::{
    ChunkingSettings, GeneralSettings, HuggingFaceSettings, IngestionSettings, OpenAISettings,
    PromptSettings, ProviderKind, ProviderSettings, RagSettings, Settings, StorageSettings,
};
