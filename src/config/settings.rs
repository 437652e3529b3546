//! Configuration settings for transcript-qa.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub provider: ProviderSettings,
    pub openai: OpenAISettings,
    pub huggingface: HuggingFaceSettings,
    pub chunking: ChunkingSettings,
    pub rag: RagSettings,
    pub storage: StorageSettings,
    pub ingestion: IngestionSettings,
    pub prompts: PromptSettings,
}


/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level when no `-v` flag is given (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

/// Backend used for both embeddings and answer synthesis.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// OpenAI embeddings and chat completions (default).
    #[default]
    OpenAI,
    /// Hugging Face hosted inference API.
    HuggingFace,
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAI),
            "huggingface" | "hf" => Ok(ProviderKind::HuggingFace),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::OpenAI => write!(f, "openai"),
            ProviderKind::HuggingFace => write!(f, "huggingface"),
        }
    }
}

/// Provider selection.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ProviderSettings {
    /// Which backend to use (openai, huggingface).
    pub kind: ProviderKind,
}

/// OpenAI model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAISettings {
    /// Chat model used for answer synthesis.
    pub chat_model: String,
    /// Embedding model.
    pub embedding_model: String,
    /// Embedding dimensions.
    pub dimensions: u32,
}

impl Default for OpenAISettings {
    fn default() -> Self {
        Self {
            chat_model: "gpt-3.5-turbo".to_string(),
            embedding_model: "text-embedding-3-small".to_string(),
            dimensions: 1536,
        }
    }
}

/// Hugging Face inference API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HuggingFaceSettings {
    /// API token. Falls back to the HF_API_KEY environment variable.
    pub api_key: Option<String>,
    /// Base URL of the inference API; model names are appended to it.
    pub base_url: String,
    /// Text generation model used for answer synthesis.
    pub chat_model: String,
    /// Feature-extraction model used for embeddings.
    pub embedding_model: String,
    /// Embedding dimensions produced by the embedding model.
    pub dimensions: u32,
}

impl Default for HuggingFaceSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api-inference.huggingface.co/models".to_string(),
            chat_model: "mistralai/Mistral-7B-Instruct-v0.2".to_string(),
            embedding_model: "sentence-transformers/all-MiniLM-L6-v2".to_string(),
            dimensions: 384,
        }
    }
}

/// Text chunking settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingSettings {
    /// Maximum chunk length in characters.
    pub chunk_size: usize,
    /// Characters shared between consecutive chunks.
    pub chunk_overlap: usize,
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

/// RAG (Retrieval-Augmented Generation) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagSettings {
    /// Number of chunks retrieved per question.
    pub top_k: usize,
    /// Sampling temperature for answer synthesis.
    pub temperature: f32,
    /// Maximum tokens in a synthesized answer.
    pub max_tokens: u32,
}

impl Default for RagSettings {
    fn default() -> Self {
        Self {
            top_k: 4,
            temperature: 0.3,
            max_tokens: 1000,
        }
    }
}

/// Where transcripts and the vector database snapshot live.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Directory of transcript files (.txt or .json).
    pub transcript_dir: String,
    /// Directory holding vectordb.json.
    pub vector_db_dir: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            transcript_dir: "./transcripts".to_string(),
            vector_db_dir: "./vectordb".to_string(),
        }
    }
}

/// Ingestion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestionSettings {
    /// Maximum concurrent embedding requests while building the store.
    pub max_concurrent: usize,
}

impl Default for IngestionSettings {
    fn default() -> Self {
        Self { max_concurrent: 4 }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}


impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::QaError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("transcript-qa")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded transcript directory path.
    pub fn transcript_dir(&self) -> PathBuf {
        Self::expand_path(&self.storage.transcript_dir)
    }

    /// Get the expanded vector database directory path.
    pub fn vector_db_dir(&self) -> PathBuf {
        Self::expand_path(&self.storage.vector_db_dir)
    }

    /// Embedding dimensionality of the selected provider.
    pub fn embedding_dimensions(&self) -> usize {
        match self.provider.kind {
            ProviderKind::OpenAI => self.openai.dimensions as usize,
            ProviderKind::HuggingFace => self.huggingface.dimensions as usize,
        }
    }
}
