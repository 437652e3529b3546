//! Hugging Face inference API client.

use crate::config::HuggingFaceSettings;
use crate::error::{QaError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Default timeout for inference requests.
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Thin JSON client for `POST {base_url}/{model}`.
#[derive(Clone)]
pub struct HuggingFaceClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HuggingFaceClient {
    /// Create a client; the key comes from settings or `HF_API_KEY`.
    pub fn from_settings(settings: &HuggingFaceSettings) -> Result<Self> {
        let api_key = settings
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var("HF_API_KEY").ok())
            .unwrap_or_default();

        Self::new(&settings.base_url, &api_key)
    }

    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| QaError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Post `body` to a model endpoint and decode the JSON reply.
    pub async fn post<B, T>(&self, model: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, model);
        debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| QaError::Provider {
                status: e.status().map(|s| s.as_u16()),
                message: format!("Request to {} failed: {}", model, e),
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| QaError::Provider {
            status: Some(status.as_u16()),
            message: format!("Failed to read response from {}: {}", model, e),
        })?;

        if !status.is_success() {
            return Err(QaError::Provider {
                status: Some(status.as_u16()),
                message: format!("Hugging Face API error for {}: {}", model, text),
            });
        }

        serde_json::from_str(&text).map_err(|e| QaError::Provider {
            status: Some(status.as_u16()),
            message: format!(
                "Unexpected response from {}: {} ({})",
                model,
                text.chars().take(200).collect::<String>(),
                e
            ),
        })
    }
}
