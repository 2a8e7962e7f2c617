use crate::GenerativeModel;
use anyhow::Context;
use async_trait::async_trait;
use prospect_core::config::ClassifierConfig;
use prospect_core::error::RouterError;
use serde::Deserialize;
use serde_json::json;
use std::time::Instant;
use tracing::debug;

/// Completion model served by a local Ollama instance.
pub struct OllamaModel {
    http: reqwest::Client,
    base_url: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

impl OllamaModel {
    pub fn new(config: &ClassifierConfig) -> Result<Self, RouterError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(RouterError::unreachable)?;
        Ok(Self {
            http,
            base_url: config.ollama_base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl GenerativeModel for OllamaModel {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        let start = Instant::now();
        let body = json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
        });

        let response = self
            .http
            .post(format!("{}/api/generate", self.base_url))
            .json(&body)
            .send()
            .await
            .with_context(|| format!("calling Ollama at {}", self.base_url))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("Ollama returned {}: {}", status, text);
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .context("decoding Ollama response")?;
        debug!(
            model = %self.model,
            duration_ms = start.elapsed().as_millis() as u64,
            "model completion received"
        );
        Ok(parsed.response)
    }
}
