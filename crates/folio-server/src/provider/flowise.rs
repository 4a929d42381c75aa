//! Flowise prediction endpoint

use super::{ChatTurn, CompletionProvider, ProviderError};
use crate::config::FlowiseConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub struct FlowiseProvider {
    client: reqwest::Client,
    config: FlowiseConfig,
}

#[derive(Debug, Serialize)]
struct PredictionRequest<'a> {
    question: &'a str,
}

#[derive(Debug, Deserialize)]
struct PredictionResponse {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    answer: Option<String>,
}

impl FlowiseProvider {
    pub fn new(client: reqwest::Client, config: FlowiseConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl CompletionProvider for FlowiseProvider {
    fn name(&self) -> &str {
        "flowise"
    }

    // The flow keeps its own memory, so only the question is sent
    async fn complete(
        &self,
        _history: &[ChatTurn],
        question: &str,
    ) -> Result<String, ProviderError> {
        if !self.config.is_configured() {
            return Err(ProviderError::NotConfigured);
        }
        let url = self
            .config
            .api_url
            .as_deref()
            .ok_or(ProviderError::NotConfigured)?;

        debug!(url = %url, "Calling Flowise");

        let mut request = self.client.post(url).json(&PredictionRequest { question });
        if let Some(key) = self.config.api_key.as_deref() {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status { status, body });
        }

        let prediction: PredictionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;

        // A reply with neither field is a failed flow, so the chain moves on
        [prediction.text, prediction.answer]
            .into_iter()
            .flatten()
            .find(|reply| !reply.trim().is_empty())
            .ok_or_else(|| {
                ProviderError::Decode("prediction has no `text` or `answer`".to_string())
            })
    }
}
