//! OpenRouter, or any OpenAI-compatible chat completions endpoint

use super::{non_empty, ChatTurn, CompletionProvider, ProviderError};
use crate::config::OpenRouterConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub struct OpenRouterProvider {
    client: reqwest::Client,
    config: OpenRouterConfig,
    persona: String,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<WireChoice>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireReply,
}

#[derive(Debug, Deserialize)]
struct WireReply {
    #[serde(default)]
    content: Option<String>,
}

impl OpenRouterProvider {
    pub fn new(client: reqwest::Client, config: OpenRouterConfig, persona: &str) -> Self {
        Self {
            client,
            config,
            persona: persona.to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    fn messages<'a>(&'a self, history: &'a [ChatTurn], question: &'a str) -> Vec<WireMessage<'a>> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(WireMessage {
            role: "system",
            content: &self.persona,
        });
        messages.extend(history.iter().map(|turn| WireMessage {
            role: turn.role.as_str(),
            content: &turn.content,
        }));
        messages.push(WireMessage {
            role: "user",
            content: question,
        });
        messages
    }
}

#[async_trait]
impl CompletionProvider for OpenRouterProvider {
    fn name(&self) -> &str {
        "openrouter"
    }

    async fn complete(
        &self,
        history: &[ChatTurn],
        question: &str,
    ) -> Result<String, ProviderError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(ProviderError::NotConfigured)?;

        let body = CompletionRequest {
            model: &self.config.model,
            messages: self.messages(history, question),
            temperature: self.config.temperature,
        };

        let endpoint = self.endpoint();
        debug!(url = %endpoint, model = %self.config.model, turns = history.len(), "Calling OpenRouter");

        let response = self
            .client
            .post(&endpoint)
            .bearer_auth(api_key)
            .header("HTTP-Referer", &self.config.referer)
            .header("X-Title", &self.config.title)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status { status, body });
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content);

        Ok(non_empty(content))
    }
}
