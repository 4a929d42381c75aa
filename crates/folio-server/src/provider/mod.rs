//! Completion providers
//!
//! A provider turns the conversation so far plus a new question into reply
//! text. The server resolves its providers once at start-up into a
//! [`ProviderChain`] that tries each in order.

mod flowise;
mod openrouter;

pub use flowise::FlowiseProvider;
pub use openrouter::OpenRouterProvider;

use crate::config::ServerConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// Reply used when a provider answers with nothing
pub const EMPTY_REPLY: &str = "I'm not sure how to respond to that.";

/// Speaker of a chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One message in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Provider failures
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode upstream reply: {0}")]
    Decode(String),

    #[error("No completion provider configured")]
    NotConfigured,

    #[error("All {attempted} providers failed")]
    Exhausted { attempted: usize },
}

/// Something that can answer a question
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &str;

    /// Produce a reply to `question` given the earlier `history`
    async fn complete(&self, history: &[ChatTurn], question: &str)
        -> Result<String, ProviderError>;
}

/// Providers tried in order until one succeeds
#[derive(Default)]
pub struct ProviderChain {
    providers: Vec<Arc<dyn CompletionProvider>>,
}

impl ProviderChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a provider to the end of the chain
    pub fn with(mut self, provider: impl CompletionProvider + 'static) -> Self {
        self.providers.push(Arc::new(provider));
        self
    }

    /// OpenRouter first when a key is set, then Flowise when its URL is set
    pub fn from_config(config: &ServerConfig, persona: &str) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        let mut chain = Self::new();
        if config.openrouter.is_configured() {
            chain = chain.with(OpenRouterProvider::new(
                client.clone(),
                config.openrouter.clone(),
                persona,
            ));
        }
        if config.flowise.is_configured() {
            chain = chain.with(FlowiseProvider::new(client, config.flowise.clone()));
        }
        Ok(chain)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Provider names in the order they are tried
    pub fn names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }
}

#[async_trait]
impl CompletionProvider for ProviderChain {
    fn name(&self) -> &str {
        "chain"
    }

    async fn complete(
        &self,
        history: &[ChatTurn],
        question: &str,
    ) -> Result<String, ProviderError> {
        if self.providers.is_empty() {
            return Err(ProviderError::NotConfigured);
        }

        for provider in &self.providers {
            match provider.complete(history, question).await {
                Ok(reply) => {
                    info!(provider = provider.name(), reply_len = reply.len(), "Provider replied");
                    return Ok(reply);
                }
                Err(e) => {
                    warn!(provider = provider.name(), error = %e, "Provider failed, trying next");
                }
            }
        }

        Err(ProviderError::Exhausted {
            attempted: self.providers.len(),
        })
    }
}

/// Map an empty reply to [`EMPTY_REPLY`]
pub(crate) fn non_empty(reply: Option<String>) -> String {
    match reply {
        Some(text) if !text.trim().is_empty() => text,
        _ => EMPTY_REPLY.to_string(),
    }
}
