//! Application state shared by the handlers.

use std::sync::Arc;

use folio_guard::{GuardConfig, Moderator};

use crate::config::{Mode, ServerConfig};
use crate::error::ServerError;
use crate::memory::ConversationMemory;
use crate::persona;
use crate::provider::{CompletionProvider, ProviderChain};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Question moderator, built once.
    pub moderator: Arc<Moderator>,
    /// Provider chain resolved at start-up.
    pub provider: Arc<dyn CompletionProvider>,
    /// Conversation buffers.
    pub memory: ConversationMemory,
    /// Deployment mode, reported by `/`.
    pub mode: Mode,
}

impl AppState {
    /// Assemble state from explicit parts.
    pub fn new(
        moderator: Moderator,
        provider: Arc<dyn CompletionProvider>,
        memory: ConversationMemory,
        mode: Mode,
    ) -> Self {
        Self {
            moderator: Arc::new(moderator),
            provider,
            memory,
            mode,
        }
    }

    /// Build the moderator, persona, provider chain and memory from config.
    pub fn from_config(config: &ServerConfig) -> Result<Self, ServerError> {
        let moderator = Moderator::new(config.guard.clone())?;
        let persona = persona::resolve(config)?;
        let chain = ProviderChain::from_config(config, &persona)?;
        let memory = ConversationMemory::new(&config.memory);

        Ok(Self::new(moderator, Arc::new(chain), memory, config.mode))
    }

    /// State with the default moderator and the given provider.
    pub fn with_provider(provider: Arc<dyn CompletionProvider>) -> Result<Self, ServerError> {
        let config = ServerConfig::default();
        Ok(Self::new(
            Moderator::new(GuardConfig::default())?,
            provider,
            ConversationMemory::new(&config.memory),
            config.mode,
        ))
    }
}
