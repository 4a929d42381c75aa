//! Per-session conversation memory

use crate::config::MemoryConfig;
use crate::provider::ChatTurn;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Session used when a request does not name one
pub const ANONYMOUS_SESSION: &str = "anonymous";

/// Bounded in-process conversation buffers, keyed by session id
#[derive(Clone)]
pub struct ConversationMemory {
    sessions: Arc<RwLock<HashMap<String, VecDeque<ChatTurn>>>>,
    max_turns: usize,
    max_sessions: usize,
}

impl ConversationMemory {
    pub fn new(config: &MemoryConfig) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            max_turns: config.max_turns,
            max_sessions: config.max_sessions.max(1),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.max_turns > 0
    }

    /// Earlier turns for `session`, oldest first
    pub async fn history(&self, session: &str) -> Vec<ChatTurn> {
        let sessions = self.sessions.read().await;
        sessions
            .get(session)
            .map(|turns| turns.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Record a question and the reply it got
    pub async fn record(&self, session: &str, question: &str, reply: &str) {
        if !self.is_enabled() {
            return;
        }

        let mut sessions = self.sessions.write().await;
        if !sessions.contains_key(session) && sessions.len() >= self.max_sessions {
            info!(sessions = sessions.len(), "Conversation memory full, resetting");
            sessions.clear();
        }

        let turns = sessions.entry(session.to_string()).or_default();
        turns.push_back(ChatTurn::user(question));
        turns.push_back(ChatTurn::assistant(reply));
        // Whole exchanges only, so history always opens with a user turn
        while turns.len() > self.max_turns {
            turns.pop_front();
            turns.pop_front();
        }
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn clear(&self) {
        self.sessions.write().await.clear();
    }
}
