//! HTTP request handlers.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::memory::ANONYMOUS_SESSION;
use crate::state::AppState;

/// Sent for every moderator rejection, whatever the reason
pub const REJECTION_TEXT: &str =
    "I'm sorry, but I can't process that input. Please ask a different question.";

/// Sent when no provider could answer
pub const FALLBACK_TEXT: &str = "I'm currently not connected to my AI brain. Please check the server configuration. Make sure OPENROUTER_API_KEY is set in your .env file, or Flowise is properly configured.";

const RUNNING_MESSAGE: &str = "Portfolio API is running";

/// Chat request body.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Any JSON value; the moderator decides whether it is usable text.
    #[serde(default)]
    pub question: Option<Value>,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Chat response body.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ChatReply {
    pub text: String,
}

impl ChatReply {
    fn new(text: impl Into<String>) -> Json<Self> {
        Json(Self { text: text.into() })
    }
}

/// `GET /api/health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "message": RUNNING_MESSAGE }))
}

/// `GET /` when no frontend is served.
pub async fn root(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "message": RUNNING_MESSAGE,
        "mode": state.mode,
        "endpoints": {
            "health": "/api/health",
            "chat": "/api/chat"
        }
    }))
}

/// Any other `/api` path.
pub async fn api_not_found() -> ApiError {
    ApiError::NotFound
}

/// Values a visitor could not have meant as a question: null, `""`, `false`
/// and zero.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// `POST /api/chat`
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatReply>> {
    let request_id = Uuid::new_v4();

    let question = match request.question {
        Some(value) if !is_blank(&value) => value,
        _ => return Err(ApiError::MissingQuestion),
    };

    let verdict = state.moderator.moderate_value(&question);
    if !verdict.accepted {
        warn!(
            %request_id,
            reason = %verdict.reason,
            detail = %verdict.detail,
            "Question rejected by moderator"
        );
        return Ok(ChatReply::new(REJECTION_TEXT));
    }

    // Accepted verdicts are always strings
    let question = match question {
        Value::String(text) => text,
        _ => return Err(ApiError::Internal("accepted a non-text question".to_string())),
    };

    let session = request
        .session_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(ANONYMOUS_SESSION);

    let history = state.memory.history(session).await;
    match state.provider.complete(&history, &question).await {
        Ok(reply) => {
            info!(%request_id, session, turns = history.len(), "Chat reply sent");
            state.memory.record(session, &question, &reply).await;
            Ok(ChatReply::new(reply))
        }
        Err(e) => {
            warn!(%request_id, error = %e, "No provider answered, sending fallback");
            Ok(ChatReply::new(FALLBACK_TEXT))
        }
    }
}
