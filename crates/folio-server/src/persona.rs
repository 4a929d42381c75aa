//! System prompt describing the portfolio owner

use crate::config::{ConfigError, ServerConfig};
use std::fs;

/// Used when neither an inline persona nor a persona file is configured
pub const DEFAULT_PERSONA: &str = "\
You are a helpful assistant on an IT student's portfolio website.

The portfolio owner is a developer who enjoys building clean, user-centered
software across the frontend and backend. Their toolbox includes React,
TypeScript, Node.js, Python, Rust, PostgreSQL, Docker and Linux. Outside of
code they follow new technology, contribute to open source, and like anime.

Answer questions about the owner's skills, projects, interests and general
software development topics. Be friendly and conversational, and keep replies
short but informative. If you do not know a personal detail, say so instead
of inventing one.";

/// Inline persona first, then the persona file, then [`DEFAULT_PERSONA`]
pub fn resolve(config: &ServerConfig) -> Result<String, ConfigError> {
    if let Some(persona) = config.persona.as_deref().filter(|p| !p.trim().is_empty()) {
        return Ok(persona.trim().to_string());
    }

    if let Some(path) = &config.persona_file {
        let persona = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        return Ok(persona.trim().to_string());
    }

    Ok(DEFAULT_PERSONA.to_string())
}
