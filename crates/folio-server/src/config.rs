//! Server configuration
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! environment variables. Command-line flags are applied last by the binary.

use folio_guard::{GuardConfig, GuardError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default listening port
pub const DEFAULT_PORT: u16 = 5000;

/// Default OpenAI-compatible endpoint
pub const DEFAULT_OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Default chat model
pub const DEFAULT_OPENROUTER_MODEL: &str = "kwaipilot/kat-coder-pro:free";

/// A Flowise URL still containing this marker has not been set up
pub const FLOWISE_PLACEHOLDER: &str = "YOUR_FLOW_ID";

/// Origins allowed in development mode
pub const DEV_ORIGINS: &[&str] = &[
    "http://localhost:5173",
    "http://localhost:3000",
    "http://127.0.0.1:5173",
    "http://localhost:5000",
];

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error(transparent)]
    Guard(#[from] GuardError),
}

/// Deployment mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Development,
    Production,
}

impl Mode {
    /// Parse a mode name; anything other than "production" is development
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("production") {
            Mode::Production
        } else {
            Mode::Development
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Development => "development",
            Mode::Production => "production",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind
    pub host: String,
    /// Port to bind
    pub port: u16,
    /// Deployment mode
    pub mode: Mode,
    /// CORS origins for production
    pub allowed_origins: Vec<String>,
    /// Built frontend to serve in production
    pub static_dir: Option<PathBuf>,
    /// Inline system prompt
    pub persona: Option<String>,
    /// File holding the system prompt
    pub persona_file: Option<PathBuf>,
    /// Timeout for each provider request
    pub request_timeout_secs: u64,
    pub openrouter: OpenRouterConfig,
    pub flowise: FlowiseConfig,
    pub memory: MemoryConfig,
    /// Moderator settings
    pub guard: GuardConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            mode: Mode::default(),
            allowed_origins: vec![],
            static_dir: None,
            persona: None,
            persona_file: None,
            request_timeout_secs: 30,
            openrouter: OpenRouterConfig::default(),
            flowise: FlowiseConfig::default(),
            memory: MemoryConfig::default(),
            guard: GuardConfig::default(),
        }
    }
}

/// OpenRouter (OpenAI-compatible) provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenRouterConfig {
    /// Provider is enabled only when a key is present
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    /// Sent as `HTTP-Referer`
    pub referer: String,
    /// Sent as `X-Title`
    pub title: String,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_OPENROUTER_BASE_URL.to_string(),
            model: DEFAULT_OPENROUTER_MODEL.to_string(),
            temperature: 0.7,
            referer: format!("http://localhost:{}", DEFAULT_PORT),
            title: "Portfolio Chatbot".to_string(),
        }
    }
}

impl OpenRouterConfig {
    pub fn is_configured(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

/// Flowise prediction endpoint settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowiseConfig {
    pub api_url: Option<String>,
    /// Optional bearer key (Flowise Cloud)
    pub api_key: Option<String>,
}

impl FlowiseConfig {
    /// URL is set and is not the placeholder
    pub fn is_configured(&self) -> bool {
        self.api_url
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty() && !url.contains(FLOWISE_PLACEHOLDER))
    }
}

/// Conversation memory bounds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Turns kept per session; 0 disables memory. Trimming drops whole
    /// exchanges, so an odd cap keeps one turn fewer.
    pub max_turns: usize,
    /// Sessions kept before the store is reset
    pub max_sessions: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_turns: 20,
            max_sessions: 1000,
        }
    }
}

impl ServerConfig {
    /// Load from an optional TOML file, then apply process environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.guard.validate()?;
        Ok(config)
    }

    /// Parse a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Override fields from environment variables read through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(port) = var("PORT") {
            self.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue { key: "PORT", value: port })?;
        }
        if let Some(mode) = var("FOLIO_MODE").or_else(|| var("NODE_ENV")) {
            self.mode = Mode::parse(&mode);
        }
        if let Some(key) = var("OPENROUTER_API_KEY") {
            self.openrouter.api_key = Some(key);
        }
        if let Some(url) = var("OPENROUTER_BASE_URL") {
            self.openrouter.base_url = url;
        }
        if let Some(model) = var("OPENROUTER_MODEL") {
            self.openrouter.model = model;
        }
        if let Some(url) = var("FLOWISE_API_URL") {
            self.flowise.api_url = Some(url);
        }
        if let Some(key) = var("FLOWISE_API_KEY") {
            self.flowise.api_key = Some(key);
        }
        if let Some(origins) = var("CLIENT_URL").or_else(|| var("FRONTEND_URL")) {
            self.allowed_origins.extend(split_origins(&origins));
        }
        if let Some(dir) = var("FOLIO_STATIC_DIR") {
            self.static_dir = Some(PathBuf::from(dir));
        }
        if let Some(file) = var("FOLIO_PERSONA_FILE") {
            self.persona_file = Some(PathBuf::from(file));
        }
        Ok(())
    }

    /// Directory to serve the frontend from, if static serving applies
    pub fn static_root(&self) -> Option<&Path> {
        match (&self.mode, &self.static_dir) {
            (Mode::Production, Some(dir)) if dir.is_dir() => Some(dir.as_path()),
            _ => None,
        }
    }

    /// Origins the CORS layer should allow. Empty means any origin.
    pub fn cors_origins(&self) -> Vec<String> {
        match self.mode {
            Mode::Production => self.allowed_origins.clone(),
            Mode::Development => DEV_ORIGINS
                .iter()
                .map(|o| o.to_string())
                .chain(self.allowed_origins.iter().cloned())
                .collect(),
        }
    }
}

/// Split a comma-separated origin list
pub fn split_origins(value: &str) -> impl Iterator<Item = String> + '_ {
    value
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
}
