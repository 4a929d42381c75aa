//! Folio Server - portfolio chat API.
//!
//! Visitor questions arrive at `/api/chat`, pass the
//! [`folio_guard::Moderator`], and are then answered by the configured
//! completion providers.
//!
//! ## Endpoints
//!
//! - `POST /api/chat` - Moderate a question and reply `{"text": ...}`
//! - `GET /api/health` - Liveness check
//! - `GET /` - API banner (when no frontend is served)
//!
//! ## Example
//!
//! ```no_run
//! use folio_server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig::load(None).unwrap();
//!     folio_server::serve(config).await.unwrap();
//! }
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod memory;
pub mod persona;
pub mod provider;
pub mod state;

use std::net::SocketAddr;

use axum::http::{header, HeaderValue, Method};
use axum::routing::{any, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub use config::{Mode, ServerConfig};
pub use error::{ApiError, ServerError};
pub use state::AppState;

/// Build the application router.
pub fn router(state: AppState, config: &ServerConfig) -> Router {
    let mut app = Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/chat", post(handlers::chat))
        .route("/api", any(handlers::api_not_found))
        .route("/api/*rest", any(handlers::api_not_found));

    app = match config.static_root() {
        Some(dir) => {
            info!(dir = %dir.display(), "Serving frontend");
            let spa = ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html")));
            app.fallback_service(spa)
        }
        None => app.route("/", get(handlers::root)),
    };

    app.layer(cors_layer(config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS for the configured origins, or any origin when none are listed.
pub fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins()
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(origins).allow_credentials(true)
    }
}

/// Build state from `config`, bind and serve until Ctrl-C.
pub async fn serve(config: ServerConfig) -> Result<(), ServerError> {
    let state = AppState::from_config(&config)?;

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|_| ServerError::Address(format!("{}:{}", config.host, config.port)))?;

    let app = router(state, &config);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;

    log_provider_strategy(&config);
    info!(%addr, mode = %config.mode, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

fn log_provider_strategy(config: &ServerConfig) {
    if config.openrouter.is_configured() {
        info!(model = %config.openrouter.model, "Chatbot: OpenRouter active");
    }
    if config.flowise.is_configured() {
        info!("Chatbot: Flowise configured");
    }
    if !config.openrouter.is_configured() && !config.flowise.is_configured() {
        warn!("Chatbot: no provider configured; set OPENROUTER_API_KEY or FLOWISE_API_URL");
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
