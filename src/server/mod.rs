//! HTTP server setup and management
//!
//! Routes:
//! - `GET /` – simple status (`online`, `offline` or `unknown`)
//! - `GET /status` – detailed status with cache age and expiry
//! - `GET /health` – liveness probe

pub mod handlers;
pub mod models;

use std::sync::Arc;

use axum::{routing::get, Router};
use thiserror::Error;
use tower_http::trace::TraceLayer;

use crate::cache::StatusCache;
use crate::config::Config;

pub use handlers::AppState;
pub use models::{DetailedStatusResponse, GameStatusResponse, StatusLabel};

/// Errors that can stop the HTTP server
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listener could not be bound
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The server loop failed
    #[error("HTTP server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Builds the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/status", get(handlers::status))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server and run until Ctrl-C
pub async fn serve(config: &Config, cache: Arc<StatusCache>) -> Result<(), ServerError> {
    let app = router(AppState::new(cache, config));

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;
    tracing::info!("OSWatch listening on http://{}/", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
