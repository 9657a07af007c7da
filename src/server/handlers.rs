//! HTTP request handlers

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;

use super::models::{DetailedStatusResponse, GameStatusResponse};
use crate::cache::StatusCache;
use crate::config::{Config, UnknownPolicy};

/// Shared state for the HTTP server
#[derive(Debug, Clone)]
pub struct AppState {
    cache: Arc<StatusCache>,
    source_url: Arc<str>,
    unknown_policy: UnknownPolicy,
}

impl AppState {
    pub fn new(cache: Arc<StatusCache>, config: &Config) -> Self {
        Self {
            cache,
            source_url: Arc::from(config.source_url.as_str()),
            unknown_policy: config.unknown_policy,
        }
    }
}

/// Health check endpoint
///
/// Does not touch the cache or the upstream.
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "oswatch"
    }))
}

/// Simple status endpoint handler
pub async fn root(State(state): State<AppState>) -> Response {
    let status = state.cache.get().await;

    let code = match state.unknown_policy {
        UnknownPolicy::ServiceUnavailable if !status.homepage_accessible() => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        _ => StatusCode::OK,
    };

    (code, Json(GameStatusResponse::from(status))).into_response()
}

/// Detailed status endpoint handler
pub async fn status(State(state): State<AppState>) -> Json<DetailedStatusResponse> {
    let (status, info) = state.cache.get_with_info().await;

    Json(DetailedStatusResponse::new(
        status,
        info,
        &state.source_url,
        Utc::now(),
    ))
}
