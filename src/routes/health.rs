use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use prometheus::{Encoder, TextEncoder};
use serde::Serialize;
use std::sync::Arc;

use crate::services::CatalogStats;
use crate::AppState;

/// Movies with posters shown in the landing hero
const FEATURED_LIMIT: usize = 10;

/// Root endpoint - basic status, catalog counts and featured movies
pub async fn root(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "name": "VidStream Server",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "runtime": "rust",
        "environment": state.config.app_env,
        "catalog": state.catalog.stats(),
        "featured": state.catalog.top_with_poster(FEATURED_LIMIT),
    }))
}

/// Health check response
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: String,
    uptime: u64,
    catalog: CatalogStats,
    active_sessions: usize,
    tmdb_configured: bool,
}

/// GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let uptime = state.start_time.elapsed().as_secs();
    let catalog = state.catalog.stats();
    let tmdb_configured = !state.config.tmdb_api_key.is_empty();

    // Without an API key only the seeded catalog works
    let status = if tmdb_configured { "ok" } else { "degraded" };

    Json(HealthResponse {
        status: status.to_string(),
        uptime,
        catalog,
        active_sessions: state.sessions.len().await,
        tmdb_configured,
    })
}

/// GET /metrics - Prometheus metrics
pub async fn metrics() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(_) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            buffer,
        ),
        Err(e) => {
            tracing::error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [("content-type", "text/plain")],
                b"Internal Server Error".to_vec(),
            )
        }
    }
}

/// Liveness probe (for Kubernetes)
pub async fn live() -> impl IntoResponse {
    (StatusCode::OK, "alive")
}
