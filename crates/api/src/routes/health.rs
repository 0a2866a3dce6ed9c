use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the data layer answers.
    pub data_healthy: bool,
    /// Number of registered models.
    pub models: usize,
}

/// GET /health -- returns service and data layer health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let data_healthy = state.data.health_check().await;

    let status = if data_healthy { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        data_healthy,
        models: state.portal.registry().len(),
    })
}

/// Mount health check routes at root level.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
