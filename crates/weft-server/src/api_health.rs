//! Per-dependency health probe.
//!
//! Never fails outright: each dependency reports `"ok"` or an error detail,
//! and the rollup is `healthy` or `degraded`.

use axum::{extract::Extension, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::AppState;

/// Response body for `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Triple store reachability: `"ok"` or `"error: …"`.
    pub graph_store: String,
    /// Broker reachability: `"ok"` or `"error: …"`.
    pub broker: String,
    /// `"healthy"` when every dependency is ok, else `"degraded"`.
    pub status: String,
}

/// Handler for `GET /health`.
pub async fn health_handler(Extension(state): Extension<Arc<AppState>>) -> Json<HealthResponse> {
    let mut healthy = true;

    let graph_store = match state.events.health().await {
        Ok(()) => "ok".to_string(),
        Err(e) => {
            healthy = false;
            format!("error: {e}")
        }
    };

    let broker = match state.publisher.check_health().await {
        Ok(()) => "ok".to_string(),
        Err(e) => {
            healthy = false;
            format!("error: {e}")
        }
    };

    let status = if healthy { "healthy" } else { "degraded" };
    Json(HealthResponse {
        graph_store,
        broker,
        status: status.to_string(),
    })
}
