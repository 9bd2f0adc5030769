//! Weft node HTTP API.
//!
//! Exposes the ingestion, listing, and lookup routes for events, the ad-hoc
//! data routes, and the health and queue-stats probes. The heavy lifting
//! lives in `weft-store` and `weft-queue`; handlers here validate input, map
//! errors to JSON responses, and wire the best-effort broadcast after
//! persistence.

pub mod api_data;
pub mod api_events;
pub mod api_health;
pub mod api_stats;
pub mod config;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use weft_queue::{Publisher, StatsClient};
use weft_store::{EventStore, StoreError};

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Event operations over the dialect-selected triple store.
    pub events: EventStore,
    /// Best-effort broadcast publisher.
    pub publisher: Publisher,
    /// Read-only broker stats client.
    pub stats: StatsClient,
    /// This node's identity.
    pub node_id: String,
}

/// API error type mapping to HTTP status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(api_health::health_handler))
        .route(
            "/events",
            post(api_events::create_event_handler).get(api_events::list_events_handler),
        )
        .route("/events/{event_id}", get(api_events::get_event_handler))
        .route(
            "/data",
            post(api_data::insert_data_handler).get(api_data::query_data_handler),
        )
        .route("/queue/stats", get(api_stats::queue_stats_handler))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(Extension(Arc::new(state)))
}
