//! Event ingestion, listing, and point lookup handlers.

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;

use weft_store::EventFilter;
use weft_types::{Event, EventDraft};

use crate::{ApiError, AppState};

/// Query parameters for `GET /events`.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Only events created at or after this RFC 3339 timestamp.
    pub since: Option<String>,
    /// Exact event type match.
    pub event_type: Option<String>,
    /// Maximum records to return (1–500, default 50).
    pub limit: Option<i64>,
}

/// Handler for `POST /events`.
///
/// Persists the event first, then broadcasts it. A broadcast failure is
/// logged and swallowed; the event is durably recorded and the ingestion
/// still reports success; the store is the source of truth.
pub async fn create_event_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(draft): Json<EventDraft>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    let stored = state.events.store_event(draft).await?;

    if let Err(e) = state.publisher.publish(&stored).await {
        tracing::warn!(event_id = %stored.id, "event stored but broadcast failed: {e}");
    }

    Ok((StatusCode::CREATED, Json(stored)))
}

/// Handler for `GET /events`.
pub async fn list_events_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<ListQuery>,
) -> Result<Json<Vec<Event>>, ApiError> {
    let limit = params.limit.unwrap_or(50);
    if !(1..=500).contains(&limit) {
        return Err(ApiError::BadRequest(format!(
            "limit must be between 1 and 500, got {limit}"
        )));
    }

    let since = params.since.as_deref().map(parse_since).transpose()?;

    let filter = EventFilter {
        since,
        event_type: params.event_type,
        limit,
    };
    let events = state.events.list_events(&filter).await?;
    Ok(Json(events))
}

/// Handler for `GET /events/{event_id}`.
pub async fn get_event_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(event_id): Path<String>,
) -> Result<Json<Event>, ApiError> {
    match state.events.get_event(&event_id).await? {
        Some(event) => Ok(Json(event)),
        None => Err(ApiError::NotFound("event not found".to_string())),
    }
}

fn parse_since(raw: &str) -> Result<DateTime<Utc>, ApiError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ApiError::BadRequest(format!("invalid since timestamp {raw:?}: {e}")))
}
