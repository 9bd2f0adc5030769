//! Queue statistics route.

use axum::{extract::Extension, Json};
use std::sync::Arc;

use weft_types::QueueStats;

use crate::AppState;

/// Handler for `GET /queue/stats`.
///
/// A monitoring read: fields are `null` when the broker management surface
/// is unreachable rather than the whole response failing.
pub async fn queue_stats_handler(Extension(state): Extension<Arc<AppState>>) -> Json<QueueStats> {
    Json(state.stats.stats().await)
}
