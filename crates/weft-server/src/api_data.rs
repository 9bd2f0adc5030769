//! Ad-hoc data routes: raw Turtle insert and SPARQL SELECT passthrough.

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use weft_store::SelectResults;

use crate::{ApiError, AppState};

/// Request body for `POST /data`.
#[derive(Debug, Deserialize)]
pub struct DataInsert {
    /// Turtle-formatted RDF statements.
    pub triples: String,
}

/// Query parameters for `GET /data`.
#[derive(Debug, Deserialize)]
pub struct DataQuery {
    /// A SPARQL SELECT query.
    pub sparql: String,
}

/// Handler for `POST /data`.
pub async fn insert_data_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<DataInsert>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    state.events.insert_turtle(&payload.triples).await?;
    Ok((StatusCode::CREATED, Json(json!({ "status": "inserted" }))))
}

/// Handler for `GET /data`.
pub async fn query_data_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<DataQuery>,
) -> Result<Json<SelectResults>, ApiError> {
    let results = state.events.select(&params.sparql).await?;
    Ok(Json(results))
}
