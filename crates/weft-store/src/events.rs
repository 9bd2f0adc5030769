//! Event persistence operations over the [`TripleStore`] capability.
//!
//! [`EventStore::store_event`] composes the metadata block and the payload
//! into one document so the whole event lands in a single atomic insert; a
//! partially-inserted event is never observable by readers.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;

use weft_types::{Event, EventDraft};

use crate::backend::TripleStore;
use crate::error::StoreError;
use crate::results::{BindingValue, SelectResults};
use crate::sparql;

/// Filter criteria for listing events.
#[derive(Debug, Clone)]
pub struct EventFilter {
    /// Only events created at or after this instant.
    pub since: Option<DateTime<Utc>>,
    /// Exact event type match.
    pub event_type: Option<String>,
    /// Maximum records to return. The 1–500 validity range is enforced at
    /// the HTTP boundary, not here.
    pub limit: i64,
}

impl Default for EventFilter {
    fn default() -> Self {
        Self {
            since: None,
            event_type: None,
            limit: 50,
        }
    }
}

/// Event-level operations layered on a dialect-selected store.
#[derive(Clone)]
pub struct EventStore {
    store: Arc<dyn TripleStore>,
}

impl EventStore {
    pub fn new(store: Arc<dyn TripleStore>) -> Self {
        Self { store }
    }

    /// Assigns id and timestamp, composes metadata plus payload into one
    /// statement block, and inserts it atomically.
    ///
    /// # Errors
    ///
    /// Returns the underlying `StoreError` when the insert fails; the caller
    /// must not report the event as stored in that case.
    pub async fn store_event(&self, draft: EventDraft) -> Result<Event, StoreError> {
        let event = Event::from_draft(draft);
        let document = format!("{}\n{}", sparql::meta_turtle(&event), event.triples);
        self.store.insert_turtle(&document).await?;
        tracing::info!(
            event_id = %event.id,
            event_type = %event.event_type,
            source_node = %event.source_node,
            "stored event"
        );
        Ok(event)
    }

    /// Lists event metadata, newest first. Payloads are not fetched.
    pub async fn list_events(&self, filter: &EventFilter) -> Result<Vec<Event>, StoreError> {
        let query = sparql::list_query(
            filter.since.as_ref(),
            filter.event_type.as_deref(),
            filter.limit,
        );
        let results = self.store.select(&query).await?;
        results
            .results
            .bindings
            .iter()
            .map(|row| {
                let id = required(row, "eventId")?;
                Ok(Event {
                    id: id.to_string(),
                    source_node: required(row, "sourceNode")?.to_string(),
                    event_type: required(row, "eventType")?.to_string(),
                    triples: String::new(),
                    created_at: parse_datetime(required(row, "createdAt")?)?,
                    links: Event::links_for(id),
                })
            })
            .collect()
    }

    /// Point lookup by event id. Absent is a valid, non-error outcome.
    pub async fn get_event(&self, event_id: &str) -> Result<Option<Event>, StoreError> {
        let results = self.store.select(&sparql::get_query(event_id)).await?;
        let Some(row) = results.results.bindings.first() else {
            return Ok(None);
        };
        Ok(Some(Event {
            id: event_id.to_string(),
            source_node: required(row, "sourceNode")?.to_string(),
            event_type: required(row, "eventType")?.to_string(),
            triples: row
                .get("triplesPayload")
                .map(|v| v.value.clone())
                .unwrap_or_default(),
            created_at: parse_datetime(required(row, "createdAt")?)?,
            links: Event::links_for(event_id),
        }))
    }

    /// Raw Turtle insert passthrough for the ad-hoc data route.
    pub async fn insert_turtle(&self, turtle: &str) -> Result<(), StoreError> {
        self.store.insert_turtle(turtle).await
    }

    /// Raw SELECT passthrough for the ad-hoc query route.
    pub async fn select(&self, query: &str) -> Result<SelectResults, StoreError> {
        self.store.select(query).await
    }

    /// Store reachability probe.
    pub async fn health(&self) -> Result<(), StoreError> {
        self.store.health().await
    }
}

fn required<'a>(
    row: &'a BTreeMap<String, BindingValue>,
    var: &str,
) -> Result<&'a str, StoreError> {
    row.get(var)
        .map(|v| v.value.as_str())
        .ok_or_else(|| StoreError::InvalidResponse(format!("missing binding: ?{var}")))
}

fn parse_datetime(raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::InvalidResponse(format!("bad createdAt literal {raw:?}: {e}")))
}
