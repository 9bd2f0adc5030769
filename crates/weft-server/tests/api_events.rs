//! Integration tests for the event routes: ingestion, listing, lookup, and
//! input validation at the HTTP boundary.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use std::sync::Arc;
use tower::ServiceExt; // for oneshot

use weft_queue::{Publisher, StatsClient};
use weft_server::{app, AppState};
use weft_store::{EventStore, SelectResults, StoreError, TripleStore};
use weft_types::Event;

/// Store stub answering SELECTs with a canned result document. The broker
/// endpoints point at a closed port, so every publish fails, which is
/// exactly the best-effort path ingestion must tolerate.
struct StubStore {
    select_body: &'static str,
}

#[async_trait]
impl TripleStore for StubStore {
    async fn insert_turtle(&self, _turtle: &str) -> Result<(), StoreError> {
        Ok(())
    }

    async fn select(&self, _query: &str) -> Result<SelectResults, StoreError> {
        Ok(serde_json::from_str(self.select_body).unwrap())
    }

    async fn health(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

fn make_state(select_body: &'static str) -> AppState {
    AppState {
        events: EventStore::new(Arc::new(StubStore { select_body })),
        publisher: Publisher::new("amqp://127.0.0.1:1/%2f", "node-a"),
        stats: StatsClient::new("http://127.0.0.1:1", "weft", "weft", "node-a"),
        node_id: "node-a".to_string(),
    }
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn ingestion_returns_created_record_despite_broker_being_down() {
    let app = app(make_state("{}"));
    let before = chrono::Utc::now();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/events")
                .header("content-type", "application/json")
                .body(Body::from(
                    r#"{"source_node":"node-b","event_type":"shipment_update","triples":"<ex:s> <ex:p> <ex:o> ."}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let event: Event = serde_json::from_slice(&bytes).unwrap();
    assert!(!event.id.is_empty());
    assert_eq!(event.source_node, "node-b");
    assert_eq!(event.event_type, "shipment_update");
    assert!(event.created_at >= before);
    assert_eq!(
        event.links.get("self"),
        Some(&format!("/events/{}", event.id))
    );
}

#[tokio::test]
async fn ingested_ids_are_unique_across_calls() {
    let state = make_state("{}");
    let mut ids = std::collections::HashSet::new();
    for _ in 0..3 {
        let response = app(state.clone())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/events")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"source_node":"node-a","event_type":"t","triples":""}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let event = body_json(response).await;
        ids.insert(event["id"].as_str().unwrap().to_string());
    }
    assert_eq!(ids.len(), 3);
}

const LISTING: &str = r#"{
    "head": { "vars": ["eventId", "sourceNode", "eventType", "createdAt"] },
    "results": { "bindings": [
        {
            "eventId": { "type": "literal", "value": "id-2" },
            "sourceNode": { "type": "literal", "value": "node-b" },
            "eventType": { "type": "literal", "value": "shipment_update" },
            "createdAt": { "type": "literal", "value": "2026-08-06T12:00:01Z" }
        },
        {
            "eventId": { "type": "literal", "value": "id-1" },
            "sourceNode": { "type": "literal", "value": "node-a" },
            "eventType": { "type": "literal", "value": "stock_level" },
            "createdAt": { "type": "literal", "value": "2026-08-06T12:00:00Z" }
        }
    ] }
}"#;

#[tokio::test]
async fn listing_returns_store_rows_newest_first() {
    let response = app(make_state(LISTING))
        .oneshot(Request::builder().uri("/events").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let events = body_json(response).await;
    let events = events.as_array().unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["id"], "id-2");
    assert_eq!(events[1]["id"], "id-1");
}

#[tokio::test]
async fn listing_rejects_out_of_range_limits() {
    for limit in ["0", "501", "-3"] {
        let response = app(make_state("{}"))
            .oneshot(
                Request::builder()
                    .uri(format!("/events?limit={limit}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "limit={limit} must be rejected"
        );
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("limit"));
    }
}

#[tokio::test]
async fn listing_rejects_malformed_since() {
    let response = app(make_state("{}"))
        .oneshot(
            Request::builder()
                .uri("/events?since=yesterday")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn lookup_of_unknown_id_is_a_distinct_not_found() {
    let response = app(make_state("{}"))
        .oneshot(
            Request::builder()
                .uri("/events/no-such-id")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "not found: event not found");
}

#[tokio::test]
async fn lookup_returns_the_stored_record() {
    let response = app(make_state(
        r#"{ "results": { "bindings": [ {
            "sourceNode": { "type": "literal", "value": "node-b" },
            "eventType": { "type": "literal", "value": "shipment_update" },
            "createdAt": { "type": "literal", "value": "2026-08-06T12:00:00Z" },
            "triplesPayload": { "type": "literal", "value": "<ex:s> <ex:p> <ex:o> ." }
        } ] } }"#,
    ))
    .oneshot(
        Request::builder()
            .uri("/events/id-9")
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["id"], "id-9");
    assert_eq!(body["event_type"], "shipment_update");
    assert_eq!(body["source_node"], "node-b");
    assert_eq!(body["triples"], "<ex:s> <ex:p> <ex:o> .");
    assert_eq!(body["links"]["self"], "/events/id-9");
}
