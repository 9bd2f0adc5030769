//! The event record moving through the pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Ingestion input for a new event.
///
/// The id and timestamp are never client-supplied; they are assigned by the
/// node when the event is stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDraft {
    /// Identity of the producing node.
    pub source_node: String,
    /// Label used for routing and filtering on read.
    pub event_type: String,
    /// Turtle-formatted RDF payload. May be empty.
    #[serde(default)]
    pub triples: String,
}

/// A stored event record.
///
/// Immutable once created: the id is assigned exactly once and `created_at`
/// is the server clock at ingestion time, never mutated afterwards. This is
/// also the broker wire format: the publisher serializes it to JSON and the
/// consumer parses the same shape back (tolerating absent `triples`/`links`
/// so a payload-less broadcast still processes).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Globally unique identifier (UUID v4), generated at ingestion time.
    pub id: String,
    /// Identity of the producing node.
    pub source_node: String,
    /// Label used for routing and filtering on read.
    pub event_type: String,
    /// Turtle-formatted RDF payload. Empty on list reads; the listing query
    /// does not fetch payloads.
    #[serde(default)]
    pub triples: String,
    /// Server-assigned creation timestamp, used for newest-first ordering.
    pub created_at: DateTime<Utc>,
    /// Computed relation links, e.g. `self` → `/events/<id>`. Not stored.
    #[serde(default)]
    pub links: BTreeMap<String, String>,
}

impl Event {
    /// Builds a fresh record from a draft, assigning id, timestamp, and the
    /// self link.
    pub fn from_draft(draft: EventDraft) -> Self {
        let id = Uuid::new_v4().to_string();
        let links = Self::links_for(&id);
        Self {
            id,
            source_node: draft.source_node,
            event_type: draft.event_type,
            triples: draft.triples,
            created_at: Utc::now(),
            links,
        }
    }

    /// The relative URI an event is retrievable at.
    pub fn self_link(id: &str) -> String {
        format!("/events/{id}")
    }

    /// The computed link map for an event id.
    pub fn links_for(id: &str) -> BTreeMap<String, String> {
        let mut links = BTreeMap::new();
        links.insert("self".to_string(), Self::self_link(id));
        links
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_draft_assigns_id_timestamp_and_self_link() {
        let before = Utc::now();
        let event = Event::from_draft(EventDraft {
            source_node: "node-b".to_string(),
            event_type: "shipment_update".to_string(),
            triples: "<ex:s> <ex:p> <ex:o> .".to_string(),
        });

        assert!(!event.id.is_empty());
        assert!(event.created_at >= before);
        assert_eq!(
            event.links.get("self"),
            Some(&format!("/events/{}", event.id))
        );
    }

    #[test]
    fn ids_are_unique_across_drafts() {
        let draft = EventDraft {
            source_node: "node-a".to_string(),
            event_type: "t".to_string(),
            triples: String::new(),
        };
        let a = Event::from_draft(draft.clone());
        let b = Event::from_draft(draft);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn wire_format_tolerates_missing_triples_and_links() {
        let body = r#"{
            "id": "abc",
            "source_node": "node-a",
            "event_type": "t",
            "created_at": "2026-01-01T00:00:00Z"
        }"#;
        let event: Event = serde_json::from_str(body).expect("should parse");
        assert_eq!(event.triples, "");
        assert!(event.links.is_empty());
    }
}
