//! Event publication onto the topic exchange.

use lapin::options::BasicPublishOptions;
use lapin::{BasicProperties, Connection, ConnectionProperties};

use weft_types::{routing_key, Event, EVENTS_EXCHANGE};

use crate::error::QueueError;
use crate::topology::ensure_topology;

/// Publishes stored events to the broker.
///
/// A fresh connection is opened per publish: publication is a coarse,
/// infrequent operation and the short-lived connection keeps the publish
/// path free of shared channel state. Topology is (re)declared before every
/// publish so a node can come up in any order relative to its peers.
///
/// Publication happens only after the event is durably persisted in the
/// store. A failure here leaves the event stored but never queued for
/// distribution; callers log it and carry on, the store stays the source
/// of truth.
#[derive(Clone)]
pub struct Publisher {
    url: String,
    node_id: String,
}

impl Publisher {
    pub fn new(url: impl Into<String>, node_id: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            node_id: node_id.into(),
        }
    }

    /// Serializes the event to JSON and publishes it, marked persistent,
    /// under the node's routing key.
    pub async fn publish(&self, event: &Event) -> Result<(), QueueError> {
        let body = serde_json::to_vec(event)?;
        let key = routing_key(&self.node_id);

        let conn = Connection::connect(&self.url, ConnectionProperties::default()).await?;
        let channel = conn.create_channel().await?;
        ensure_topology(&channel).await?;

        channel
            .basic_publish(
                EVENTS_EXCHANGE,
                &key,
                BasicPublishOptions::default(),
                &body,
                BasicProperties::default()
                    .with_delivery_mode(2)
                    .with_content_type("application/json".into()),
            )
            .await?
            .await?;

        tracing::info!(event_id = %event.id, routing_key = %key, "published event");

        if let Err(e) = conn.close(200, "publish complete").await {
            tracing::debug!("broker connection close failed: {e}");
        }
        Ok(())
    }

    /// Broker reachability probe: open a connection and close it again.
    pub async fn check_health(&self) -> Result<(), QueueError> {
        let conn = Connection::connect(&self.url, ConnectionProperties::default()).await?;
        conn.close(200, "health probe").await?;
        Ok(())
    }
}
