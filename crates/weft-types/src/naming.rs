//! Broker naming conventions shared by publisher, consumer, and stats.
//!
//! Exchange and dead-letter names are fixed across the deployment; the
//! per-node queue and routing key are deterministic from the node identity so
//! that topology declared by any process matches what every other process
//! expects.

/// Topic exchange all event broadcasts are published to.
pub const EVENTS_EXCHANGE: &str = "weft.events";

/// Fanout exchange rejected messages are dead-lettered through.
pub const DEAD_LETTER_EXCHANGE: &str = "weft.events.dlx";

/// Durable queue holding dead-lettered messages, shared across nodes.
pub const DEAD_LETTER_QUEUE: &str = "weft.events.dead";

/// The durable per-node queue name.
pub fn node_queue(node_id: &str) -> String {
    format!("weft.events.{node_id}")
}

/// The routing key a node's events are published under.
pub fn routing_key(node_id: &str) -> String {
    format!("events.{node_id}")
}
