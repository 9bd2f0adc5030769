//! Shared types for the Weft platform.
//!
//! A weft node accepts semantically-tagged facts (RDF triples) as immutable
//! events, records them in a triple store, and broadcasts them over an AMQP
//! broker. This crate holds the data model and naming conventions shared by
//! the HTTP server, the publisher, and the consumer so that all three agree
//! on the wire contract without depending on each other.

mod event;
mod naming;
mod stats;

pub use event::{Event, EventDraft};
pub use naming::{
    node_queue, routing_key, DEAD_LETTER_EXCHANGE, DEAD_LETTER_QUEUE, EVENTS_EXCHANGE,
};
pub use stats::{ConsumerDetail, QueueStats};
