//! Broker integration for the Weft platform.
//!
//! Three concerns live here:
//!
//! - [`topology`]: idempotent declaration of the exchanges, queues, and
//!   bindings shared by the publisher and the consumer,
//! - [`Publisher`]: durable JSON publication of stored events onto the topic
//!   exchange, best-effort after store persistence,
//! - [`StatsClient`]: a read-only view of queue depth, consumers, and
//!   dead-letter counts from the broker's management HTTP API, where every
//!   field degrades to "unknown" instead of failing.

mod error;
mod management;
mod publish;
pub mod topology;

pub use error::QueueError;
pub use management::StatsClient;
pub use publish::Publisher;
