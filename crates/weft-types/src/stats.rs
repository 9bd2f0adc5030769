//! Broker observability snapshot types.

use serde::{Deserialize, Serialize};

/// A best-effort snapshot of broker queue state.
///
/// Every numeric field is independently nullable: when the management surface
/// is unreachable or a sub-resource is missing, the corresponding field is
/// `None` and serializes as JSON `null`. The default value is the fully
/// unknown snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueueStats {
    /// Messages waiting in the node queue.
    pub messages_ready: Option<u64>,
    /// Messages delivered but not yet acknowledged.
    pub messages_unacked: Option<u64>,
    /// Consumers attached to the node queue.
    pub consumers: Option<u64>,
    /// Messages sitting in the dead-letter queue.
    pub dead_letters: Option<u64>,
    /// Publish rate extrapolated to messages per minute.
    pub throughput_per_minute: Option<f64>,
    /// Per-consumer detail rows; empty when unavailable.
    pub consumer_details: Vec<ConsumerDetail>,
}

/// One consumer as reported by the broker management surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsumerDetail {
    /// The broker-assigned consumer tag.
    pub id: String,
    /// `"active"` or `"idle"`.
    pub status: String,
    /// Connection name the consumer is attached through, when reported.
    pub connected_at: Option<String>,
    /// Recent delivery rate for this consumer.
    pub messages_processed: f64,
}
