//! Error types for the broker layer.

/// Errors that can occur publishing to or declaring topology on the broker.
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    /// Connection, channel, or protocol failure.
    #[error("broker unavailable: {0}")]
    Broker(#[from] lapin::Error),

    /// The event could not be serialized for the wire.
    #[error("event serialization failed: {0}")]
    Encode(#[from] serde_json::Error),
}
