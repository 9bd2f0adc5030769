//! The per-delivery state machine: `received → attempting → (acked | dead-lettered)`.
//!
//! A malformed body is a processing failure, not a crash; it burns attempts
//! like any store failure and ends up dead-lettered for inspection. Backoff
//! waits are plain timed suspensions; the prefetch-one consumer guarantees no
//! other delivery is dispatched while a retry is pending.

use weft_store::{StoreError, TripleStore};
use weft_types::Event;

use crate::retry::RetryPolicy;

/// Terminal resolution of one delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Processing succeeded; acknowledge the message.
    Acked {
        /// Attempts consumed, including the successful one.
        attempts: u32,
    },
    /// The retry budget is exhausted; reject without requeue so the broker
    /// routes the message to the dead-letter queue.
    DeadLettered {
        /// Attempts consumed.
        attempts: u32,
    },
}

#[derive(Debug, thiserror::Error)]
enum AttemptError {
    #[error("malformed message body: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// One processing attempt: parse the wire event and materialize its payload
/// triples. An event with no triples is a valid no-op.
async fn attempt(store: &dyn TripleStore, body: &[u8]) -> Result<(), AttemptError> {
    let event: Event = serde_json::from_slice(body)?;
    if event.triples.trim().is_empty() {
        tracing::warn!(event_id = %event.id, "event has no triples, skipping insert");
        return Ok(());
    }
    store.insert_turtle(&event.triples).await?;
    tracing::info!(event_id = %event.id, event_type = %event.event_type, "materialized event triples");
    Ok(())
}

/// Runs one delivery through the retry state machine to a terminal outcome.
///
/// Redelivery after a crash between a successful insert and the ack can
/// repeat the insert, an accepted at-least-once consequence; the store is
/// not guaranteed to deduplicate statements.
pub async fn process_delivery(
    store: &dyn TripleStore,
    policy: &RetryPolicy,
    body: &[u8],
) -> Outcome {
    let max_attempts = policy.max_attempts();
    for attempt_no in 1..=max_attempts {
        if attempt_no > 1 {
            let retry = attempt_no - 1;
            let delay = policy.delay_before_retry(retry);
            tracing::info!(
                retry,
                max_retries = policy.max_retries,
                delay_secs = delay.as_secs(),
                "waiting before retry"
            );
            tokio::time::sleep(delay).await;
        }
        match attempt(store, body).await {
            Ok(()) => {
                return Outcome::Acked {
                    attempts: attempt_no,
                }
            }
            Err(e) => {
                tracing::error!(attempt = attempt_no, "failed to process delivery: {e}");
            }
        }
    }
    Outcome::DeadLettered {
        attempts: max_attempts,
    }
}
