//! Consumer startup and the consume loop.
//!
//! Connection state machine: `disconnected → connecting → connected →
//! consuming`. Connecting retries on a fixed delay up to a bounded attempt
//! count; exhausting it is a fatal startup error, since the consumer cannot
//! run without a broker.
//! Once connected, topology is declared, prefetch is pinned to one, and the
//! loop blocks on deliveries until shutdown.

use futures_util::StreamExt;
use lapin::options::{BasicAckOptions, BasicConsumeOptions, BasicNackOptions, BasicQosOptions};
use lapin::types::FieldTable;
use lapin::{Connection, ConnectionProperties};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use weft_queue::topology::{ensure_node_queue, ensure_topology};
use weft_store::TripleStore;

use crate::config::ConsumerConfig;
use crate::process::{process_delivery, Outcome};
use crate::retry::RetryPolicy;

/// Errors that can terminate the consumer.
#[derive(Debug, thiserror::Error)]
pub enum ConsumerError {
    /// Startup could not reach the broker within the bounded attempt count.
    #[error("broker unreachable after {attempts} connection attempts")]
    BrokerUnreachable {
        /// Attempts made before giving up.
        attempts: u32,
    },

    /// Topology declaration failed.
    #[error(transparent)]
    Queue(#[from] weft_queue::QueueError),

    /// Channel or delivery-stream failure after startup.
    #[error("broker channel error: {0}")]
    Broker(#[from] lapin::Error),
}

/// Connects to the broker, retrying on a fixed delay.
pub async fn connect_with_retry(
    url: &str,
    max_attempts: u32,
    delay: Duration,
) -> Result<Connection, ConsumerError> {
    for attempt in 1..=max_attempts {
        match Connection::connect(url, ConnectionProperties::default()).await {
            Ok(conn) => {
                tracing::info!(attempt, "connected to broker");
                return Ok(conn);
            }
            Err(e) => {
                tracing::warn!(attempt, max_attempts, "broker not ready: {e}");
                if attempt < max_attempts {
                    sleep(delay).await;
                }
            }
        }
    }
    Err(ConsumerError::BrokerUnreachable {
        attempts: max_attempts,
    })
}

/// Runs the consumer until the delivery stream ends or `shutdown` resolves.
///
/// Shutdown is graceful: the in-flight delivery, including any pending
/// backoff waits, runs to its terminal ack/nack before the connection
/// closes. No message is abandoned mid-backoff.
pub async fn run(
    cfg: &ConsumerConfig,
    store: Arc<dyn TripleStore>,
    shutdown: impl Future<Output = ()>,
) -> Result<(), ConsumerError> {
    let policy = RetryPolicy::default();
    let conn = connect_with_retry(
        &cfg.broker.url,
        cfg.broker.connect_attempts,
        Duration::from_secs(cfg.broker.connect_delay_secs),
    )
    .await?;

    let channel = conn.create_channel().await?;
    ensure_topology(&channel).await?;
    let queue = ensure_node_queue(&channel, &cfg.node.id).await?;

    // One unacknowledged message at a time: retries hold the slot, which is
    // what preserves per-node delivery order.
    channel.basic_qos(1, BasicQosOptions::default()).await?;

    let mut consumer = channel
        .basic_consume(
            &queue,
            &format!("weft-consumer-{}", cfg.node.id),
            BasicConsumeOptions::default(),
            FieldTable::default(),
        )
        .await?;

    tracing::info!(%queue, node_id = %cfg.node.id, "consumer started, waiting for events");

    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            delivery = consumer.next() => {
                match delivery {
                    Some(Ok(delivery)) => {
                        match process_delivery(store.as_ref(), &policy, &delivery.data).await {
                            Outcome::Acked { attempts } => {
                                tracing::debug!(attempts, delivery_tag = delivery.delivery_tag, "acknowledged");
                                delivery.acker.ack(BasicAckOptions::default()).await?;
                            }
                            Outcome::DeadLettered { attempts } => {
                                tracing::error!(
                                    attempts,
                                    delivery_tag = delivery.delivery_tag,
                                    "attempts exhausted, rejecting to dead-letter"
                                );
                                delivery
                                    .acker
                                    .nack(BasicNackOptions {
                                        requeue: false,
                                        ..Default::default()
                                    })
                                    .await?;
                            }
                        }
                    }
                    Some(Err(e)) => return Err(e.into()),
                    None => {
                        tracing::warn!("delivery stream closed by broker");
                        return Ok(());
                    }
                }
            }
            () = &mut shutdown => {
                tracing::info!("shutdown requested, closing consumer");
                break;
            }
        }
    }

    if let Err(e) = conn.close(200, "consumer shutdown").await {
        tracing::debug!("broker connection close failed: {e}");
    }
    Ok(())
}
