//! Idempotent broker topology declaration.
//!
//! Declarations are safe to re-run on every connection: redeclaring an
//! exchange or queue with matching attributes is a no-op on the broker, so
//! both the publisher and the consumer call [`ensure_topology`] before doing
//! anything else. Only the consumer declares its own per-node queue, via
//! [`ensure_node_queue`].

use lapin::options::{ExchangeDeclareOptions, QueueBindOptions, QueueDeclareOptions};
use lapin::types::{AMQPValue, FieldTable};
use lapin::{Channel, ExchangeKind};

use weft_types::{node_queue, routing_key, DEAD_LETTER_EXCHANGE, DEAD_LETTER_QUEUE, EVENTS_EXCHANGE};

use crate::error::QueueError;

fn durable_exchange() -> ExchangeDeclareOptions {
    ExchangeDeclareOptions {
        durable: true,
        ..Default::default()
    }
}

fn durable_queue() -> QueueDeclareOptions {
    QueueDeclareOptions {
        durable: true,
        ..Default::default()
    }
}

/// Declares the shared topology: the topic exchange events are published to,
/// the dead-letter fanout exchange, and the dead-letter queue bound to it.
pub async fn ensure_topology(channel: &Channel) -> Result<(), QueueError> {
    channel
        .exchange_declare(
            EVENTS_EXCHANGE,
            ExchangeKind::Topic,
            durable_exchange(),
            FieldTable::default(),
        )
        .await?;
    channel
        .exchange_declare(
            DEAD_LETTER_EXCHANGE,
            ExchangeKind::Fanout,
            durable_exchange(),
            FieldTable::default(),
        )
        .await?;
    channel
        .queue_declare(DEAD_LETTER_QUEUE, durable_queue(), FieldTable::default())
        .await?;
    channel
        .queue_bind(
            DEAD_LETTER_QUEUE,
            DEAD_LETTER_EXCHANGE,
            "",
            QueueBindOptions::default(),
            FieldTable::default(),
        )
        .await?;
    Ok(())
}

/// Declares the per-node durable queue, wired so that messages rejected
/// without requeue are routed to the dead-letter exchange by the broker, and
/// binds it to the topic exchange under the node's routing key.
///
/// Returns the declared queue name.
pub async fn ensure_node_queue(channel: &Channel, node_id: &str) -> Result<String, QueueError> {
    let queue = node_queue(node_id);
    let mut args = FieldTable::default();
    args.insert(
        "x-dead-letter-exchange".into(),
        AMQPValue::LongString(DEAD_LETTER_EXCHANGE.into()),
    );
    channel.queue_declare(&queue, durable_queue(), args).await?;
    channel
        .queue_bind(
            &queue,
            EVENTS_EXCHANGE,
            &routing_key(node_id),
            QueueBindOptions::default(),
            FieldTable::default(),
        )
        .await?;
    Ok(queue)
}
