//! Best-effort queue statistics from the broker management HTTP API.
//!
//! This is a monitoring read, not a control operation: partial data is
//! strictly preferred over an error. Every fetch failure (unreachable
//! endpoint, 404, auth failure, malformed body) resolves to `None`, and the
//! snapshot surfaces the corresponding fields as `null` so a dashboard can
//! render a placeholder instead of an error state.

use serde_json::Value;
use std::time::Duration;

use weft_types::{node_queue, ConsumerDetail, QueueStats, DEAD_LETTER_QUEUE};

/// Default vhost, URL-encoded for the management API path.
const VHOST: &str = "%2F";

/// Timeout for management API reads.
const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Read-only client for the broker management surface.
#[derive(Clone)]
pub struct StatsClient {
    client: reqwest::Client,
    base_url: String,
    user: String,
    pass: String,
    node_queue: String,
}

impl StatsClient {
    pub fn new(
        base_url: impl Into<String>,
        user: impl Into<String>,
        pass: impl Into<String>,
        node_id: &str,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            client: reqwest::Client::builder()
                .timeout(FETCH_TIMEOUT)
                .build()
                .unwrap_or_default(),
            base_url: base_url.trim_end_matches('/').to_string(),
            user: user.into(),
            pass: pass.into(),
            node_queue: node_queue(node_id),
        }
    }

    /// Fetches one management API path, degrading every failure to `None`.
    async fn fetch(&self, path: &str) -> Option<Value> {
        let url = format!("{}/api/{}", self.base_url, path);
        let resp = match self
            .client
            .get(&url)
            .basic_auth(&self.user, Some(&self.pass))
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(path, "broker management API unavailable: {e}");
                return None;
            }
        };
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return None;
        }
        if !resp.status().is_success() {
            tracing::warn!(
                path,
                status = resp.status().as_u16(),
                "broker management API error"
            );
            return None;
        }
        match resp.json().await {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(path, "broker management API returned malformed body: {e}");
                None
            }
        }
    }

    /// Polls queue depth, unacked count, consumer details, dead-letter depth,
    /// and publish throughput. Never fails; unknown fields come back `None`.
    pub async fn stats(&self) -> QueueStats {
        let main = self.fetch(&format!("queues/{VHOST}/{}", self.node_queue)).await;
        let dlq = self.fetch(&format!("queues/{VHOST}/{DEAD_LETTER_QUEUE}")).await;
        let consumers = self.fetch(&format!("consumers/{VHOST}")).await;
        snapshot_from(main, dlq, consumers)
    }
}

/// Assembles the snapshot from the three raw management reads.
fn snapshot_from(main: Option<Value>, dlq: Option<Value>, consumers: Option<Value>) -> QueueStats {
    let consumer_details = consumers
        .as_ref()
        .and_then(Value::as_array)
        .map(|list| list.iter().map(consumer_detail).collect())
        .unwrap_or_default();

    let throughput = main
        .as_ref()
        .and_then(|m| m.pointer("/message_stats/publish_details/rate"))
        .and_then(Value::as_f64);

    QueueStats {
        messages_ready: field_u64(main.as_ref(), "messages_ready"),
        messages_unacked: field_u64(main.as_ref(), "messages_unacknowledged"),
        consumers: field_u64(main.as_ref(), "consumers"),
        dead_letters: field_u64(dlq.as_ref(), "messages_ready"),
        throughput_per_minute: throughput.map(|rate| (rate * 60.0 * 10.0).round() / 10.0),
        consumer_details,
    }
}

fn field_u64(value: Option<&Value>, key: &str) -> Option<u64> {
    value.and_then(|v| v.get(key)).and_then(Value::as_u64)
}

fn consumer_detail(raw: &Value) -> ConsumerDetail {
    let activity = raw
        .get("activity_status")
        .and_then(Value::as_str)
        .unwrap_or("unknown");
    let status = if activity == "up" { "active" } else { "idle" };
    ConsumerDetail {
        id: raw
            .get("consumer_tag")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string(),
        status: status.to_string(),
        connected_at: raw
            .pointer("/channel_details/connection_name")
            .and_then(Value::as_str)
            .map(String::from),
        messages_processed: raw
            .pointer("/stats/deliver_get_details/rate")
            .and_then(Value::as_f64)
            .unwrap_or(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn snapshot_maps_management_payloads() {
        let main = json!({
            "messages_ready": 4,
            "messages_unacknowledged": 1,
            "consumers": 1,
            "message_stats": { "publish_details": { "rate": 0.5 } }
        });
        let dlq = json!({ "messages_ready": 2 });
        let consumers = json!([{
            "consumer_tag": "ctag-1",
            "activity_status": "up",
            "channel_details": { "connection_name": "10.0.0.5:49202" },
            "stats": { "deliver_get_details": { "rate": 0.2 } }
        }]);

        let stats = snapshot_from(Some(main), Some(dlq), Some(consumers));
        assert_eq!(stats.messages_ready, Some(4));
        assert_eq!(stats.messages_unacked, Some(1));
        assert_eq!(stats.consumers, Some(1));
        assert_eq!(stats.dead_letters, Some(2));
        assert_eq!(stats.throughput_per_minute, Some(30.0));
        assert_eq!(stats.consumer_details.len(), 1);
        assert_eq!(stats.consumer_details[0].id, "ctag-1");
        assert_eq!(stats.consumer_details[0].status, "active");
        assert_eq!(
            stats.consumer_details[0].connected_at.as_deref(),
            Some("10.0.0.5:49202")
        );
    }

    #[test]
    fn snapshot_degrades_each_missing_read_independently() {
        let main = json!({ "messages_ready": 7 });
        let stats = snapshot_from(Some(main), None, None);
        assert_eq!(stats.messages_ready, Some(7));
        assert_eq!(stats.messages_unacked, None);
        assert_eq!(stats.dead_letters, None);
        assert_eq!(stats.throughput_per_minute, None);
        assert!(stats.consumer_details.is_empty());
    }

    #[test]
    fn idle_consumers_are_reported_idle() {
        let consumers = json!([{ "consumer_tag": "ctag-2", "activity_status": "waiting" }]);
        let stats = snapshot_from(None, None, Some(consumers));
        assert_eq!(stats.consumer_details[0].status, "idle");
        assert_eq!(stats.consumer_details[0].messages_processed, 0.0);
        assert!(stats.consumer_details[0].connected_at.is_none());
    }

    #[tokio::test]
    async fn unreachable_management_surface_yields_fully_unknown_snapshot() {
        let client = StatsClient::new("http://127.0.0.1:1", "guest", "guest", "node-a");
        let stats = client.stats().await;
        assert_eq!(stats.messages_ready, None);
        assert_eq!(stats.messages_unacked, None);
        assert_eq!(stats.consumers, None);
        assert_eq!(stats.dead_letters, None);
        assert_eq!(stats.throughput_per_minute, None);
        assert!(stats.consumer_details.is_empty());
    }
}
