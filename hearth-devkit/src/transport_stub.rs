//! Transport stub for broker-less tests
//!
//! Records every send attempt and can be forced offline, globally or per
//! topic, to exercise the local-log fallback paths.

use async_trait::async_trait;
use hearth_agent::uplink::Transport;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub topic: String,
    pub payload: String,
}

#[derive(Default)]
pub struct StubTransport {
    sent: Mutex<Vec<SentMessage>>,
    offline: Mutex<bool>,
    failing_topics: Mutex<HashSet<String>>,
}

impl StubTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make every subsequent send fail (attempts are still recorded).
    pub fn set_offline(&self, offline: bool) {
        *self.offline.lock() = offline;
    }

    /// Make sends to one topic fail.
    pub fn fail_topic(&self, topic: &str) {
        self.failing_topics.lock().insert(topic.to_string());
    }

    /// Every send attempted so far, in order.
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().clone()
    }

    pub fn sent_to(&self, topic: &str) -> Vec<SentMessage> {
        self.sent.lock().iter().filter(|m| m.topic == topic).cloned().collect()
    }

    pub fn last_payload(&self, topic: &str) -> Option<String> {
        self.sent_to(topic).last().map(|m| m.payload.clone())
    }

    /// Last payload on `topic`, parsed as JSON.
    pub fn last_json(&self, topic: &str) -> Option<serde_json::Value> {
        self.last_payload(topic).and_then(|p| serde_json::from_str(&p).ok())
    }

    pub fn clear(&self) {
        self.sent.lock().clear();
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn send(&self, topic: &str, payload: &str) -> anyhow::Result<()> {
        let rejected = *self.offline.lock() || self.failing_topics.lock().contains(topic);
        self.sent.lock().push(SentMessage {
            topic: topic.to_string(),
            payload: payload.to_string(),
        });
        if rejected {
            anyhow::bail!("transport offline for {topic}");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_sends_and_injects_failures() {
        let stub = StubTransport::new();
        stub.send("t/a", "1").await.unwrap();

        stub.set_offline(true);
        assert!(stub.send("t/a", "2").await.is_err());

        // both attempts were recorded
        assert_eq!(stub.sent_to("t/a").len(), 2);
        assert_eq!(stub.last_payload("t/a").unwrap(), "2");
    }

    #[tokio::test]
    async fn per_topic_failure_leaves_other_topics_alone() {
        let stub = StubTransport::new();
        stub.fail_topic("t/bad");
        assert!(stub.send("t/bad", "x").await.is_err());
        assert!(stub.send("t/good", "y").await.is_ok());
    }
}
