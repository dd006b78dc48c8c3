//! Cloud uplink
//!
//! Fans a map of named metrics out to the remote broker, one send per
//! metric, through the transport seam. Delivery is best-effort: a failed
//! send never aborts the rest of a batch, the local log is the fallback.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Seam to the remote broker client.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Deliver one payload to one topic. An error means the value did
    /// not reach the broker.
    async fn send(&self, topic: &str, payload: &str) -> anyhow::Result<()>;
}

/// Delay after each send, to respect the remote endpoint's rate limits.
pub const SEND_PACING: Duration = Duration::from_millis(500);

#[derive(Clone)]
pub struct CloudUplink {
    transport: Arc<dyn Transport>,
    pacing: Duration,
}

impl CloudUplink {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_pacing(transport, SEND_PACING)
    }

    /// Constructor with explicit pacing, zeroed in tests.
    pub fn with_pacing(transport: Arc<dyn Transport>, pacing: Duration) -> Self {
        Self { transport, pacing }
    }

    /// Send every metric present in both `values` and `feeds`. Returns
    /// true only if every attempted send succeeded.
    pub async fn publish_all(&self, values: &[(&str, Value)], feeds: &[(&str, &str)]) -> bool {
        let mut success = true;
        for &(metric, topic) in feeds {
            let Some((_, value)) = values.iter().find(|(name, _)| *name == metric) else {
                continue;
            };
            if !self.publish(topic, &render(value)).await {
                success = false;
            }
            tokio::time::sleep(self.pacing).await;
        }
        success
    }

    /// Single unpaced send.
    pub async fn publish(&self, topic: &str, payload: &str) -> bool {
        match self.transport.send(topic, payload).await {
            Ok(()) => {
                debug!("sent {payload} to {topic}");
                true
            }
            Err(e) => {
                warn!("send to {topic} failed: {e:#}");
                false
            }
        }
    }
}

/// Bare string for string values, compact JSON for everything else.
fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
