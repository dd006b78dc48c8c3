//! MQTT transport driver
//!
//! Owns the rumqttc client: publishes uplink payloads and forwards
//! inbound publishes on subscribed control topics to the command queue.
//! Connection errors are logged and retried; the broker being down never
//! takes the agent down with it.

use crate::config::MqttConf;
use crate::feeds;
use crate::models::Command;
use crate::uplink::Transport;
use anyhow::{Context, Result};
use async_trait::async_trait;
use rumqttc::{AsyncClient, Event, EventLoop, Incoming, MqttOptions, QoS};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

pub struct MqttTransport {
    client: AsyncClient,
}

impl MqttTransport {
    /// Connect to the broker, subscribe to every control topic, and
    /// spawn the event loop feeding inbound messages to `commands`.
    pub async fn connect(conf: &MqttConf, commands: mpsc::Sender<Command>) -> Result<Arc<Self>> {
        let mut opts = MqttOptions::new("hearth-agent", &conf.host, conf.port);
        opts.set_keep_alive(Duration::from_secs(30));
        opts.set_clean_session(true);

        let (client, eventloop) = AsyncClient::new(opts, 10);
        for topic in feeds::control_topics() {
            client
                .subscribe(topic, QoS::AtLeastOnce)
                .await
                .with_context(|| format!("failed to subscribe to {topic}"))?;
        }
        info!("subscribed to control feeds on {}:{}", conf.host, conf.port);

        tokio::spawn(Self::drive(eventloop, commands));
        Ok(Arc::new(Self { client }))
    }

    async fn drive(mut eventloop: EventLoop, commands: mpsc::Sender<Command>) {
        loop {
            match eventloop.poll().await {
                Ok(Event::Incoming(Incoming::Publish(publish))) => {
                    let payload = String::from_utf8_lossy(&publish.payload).to_string();
                    let cmd = Command { topic: publish.topic, payload };
                    if commands.send(cmd).await.is_err() {
                        debug!("command channel closed, transport loop exiting");
                        return;
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    error!("MQTT connection error: {e}");
                    tokio::time::sleep(Duration::from_secs(2)).await;
                }
            }
        }
    }
}

#[async_trait]
impl Transport for MqttTransport {
    async fn send(&self, topic: &str, payload: &str) -> Result<()> {
        self.client
            .publish(topic, QoS::AtLeastOnce, false, payload.as_bytes().to_vec())
            .await
            .with_context(|| format!("failed to publish to {topic}"))
    }
}
