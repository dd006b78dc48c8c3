//! Hearth Agent - home monitoring daemon
//!
//! Wires the coordinator together:
//! - environmental and security sampling on independent cadences
//! - summaries relayed to the remote broker, durably logged locally
//!   whenever the broker is unreachable
//! - remote control commands (actuator toggles, camera trigger, mode)

use anyhow::{Context, Result};
use chrono::Local;
use hearth_agent::collector::{Collector, Intervals};
use hearth_agent::config::AgentConfig;
use hearth_agent::datalog::DataLog;
use hearth_agent::devices::{Camera, SimCamera, SimRelayBank};
use hearth_agent::mode::{ModeSwitch, SystemMode};
use hearth_agent::router::CommandRouter;
use hearth_agent::sensors::{SimEnvironment, SimSecurity};
use hearth_agent::transport::MqttTransport;
use hearth_agent::uplink::CloudUplink;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().init();

    info!("🏠 hearth agent starting...");

    let cfg = AgentConfig::load(AgentConfig::path());
    let mode = ModeSwitch::new(SystemMode::Home);

    let (commands_tx, commands_rx) = mpsc::channel(32);
    let transport = MqttTransport::connect(&cfg.mqtt, commands_tx)
        .await
        .context("failed to start MQTT transport")?;
    let uplink = CloudUplink::new(transport);

    let actuator = Arc::new(Mutex::new(SimRelayBank::default()));
    let camera = Arc::new(Mutex::new(SimCamera::new()));

    let router =
        CommandRouter::new(mode.clone(), actuator.clone(), camera.clone(), uplink.clone());
    router.spawn(commands_rx);

    let today = Local::now().date_naive();
    let datalog = DataLog::open("logs", today).context("failed to open local log files")?;
    info!("logging under logs/ with day stamp {}", today.format("%Y%m%d"));

    let collector = Collector::new(
        Intervals::from_config(&cfg),
        mode,
        Box::new(SimEnvironment::new()),
        Box::new(SimSecurity::new(Duration::from_secs(cfg.cooldown_duration_sec))),
        uplink,
        datalog,
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let collector_task = tokio::spawn(collector.run(shutdown_rx));

    tokio::signal::ctrl_c().await.context("failed to listen for shutdown signal")?;
    info!("👋 shutting down...");

    shutdown_tx.send(true).ok();
    match tokio::time::timeout(Duration::from_secs(10), collector_task).await {
        Ok(joined) => {
            if let Err(e) = joined {
                error!("collection task aborted: {e}");
            }
        }
        Err(_) => warn!("collection loop did not stop within 10s, proceeding anyway"),
    }

    camera.lock().release();
    info!("stopped");
    Ok(())
}
