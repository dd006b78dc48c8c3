//! Collection scheduler
//!
//! One repeating tick multiplexes the independently-timed tasks:
//! environmental sampling, mode-gated security sampling, the security
//! summary, and the periodic forced log sync. Each task keeps its own
//! "last fired" mark compared against the tick's clock reading, so tests
//! can drive `tick` with fabricated instants instead of sleeping.

use crate::config::AgentConfig;
use crate::datalog::{DataLog, LogDomain};
use crate::feeds;
use crate::mode::{ModeSwitch, SystemMode};
use crate::models::SecuritySummary;
use crate::sensors::{EnvironmentalSensor, SecuritySensor};
use crate::uplink::CloudUplink;
use anyhow::{Context, Result};
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tracing::{error, info, warn};

/// Pause after a failed tick before the loop resumes.
const ERROR_PAUSE: Duration = Duration::from_secs(5);

/// Per-task cadences, lifted from config once at startup.
#[derive(Debug, Clone, Copy)]
pub struct Intervals {
    pub env: Duration,
    pub security_check: Duration,
    pub security_send: Duration,
    pub flush: Duration,
}

impl Intervals {
    pub fn from_config(cfg: &AgentConfig) -> Self {
        Self {
            env: Duration::from_secs(cfg.env_interval),
            security_check: Duration::from_secs(cfg.security_check_interval),
            security_send: Duration::from_secs(cfg.security_send_interval),
            flush: Duration::from_secs(cfg.flushing_interval),
        }
    }
}

/// "Last fired" marks per task. `None` means never fired.
#[derive(Debug, Default)]
struct Timers {
    env_check: Option<Instant>,
    security_check: Option<Instant>,
    security_send: Option<Instant>,
    fsync: Option<Instant>,
}

fn due(last: Option<Instant>, now: Instant, interval: Duration) -> bool {
    last.map_or(true, |t| now.duration_since(t) >= interval)
}

/// Strict variant used for the forced sync.
fn overdue(last: Option<Instant>, now: Instant, interval: Duration) -> bool {
    last.map_or(true, |t| now.duration_since(t) > interval)
}

/// Running detection counts since the last summary send.
#[derive(Debug, Default)]
struct Counters {
    motion: u32,
    smoke: u32,
    sound: u32,
}

impl Counters {
    fn reset(&mut self) {
        *self = Self::default();
    }
}

pub struct Collector {
    intervals: Intervals,
    mode: ModeSwitch,
    environment: Box<dyn EnvironmentalSensor>,
    security: Box<dyn SecuritySensor>,
    uplink: CloudUplink,
    datalog: DataLog,
    timers: Timers,
    counts: Counters,
}

impl Collector {
    pub fn new(
        intervals: Intervals,
        mode: ModeSwitch,
        environment: Box<dyn EnvironmentalSensor>,
        security: Box<dyn SecuritySensor>,
        uplink: CloudUplink,
        datalog: DataLog,
    ) -> Self {
        Self {
            intervals,
            mode,
            environment,
            security,
            uplink,
            datalog,
            timers: Timers::default(),
            counts: Counters::default(),
        }
    }

    /// One scheduler pass at clock reading `now`.
    pub async fn tick(&mut self, now: Instant) -> Result<()> {
        if due(self.timers.env_check, now, self.intervals.env) {
            self.collect_environment().await?;
            self.timers.env_check = Some(now);
        }

        // security sampling only runs outside Home mode
        if self.mode.current() != SystemMode::Home
            && due(self.timers.security_check, now, self.intervals.security_check)
        {
            self.collect_security()?;
            self.timers.security_check = Some(now);
        }

        if due(self.timers.security_send, now, self.intervals.security_send) {
            self.send_summary().await?;
            self.timers.security_send = Some(now);
        }

        if overdue(self.timers.fsync, now, self.intervals.flush) {
            self.datalog.force_sync().context("forced log sync")?;
            self.timers.fsync = Some(now);
        }

        Ok(())
    }

    async fn collect_environment(&mut self) -> Result<()> {
        let reading = self.environment.sample().context("environmental sample")?;
        self.datalog
            .append(LogDomain::Environmental, &reading)
            .context("environmental log append")?;
        if self.uplink.publish_all(&reading.metrics(), feeds::ENV_FEEDS).await {
            info!("environmental data sent to cloud");
        } else {
            info!("offline, environmental data kept in local log");
        }
        Ok(())
    }

    fn collect_security(&mut self) -> Result<()> {
        let reading = self.security.sample().context("security sample")?;
        if reading.motion_detected {
            self.counts.motion += 1;
        }
        if reading.smoke_detected {
            self.counts.smoke += 1;
        }
        if reading.sound_detected {
            self.counts.sound += 1;
        }
        // raw readings only hit the log when something fired
        if reading.any_detected() {
            self.datalog
                .append(LogDomain::Security, &reading)
                .context("security log append")?;
        }
        Ok(())
    }

    async fn send_summary(&mut self) -> Result<()> {
        let summary =
            SecuritySummary::new(self.counts.motion, self.counts.smoke, self.counts.sound);
        self.datalog.append(LogDomain::Security, &summary).context("summary log append")?;
        if self.uplink.publish_all(&summary.metrics(), feeds::SECURITY_FEEDS).await {
            info!(
                "security summary sent: M:{} S:{} A:{}",
                summary.motion_count, summary.smoke_count, summary.sound_count
            );
        } else {
            warn!("failed to send security summary");
        }
        // counters restart every interval, delivered or not
        self.counts.reset();
        Ok(())
    }

    /// The scheduler loop. Exits only through the shutdown flag; a tick
    /// failure is reported and the loop resumes after a short pause.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        info!("collection loop started");
        while !*shutdown.borrow() {
            let pause = match self.tick(Instant::now()).await {
                Ok(()) => self.intervals.security_check,
                Err(e) => {
                    error!("collection tick failed: {e:#}");
                    ERROR_PAUSE
                }
            };
            tokio::select! {
                _ = tokio::time::sleep(pause) => {}
                _ = shutdown.changed() => {}
            }
        }
        if let Err(e) = self.datalog.force_sync() {
            error!("final log sync failed: {e:#}");
        }
        info!("collection loop stopped");
    }
}
