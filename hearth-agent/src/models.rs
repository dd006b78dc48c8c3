//! Record shapes written to the local log and fanned out to the uplink.

use chrono::Local;
use serde::Serialize;
use serde_json::{json, Value};

/// Local-clock timestamp in the record format shared by all domains.
pub fn timestamp_now() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// One environmental sample.
#[derive(Debug, Clone, Serialize)]
pub struct EnvReading {
    pub timestamp: String,
    pub temperature: f64,
    pub humidity: f64,
    pub pressure: f64,
}

impl EnvReading {
    pub fn new(temperature: f64, humidity: f64, pressure: f64) -> Self {
        Self { timestamp: timestamp_now(), temperature, humidity, pressure }
    }

    /// Metric values keyed the way `feeds::ENV_FEEDS` expects.
    pub fn metrics(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("temperature", json!(self.temperature)),
            ("humidity", json!(self.humidity)),
            ("pressure", json!(self.pressure)),
        ]
    }
}

/// One security poll. Detection flags arrive cooldown-filtered from the
/// driver, so every `true` counts as one event.
#[derive(Debug, Clone, Serialize)]
pub struct SecurityReading {
    pub timestamp: String,
    pub motion_detected: bool,
    pub smoke_detected: bool,
    pub sound_detected: bool,
}

impl SecurityReading {
    pub fn new(motion: bool, smoke: bool, sound: bool) -> Self {
        Self {
            timestamp: timestamp_now(),
            motion_detected: motion,
            smoke_detected: smoke,
            sound_detected: sound,
        }
    }

    pub fn any_detected(&self) -> bool {
        self.motion_detected || self.smoke_detected || self.sound_detected
    }
}

/// Aggregate detection counts over one summary interval.
#[derive(Debug, Clone, Serialize)]
pub struct SecuritySummary {
    pub timestamp: String,
    pub motion_count: u32,
    pub smoke_count: u32,
    pub sound_count: u32,
}

impl SecuritySummary {
    pub fn new(motion_count: u32, smoke_count: u32, sound_count: u32) -> Self {
        Self { timestamp: timestamp_now(), motion_count, smoke_count, sound_count }
    }

    /// Metric values keyed the way `feeds::SECURITY_FEEDS` expects.
    pub fn metrics(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("motion_count", json!(self.motion_count)),
            ("smoke_count", json!(self.smoke_count)),
            ("sound_count", json!(self.sound_count)),
        ]
    }
}

/// Inbound control message as delivered by the transport.
#[derive(Debug, Clone)]
pub struct Command {
    pub topic: String,
    pub payload: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readings_serialize_to_flat_json() {
        let reading = EnvReading::new(21.5, 40.0, 1013.2);
        let line = serde_json::to_string(&reading).unwrap();
        let back: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(back["temperature"], 21.5);
        assert!(back["timestamp"].is_string());
    }

    #[test]
    fn any_detected_covers_each_flag() {
        assert!(!SecurityReading::new(false, false, false).any_detected());
        assert!(SecurityReading::new(true, false, false).any_detected());
        assert!(SecurityReading::new(false, true, false).any_detected());
        assert!(SecurityReading::new(false, false, true).any_detected());
    }

    #[test]
    fn summary_metrics_use_the_security_feed_keys() {
        let summary = SecuritySummary::new(3, 0, 1);
        let metrics = summary.metrics();
        assert_eq!(metrics[0], ("motion_count", json!(3)));
        assert_eq!(metrics[2], ("sound_count", json!(1)));
    }
}
