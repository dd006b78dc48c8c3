//! Agent configuration
//!
//! Tunables come from a small JSON file. Every recognized key has a
//! built-in default; unrecognized keys are ignored; a missing or broken
//! file falls back to the defaults with a warning and is never fatal.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Seconds between security polls (also the scheduler tick cadence).
    pub security_check_interval: u64,
    /// Seconds between security summary sends.
    pub security_send_interval: u64,
    /// Seconds between environmental samples.
    pub env_interval: u64,
    /// Seconds between forced log syncs.
    pub flushing_interval: u64,
    /// Per-detector suppression window, consumed by the security driver.
    pub cooldown_duration_sec: u64,
    pub mqtt: MqttConf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MqttConf {
    pub host: String,
    pub port: u16,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            security_check_interval: 5,
            security_send_interval: 360,
            env_interval: 360,
            flushing_interval: 10,
            cooldown_duration_sec: 10,
            mqtt: MqttConf::default(),
        }
    }
}

impl Default for MqttConf {
    fn default() -> Self {
        Self { host: "localhost".to_string(), port: 1883 }
    }
}

impl AgentConfig {
    /// Config file location: `HEARTH_CONFIG` env var, or `hearth.json`.
    pub fn path() -> String {
        std::env::var("HEARTH_CONFIG").unwrap_or_else(|_| "hearth.json".to_string())
    }

    /// Load the config, substituting defaults on any failure.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::read(path) {
            Ok(cfg) => {
                info!("loaded config from {}", path.display());
                cfg
            }
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("config file {} not found, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                warn!("config file {}: {e}, using defaults", path.display());
                Self::default()
            }
        }
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_builtins() {
        let cfg = AgentConfig::default();
        assert_eq!(cfg.security_check_interval, 5);
        assert_eq!(cfg.security_send_interval, 360);
        assert_eq!(cfg.env_interval, 360);
        assert_eq!(cfg.flushing_interval, 10);
        assert_eq!(cfg.mqtt.port, 1883);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let cfg = AgentConfig::load("definitely/not/here.json");
        assert_eq!(cfg.env_interval, 360);
    }

    #[test]
    fn partial_file_keeps_defaults_for_the_rest() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, r#"{{"env_interval": 60, "favourite_colour": "teal"}}"#).unwrap();
        let cfg = AgentConfig::load(f.path());
        assert_eq!(cfg.env_interval, 60);
        assert_eq!(cfg.security_send_interval, 360);
    }

    #[test]
    fn broken_file_yields_defaults() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "this is not json").unwrap();
        let cfg = AgentConfig::load(f.path());
        assert_eq!(cfg.security_check_interval, 5);
    }
}
