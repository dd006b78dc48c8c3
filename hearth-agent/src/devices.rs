//! Actuator and camera seams with simulated drivers.

use anyhow::Result;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::info;

/// Maps a command payload onto a named physical output.
pub trait Actuator: Send {
    fn process_command(&mut self, device: &str, payload: &str) -> Result<()>;
}

/// Still-capture device.
pub trait Camera: Send {
    /// Take one still, returning where it was stored.
    fn trigger_capture(&mut self) -> Result<PathBuf>;

    /// Release any held capture resource. Called once at shutdown.
    fn release(&mut self) {}
}

/// Relay-bank stand-in: remembers the last payload per device.
#[derive(Debug, Default)]
pub struct SimRelayBank {
    states: HashMap<String, String>,
}

impl SimRelayBank {
    pub fn state(&self, device: &str) -> Option<&str> {
        self.states.get(device).map(String::as_str)
    }
}

impl Actuator for SimRelayBank {
    fn process_command(&mut self, device: &str, payload: &str) -> Result<()> {
        info!("actuator '{device}' set to {payload:?}");
        self.states.insert(device.to_string(), payload.to_string());
        Ok(())
    }
}

/// Camera stand-in: counts captures instead of writing stills.
#[derive(Debug)]
pub struct SimCamera {
    captures: u32,
    active: bool,
}

impl SimCamera {
    pub fn new() -> Self {
        Self { captures: 0, active: true }
    }
}

impl Default for SimCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera for SimCamera {
    fn trigger_capture(&mut self) -> Result<PathBuf> {
        self.captures += 1;
        let path = PathBuf::from(format!("captures/manual_{:04}.jpg", self.captures));
        info!("camera capture #{} -> {}", self.captures, path.display());
        Ok(path)
    }

    fn release(&mut self) {
        if self.active {
            self.active = false;
            info!("camera released");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relay_bank_tracks_last_payload_per_device() {
        let mut bank = SimRelayBank::default();
        bank.process_command("light", "ON").unwrap();
        bank.process_command("fan", "1").unwrap();
        bank.process_command("light", "OFF").unwrap();
        assert_eq!(bank.state("light"), Some("OFF"));
        assert_eq!(bank.state("fan"), Some("1"));
        assert_eq!(bank.state("buzzer"), None);
    }

    #[test]
    fn camera_release_is_idempotent() {
        let mut cam = SimCamera::new();
        cam.trigger_capture().unwrap();
        cam.release();
        cam.release();
    }
}
