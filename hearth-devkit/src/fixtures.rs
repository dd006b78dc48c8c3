//! Deterministic stand-ins for the sampling and device collaborators.

use hearth_agent::devices::{Actuator, Camera};
use hearth_agent::models::{EnvReading, SecurityReading};
use hearth_agent::sensors::{EnvironmentalSensor, SecuritySensor};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Environmental sensor replaying a canned sequence, repeating the last
/// reading once the script runs dry.
pub struct ScriptedEnvironment {
    script: VecDeque<EnvReading>,
    last: EnvReading,
    taken: Arc<AtomicUsize>,
}

impl ScriptedEnvironment {
    pub fn new(readings: impl IntoIterator<Item = EnvReading>) -> Self {
        let mut script: VecDeque<EnvReading> = readings.into_iter().collect();
        let last = script.pop_front().unwrap_or_else(|| EnvReading::new(21.0, 45.0, 1013.0));
        script.push_front(last.clone());
        Self { script, last, taken: Arc::new(AtomicUsize::new(0)) }
    }

    pub fn constant(temperature: f64, humidity: f64, pressure: f64) -> Self {
        Self::new([EnvReading::new(temperature, humidity, pressure)])
    }

    /// Handle counting how many samples were taken; keep it before
    /// boxing the sensor away.
    pub fn counter(&self) -> Arc<AtomicUsize> {
        self.taken.clone()
    }
}

impl EnvironmentalSensor for ScriptedEnvironment {
    fn sample(&mut self) -> anyhow::Result<EnvReading> {
        self.taken.fetch_add(1, Ordering::SeqCst);
        if let Some(reading) = self.script.pop_front() {
            self.last = reading;
        }
        Ok(self.last.clone())
    }
}

/// Security sensor replaying canned detection flags, quiet once dry.
pub struct ScriptedSecurity {
    script: VecDeque<SecurityReading>,
    taken: Arc<AtomicUsize>,
}

impl ScriptedSecurity {
    pub fn new(readings: impl IntoIterator<Item = SecurityReading>) -> Self {
        Self { script: readings.into_iter().collect(), taken: Arc::new(AtomicUsize::new(0)) }
    }

    /// No detections, ever.
    pub fn quiet() -> Self {
        Self::new([])
    }

    pub fn counter(&self) -> Arc<AtomicUsize> {
        self.taken.clone()
    }
}

impl SecuritySensor for ScriptedSecurity {
    fn sample(&mut self) -> anyhow::Result<SecurityReading> {
        self.taken.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .script
            .pop_front()
            .unwrap_or_else(|| SecurityReading::new(false, false, false)))
    }
}

/// Actuator recording every (device, payload) pair it receives.
#[derive(Debug, Default)]
pub struct RecordingRelays {
    pub commands: Vec<(String, String)>,
}

impl Actuator for RecordingRelays {
    fn process_command(&mut self, device: &str, payload: &str) -> anyhow::Result<()> {
        self.commands.push((device.to_string(), payload.to_string()));
        Ok(())
    }
}

/// Camera counting captures and releases.
#[derive(Debug, Default)]
pub struct RecordingCamera {
    pub captures: u32,
    pub released: bool,
}

impl Camera for RecordingCamera {
    fn trigger_capture(&mut self) -> anyhow::Result<PathBuf> {
        self.captures += 1;
        Ok(PathBuf::from(format!("captures/test_{:04}.jpg", self.captures)))
    }

    fn release(&mut self) {
        self.released = true;
    }
}
