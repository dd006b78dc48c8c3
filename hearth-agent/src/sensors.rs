//! Sampling seams and simulated drivers
//!
//! Real deployments implement these traits over hardware buses; the
//! simulated drivers keep the agent runnable on a bare workstation.

use crate::models::{EnvReading, SecurityReading};
use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};

pub trait EnvironmentalSensor: Send {
    fn sample(&mut self) -> Result<EnvReading>;
}

/// A security poll. Implementations own the cooldown policy: a sustained
/// detection must report `true` at most once per suppression window.
pub trait SecuritySensor: Send {
    fn sample(&mut self) -> Result<SecurityReading>;
}

/// Suppression window preventing a sustained detection from being
/// counted more than once.
#[derive(Debug)]
pub struct Cooldown {
    window: Duration,
    last: Option<Instant>,
}

impl Cooldown {
    pub fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    /// Whether a detection at `now` should be reported.
    pub fn admit(&mut self, now: Instant) -> bool {
        match self.last {
            Some(t) if now.duration_since(t) < self.window => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}

/// Indoor-climate stand-in: plausible values with a little jitter.
pub struct SimEnvironment {
    rng: StdRng,
}

impl SimEnvironment {
    pub fn new() -> Self {
        Self { rng: StdRng::from_entropy() }
    }
}

impl Default for SimEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvironmentalSensor for SimEnvironment {
    fn sample(&mut self) -> Result<EnvReading> {
        Ok(EnvReading::new(
            21.5 + self.rng.gen_range(-1.5..1.5),
            45.0 + self.rng.gen_range(-6.0..6.0),
            1013.0 + self.rng.gen_range(-4.0..4.0),
        ))
    }
}

/// Detection stand-in: rare random events, cooldown-filtered per channel.
pub struct SimSecurity {
    rng: StdRng,
    motion: Cooldown,
    smoke: Cooldown,
    sound: Cooldown,
}

impl SimSecurity {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            rng: StdRng::from_entropy(),
            motion: Cooldown::new(cooldown),
            smoke: Cooldown::new(cooldown),
            sound: Cooldown::new(cooldown),
        }
    }
}

impl SecuritySensor for SimSecurity {
    fn sample(&mut self) -> Result<SecurityReading> {
        let now = Instant::now();
        let motion = self.rng.gen_bool(0.05) && self.motion.admit(now);
        let smoke = self.rng.gen_bool(0.002) && self.smoke.admit(now);
        let sound = self.rng.gen_bool(0.03) && self.sound.admit(now);
        Ok(SecurityReading::new(motion, smoke, sound))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cooldown_suppresses_within_its_window() {
        let mut cd = Cooldown::new(Duration::from_secs(10));
        let t0 = Instant::now();
        assert!(cd.admit(t0));
        assert!(!cd.admit(t0 + Duration::from_secs(5)));
        assert!(!cd.admit(t0 + Duration::from_secs(9)));
        assert!(cd.admit(t0 + Duration::from_secs(10)));
    }

    #[test]
    fn cooldown_restarts_after_each_admitted_event() {
        let mut cd = Cooldown::new(Duration::from_secs(10));
        let t0 = Instant::now();
        assert!(cd.admit(t0));
        assert!(cd.admit(t0 + Duration::from_secs(12)));
        // window restarts at t0+12, not t0+10
        assert!(!cd.admit(t0 + Duration::from_secs(21)));
        assert!(cd.admit(t0 + Duration::from_secs(22)));
    }

    #[test]
    fn sim_environment_stays_in_plausible_ranges() {
        let mut sensor = SimEnvironment::new();
        for _ in 0..100 {
            let r = sensor.sample().unwrap();
            assert!((20.0..23.0).contains(&r.temperature));
            assert!((39.0..51.0).contains(&r.humidity));
            assert!((1009.0..1017.0).contains(&r.pressure));
        }
    }
}
