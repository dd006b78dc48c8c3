//! Operating mode state machine
//!
//! The mode gates security sampling and is the one piece of state shared
//! between the router task and the collection loop, so it lives behind a
//! guarded handle exposing only atomic get/set.

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemMode {
    Home,
    Away,
}

impl SystemMode {
    /// Parse a raw payload: whitespace-trimmed, case-insensitive.
    fn parse(raw: &str) -> Option<SystemMode> {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("home") {
            Some(SystemMode::Home)
        } else if trimmed.eq_ignore_ascii_case("away") {
            Some(SystemMode::Away)
        } else {
            None
        }
    }
}

impl fmt::Display for SystemMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SystemMode::Home => write!(f, "Home"),
            SystemMode::Away => write!(f, "Away"),
        }
    }
}

#[derive(Debug, Error)]
#[error("invalid mode value {0:?}")]
pub struct InvalidMode(pub String);

/// Shared handle to the current operating mode.
#[derive(Clone)]
pub struct ModeSwitch {
    inner: Arc<Mutex<SystemMode>>,
}

impl ModeSwitch {
    pub fn new(initial: SystemMode) -> Self {
        Self { inner: Arc::new(Mutex::new(initial)) }
    }

    pub fn current(&self) -> SystemMode {
        *self.inner.lock()
    }

    /// Validated transition. Anything other than `Home`/`Away` is
    /// rejected and the held mode stays untouched.
    pub fn set(&self, raw: &str) -> Result<SystemMode, InvalidMode> {
        match SystemMode::parse(raw) {
            Some(mode) => {
                *self.inner.lock() = mode;
                Ok(mode)
            }
            None => Err(InvalidMode(raw.trim().to_string())),
        }
    }
}
