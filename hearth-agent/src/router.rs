//! Command router
//!
//! Runs on its own task, draining the bounded inbound-command queue and
//! dispatching each message against the closed control-action set: mode
//! changes, manual camera triggers, and actuator payloads. Anything
//! unrecognized is dropped silently.

use crate::devices::{Actuator, Camera};
use crate::feeds::{self, ControlAction};
use crate::mode::ModeSwitch;
use crate::models::Command;
use crate::uplink::CloudUplink;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Confirmation value published back on the camera topic.
pub const PHOTO_CONFIRM: &str = "PHOTO_TAKEN";

pub struct CommandRouter {
    mode: ModeSwitch,
    actuator: Arc<Mutex<dyn Actuator>>,
    camera: Arc<Mutex<dyn Camera>>,
    uplink: CloudUplink,
}

impl CommandRouter {
    pub fn new(
        mode: ModeSwitch,
        actuator: Arc<Mutex<dyn Actuator>>,
        camera: Arc<Mutex<dyn Camera>>,
        uplink: CloudUplink,
    ) -> Self {
        Self { mode, actuator, camera, uplink }
    }

    /// Dispatch one inbound message. First match wins.
    pub async fn handle(&self, topic: &str, payload: &str) {
        match feeds::control_action(topic) {
            Some(ControlAction::SetMode) => match self.mode.set(payload) {
                Ok(mode) => info!("🚀 system mode updated to {mode}"),
                Err(e) => warn!("{e}, mode stays {}", self.mode.current()),
            },
            Some(ControlAction::TriggerCamera) => {
                if !is_capture_request(payload) {
                    return;
                }
                info!("📸 remote photo trigger received");
                let shot = self.camera.lock().trigger_capture();
                match shot {
                    Ok(path) => {
                        debug!("capture stored at {}", path.display());
                        self.uplink.publish(feeds::CAMERA_TOPIC, PHOTO_CONFIRM).await;
                    }
                    Err(e) => error!("manual capture failed: {e:#}"),
                }
            }
            Some(ControlAction::Actuate(device)) => {
                if let Err(e) = self.actuator.lock().process_command(device, payload) {
                    error!("actuator command on '{device}' failed: {e:#}");
                }
            }
            None => {}
        }
    }

    /// Drain the command queue until the transport side closes it.
    pub fn spawn(self, mut commands: mpsc::Receiver<Command>) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(cmd) = commands.recv().await {
                self.handle(&cmd.topic, &cmd.payload).await;
            }
            debug!("command channel closed, router exiting");
        })
    }
}

fn is_capture_request(payload: &str) -> bool {
    payload.eq_ignore_ascii_case("TAKE_PHOTO") || payload == "1"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_request_matching_is_case_insensitive() {
        assert!(is_capture_request("TAKE_PHOTO"));
        assert!(is_capture_request("take_photo"));
        assert!(is_capture_request("1"));
        assert!(!is_capture_request("0"));
        assert!(!is_capture_request("PHOTO"));
        assert!(!is_capture_request(""));
    }
}
