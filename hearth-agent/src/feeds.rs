//! Remote feed topology
//!
//! Static metric-to-topic tables for the three feed families, plus the
//! closed set of actions an inbound control message can trigger. The
//! subscribe list and the dispatch lookup are both derived from the same
//! control table, so they cannot drift apart.

pub const ENV_FEEDS: &[(&str, &str)] = &[
    ("temperature", "hearth/env/temperature"),
    ("humidity", "hearth/env/humidity"),
    ("pressure", "hearth/env/pressure"),
];

pub const SECURITY_FEEDS: &[(&str, &str)] = &[
    ("motion_count", "hearth/security/motion-count"),
    ("smoke_count", "hearth/security/smoke-count"),
    ("sound_count", "hearth/security/sound-count"),
];

pub const CONTROL_FEEDS: &[(&str, &str)] = &[
    ("light", "hearth/control/light"),
    ("fan", "hearth/control/fan"),
    ("buzzer", "hearth/control/buzzer"),
    ("mode", "hearth/control/mode"),
    ("camera", "hearth/control/camera"),
];

pub const CAMERA_TOPIC: &str = "hearth/control/camera";

/// What an inbound message on a control topic means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    SetMode,
    TriggerCamera,
    Actuate(&'static str),
}

/// Resolve a topic against the closed control set.
pub fn control_action(topic: &str) -> Option<ControlAction> {
    CONTROL_FEEDS.iter().find(|(_, t)| *t == topic).map(|&(device, _)| match device {
        "mode" => ControlAction::SetMode,
        "camera" => ControlAction::TriggerCamera,
        other => ControlAction::Actuate(other),
    })
}

/// Topics the agent subscribes to at startup.
pub fn control_topics() -> impl Iterator<Item = &'static str> {
    CONTROL_FEEDS.iter().map(|&(_, topic)| topic)
}
