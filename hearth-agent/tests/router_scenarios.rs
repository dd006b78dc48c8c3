//! Command dispatch scenarios over the devkit doubles.

use hearth_agent::mode::{ModeSwitch, SystemMode};
use hearth_agent::models::Command;
use hearth_agent::router::{CommandRouter, PHOTO_CONFIRM};
use hearth_agent::uplink::CloudUplink;
use hearth_devkit::{RecordingCamera, RecordingRelays, StubTransport};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

const MODE_TOPIC: &str = "hearth/control/mode";
const CAMERA_TOPIC: &str = "hearth/control/camera";

struct Rig {
    router: CommandRouter,
    mode: ModeSwitch,
    transport: Arc<StubTransport>,
    actuator: Arc<Mutex<RecordingRelays>>,
    camera: Arc<Mutex<RecordingCamera>>,
}

fn rig() -> Rig {
    let transport = StubTransport::new();
    let uplink = CloudUplink::with_pacing(transport.clone(), Duration::ZERO);
    let mode = ModeSwitch::new(SystemMode::Home);
    let actuator = Arc::new(Mutex::new(RecordingRelays::default()));
    let camera = Arc::new(Mutex::new(RecordingCamera::default()));
    let router =
        CommandRouter::new(mode.clone(), actuator.clone(), camera.clone(), uplink);
    Rig { router, mode, transport, actuator, camera }
}

#[tokio::test]
async fn mode_command_switches_to_away() {
    let rig = rig();
    rig.router.handle(MODE_TOPIC, "away").await;
    assert_eq!(rig.mode.current(), SystemMode::Away);
}

#[tokio::test]
async fn invalid_mode_value_leaves_mode_unchanged() {
    let rig = rig();
    rig.router.handle(MODE_TOPIC, "Away").await;
    rig.router.handle(MODE_TOPIC, "Vacation").await;
    assert_eq!(rig.mode.current(), SystemMode::Away);
}

#[tokio::test]
async fn camera_trigger_captures_once_and_confirms() {
    let rig = rig();
    rig.router.handle(CAMERA_TOPIC, "1").await;

    assert_eq!(rig.camera.lock().captures, 1);
    assert_eq!(rig.transport.last_payload(CAMERA_TOPIC).unwrap(), PHOTO_CONFIRM);
}

#[tokio::test]
async fn camera_trigger_accepts_take_photo_in_any_case() {
    let rig = rig();
    rig.router.handle(CAMERA_TOPIC, "take_photo").await;
    assert_eq!(rig.camera.lock().captures, 1);
}

#[tokio::test]
async fn other_camera_payloads_are_ignored() {
    let rig = rig();
    for payload in ["0", "off", "PHOTO", ""] {
        rig.router.handle(CAMERA_TOPIC, payload).await;
    }
    assert_eq!(rig.camera.lock().captures, 0);
    assert!(rig.transport.sent().is_empty());
}

#[tokio::test]
async fn actuator_topics_forward_payloads_verbatim() {
    let rig = rig();
    rig.router.handle("hearth/control/light", "ON").await;
    rig.router.handle("hearth/control/fan", "1").await;
    rig.router.handle("hearth/control/buzzer", "tune:alarm").await;

    let commands = &rig.actuator.lock().commands;
    assert_eq!(
        *commands,
        vec![
            ("light".to_string(), "ON".to_string()),
            ("fan".to_string(), "1".to_string()),
            ("buzzer".to_string(), "tune:alarm".to_string()),
        ]
    );
}

#[tokio::test]
async fn unmatched_topics_are_dropped_silently() {
    let rig = rig();
    rig.router.handle("hearth/env/temperature", "21.5").await;
    rig.router.handle("somebody/else/entirely", "Away").await;

    assert_eq!(rig.mode.current(), SystemMode::Home);
    assert!(rig.actuator.lock().commands.is_empty());
    assert!(rig.transport.sent().is_empty());
}

#[tokio::test]
async fn router_task_drains_the_queue_in_order() {
    let rig = rig();
    let (tx, rx) = mpsc::channel::<Command>(8);
    let handle = rig.router.spawn(rx);

    for (topic, payload) in [
        (MODE_TOPIC, "Away"),
        (CAMERA_TOPIC, "1"),
        ("hearth/control/light", "OFF"),
    ] {
        tx.send(Command { topic: topic.to_string(), payload: payload.to_string() })
            .await
            .unwrap();
    }
    drop(tx); // closing the channel lets the router finish draining
    handle.await.unwrap();

    assert_eq!(rig.mode.current(), SystemMode::Away);
    assert_eq!(rig.camera.lock().captures, 1);
    assert_eq!(rig.actuator.lock().commands, vec![("light".into(), "OFF".into())]);
}
