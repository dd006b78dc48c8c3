/*!
# Hearth DevKit - test support for the hearth agent

Lets agent behavior be tested without a broker or hardware:
- transport stub recording every send, with failure injection
- scripted sensors replaying canned readings
- recording actuator/camera doubles for dispatch assertions
*/

pub mod fixtures;
pub mod transport_stub;

pub use fixtures::{RecordingCamera, RecordingRelays, ScriptedEnvironment, ScriptedSecurity};
pub use transport_stub::{SentMessage, StubTransport};
