//! Hearth agent library
//!
//! Runtime coordinator for a small home-monitoring installation:
//! - environmental and security sampling on independent cadences
//! - cloud uplink over MQTT with a local durable log as the offline fallback
//! - remote control commands (actuators, camera trigger, operating mode)

pub mod collector;
pub mod config;
pub mod datalog;
pub mod devices;
pub mod feeds;
pub mod mode;
pub mod models;
pub mod router;
pub mod sensors;
pub mod transport;
pub mod uplink;
