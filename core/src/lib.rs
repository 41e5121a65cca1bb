//! Platform-agnostic core logic for the LoRa sensor node firmware
//!
//! This crate contains the node's business logic: composing the telemetry
//! payload, filtering inbound packets by device ID and driving the radio
//! through the `sisicic-hal` traits. It has NO board dependencies.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]
#![deny(warnings)]

mod logging;

pub mod config;
pub mod envelope;
pub mod error;
pub mod lora;
pub mod node;
pub mod payload;
pub mod receiver;

pub use config::{DeviceId, Field, MockOverrides, NodeConfig};
pub use envelope::Envelope;
pub use error::{NodeError, PayloadError};
pub use lora::{initialize, signal_init_failure, transmit, INIT_FAILURE_ALERT};
pub use node::Node;
pub use payload::{compose_payload, Measurements, Payload};
pub use receiver::{PacketReceiver, Reception};
