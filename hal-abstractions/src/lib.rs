//! Hardware abstraction traits for the sensor node firmware
//!
//! This crate defines the traits that abstract over the radio and status
//! indicator hardware, plus a driver for the SX1278 transceiver written
//! against `embedded-hal` so any board can use it.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]
#![deny(warnings)]

pub mod logging;

pub mod error;
pub mod indicator;
pub mod radio;
pub mod sx1278;

pub use error::RadioError;
pub use indicator::Indicator;
pub use radio::{LoraConfig, LoraRadio, MAX_PACKET_LEN};
pub use sx1278::Sx1278;
