//! Radio bring-up and telemetry transmission
//!
//! Bring-up failure is fail-stop: the node cannot do anything useful without
//! its radio. What "stop" means (halt, reboot, blink forever) is the board's
//! call, so [`initialize`] only reports it and [`signal_init_failure`] runs
//! the standard alert.

use sisicic_hal::{Indicator, LoraConfig, LoraRadio};

use crate::config::NodeConfig;
use crate::error::NodeError;
use crate::logging::{log_error, log_info};
use crate::payload::{compose_payload, Measurements, Payload};

/// Alert pattern shown when the radio cannot be started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertPattern {
    /// Pulse period
    pub period_ms: u32,
    /// Number of pulses
    pub repetitions: u8,
}

/// Five pulses, 200 ms apart
pub const INIT_FAILURE_ALERT: AlertPattern = AlertPattern {
    period_ms: 200,
    repetitions: 5,
};

/// Start the radio and leave it listening
///
/// Resets and probes the chip, tunes it, sets power and sync word, then enters
/// continuous receive.
///
/// # Errors
///
/// Returns `NodeError::InitFailed` on any radio failure. The node should not
/// continue.
pub fn initialize<R: LoraRadio>(radio: &mut R, config: &LoraConfig) -> Result<(), NodeError> {
    bring_up(radio, config).map_err(NodeError::InitFailed)?;
    log_info!("LoRa initialized OK.");
    Ok(())
}

fn bring_up<R: LoraRadio>(radio: &mut R, config: &LoraConfig) -> Result<(), sisicic_hal::RadioError> {
    radio.begin(config.frequency_hz)?;
    radio.set_tx_power(config.tx_power_dbm)?;
    radio.set_sync_word(config.sync_word)?;
    radio.receive()
}

/// Report a bring-up failure on the log and the indicator
pub fn signal_init_failure<I: Indicator>(indicator: &mut I, error: &NodeError) {
    log_error!("Starting LoRa failed: {:?}", error);
    indicator.alert(INIT_FAILURE_ALERT.period_ms, INIT_FAILURE_ALERT.repetitions);
}

/// Compose the telemetry payload, send it and go back to listening
///
/// Returns the payload that went on air.
///
/// # Errors
///
/// `NodeError::Payload` if the readings do not fit in one packet (nothing is
/// sent), `NodeError::Radio` if the transmission or the return to receive
/// mode fails.
pub fn transmit<R: LoraRadio>(
    radio: &mut R,
    measurements: &Measurements<'_>,
    config: &NodeConfig,
) -> Result<Payload, NodeError> {
    let payload = compose_payload(measurements, config)?;
    log_info!("Sending: {}", payload.as_str());

    let sent = radio.send(payload.as_bytes());
    // Listen again even if the send failed
    let listening = radio.receive();
    sent?;
    listening?;

    Ok(payload)
}
