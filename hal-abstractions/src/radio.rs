//! LoRa radio abstraction
//!
//! The trait mirrors the packet-oriented API most SX127x drivers expose:
//! bring-up, continuous receive with an interrupt-driven packet notification,
//! byte-wise FIFO reads and blocking single-packet transmit.

use crate::RadioError;

/// Largest payload an SX127x FIFO can carry in one packet
pub const MAX_PACKET_LEN: usize = 255;

/// Radio link configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoraConfig {
    /// Carrier frequency in Hz (SX1278 covers the 433 MHz band)
    pub frequency_hz: u32,
    /// Sync word; nodes only hear packets carrying the same value
    pub sync_word: u8,
    /// Output power on PA_BOOST in dBm (2..=20)
    pub tx_power_dbm: i8,
}

impl LoraConfig {
    /// Create a configuration with the default sync word and power
    pub const fn new(frequency_hz: u32) -> Self {
        Self {
            frequency_hz,
            sync_word: 0xF3,
            tx_power_dbm: 17,
        }
    }

    /// Override the sync word
    pub const fn with_sync_word(mut self, sync_word: u8) -> Self {
        self.sync_word = sync_word;
        self
    }

    /// Override the transmit power
    pub const fn with_tx_power(mut self, tx_power_dbm: i8) -> Self {
        self.tx_power_dbm = tx_power_dbm;
        self
    }
}

impl Default for LoraConfig {
    fn default() -> Self {
        Self::new(433_000_000)
    }
}

/// Packet radio operated in continuous receive mode
///
/// `service_interrupt` is meant to be called from the DIO0 interrupt handler.
/// It acknowledges the interrupt and returns the size of the packet now
/// waiting in the FIFO, or 0 if the interrupt did not deliver one. The
/// packet is then drained with `available`/`read`.
pub trait LoraRadio {
    /// Reset the chip, verify it responds and tune to `frequency_hz`
    fn begin(&mut self, frequency_hz: u32) -> Result<(), RadioError>;

    /// Set the sync word
    fn set_sync_word(&mut self, sync_word: u8) -> Result<(), RadioError>;

    /// Set the transmit power in dBm
    fn set_tx_power(&mut self, dbm: i8) -> Result<(), RadioError>;

    /// Enter continuous receive mode with DIO0 signalling RxDone
    fn receive(&mut self) -> Result<(), RadioError>;

    /// Acknowledge a DIO0 interrupt, returning the received packet size
    fn service_interrupt(&mut self) -> Result<usize, RadioError>;

    /// Bytes of the current packet not yet read
    fn available(&mut self) -> Result<usize, RadioError>;

    /// Read the next byte of the current packet
    fn read(&mut self) -> Result<Option<u8>, RadioError>;

    /// Transmit one packet, blocking until the radio reports completion
    fn send(&mut self, payload: &[u8]) -> Result<(), RadioError>;
}
