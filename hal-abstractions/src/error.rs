//! Radio error types

/// Radio driver operation errors
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadioError {
    /// SPI transaction failed
    Bus,
    /// Reset line could not be driven
    Reset,
    /// Silicon revision register did not read back as an SX127x
    VersionMismatch { found: u8 },
    /// Carrier frequency outside what the synthesizer can encode
    InvalidFrequency,
    /// Requested output power outside the PA_BOOST range
    InvalidTxPower { dbm: i8 },
    /// Payload does not fit in the 255-byte FIFO
    PayloadTooLong { len: usize },
    /// TX_DONE never asserted
    TxTimeout,
}

impl core::fmt::Display for RadioError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Bus => write!(f, "SPI bus error"),
            Self::Reset => write!(f, "Reset pin error"),
            Self::VersionMismatch { found } => {
                write!(f, "Unexpected radio version 0x{:02X}", found)
            }
            Self::InvalidFrequency => write!(f, "Invalid carrier frequency"),
            Self::InvalidTxPower { dbm } => write!(f, "Invalid TX power {} dBm", dbm),
            Self::PayloadTooLong { len } => write!(f, "Payload too long ({} bytes)", len),
            Self::TxTimeout => write!(f, "Transmit timeout"),
        }
    }
}

impl core::error::Error for RadioError {}
