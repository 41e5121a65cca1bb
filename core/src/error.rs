//! Node error types

use sisicic_hal::RadioError;

/// Payload composition errors
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadError {
    /// Composed text exceeds one radio packet
    Overflow,
}

impl core::fmt::Display for PayloadError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Overflow => write!(f, "Payload exceeds packet size"),
        }
    }
}

impl core::error::Error for PayloadError {}

/// Node operation errors
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeError {
    /// Radio bring-up failed; the node cannot operate (fail-stop)
    InitFailed(RadioError),
    /// Radio operation failed after bring-up
    Radio(RadioError),
    /// Telemetry could not be composed
    Payload(PayloadError),
}

impl NodeError {
    /// Whether the node must stop operating
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::InitFailed(_))
    }
}

impl core::fmt::Display for NodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InitFailed(e) => write!(f, "Starting LoRa failed: {}", e),
            Self::Radio(e) => write!(f, "Radio error: {}", e),
            Self::Payload(e) => write!(f, "Payload error: {}", e),
        }
    }
}

impl core::error::Error for NodeError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::InitFailed(e) | Self::Radio(e) => Some(e),
            Self::Payload(e) => Some(e),
        }
    }
}

impl From<RadioError> for NodeError {
    fn from(e: RadioError) -> Self {
        Self::Radio(e)
    }
}

impl From<PayloadError> for NodeError {
    fn from(e: PayloadError) -> Self {
        Self::Payload(e)
    }
}
