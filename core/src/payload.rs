//! Telemetry payload composition
//!
//! Every transmission carries one text payload of the form
//!
//! ```text
//! <DEVICE_ID>current=V0&voltage=V1&flame=V2&temperature=V3&raindrops=V4&gas=V5/CAPACITY
//! ```
//!
//! Values are inserted verbatim; nothing checks that they are numbers.

use core::fmt::Write;

use heapless::String;
use sisicic_hal::MAX_PACKET_LEN;

use crate::config::{Field, NodeConfig, FIELD_COUNT};
use crate::error::PayloadError;

/// A composed payload, sized to fit one radio packet
pub type Payload = String<MAX_PACKET_LEN>;

/// One set of textual sensor readings, in [`Field`] order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Measurements<'a> {
    values: [&'a str; FIELD_COUNT],
}

impl<'a> Measurements<'a> {
    /// Wrap readings given as `[current, voltage, flame, temperature, raindrops, gas]`
    pub const fn new(values: [&'a str; FIELD_COUNT]) -> Self {
        Self { values }
    }

    /// Reading for `field`
    pub fn get(&self, field: Field) -> &'a str {
        self.values[field.index()]
    }
}

impl<'a> From<[&'a str; FIELD_COUNT]> for Measurements<'a> {
    fn from(values: [&'a str; FIELD_COUNT]) -> Self {
        Self::new(values)
    }
}

/// Compose the telemetry payload for `measurements`
///
/// Mocked fields in `config` replace the corresponding reading.
///
/// # Errors
///
/// Returns `PayloadError::Overflow` if the text does not fit in one packet.
///
/// # Example
///
/// ```
/// use sisicic_core::{compose_payload, Measurements, NodeConfig};
///
/// let readings = Measurements::new(["7.66", "223.11", "0", "23.11", "0", "128.22"]);
/// let payload = compose_payload(&readings, &NodeConfig::default()).unwrap();
/// assert_eq!(
///     payload.as_str(),
///     "<10009>current=7.66&voltage=223.11&flame=0&temperature=23.11&raindrops=0&gas=128.22/150"
/// );
/// ```
pub fn compose_payload(
    measurements: &Measurements<'_>,
    config: &NodeConfig,
) -> Result<Payload, PayloadError> {
    let mut payload = Payload::new();

    write!(payload, "<{}>", config.device_id).map_err(|_| PayloadError::Overflow)?;

    for (position, field) in Field::ALL.iter().enumerate() {
        if position > 0 {
            payload.push('&').map_err(|_| PayloadError::Overflow)?;
        }
        let value = config
            .mocks
            .get(*field)
            .unwrap_or_else(|| measurements.get(*field));

        payload
            .push_str(field.key())
            .map_err(|_| PayloadError::Overflow)?;
        payload.push('=').map_err(|_| PayloadError::Overflow)?;
        payload.push_str(value).map_err(|_| PayloadError::Overflow)?;
    }

    write!(payload, "/{}", config.fuel_capacity).map_err(|_| PayloadError::Overflow)?;

    Ok(payload)
}
