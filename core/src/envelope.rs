//! Inbound packet addressing
//!
//! A packet starts with `<ID>` followed by the payload. There is no escaping,
//! length prefix or checksum: the ID is whatever sits between the first byte
//! and the first `>`.

use crate::config::DeviceId;

/// Address delimiter
pub const DELIMITER: u8 = b'>';

/// A decoded packet, borrowed from the receive buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Envelope<'a> {
    /// Addressed node
    pub receiver: DeviceId,
    /// Application data after the delimiter
    pub payload: &'a [u8],
}

impl<'a> Envelope<'a> {
    /// Split a raw packet into receiver ID and payload
    ///
    /// Malformed packets still decode; they just end up addressed to
    /// whatever the ID text parses to:
    /// - no `>`: the ID is read from everything after the first byte and the
    ///   payload is the whole packet;
    /// - `>` first: the ID is read from that single byte (so it is 0).
    ///
    /// A non-numeric ID parses to 0 and therefore matches a node configured
    /// with ID 0.
    pub fn decode(raw: &'a [u8]) -> Self {
        let delimiter = raw.iter().position(|&b| b == DELIMITER);

        let (id_text, payload) = match delimiter {
            Some(0) => (&raw[..1], &raw[1..]),
            Some(index) => (&raw[1..index], &raw[index + 1..]),
            None => (raw.get(1..).unwrap_or_default(), raw),
        };

        Self {
            receiver: parse_device_id(id_text),
            payload,
        }
    }

    /// Whether this packet is addressed to `device_id`
    pub fn is_for(&self, device_id: DeviceId) -> bool {
        self.receiver == device_id
    }

    /// The payload as text, if it is valid UTF-8
    pub fn payload_str(&self) -> Option<&'a str> {
        core::str::from_utf8(self.payload).ok()
    }
}

/// Parse a leading decimal integer the way C `atol` does
///
/// Leading C `isspace` whitespace and one sign are accepted; parsing stops
/// at the first non-digit. No digits at all yields 0. Out-of-range values
/// saturate.
pub fn parse_device_id(text: &[u8]) -> DeviceId {
    let mut rest = text;
    while let [first, tail @ ..] = rest {
        if !matches!(*first, b' ' | b'\t' | b'\n' | b'\x0B' | b'\x0C' | b'\r') {
            break;
        }
        rest = tail;
    }

    let negative = match rest.first() {
        Some(b'-') => {
            rest = &rest[1..];
            true
        }
        Some(b'+') => {
            rest = &rest[1..];
            false
        }
        _ => false,
    };

    let mut value: DeviceId = 0;
    for &byte in rest.iter().take_while(|b| b.is_ascii_digit()) {
        let digit = DeviceId::from(byte - b'0');
        value = if negative {
            value.saturating_mul(10).saturating_sub(digit)
        } else {
            value.saturating_mul(10).saturating_add(digit)
        };
    }

    value
}
