//! Packet receiver
//!
//! Runs inside the radio's DIO0 interrupt: drain the packet into a bounded
//! buffer, decode the address and keep the payload only if it is for us.
//! Everything is run-to-completion; the fill loop is bounded by the packet
//! size and the buffer capacity, never by the radio alone.

use heapless::Vec;
use sisicic_hal::{LoraRadio, MAX_PACKET_LEN};

use crate::config::{DeviceId, NodeConfig};
use crate::envelope::Envelope;
use crate::logging::{log_debug, log_info, log_warn};

/// Receive buffer capacity
pub const RX_BUFFER_LEN: usize = MAX_PACKET_LEN;

/// What happened to one radio packet notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reception<'a> {
    /// Zero-length notification; nothing was read
    Spurious,
    /// Packet addressed to this node
    Accepted(Envelope<'a>),
    /// Packet addressed elsewhere, or whose address did not parse to ours
    Discarded { receiver: DeviceId },
    /// The radio failed mid-read; the partial packet was dropped
    Unreadable,
}

impl<'a> Reception<'a> {
    /// The accepted envelope, if any
    pub fn accepted(&self) -> Option<Envelope<'a>> {
        match self {
            Reception::Accepted(envelope) => Some(*envelope),
            _ => None,
        }
    }
}

/// Interrupt-side packet receiver
pub struct PacketReceiver {
    device_id: DeviceId,
    buffer: Vec<u8, RX_BUFFER_LEN>,
}

impl PacketReceiver {
    /// Create a receiver filtering on `config.device_id`
    pub fn new(config: &NodeConfig) -> Self {
        Self {
            device_id: config.device_id,
            buffer: Vec::new(),
        }
    }

    /// The ID packets must carry to be accepted
    pub fn device_id(&self) -> DeviceId {
        self.device_id
    }

    /// Service a DIO0 interrupt and handle whatever packet it delivered
    pub fn service<R: LoraRadio>(&mut self, radio: &mut R) -> Reception<'_> {
        match radio.service_interrupt() {
            Ok(packet_size) => self.on_receive(packet_size, radio),
            Err(e) => {
                log_warn!("Radio interrupt could not be serviced: {:?}", e);
                Reception::Unreadable
            }
        }
    }

    /// Handle a packet of `packet_size` bytes waiting in the radio
    ///
    /// A zero size is a spurious wake and returns without touching the radio.
    pub fn on_receive<R: LoraRadio>(&mut self, packet_size: usize, radio: &mut R) -> Reception<'_> {
        log_debug!("Entering receive mode");
        if packet_size == 0 {
            return Reception::Spurious;
        }

        if self.fill(packet_size, radio).is_err() {
            return Reception::Unreadable;
        }

        let envelope = Envelope::decode(&self.buffer);
        log_info!("Receiver: {}", envelope.receiver);

        if envelope.is_for(self.device_id) {
            log_info!(
                "Packet for this node: {}",
                envelope.payload_str().unwrap_or("<binary>")
            );
            Reception::Accepted(envelope)
        } else {
            log_debug!("Packet for {}, ignoring", envelope.receiver);
            Reception::Discarded {
                receiver: envelope.receiver,
            }
        }
    }

    /// Copy the packet out of the radio byte by byte
    ///
    /// Stops after `packet_size` bytes, when the buffer is full, or as soon as
    /// the radio has nothing left, whichever comes first.
    fn fill<R: LoraRadio>(&mut self, packet_size: usize, radio: &mut R) -> Result<(), ()> {
        self.buffer.clear();
        let limit = packet_size.min(RX_BUFFER_LEN);
        if packet_size > RX_BUFFER_LEN {
            log_warn!(
                "Packet of {} bytes truncated to {}",
                packet_size,
                RX_BUFFER_LEN
            );
        }

        while self.buffer.len() < limit {
            let available = radio.available().map_err(|e| {
                log_warn!("Radio read failed: {:?}", e);
            })?;
            if available == 0 {
                break;
            }
            let byte = match radio.read() {
                Ok(Some(byte)) => byte,
                Ok(None) => break,
                Err(e) => {
                    log_warn!("Radio read failed: {:?}", e);
                    return Err(());
                }
            };
            self.buffer.push(byte).map_err(|_| {
                log_warn!("Receive buffer full");
            })?;
        }

        Ok(())
    }
}
