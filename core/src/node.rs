//! Sensor node facade
//!
//! Owns the radio, the configuration and the receive buffer. A board keeps one
//! `Node` as a local resource of its DIO0 interrupt and its sampling task.
//!
//! # Example
//!
//! ```ignore
//! let mut node = match Node::start(radio, NodeConfig::default()) {
//!     Ok(node) => node,
//!     Err(e) => {
//!         signal_init_failure(&mut led, &e);
//!         halt();
//!     }
//! };
//!
//! // DIO0 interrupt
//! if let Some(envelope) = node.on_dio0().accepted() {
//!     handle_command(envelope.payload);
//! }
//!
//! // Sampling task
//! node.send_telemetry(&Measurements::new(readings))?;
//! ```

use crate::config::NodeConfig;
use crate::error::NodeError;
use crate::lora;
use crate::payload::{Measurements, Payload};
use crate::receiver::{PacketReceiver, Reception};
use sisicic_hal::LoraRadio;

/// A running sensor node
pub struct Node<R> {
    radio: R,
    config: NodeConfig,
    receiver: PacketReceiver,
}

impl<R: LoraRadio> Node<R> {
    /// Bring the radio up and start listening
    ///
    /// # Errors
    ///
    /// Returns `NodeError::InitFailed` if the radio cannot be started.
    pub fn start(mut radio: R, config: NodeConfig) -> Result<Self, NodeError> {
        lora::initialize(&mut radio, &config.radio)?;
        Ok(Self {
            radio,
            receiver: PacketReceiver::new(&config),
            config,
        })
    }

    /// Compose and send one telemetry packet
    pub fn send_telemetry(&mut self, measurements: &Measurements<'_>) -> Result<Payload, NodeError> {
        lora::transmit(&mut self.radio, measurements, &self.config)
    }

    /// Handle a DIO0 interrupt
    pub fn on_dio0(&mut self) -> Reception<'_> {
        self.receiver.service(&mut self.radio)
    }

    /// Active configuration
    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// Direct access to the radio (RSSI, sleep, ...)
    pub fn radio_mut(&mut self) -> &mut R {
        &mut self.radio
    }

    /// Stop the node and hand the radio back
    pub fn release(self) -> R {
        self.radio
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::receiver::tests::FakeRadio;
    use sisicic_hal::RadioError;

    #[test]
    fn test_start_failure() {
        let radio = FakeRadio {
            fail_begin: Some(RadioError::Bus),
            ..Default::default()
        };
        let result = Node::start(radio, NodeConfig::default());
        assert!(matches!(result, Err(NodeError::InitFailed(RadioError::Bus))));
    }

    #[test]
    fn test_round_trip_through_node() {
        let mut node = Node::start(FakeRadio::default(), NodeConfig::new(31, 90)).unwrap();

        node.radio_mut().pending.push_back(b"<31>open-valve".to_vec());
        node.radio_mut().pending.push_back(b"<32>open-valve".to_vec());

        assert_eq!(
            node.on_dio0().accepted().map(|e| e.payload),
            Some(&b"open-valve"[..])
        );
        assert_eq!(node.on_dio0(), Reception::Discarded { receiver: 32 });
        assert_eq!(node.on_dio0(), Reception::Spurious);

        let payload = node
            .send_telemetry(&Measurements::new(["0", "0", "0", "0", "0", "0"]))
            .unwrap();
        assert_eq!(
            payload.as_str(),
            "<31>current=0&voltage=0&flame=0&temperature=0&raindrops=0&gas=0/90"
        );

        let radio = node.release();
        assert_eq!(radio.sent.len(), 1);
    }
}
