//! SX1278 LoRa transceiver driver
//!
//! Blocking register-level driver over `embedded-hal` 1.0. Chip select is
//! owned by the `SpiDevice`; DIO0 is wired to an EXTI line by the board, whose
//! handler calls [`LoraRadio::service_interrupt`].
//!
//! Register sequencing follows the widely deployed Arduino LoRa library so a
//! node running this driver interoperates with the existing gateways:
//! same FIFO layout, explicit header mode, AGC on, PA_BOOST output.
//!
//! # Example
//!
//! ```ignore
//! let mut radio = Sx1278::new(spi_device, reset_pin, delay);
//! radio.begin(433_000_000)?;
//! radio.set_sync_word(0xF3)?;
//! radio.receive()?;
//! ```

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;

use crate::radio::{LoraRadio, MAX_PACKET_LEN};
use crate::{log_debug, log_warn, RadioError};

// Registers
const REG_FIFO: u8 = 0x00;
const REG_OP_MODE: u8 = 0x01;
const REG_FRF_MSB: u8 = 0x06;
const REG_FRF_MID: u8 = 0x07;
const REG_FRF_LSB: u8 = 0x08;
const REG_PA_CONFIG: u8 = 0x09;
const REG_OCP: u8 = 0x0B;
const REG_LNA: u8 = 0x0C;
const REG_FIFO_ADDR_PTR: u8 = 0x0D;
const REG_FIFO_TX_BASE_ADDR: u8 = 0x0E;
const REG_FIFO_RX_BASE_ADDR: u8 = 0x0F;
const REG_FIFO_RX_CURRENT_ADDR: u8 = 0x10;
const REG_IRQ_FLAGS: u8 = 0x12;
const REG_RX_NB_BYTES: u8 = 0x13;
const REG_PKT_SNR_VALUE: u8 = 0x19;
const REG_PKT_RSSI_VALUE: u8 = 0x1A;
const REG_MODEM_CONFIG_1: u8 = 0x1D;
const REG_PAYLOAD_LENGTH: u8 = 0x22;
const REG_MODEM_CONFIG_3: u8 = 0x26;
const REG_SYNC_WORD: u8 = 0x39;
const REG_DIO_MAPPING_1: u8 = 0x40;
const REG_VERSION: u8 = 0x42;
const REG_PA_DAC: u8 = 0x4D;

// Modes
const MODE_LONG_RANGE_MODE: u8 = 0x80;
const MODE_SLEEP: u8 = 0x00;
const MODE_STDBY: u8 = 0x01;
const MODE_TX: u8 = 0x03;
const MODE_RX_CONTINUOUS: u8 = 0x05;

// IRQ masks
const IRQ_TX_DONE_MASK: u8 = 0x08;
const IRQ_PAYLOAD_CRC_ERROR_MASK: u8 = 0x20;
const IRQ_RX_DONE_MASK: u8 = 0x40;

const PA_BOOST: u8 = 0x80;
const EXPECTED_VERSION: u8 = 0x12;
const FXOSC_HZ: u64 = 32_000_000;
const RSSI_OFFSET_LF_PORT: i16 = 164;

/// SX1278 low-frequency band edges
const MIN_FREQUENCY_HZ: u32 = 137_000_000;
const MAX_FREQUENCY_HZ: u32 = 525_000_000;

/// TX_DONE polling budget, one millisecond per poll. A full 255-byte packet at
/// SF12/125 kHz is on air for well under this.
const TX_DONE_POLL_LIMIT: u32 = 10_000;

/// SX1278 driver
pub struct Sx1278<SPI, RST, D> {
    spi: SPI,
    reset: RST,
    delay: D,
    /// Bytes of the current RX packet already drained from the FIFO
    packet_index: usize,
}

impl<SPI, RST, D> Sx1278<SPI, RST, D>
where
    SPI: SpiDevice,
    RST: OutputPin,
    D: DelayNs,
{
    /// Create a driver; the chip is not touched until [`LoraRadio::begin`]
    pub fn new(spi: SPI, reset: RST, delay: D) -> Self {
        Self {
            spi,
            reset,
            delay,
            packet_index: 0,
        }
    }

    /// Give the bus, reset pin and delay back
    pub fn release(self) -> (SPI, RST, D) {
        (self.spi, self.reset, self.delay)
    }

    /// Put the modem to sleep (LoRa mode retained)
    pub fn sleep(&mut self) -> Result<(), RadioError> {
        self.set_mode(MODE_SLEEP)
    }

    /// Put the modem in standby
    pub fn idle(&mut self) -> Result<(), RadioError> {
        self.set_mode(MODE_STDBY)
    }

    /// Program the carrier frequency
    ///
    /// # Errors
    ///
    /// Returns `RadioError::InvalidFrequency` outside 137–525 MHz.
    pub fn set_frequency(&mut self, frequency_hz: u32) -> Result<(), RadioError> {
        if !(MIN_FREQUENCY_HZ..=MAX_FREQUENCY_HZ).contains(&frequency_hz) {
            return Err(RadioError::InvalidFrequency);
        }

        let frf = (u64::from(frequency_hz) << 19) / FXOSC_HZ;
        self.write_register(REG_FRF_MSB, (frf >> 16) as u8)?;
        self.write_register(REG_FRF_MID, (frf >> 8) as u8)?;
        self.write_register(REG_FRF_LSB, frf as u8)
    }

    /// RSSI of the last received packet in dBm
    pub fn packet_rssi(&mut self) -> Result<i16, RadioError> {
        let raw = self.read_register(REG_PKT_RSSI_VALUE)?;
        Ok(i16::from(raw) - RSSI_OFFSET_LF_PORT)
    }

    /// SNR of the last received packet in dB
    pub fn packet_snr(&mut self) -> Result<f32, RadioError> {
        let raw = self.read_register(REG_PKT_SNR_VALUE)? as i8;
        Ok(f32::from(raw) * 0.25)
    }

    fn set_mode(&mut self, mode: u8) -> Result<(), RadioError> {
        self.write_register(REG_OP_MODE, MODE_LONG_RANGE_MODE | mode)
    }

    fn set_explicit_header_mode(&mut self) -> Result<(), RadioError> {
        let config = self.read_register(REG_MODEM_CONFIG_1)?;
        self.write_register(REG_MODEM_CONFIG_1, config & 0xFE)
    }

    /// Over-current protection trim, in mA
    fn set_ocp(&mut self, milliamps: u8) -> Result<(), RadioError> {
        let trim = match milliamps {
            0..=120 => milliamps.saturating_sub(45) / 5,
            121..=240 => ((u16::from(milliamps) + 30) / 10) as u8,
            _ => 27,
        };
        self.write_register(REG_OCP, 0x20 | (0x1F & trim))
    }

    fn reset_chip(&mut self) -> Result<(), RadioError> {
        self.reset.set_low().map_err(|_| RadioError::Reset)?;
        self.delay.delay_ms(10);
        self.reset.set_high().map_err(|_| RadioError::Reset)?;
        self.delay.delay_ms(10);
        Ok(())
    }

    fn read_register(&mut self, address: u8) -> Result<u8, RadioError> {
        let mut buf = [address & 0x7F, 0];
        self.spi
            .transfer_in_place(&mut buf)
            .map_err(|_| RadioError::Bus)?;
        Ok(buf[1])
    }

    fn write_register(&mut self, address: u8, value: u8) -> Result<(), RadioError> {
        self.spi
            .write(&[address | 0x80, value])
            .map_err(|_| RadioError::Bus)
    }
}

impl<SPI, RST, D> LoraRadio for Sx1278<SPI, RST, D>
where
    SPI: SpiDevice,
    RST: OutputPin,
    D: DelayNs,
{
    fn begin(&mut self, frequency_hz: u32) -> Result<(), RadioError> {
        self.reset_chip()?;

        let version = self.read_register(REG_VERSION)?;
        if version != EXPECTED_VERSION {
            return Err(RadioError::VersionMismatch { found: version });
        }
        log_debug!("SX1278 silicon version {}", version);

        // Mode changes into LoRa only take effect from sleep
        self.sleep()?;
        self.set_frequency(frequency_hz)?;

        self.write_register(REG_FIFO_TX_BASE_ADDR, 0)?;
        self.write_register(REG_FIFO_RX_BASE_ADDR, 0)?;

        // LNA boost on HF port, AGC auto
        let lna = self.read_register(REG_LNA)?;
        self.write_register(REG_LNA, lna | 0x03)?;
        self.write_register(REG_MODEM_CONFIG_3, 0x04)?;

        self.set_tx_power(17)?;
        self.idle()
    }

    fn set_sync_word(&mut self, sync_word: u8) -> Result<(), RadioError> {
        self.write_register(REG_SYNC_WORD, sync_word)
    }

    fn set_tx_power(&mut self, dbm: i8) -> Result<(), RadioError> {
        let level = match dbm {
            18..=20 => {
                // High power mode on PA_BOOST
                self.write_register(REG_PA_DAC, 0x87)?;
                self.set_ocp(140)?;
                dbm - 3
            }
            2..=17 => {
                self.write_register(REG_PA_DAC, 0x84)?;
                self.set_ocp(100)?;
                dbm
            }
            _ => return Err(RadioError::InvalidTxPower { dbm }),
        };

        self.write_register(REG_PA_CONFIG, PA_BOOST | (level - 2) as u8)
    }

    fn receive(&mut self) -> Result<(), RadioError> {
        // DIO0 => RxDone
        self.write_register(REG_DIO_MAPPING_1, 0x00)?;
        self.set_explicit_header_mode()?;
        self.set_mode(MODE_RX_CONTINUOUS)
    }

    fn service_interrupt(&mut self) -> Result<usize, RadioError> {
        let flags = self.read_register(REG_IRQ_FLAGS)?;
        // Write-1-to-clear
        self.write_register(REG_IRQ_FLAGS, flags)?;

        if flags & IRQ_PAYLOAD_CRC_ERROR_MASK != 0 {
            log_warn!("Dropping packet with payload CRC error");
            return Ok(0);
        }
        if flags & IRQ_RX_DONE_MASK == 0 {
            return Ok(0);
        }

        self.packet_index = 0;
        let length = self.read_register(REG_RX_NB_BYTES)?;
        let current = self.read_register(REG_FIFO_RX_CURRENT_ADDR)?;
        self.write_register(REG_FIFO_ADDR_PTR, current)?;

        Ok(usize::from(length))
    }

    fn available(&mut self) -> Result<usize, RadioError> {
        let length = self.read_register(REG_RX_NB_BYTES)?;
        Ok(usize::from(length).saturating_sub(self.packet_index))
    }

    fn read(&mut self) -> Result<Option<u8>, RadioError> {
        if self.available()? == 0 {
            return Ok(None);
        }
        self.packet_index += 1;
        self.read_register(REG_FIFO).map(Some)
    }

    fn send(&mut self, payload: &[u8]) -> Result<(), RadioError> {
        if payload.len() > MAX_PACKET_LEN {
            return Err(RadioError::PayloadTooLong { len: payload.len() });
        }

        self.idle()?;
        self.set_explicit_header_mode()?;
        self.write_register(REG_FIFO_ADDR_PTR, 0)?;
        self.write_register(REG_PAYLOAD_LENGTH, 0)?;

        for &byte in payload {
            self.write_register(REG_FIFO, byte)?;
        }
        self.write_register(REG_PAYLOAD_LENGTH, payload.len() as u8)?;

        self.set_mode(MODE_TX)?;
        for _ in 0..TX_DONE_POLL_LIMIT {
            if self.read_register(REG_IRQ_FLAGS)? & IRQ_TX_DONE_MASK != 0 {
                self.write_register(REG_IRQ_FLAGS, IRQ_TX_DONE_MASK)?;
                log_debug!("Sent {} byte packet", payload.len());
                return Ok(());
            }
            self.delay.delay_ms(1);
        }

        Err(RadioError::TxTimeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use core::cell::RefCell;
    use core::convert::Infallible;
    use embedded_hal::spi::{ErrorType, Operation};
    use std::rc::Rc;

    /// Register file and FIFO of a simulated chip
    struct Chip {
        registers: [u8; 0x80],
        fifo: [u8; 256],
        /// Whether entering TX mode raises TX_DONE
        completes_tx: bool,
    }

    impl Chip {
        fn new() -> Self {
            let mut registers = [0u8; 0x80];
            registers[REG_VERSION as usize] = EXPECTED_VERSION;
            Self {
                registers,
                fifo: [0u8; 256],
                completes_tx: true,
            }
        }

        fn read(&mut self, address: u8) -> u8 {
            if address == REG_FIFO {
                let ptr = self.registers[REG_FIFO_ADDR_PTR as usize];
                self.registers[REG_FIFO_ADDR_PTR as usize] = ptr.wrapping_add(1);
                return self.fifo[ptr as usize];
            }
            self.registers[address as usize]
        }

        fn write(&mut self, address: u8, value: u8) {
            match address {
                REG_FIFO => {
                    let ptr = self.registers[REG_FIFO_ADDR_PTR as usize];
                    self.fifo[ptr as usize] = value;
                    self.registers[REG_FIFO_ADDR_PTR as usize] = ptr.wrapping_add(1);
                }
                REG_IRQ_FLAGS => self.registers[address as usize] &= !value,
                REG_OP_MODE => {
                    self.registers[address as usize] = value;
                    if value & 0x07 == MODE_TX && self.completes_tx {
                        self.registers[REG_IRQ_FLAGS as usize] |= IRQ_TX_DONE_MASK;
                    }
                }
                _ => self.registers[address as usize] = value,
            }
        }

        fn deliver(&mut self, base: u8, packet: &[u8]) {
            for (offset, byte) in packet.iter().enumerate() {
                self.fifo[base as usize + offset] = *byte;
            }
            self.registers[REG_FIFO_RX_CURRENT_ADDR as usize] = base;
            self.registers[REG_RX_NB_BYTES as usize] = packet.len() as u8;
            self.registers[REG_IRQ_FLAGS as usize] |= IRQ_RX_DONE_MASK;
        }

        fn register(&self, address: u8) -> u8 {
            self.registers[address as usize]
        }
    }

    #[derive(Clone)]
    struct FakeSpi(Rc<RefCell<Chip>>);

    impl ErrorType for FakeSpi {
        type Error = Infallible;
    }

    impl SpiDevice for FakeSpi {
        fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Infallible> {
            let mut chip = self.0.borrow_mut();
            for operation in operations.iter_mut() {
                match operation {
                    Operation::Write(bytes) => chip.write(bytes[0] & 0x7F, bytes[1]),
                    Operation::TransferInPlace(bytes) => {
                        bytes[1] = chip.read(bytes[0] & 0x7F);
                    }
                    _ => {}
                }
            }
            Ok(())
        }
    }

    struct FakePin;

    impl embedded_hal::digital::ErrorType for FakePin {
        type Error = Infallible;
    }

    impl OutputPin for FakePin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            Ok(())
        }
    }

    struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    fn radio() -> (Sx1278<FakeSpi, FakePin, NoDelay>, Rc<RefCell<Chip>>) {
        let chip = Rc::new(RefCell::new(Chip::new()));
        let radio = Sx1278::new(FakeSpi(chip.clone()), FakePin, NoDelay);
        (radio, chip)
    }

    #[test]
    fn test_begin_configures_chip() {
        let (mut radio, chip) = radio();
        radio.begin(433_000_000).unwrap();

        let chip = chip.borrow();
        // 433 MHz => FRF 0x6C4000
        assert_eq!(chip.register(REG_FRF_MSB), 0x6C);
        assert_eq!(chip.register(REG_FRF_MID), 0x40);
        assert_eq!(chip.register(REG_FRF_LSB), 0x00);
        assert_eq!(chip.register(REG_LNA) & 0x03, 0x03);
        assert_eq!(chip.register(REG_MODEM_CONFIG_3), 0x04);
        assert_eq!(chip.register(REG_PA_CONFIG), 0x8F);
        assert_eq!(chip.register(REG_PA_DAC), 0x84);
        assert_eq!(chip.register(REG_OCP), 0x2B);
        assert_eq!(chip.register(REG_OP_MODE), MODE_LONG_RANGE_MODE | MODE_STDBY);
    }

    #[test]
    fn test_begin_rejects_unknown_chip() {
        let (mut radio, chip) = radio();
        chip.borrow_mut().registers[REG_VERSION as usize] = 0x00;

        assert_eq!(
            radio.begin(433_000_000),
            Err(RadioError::VersionMismatch { found: 0x00 })
        );
    }

    #[test]
    fn test_frequency_out_of_band() {
        let (mut radio, _chip) = radio();
        assert_eq!(radio.begin(915_000_000), Err(RadioError::InvalidFrequency));
        assert_eq!(radio.set_frequency(100_000_000), Err(RadioError::InvalidFrequency));
    }

    #[test]
    fn test_high_power_mode() {
        let (mut radio, chip) = radio();
        radio.set_tx_power(20).unwrap();

        let chip = chip.borrow();
        assert_eq!(chip.register(REG_PA_DAC), 0x87);
        assert_eq!(chip.register(REG_OCP), 0x31);
        assert_eq!(chip.register(REG_PA_CONFIG), PA_BOOST | 15);
    }

    #[test]
    fn test_invalid_tx_power() {
        let (mut radio, _chip) = radio();
        assert_eq!(radio.set_tx_power(21), Err(RadioError::InvalidTxPower { dbm: 21 }));
        assert_eq!(radio.set_tx_power(1), Err(RadioError::InvalidTxPower { dbm: 1 }));
    }

    #[test]
    fn test_receive_mode() {
        let (mut radio, chip) = radio();
        chip.borrow_mut().registers[REG_MODEM_CONFIG_1 as usize] = 0x73;
        radio.set_sync_word(0xF3).unwrap();
        radio.receive().unwrap();

        let chip = chip.borrow();
        assert_eq!(chip.register(REG_SYNC_WORD), 0xF3);
        assert_eq!(chip.register(REG_DIO_MAPPING_1), 0x00);
        assert_eq!(chip.register(REG_MODEM_CONFIG_1), 0x72);
        assert_eq!(
            chip.register(REG_OP_MODE),
            MODE_LONG_RANGE_MODE | MODE_RX_CONTINUOUS
        );
    }

    #[test]
    fn test_rx_done_drains_fifo() {
        let (mut radio, chip) = radio();
        chip.borrow_mut().deliver(0x20, b"<7>hi");

        assert_eq!(radio.service_interrupt().unwrap(), 5);
        assert_eq!(chip.borrow().register(REG_IRQ_FLAGS), 0);
        assert_eq!(radio.available().unwrap(), 5);

        let mut received = std::vec::Vec::new();
        while let Some(byte) = radio.read().unwrap() {
            received.push(byte);
        }
        assert_eq!(received, b"<7>hi");
        assert_eq!(radio.available().unwrap(), 0);
    }

    #[test]
    fn test_crc_error_reports_no_packet() {
        let (mut radio, chip) = radio();
        chip.borrow_mut().deliver(0, b"<7>hi");
        chip.borrow_mut().registers[REG_IRQ_FLAGS as usize] |= IRQ_PAYLOAD_CRC_ERROR_MASK;

        assert_eq!(radio.service_interrupt().unwrap(), 0);
        assert_eq!(chip.borrow().register(REG_IRQ_FLAGS), 0);
    }

    #[test]
    fn test_interrupt_without_rx_done() {
        let (mut radio, _chip) = radio();
        assert_eq!(radio.service_interrupt().unwrap(), 0);
    }

    #[test]
    fn test_send_writes_fifo() {
        let (mut radio, chip) = radio();
        radio.send(b"<10009>gas=1/150").unwrap();

        let chip = chip.borrow();
        assert_eq!(&chip.fifo[..16], b"<10009>gas=1/150");
        assert_eq!(chip.register(REG_PAYLOAD_LENGTH), 16);
        assert_eq!(chip.register(REG_IRQ_FLAGS) & IRQ_TX_DONE_MASK, 0);
    }

    #[test]
    fn test_send_timeout() {
        let (mut radio, chip) = radio();
        chip.borrow_mut().completes_tx = false;
        assert_eq!(radio.send(b"ping"), Err(RadioError::TxTimeout));
    }

    #[test]
    fn test_send_rejects_oversized_payload() {
        let (mut radio, _chip) = radio();
        let payload = [b'x'; MAX_PACKET_LEN + 1];
        assert_eq!(
            radio.send(&payload),
            Err(RadioError::PayloadTooLong { len: 256 })
        );
    }

    #[test]
    fn test_packet_rssi_and_snr() {
        let (mut radio, chip) = radio();
        chip.borrow_mut().registers[REG_PKT_RSSI_VALUE as usize] = 100;
        chip.borrow_mut().registers[REG_PKT_SNR_VALUE as usize] = (-8i8) as u8;

        assert_eq!(radio.packet_rssi().unwrap(), -64);
        assert_eq!(radio.packet_snr().unwrap(), -2.0);
    }
}
