//! Visual/audible status indicator

/// Something that can signal a fault to a person standing next to the node
/// (status LED, buzzer)
pub trait Indicator {
    /// Pulse `repetitions` times with the given period
    fn alert(&mut self, period_ms: u32, repetitions: u8);
}
