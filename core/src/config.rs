//! Node configuration
//!
//! Everything that used to be a build-time constant (device ID, fuel tank
//! capacity, radio parameters, mocked sensor values) lives in one immutable
//! [`NodeConfig`]. The builders are `const fn`, so a board can still pin its
//! configuration at compile time:
//!
//! ```
//! use sisicic_core::config::{Field, NodeConfig};
//!
//! const CONFIG: NodeConfig = NodeConfig::new(10009, 150)
//!     .with_mock(Field::Flame, "0")
//!     .with_mock(Field::Raindrops, "0");
//! assert_eq!(CONFIG.mocks.get(Field::Flame), Some("0"));
//! ```

use sisicic_hal::LoraConfig;

/// Numeric node address used as destination filter
pub type DeviceId = i32;

/// Number of telemetry fields carried in every payload
pub const FIELD_COUNT: usize = 6;

/// Telemetry fields, in wire order
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Current = 0,
    Voltage = 1,
    Flame = 2,
    Temperature = 3,
    Raindrops = 4,
    Gas = 5,
}

impl Field {
    /// All fields in the order receivers expect them
    pub const ALL: [Field; FIELD_COUNT] = [
        Field::Current,
        Field::Voltage,
        Field::Flame,
        Field::Temperature,
        Field::Raindrops,
        Field::Gas,
    ];

    /// Key used on the wire
    pub const fn key(self) -> &'static str {
        match self {
            Field::Current => "current",
            Field::Voltage => "voltage",
            Field::Flame => "flame",
            Field::Temperature => "temperature",
            Field::Raindrops => "raindrops",
            Field::Gas => "gas",
        }
    }

    /// Position within the payload and within [`crate::Measurements`]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Per-field substitutes used instead of live readings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MockOverrides {
    values: [Option<&'static str>; FIELD_COUNT],
}

impl MockOverrides {
    /// No field mocked
    pub const NONE: Self = Self {
        values: [None; FIELD_COUNT],
    };

    /// Mock `field` with a fixed value
    pub const fn with(mut self, field: Field, value: &'static str) -> Self {
        self.values[field.index()] = Some(value);
        self
    }

    /// The substitute for `field`, if any
    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.values[field.index()]
    }

    /// Whether any field is mocked
    pub fn any(&self) -> bool {
        self.values.iter().any(Option::is_some)
    }
}

/// Immutable node configuration shared by the composer and the receiver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeConfig {
    /// This node's address
    pub device_id: DeviceId,
    /// Total fuel tank capacity reported after the `/` of every payload
    pub fuel_capacity: u32,
    /// Radio link parameters
    pub radio: LoraConfig,
    /// Mocked sensor values
    pub mocks: MockOverrides,
}

impl NodeConfig {
    /// Create a configuration with the default radio and no mocks
    pub const fn new(device_id: DeviceId, fuel_capacity: u32) -> Self {
        Self {
            device_id,
            fuel_capacity,
            radio: LoraConfig::new(433_000_000),
            mocks: MockOverrides::NONE,
        }
    }

    /// Replace the radio parameters
    pub const fn with_radio(mut self, radio: LoraConfig) -> Self {
        self.radio = radio;
        self
    }

    /// Mock one sensor field
    pub const fn with_mock(mut self, field: Field, value: &'static str) -> Self {
        self.mocks = self.mocks.with(field, value);
        self
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self::new(10009, 150)
    }
}
