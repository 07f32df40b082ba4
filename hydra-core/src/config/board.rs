//! Board profile types
//!
//! These types describe which I2C buses and status indicators physically
//! exist on a board.

use heapless::{String, Vec};
use hydra_hal::{ActiveLevel, I2cConfig};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum hardware I2C buses per board
pub const MAX_BUSES: usize = 4;

/// Maximum status indicators per board
pub const MAX_INDICATORS: usize = 8;

/// Maximum length of a symbolic bus name
pub const MAX_BUS_NAME_LEN: usize = 4;

/// Maximum length of the board identity string
pub const MAX_IDENTITY_LEN: usize = 48;

/// Identity string reported by HydraBus boards
pub const HYDRABUS_IDENTITY: &str = "HydraBus1.0 with STM32F4";

/// GPIO pin on an STM32 port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinConfig {
    /// Port letter ('A'..='I')
    pub port: char,
    /// Pin number within the port (0-15)
    pub pin: u8,
    /// Pin is active-low (inverted)
    pub inverted: bool,
}

impl PinConfig {
    /// Create a new active-high pin config
    pub const fn new(port: char, pin: u8) -> Self {
        Self {
            port,
            pin,
            inverted: false,
        }
    }

    /// Create an inverted (active-low) pin
    pub const fn inverted(port: char, pin: u8) -> Self {
        Self {
            port,
            pin,
            inverted: true,
        }
    }

    /// Same port and pin, ignoring polarity
    pub fn same_pin(&self, other: &PinConfig) -> bool {
        self.port == other.port && self.pin == other.pin
    }

    /// Level that lights an indicator wired to this pin
    pub fn active_level(&self) -> ActiveLevel {
        if self.inverted {
            ActiveLevel::Low
        } else {
            ActiveLevel::High
        }
    }

    /// Parse a pin string
    ///
    /// Supports formats:
    /// - "PA0" -> (Port A, Pin 0, active-high)
    /// - "!PB1" -> (Port B, Pin 1, inverted)
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();

        let (s, inverted) = match s.strip_prefix('!') {
            Some(rest) => (rest, true),
            None => (s, false),
        };

        let rest = s.strip_prefix('P')?;
        let mut chars = rest.chars();
        let port = chars.next()?;
        if !('A'..='I').contains(&port) {
            return None;
        }

        let pin: u8 = chars.as_str().parse().ok()?;
        if pin > 15 {
            return None;
        }

        Some(Self {
            port,
            pin,
            inverted,
        })
    }
}

/// Hardware I2C bus entry
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BusConfig {
    /// Peripheral id (I2C1 = 1, ...)
    pub id: u8,
    /// Optional symbolic name, matched case-sensitively
    pub name: Option<String<MAX_BUS_NAME_LEN>>,
    /// Bus clock settings
    pub i2c: I2cConfig,
}

impl BusConfig {
    /// Create an unnamed bus at the default clock
    pub fn new(id: u8) -> Self {
        Self {
            id,
            name: None,
            i2c: I2cConfig::default(),
        }
    }

    /// Create a bus reachable by `name` as well as by id
    ///
    /// Names longer than [`MAX_BUS_NAME_LEN`] are dropped.
    pub fn named(id: u8, name: &str) -> Self {
        Self {
            name: String::try_from(name).ok(),
            ..Self::new(id)
        }
    }

    /// Check the symbolic name (case-sensitive)
    pub fn has_name(&self, name: &str) -> bool {
        self.name.as_deref() == Some(name)
    }
}

/// Status indicator entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IndicatorConfig {
    /// 1-based ordinal
    pub ordinal: u8,
    /// Output pin
    pub pin: PinConfig,
    /// Pin is routed to a timer channel and supports intermediate levels
    pub pwm: bool,
}

/// Disagreement between a profile indicator and the firmware's wiring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WiringMismatch {
    /// No profile entry for the wired ordinal
    Missing,
    /// Profile names another pin
    Pin(PinConfig),
    /// Profile disagrees on whether the output is dimmable
    Pwm(bool),
}

/// Complete board profile
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoardProfile {
    /// Identity string, used for capability gating
    pub identity: String<MAX_IDENTITY_LEN>,
    /// Software (bit-banged) bus reachable as index -1
    pub soft_i2c: bool,
    /// Hardware I2C buses
    pub buses: Vec<BusConfig, MAX_BUSES>,
    /// Status indicators, ordered by ordinal starting at 1
    pub indicators: Vec<IndicatorConfig, MAX_INDICATORS>,
}

impl Default for BoardProfile {
    fn default() -> Self {
        Self {
            identity: String::new(),
            soft_i2c: false,
            buses: Vec::new(),
            indicators: Vec::new(),
        }
    }
}

impl BoardProfile {
    /// Create a new empty profile
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in HydraBus 1.0 (STM32F405) profile
    ///
    /// Three hardware buses (two of them named), the soft bus, and four
    /// indicators of which the last two sit on timer channels.
    pub fn hydrabus() -> Self {
        let mut profile = Self::new();
        let _ = profile.identity.push_str(HYDRABUS_IDENTITY);
        profile.soft_i2c = true;

        for bus in [BusConfig::named(1, "X"), BusConfig::named(2, "Y"), BusConfig::new(3)] {
            let _ = profile.buses.push(bus);
        }

        let leds = [
            (PinConfig::new('A', 4), false),
            (PinConfig::new('C', 4), false),
            (PinConfig::new('A', 15), true),
            (PinConfig::new('B', 4), true),
        ];
        for (i, (pin, pwm)) in leds.into_iter().enumerate() {
            let _ = profile.indicators.push(IndicatorConfig {
                ordinal: i as u8 + 1,
                pin,
                pwm,
            });
        }

        profile
    }

    /// Find a hardware bus by id
    pub fn find_bus(&self, id: u8) -> Option<&BusConfig> {
        self.buses.iter().find(|b| b.id == id)
    }

    /// Find a hardware bus by symbolic name
    pub fn find_bus_by_name(&self, name: &str) -> Option<&BusConfig> {
        self.buses.iter().find(|b| b.has_name(name))
    }

    /// Find an indicator by ordinal
    pub fn find_indicator(&self, ordinal: u8) -> Option<&IndicatorConfig> {
        self.indicators.iter().find(|i| i.ordinal == ordinal)
    }

    /// Number of indicators (N)
    pub fn indicator_count(&self) -> usize {
        self.indicators.len()
    }

    /// Compare indicator `ordinal` against the output actually wired to it
    pub fn check_wiring(
        &self,
        ordinal: u8,
        pin: &PinConfig,
        dimmable: bool,
    ) -> Result<(), WiringMismatch> {
        let entry = self.find_indicator(ordinal).ok_or(WiringMismatch::Missing)?;
        if !entry.pin.same_pin(pin) {
            return Err(WiringMismatch::Pin(entry.pin));
        }
        if entry.pwm != dimmable {
            return Err(WiringMismatch::Pwm(entry.pwm));
        }
        Ok(())
    }
}
