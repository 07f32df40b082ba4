//! GPIO pin abstractions
//!
//! Provides the digital output trait used to drive plain (non-PWM)
//! indicators.

/// Digital output pin
///
/// Implementations should handle the actual hardware register manipulation
/// for the specific chip.
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Check if the pin is currently set high
    fn is_set_high(&self) -> bool;

    /// Check if the pin is currently set low
    fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }
}

/// Electrical level that lights an indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActiveLevel {
    /// Pin high = lit
    #[default]
    High,
    /// Pin low = lit
    Low,
}

impl ActiveLevel {
    /// Pin state that corresponds to the logical `on` state
    pub fn pin_high_for(self, on: bool) -> bool {
        match self {
            ActiveLevel::High => on,
            ActiveLevel::Low => !on,
        }
    }
}
