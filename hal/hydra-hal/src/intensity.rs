//! Indicator intensity abstractions
//!
//! An indicator is driven either by a timer channel (PWM, full 0-255
//! range) or by a plain GPIO pin that can only be fully on or off.

use crate::gpio::{ActiveLevel, OutputPin};

/// Intensity of a fully lit indicator
pub const INTENSITY_MAX: u8 = 255;

/// Intensity of a dark indicator
pub const INTENSITY_OFF: u8 = 0;

/// Physical output behind a status indicator
///
/// The output itself is the source of truth for the current intensity;
/// callers never keep their own copy.
pub trait IntensityOutput {
    /// Drive the output to `level` (0 = off, 255 = fully on)
    fn set_intensity(&mut self, level: u8);

    /// Read back the level currently driven
    fn intensity(&self) -> u8;

    /// Whether the output can hold levels between the two extremes
    fn is_dimmable(&self) -> bool {
        false
    }
}

/// Indicator on a plain GPIO pin
///
/// Any nonzero level lights the indicator; read-back reports
/// [`INTENSITY_MAX`] or [`INTENSITY_OFF`].
pub struct GpioIntensity<P> {
    pin: P,
    active: ActiveLevel,
}

impl<P: OutputPin> GpioIntensity<P> {
    /// Wrap a pin, initializing the indicator to off
    pub fn new(pin: P, active: ActiveLevel) -> Self {
        let mut output = Self { pin, active };
        output.set_intensity(INTENSITY_OFF);
        output
    }

    /// Indicator lit when the pin is high
    pub fn active_high(pin: P) -> Self {
        Self::new(pin, ActiveLevel::High)
    }

    /// Indicator lit when the pin is low
    pub fn active_low(pin: P) -> Self {
        Self::new(pin, ActiveLevel::Low)
    }

    /// Release the underlying pin
    pub fn free(self) -> P {
        self.pin
    }
}

impl<P: OutputPin> IntensityOutput for GpioIntensity<P> {
    fn set_intensity(&mut self, level: u8) {
        let high = self.active.pin_high_for(level != INTENSITY_OFF);
        self.pin.set_state(high);
    }

    fn intensity(&self) -> u8 {
        if self.active.pin_high_for(true) == self.pin.is_set_high() {
            INTENSITY_MAX
        } else {
            INTENSITY_OFF
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Mock GPIO pin for testing
    struct MockPin {
        high: bool,
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) {
            self.high = true;
        }

        fn set_low(&mut self) {
            self.high = false;
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    #[test]
    fn test_active_high_indicator() {
        let mut led = GpioIntensity::active_high(MockPin { high: true });

        // Starts off regardless of the pin's reset state
        assert_eq!(led.intensity(), INTENSITY_OFF);
        assert!(led.pin.is_set_low());

        led.set_intensity(INTENSITY_MAX);
        assert_eq!(led.intensity(), INTENSITY_MAX);
        assert!(led.pin.is_set_high());

        led.set_intensity(INTENSITY_OFF);
        assert_eq!(led.intensity(), INTENSITY_OFF);
    }

    #[test]
    fn test_active_low_indicator() {
        let mut led = GpioIntensity::active_low(MockPin { high: false });

        assert_eq!(led.intensity(), INTENSITY_OFF);
        assert!(led.pin.is_set_high());

        led.set_intensity(INTENSITY_MAX);
        assert_eq!(led.intensity(), INTENSITY_MAX);
        assert!(led.pin.is_set_low());
    }

    #[test]
    fn test_intermediate_level_saturates() {
        let mut led = GpioIntensity::active_high(MockPin { high: false });
        assert!(!led.is_dimmable());

        led.set_intensity(40);
        assert_eq!(led.intensity(), INTENSITY_MAX);

        let pin = led.free();
        assert!(pin.is_set_high());
    }
}
