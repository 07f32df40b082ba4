//! Timer-channel indicators
//!
//! Maps the 0-255 indicator intensity onto a PWM duty cycle. Works with any
//! `embedded-hal` duty-cycle channel; on STM32F4 that is an embassy
//! `SimplePwmChannel`.

use embedded_hal::pwm::SetDutyCycle;

use crate::intensity::{IntensityOutput, INTENSITY_MAX, INTENSITY_OFF};

/// Indicator on a PWM channel
///
/// The channel is owned exclusively, so the level held here mirrors the
/// last duty cycle the channel accepted. A rejected write leaves it as is.
pub struct PwmIntensity<P> {
    channel: P,
    level: u8,
}

impl<P: SetDutyCycle> PwmIntensity<P> {
    /// Wrap an enabled channel, initializing the indicator to off
    pub fn new(channel: P) -> Self {
        let mut output = Self {
            channel,
            level: INTENSITY_OFF,
        };
        output.set_intensity(INTENSITY_OFF);
        output
    }

    /// Release the underlying channel
    pub fn free(self) -> P {
        self.channel
    }
}

impl<P: SetDutyCycle> IntensityOutput for PwmIntensity<P> {
    fn set_intensity(&mut self, level: u8) {
        let applied = match level {
            INTENSITY_OFF => self.channel.set_duty_cycle_fully_off(),
            INTENSITY_MAX => self.channel.set_duty_cycle_fully_on(),
            _ => self
                .channel
                .set_duty_cycle_fraction(level as u16, INTENSITY_MAX as u16),
        };
        if applied.is_ok() {
            self.level = level;
        }
    }

    fn intensity(&self) -> u8 {
        self.level
    }

    fn is_dimmable(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::pwm::{ErrorKind, ErrorType};

    const MAX_DUTY: u16 = 1000;

    /// Mock timer channel that can be told to reject writes
    struct MockChannel {
        duty: u16,
        writes: u32,
        reject: bool,
    }

    impl MockChannel {
        fn new() -> Self {
            Self {
                // Non-zero reset value so the initial off write is visible
                duty: 123,
                writes: 0,
                reject: false,
            }
        }
    }

    impl ErrorType for MockChannel {
        type Error = ErrorKind;
    }

    impl SetDutyCycle for MockChannel {
        fn max_duty_cycle(&self) -> u16 {
            MAX_DUTY
        }

        fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
            self.writes += 1;
            if self.reject {
                return Err(ErrorKind::Other);
            }
            self.duty = duty;
            Ok(())
        }
    }

    #[test]
    fn test_starts_off() {
        let led = PwmIntensity::new(MockChannel::new());
        assert_eq!(led.intensity(), INTENSITY_OFF);
        assert!(led.is_dimmable());

        let channel = led.free();
        assert_eq!(channel.duty, 0);
        assert_eq!(channel.writes, 1);
    }

    #[test]
    fn test_extremes_map_to_full_duty() {
        let mut led = PwmIntensity::new(MockChannel::new());

        led.set_intensity(INTENSITY_MAX);
        assert_eq!(led.intensity(), INTENSITY_MAX);
        assert_eq!(led.channel.duty, MAX_DUTY);

        led.set_intensity(INTENSITY_OFF);
        assert_eq!(led.intensity(), INTENSITY_OFF);
        assert_eq!(led.channel.duty, 0);
    }

    #[test]
    fn test_intermediate_level_scales() {
        let mut led = PwmIntensity::new(MockChannel::new());

        led.set_intensity(51);
        assert_eq!(led.intensity(), 51);
        // 51 / 255 of 1000
        assert_eq!(led.channel.duty, 200);

        led.set_intensity(1);
        assert_eq!(led.intensity(), 1);
        assert_eq!(led.channel.duty, 3);
    }

    #[test]
    fn test_rejected_write_keeps_last_level() {
        let mut led = PwmIntensity::new(MockChannel::new());
        led.set_intensity(INTENSITY_MAX);

        led.channel.reject = true;
        led.set_intensity(INTENSITY_OFF);
        assert_eq!(led.intensity(), INTENSITY_MAX);
        led.set_intensity(100);
        assert_eq!(led.intensity(), INTENSITY_MAX);
        assert_eq!(led.channel.duty, MAX_DUTY);

        led.channel.reject = false;
        led.set_intensity(100);
        assert_eq!(led.intensity(), 100);
    }

    #[test]
    fn test_rejected_initial_write_reads_off() {
        let mut channel = MockChannel::new();
        channel.reject = true;

        let led = PwmIntensity::new(channel);
        assert_eq!(led.intensity(), INTENSITY_OFF);
        assert_eq!(led.channel.writes, 1);
    }
}
