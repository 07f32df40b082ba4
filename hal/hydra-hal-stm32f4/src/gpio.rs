//! GPIO outputs for STM32F4
//!
//! Adapts embassy-stm32 push-pull outputs to [`hydra_hal::OutputPin`].

use embassy_stm32::gpio::Output;
use hydra_hal::OutputPin;

/// Push-pull output pin
pub struct GpioPin<'d> {
    pin: Output<'d>,
}

impl<'d> GpioPin<'d> {
    /// Wrap an embassy output
    pub fn new(pin: Output<'d>) -> Self {
        Self { pin }
    }

    /// Release the embassy output
    pub fn free(self) -> Output<'d> {
        self.pin
    }
}

impl OutputPin for GpioPin<'_> {
    fn set_high(&mut self) {
        self.pin.set_high();
    }

    fn set_low(&mut self) {
        self.pin.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.pin.is_set_high()
    }
}
