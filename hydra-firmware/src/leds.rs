//! HydraBus LED wiring
//!
//! LEDs 1 and 2 are plain GPIOs; LEDs 3 and 4 sit on TIM2_CH1 and
//! TIM3_CH1 so their intensity can be dimmed.

use embassy_stm32::peripherals::{TIM2, TIM3};
use embassy_stm32::timer::simple_pwm::SimplePwmChannel;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

use hydra_core::config::PinConfig;
use hydra_core::IndicatorController;
use hydra_hal::{GpioIntensity, IntensityOutput, PwmIntensity};
use hydra_hal_stm32f4::GpioPin;

/// Number of LEDs on the board
pub const LED_COUNT: usize = 4;

/// Pins the LEDs are wired to in `main`, by ordinal
pub const LED_PINS: [PinConfig; LED_COUNT] = [
    PinConfig::new('A', 4),
    PinConfig::new('C', 4),
    PinConfig::new('A', 15),
    PinConfig::new('B', 4),
];

/// All board LEDs, shared by every task
pub type Indicators = IndicatorController<CriticalSectionRawMutex, BoardLed, LED_COUNT>;

/// Physical output behind one LED
pub enum BoardLed {
    Gpio(GpioIntensity<GpioPin<'static>>),
    Tim2(PwmIntensity<SimplePwmChannel<'static, TIM2>>),
    Tim3(PwmIntensity<SimplePwmChannel<'static, TIM3>>),
}

impl IntensityOutput for BoardLed {
    fn set_intensity(&mut self, level: u8) {
        match self {
            BoardLed::Gpio(led) => led.set_intensity(level),
            BoardLed::Tim2(led) => led.set_intensity(level),
            BoardLed::Tim3(led) => led.set_intensity(level),
        }
    }

    fn intensity(&self) -> u8 {
        match self {
            BoardLed::Gpio(led) => led.intensity(),
            BoardLed::Tim2(led) => led.intensity(),
            BoardLed::Tim3(led) => led.intensity(),
        }
    }

    fn is_dimmable(&self) -> bool {
        match self {
            BoardLed::Gpio(led) => led.is_dimmable(),
            BoardLed::Tim2(led) => led.is_dimmable(),
            BoardLed::Tim3(led) => led.is_dimmable(),
        }
    }
}
