//! Hydra - board self-test firmware
//!
//! Main firmware binary for HydraBus 1.0 (STM32F405). Loads the board
//! profile, wires the LEDs and runs the self-test, then blinks LED 1 as a
//! heartbeat.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_stm32::gpio::{Level, Output, OutputType, Speed};
use embassy_stm32::peripherals::RNG;
use embassy_stm32::rng::{self, Rng};
use embassy_stm32::time::{khz, Hertz};
use embassy_stm32::timer::low_level::CountingMode;
use embassy_stm32::timer::simple_pwm::{PwmPin, SimplePwm};
use embassy_stm32::{bind_interrupts, Config};
use embassy_time::Timer;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use hydra_core::config::{BoardProfile, HYDRABUS_IDENTITY};
use hydra_core::Board;
use hydra_hal::{ActiveLevel, GpioIntensity, PwmIntensity};
use hydra_hal_stm32f4::{GpioPin, Stm32Board};

use crate::leds::{BoardLed, Indicators};
use crate::selftest::Outcome;

mod config;
mod leds;
mod selftest;

bind_interrupts!(struct Irqs {
    HASH_RNG => rng::InterruptHandler<RNG>;
});

// Static cells (must live forever for task references)
static PROFILE: StaticCell<BoardProfile> = StaticCell::new();
static INDICATORS: StaticCell<Indicators> = StaticCell::new();

/// Heartbeat blink period
const HEARTBEAT_MS: u64 = 500;

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Hydra firmware starting...");

    let p = embassy_stm32::init(rcc_config());
    let clocks = embassy_stm32::rcc::clocks(&p.RCC);
    info!("Peripherals initialized");

    let profile: &'static BoardProfile = PROFILE.init(config::load_board());

    // LEDs 1-2: GPIO. Pins must match `LED_PINS`.
    let led1 = Output::new(p.PA4, Level::Low, Speed::Low);
    let led2 = Output::new(p.PC4, Level::Low, Speed::Low);

    // LEDs 3-4: PWM at 1 kHz
    let tim2 = SimplePwm::new(
        p.TIM2,
        Some(PwmPin::new(p.PA15, OutputType::PushPull)),
        None,
        None,
        None,
        khz(1),
        CountingMode::EdgeAlignedUp,
    );
    let tim3 = SimplePwm::new(
        p.TIM3,
        Some(PwmPin::new(p.PB4, OutputType::PushPull)),
        None,
        None,
        None,
        khz(1),
        CountingMode::EdgeAlignedUp,
    );
    let mut led3 = tim2.split().ch1;
    let mut led4 = tim3.split().ch1;
    led3.enable();
    led4.enable();

    let active = |ordinal: u8| {
        profile
            .find_indicator(ordinal)
            .map(|i| i.pin.active_level())
            .unwrap_or(ActiveLevel::High)
    };

    let leds: &'static Indicators = INDICATORS.init(Indicators::new([
        BoardLed::Gpio(GpioIntensity::new(GpioPin::new(led1), active(1))),
        BoardLed::Gpio(GpioIntensity::new(GpioPin::new(led2), active(2))),
        BoardLed::Tim2(PwmIntensity::new(led3)),
        BoardLed::Tim3(PwmIntensity::new(led4)),
    ]));
    info!("{} LEDs ready", leds.count());

    let rng = Rng::new(p.RNG, Irqs);
    let mut board = Board::new(Stm32Board::new(HYDRABUS_IDENTITY, clocks, rng));

    match selftest::run(&mut board, profile, leds).await {
        Outcome::Passed => info!("Self-test passed"),
        Outcome::Skipped => info!("Self-test skipped"),
        Outcome::Failed(n) => error!("Self-test failed: {} checks", n),
    }

    let heartbeat = leds.construct(1);
    loop {
        if let Ok(led) = heartbeat {
            leds.toggle(led);
        }
        Timer::after_millis(HEARTBEAT_MS).await;
    }
}

/// HSE 8 MHz -> PLL 168 MHz, 48 MHz for the RNG
fn rcc_config() -> Config {
    use embassy_stm32::rcc::*;

    let mut config = Config::default();
    config.rcc.hse = Some(Hse {
        freq: Hertz(8_000_000),
        mode: HseMode::Oscillator,
    });
    config.rcc.pll_src = PllSource::HSE;
    config.rcc.pll = Some(Pll {
        prediv: PllPreDiv::DIV4,
        mul: PllMul::MUL168,
        divp: Some(PllPDiv::DIV2), // 168 MHz sysclk
        divq: Some(PllQDiv::DIV7), // 48 MHz for RNG
        divr: None,
    });
    config.rcc.ahb_pre = AHBPrescaler::DIV1;
    config.rcc.apb1_pre = APBPrescaler::DIV4;
    config.rcc.apb2_pre = APBPrescaler::DIV2;
    config.rcc.sys = Sysclk::PLL1_P;
    config
}
