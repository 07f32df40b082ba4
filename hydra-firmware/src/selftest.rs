//! Board self-test
//!
//! Runs once at boot: gate on the board identity, probe the I2C selector
//! space, cycle the LEDs and print the clock tree and an RNG sample.

use defmt::*;
use embassy_time::Timer;

use hydra_core::config::BoardProfile;
use hydra_core::{Board, BusResolver, BusSelector, Capability, ResolutionError};
use hydra_hal::{INTENSITY_MAX, INTENSITY_OFF};
use hydra_hal_stm32f4::Stm32Board;

use crate::leds::{Indicators, LED_PINS};

/// Settling time between LED steps
const LED_STEP_MS: u64 = 100;

/// Selectors probed on every boot; the last ones must fail
const PROBE_SELECTORS: [BusSelector<'static>; 8] = [
    BusSelector::Index(-1),
    BusSelector::Index(0),
    BusSelector::Index(1),
    BusSelector::Index(2),
    BusSelector::Index(3),
    BusSelector::Name("X"),
    BusSelector::Name("Y"),
    BusSelector::Name("Z"),
];

/// Result of a self-test run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Format)]
pub enum Outcome {
    /// Every check passed
    Passed,
    /// Not the board this test targets
    Skipped,
    /// Number of failed checks
    Failed(u8),
}

/// Run the self-test
pub async fn run(
    board: &mut Board<Stm32Board<'_>>,
    profile: &BoardProfile,
    leds: &Indicators,
) -> Outcome {
    if board.check(profile.identity.as_str()) == Capability::Skip {
        info!("SKIP: running on '{}'", board.identity().as_str());
        return Outcome::Skipped;
    }

    let mut failures = 0u8;
    failures += probe_buses(profile);
    failures += check_wiring(profile, leds);
    failures += exercise_leds(leds).await;

    let freq = board.freq();
    info!("freq: {}", freq);
    if freq.sysclk == 0 {
        error!("RCC reports no system clock");
        failures += 1;
    }
    info!("rng: {}", board.rng());

    if failures == 0 {
        Outcome::Passed
    } else {
        Outcome::Failed(failures)
    }
}

/// Resolve every probe selector and compare against the profile
fn probe_buses(profile: &BoardProfile) -> u8 {
    let resolver = BusResolver::new(profile);
    let mut failures = 0;

    for selector in PROBE_SELECTORS {
        match resolver.resolve(selector) {
            Ok(bus) => info!(
                "I2C {} -> bus {} @ {} Hz",
                selector,
                bus.id().index(),
                bus.config().frequency
            ),
            Err(ResolutionError::InvalidBusSelector(fault)) => {
                info!("I2C {} -> invalid ({})", selector, fault)
            }
            Err(e) => {
                error!("I2C {} -> unexpected {}", selector, e);
                failures += 1;
            }
        }
    }

    // Enumeration and resolution must agree
    for bus in resolver.buses() {
        if resolver.resolve(bus.id().index()).as_ref() != Ok(&bus) {
            error!("bus {} enumerated but does not resolve", bus.id().index());
            failures += 1;
        }
    }

    failures
}

/// Compare the `[led.N]` tables against the LEDs actually wired
fn check_wiring(profile: &BoardProfile, leds: &Indicators) -> u8 {
    let mut failures = 0;

    if profile.indicator_count() != leds.count() {
        error!(
            "board.toml lists {} LEDs, firmware wires {}",
            profile.indicator_count(),
            leds.count()
        );
        failures += 1;
    }

    for (led, pin) in leds.handles().zip(LED_PINS.iter()) {
        let ordinal = led.ordinal() as u8;
        if let Err(mismatch) = profile.check_wiring(ordinal, pin, leds.is_dimmable(led)) {
            error!("LED({}) wiring mismatch: {}", ordinal, mismatch);
            failures += 1;
        }
    }

    failures
}

/// On/off and toggle pass over every LED
async fn exercise_leds(leds: &Indicators) -> u8 {
    let mut failures = 0;

    for led in leds.handles() {
        info!("{}", Display2Format(&led));
    }

    for led in leds.handles() {
        leds.on(led);
        failures += expect_level(leds.intensity(led), INTENSITY_MAX, led.ordinal());
        Timer::after_millis(LED_STEP_MS).await;

        leds.off(led);
        failures += expect_level(leds.intensity(led), INTENSITY_OFF, led.ordinal());
        Timer::after_millis(LED_STEP_MS).await;
    }

    for _ in 0..2 {
        for led in leds.handles() {
            leds.toggle(led);
            let level = leds.intensity(led);
            if level != INTENSITY_OFF && level != INTENSITY_MAX {
                error!("LED({}) toggled to {}", led.ordinal(), level);
                failures += 1;
            }
            Timer::after_millis(LED_STEP_MS).await;
        }
    }

    // One past the last LED must not resolve
    let past_end = leds.count() as i32 + 1;
    if leds.construct(past_end).is_ok() {
        error!("LED({}) resolved on a {}-LED board", past_end, leds.count());
        failures += 1;
    }

    leds.all_off();
    failures
}

fn expect_level(actual: u8, expected: u8, ordinal: usize) -> u8 {
    if actual == expected {
        0
    } else {
        error!("LED({}) intensity {} != {}", ordinal, actual, expected);
        1
    }
}
