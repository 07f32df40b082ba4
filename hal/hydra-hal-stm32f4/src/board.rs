//! Board queries for STM32F4
//!
//! Identity is fixed at build time, the clock tree is read back from RCC
//! after `embassy_stm32::init`, and random values come from the RNG
//! peripheral.

use embassy_stm32::peripherals::RNG;
use embassy_stm32::rcc::Clocks;
use embassy_stm32::rng::Rng;
use embassy_stm32::time::MaybeHertz;
use hydra_hal::{BoardQuery, ClockFrequencies};

/// Running STM32F4 board
pub struct Stm32Board<'d> {
    machine: &'static str,
    clocks: ClockFrequencies,
    rng: Rng<'d, RNG>,
}

impl<'d> Stm32Board<'d> {
    /// Create the board view from the frozen RCC clock tree
    pub fn new(machine: &'static str, clocks: &Clocks, rng: Rng<'d, RNG>) -> Self {
        Self {
            machine,
            clocks: clock_tree(clocks),
            rng,
        }
    }
}

/// Disabled clocks report 0 Hz
fn clock_tree(clocks: &Clocks) -> ClockFrequencies {
    let hz = |clock: MaybeHertz| clock.to_hertz().map_or(0, |f| f.0);
    ClockFrequencies {
        sysclk: hz(clocks.sys),
        hclk: hz(clocks.hclk1),
        pclk1: hz(clocks.pclk1),
        pclk2: hz(clocks.pclk2),
    }
}

impl BoardQuery for Stm32Board<'_> {
    fn machine(&self) -> &str {
        self.machine
    }

    fn frequencies(&self) -> ClockFrequencies {
        self.clocks
    }

    fn random(&mut self) -> u32 {
        self.rng.next_u32()
    }
}
