//! Board-level queries
//!
//! Identity, clock tree and random number generation are owned by the
//! chip HAL. The core only forwards these calls.

/// Bus clock frequencies of the running system, in Hz
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockFrequencies {
    /// System clock
    pub sysclk: u32,
    /// AHB clock
    pub hclk: u32,
    /// APB1 peripheral clock
    pub pclk1: u32,
    /// APB2 peripheral clock
    pub pclk2: u32,
}

/// Queries answered by the running board
pub trait BoardQuery {
    /// Free-form description of the hardware (e.g. "HydraBus1.0 with STM32F4")
    fn machine(&self) -> &str;

    /// Current clock tree frequencies
    fn frequencies(&self) -> ClockFrequencies;

    /// Next value from the hardware random number generator
    ///
    /// Takes `&mut self` because the generator advances on every read.
    fn random(&mut self) -> u32;
}
