//! Hydra Hardware Abstraction Layer
//!
//! This crate defines the hardware traits the board core is written
//! against. Chip-specific crates (currently STM32F4) implement them, and
//! host tests implement them with mocks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (hydra-firmware, tests)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  hydra-core (resolution, indicators)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  hydra-hal (this crate - traits)        │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │  hydra-hal-   │
//!             │    stm32f4    │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`] - Digital output
//! - [`intensity::IntensityOutput`] - Indicator brightness (PWM or plain GPIO)
//! - [`pwm::PwmIntensity`] - Indicator on any `embedded-hal` duty-cycle channel
//! - [`board::BoardQuery`] - Board identity, clock tree and RNG queries
//! - [`i2c::I2cConfig`] - I2C bus configuration

#![no_std]
#![deny(unsafe_code)]

pub mod board;
pub mod gpio;
pub mod i2c;
pub mod intensity;
pub mod pwm;

// Re-export key traits at crate root for convenience
pub use board::{BoardQuery, ClockFrequencies};
pub use gpio::{ActiveLevel, OutputPin};
pub use i2c::I2cConfig;
pub use intensity::{GpioIntensity, IntensityOutput, INTENSITY_MAX, INTENSITY_OFF};
pub use pwm::PwmIntensity;
