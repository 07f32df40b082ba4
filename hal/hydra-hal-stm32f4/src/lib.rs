//! STM32F4-specific HAL for the Hydra board HAL
//!
//! This crate implements the `hydra-hal` traits on top of embassy-stm32
//! peripherals. It supports:
//!
//! - STM32F405RG (HydraBus 1.0)
//!
//! # Features
//!
//! - `stm32f405rg` - Enable support for STM32F405RG
//! - `defmt` - Enable debug formatting support
//!
//! # Usage
//!
//! The firmware owns peripheral initialization and hands the configured
//! pins and RNG to the wrappers here. Timer channels go straight into
//! `hydra_hal::PwmIntensity`.

#![no_std]

pub mod board;
pub mod gpio;

pub use board::Stm32Board;
pub use gpio::GpioPin;
