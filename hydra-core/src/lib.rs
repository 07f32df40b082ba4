//! Board-agnostic peripheral logic for the Hydra board HAL
//!
//! This crate contains everything that does not touch chip registers:
//!
//! - Board profile types and the `board.toml` parser
//! - I2C bus selector resolution
//! - Status indicator control over a shared physical state
//! - Board capability gating and the clock/RNG query passthrough

#![no_std]
#![deny(unsafe_code)]

pub mod board;
pub mod bus;
pub mod config;
pub mod error;
pub mod indicator;

pub use board::{check, supports, Board, BoardIdentity, Capability};
pub use bus::{BusHandle, BusId, BusOrigin, BusResolver, BusSelector};
pub use config::{parse_board, BoardProfile};
pub use error::{ResolutionError, SelectorFault};
pub use indicator::{IndicatorController, IndicatorHandle};
