//! Configuration types
//!
//! The board profile is the fixed peripheral table every resolution is
//! validated against. It is compiled in as a default and can also be
//! parsed from `board.toml` text.

pub mod board;
pub mod toml;

pub use board::*;
pub use toml::{parse_board, ParseError};
