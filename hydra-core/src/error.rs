//! Peripheral resolution errors

use core::fmt;

/// Why a bus selector did not resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SelectorFault {
    /// Integer selector is not one of the board's bus ids
    UnknownIndex(i32),
    /// Name selector is not one of the board's bus names
    UnknownName,
}

/// A peripheral identifier that is not part of the board's supported set
///
/// Bus and indicator namespaces are kept apart. Failures are definitional,
/// so retrying the same identifier never succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResolutionError {
    /// Bus selector (index or name) does not exist on this board
    InvalidBusSelector(SelectorFault),
    /// Indicator ordinal outside `1..=N`
    InvalidIndex(i32),
}

impl ResolutionError {
    /// Check if this error came from bus resolution
    pub fn is_bus(&self) -> bool {
        matches!(self, ResolutionError::InvalidBusSelector(_))
    }
}

impl fmt::Display for ResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionError::InvalidBusSelector(SelectorFault::UnknownIndex(i)) => {
                write!(f, "I2C({}) doesn't exist", i)
            }
            ResolutionError::InvalidBusSelector(SelectorFault::UnknownName) => {
                f.write_str("I2C bus name doesn't exist")
            }
            ResolutionError::InvalidIndex(i) => write!(f, "LED({}) doesn't exist", i),
        }
    }
}
