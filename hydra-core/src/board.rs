//! Board capability gating and board-level queries
//!
//! Board-specific checks run only when the running hardware identifies
//! itself as the board they were written for. A mismatch is a normal
//! [`Capability::Skip`], never an error.

use core::fmt;

use hydra_hal::{BoardQuery, ClockFrequencies};

/// Free-form description of the running hardware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BoardIdentity<'a>(&'a str);

impl<'a> BoardIdentity<'a> {
    /// Wrap the machine string reported by the board
    pub const fn new(machine: &'a str) -> Self {
        Self(machine)
    }

    /// Raw identity text
    pub fn as_str(&self) -> &'a str {
        self.0
    }
}

impl<'a> From<&'a str> for BoardIdentity<'a> {
    fn from(machine: &'a str) -> Self {
        Self(machine)
    }
}

impl fmt::Display for BoardIdentity<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Outcome of a capability check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Capability {
    /// Board-specific peripherals are present
    Supported,
    /// Not this board; skip the board-specific work
    Skip,
}

impl Capability {
    /// Check if the board-specific work should run
    pub fn is_supported(self) -> bool {
        self == Capability::Supported
    }
}

/// Check whether `required` occurs literally in `identity`
///
/// An empty identity never supports anything.
pub fn supports<'a>(identity: impl Into<BoardIdentity<'a>>, required: &str) -> bool {
    let identity = identity.into().as_str();
    !identity.is_empty() && identity.contains(required)
}

/// [`supports`] as a first-class outcome
pub fn check<'a>(identity: impl Into<BoardIdentity<'a>>, required: &str) -> Capability {
    if supports(identity, required) {
        Capability::Supported
    } else {
        Capability::Skip
    }
}

/// The running board, seen through its query interface
///
/// Frequency and RNG reads are forwarded unchanged.
pub struct Board<Q> {
    query: Q,
}

impl<Q: BoardQuery> Board<Q> {
    /// Wrap the board's query interface
    pub fn new(query: Q) -> Self {
        Self { query }
    }

    /// Identity reported by the hardware
    pub fn identity(&self) -> BoardIdentity<'_> {
        BoardIdentity::new(self.query.machine())
    }

    /// Check whether this board matches `required`
    pub fn supports(&self, required: &str) -> bool {
        supports(self.identity(), required)
    }

    /// Capability check against this board's identity
    pub fn check(&self, required: &str) -> Capability {
        check(self.identity(), required)
    }

    /// Clock tree frequencies (sysclk, hclk, pclk1, pclk2)
    pub fn freq(&self) -> ClockFrequencies {
        self.query.frequencies()
    }

    /// Next hardware random value
    pub fn rng(&mut self) -> u32 {
        self.query.random()
    }

    /// Release the query interface
    pub fn into_inner(self) -> Q {
        self.query
    }
}
