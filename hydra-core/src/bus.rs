//! I2C bus selector resolution
//!
//! A bus is requested either by index or by symbolic name. Resolution
//! checks the selector against the board profile and either returns a
//! fully valid [`BusHandle`] or an error; nothing is touched on failure.

use core::fmt;

use heapless::String;
use hydra_hal::I2cConfig;

use crate::config::{BoardProfile, BusConfig, MAX_BUS_NAME_LEN};
use crate::error::{ResolutionError, SelectorFault};

/// Caller-supplied bus identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusSelector<'a> {
    /// Numeric id; `-1` selects the software bus
    Index(i32),
    /// Symbolic name (case-sensitive)
    Name(&'a str),
}

impl From<i32> for BusSelector<'_> {
    fn from(index: i32) -> Self {
        BusSelector::Index(index)
    }
}

impl<'a> From<&'a str> for BusSelector<'a> {
    fn from(name: &'a str) -> Self {
        BusSelector::Name(name)
    }
}

/// Physical identity of a bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusId {
    /// Software (bit-banged) bus, index -1
    Soft,
    /// Hardware peripheral, I2C1 = 1, ...
    Hw(u8),
}

impl BusId {
    /// Index reserved for the software bus
    pub const SOFT_INDEX: i32 = -1;

    /// Numeric index as accepted by [`BusSelector::Index`]
    pub fn index(self) -> i32 {
        match self {
            BusId::Soft => Self::SOFT_INDEX,
            BusId::Hw(id) => id as i32,
        }
    }
}

/// Owned copy of the selector a handle was resolved from
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusOrigin {
    Index(i32),
    Name(String<MAX_BUS_NAME_LEN>),
}

impl PartialEq<BusSelector<'_>> for BusOrigin {
    fn eq(&self, other: &BusSelector<'_>) -> bool {
        match (self, other) {
            (BusOrigin::Index(a), BusSelector::Index(b)) => a == b,
            (BusOrigin::Name(a), BusSelector::Name(b)) => a.as_str() == *b,
            _ => false,
        }
    }
}

/// A validated I2C bus
///
/// Only [`BusResolver`] creates these, so the id is always one the board
/// has.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusHandle {
    id: BusId,
    origin: BusOrigin,
    config: I2cConfig,
}

impl BusHandle {
    fn soft(origin: BusOrigin) -> Self {
        Self {
            id: BusId::Soft,
            origin,
            config: I2cConfig::default(),
        }
    }

    fn hardware(bus: &BusConfig, origin: BusOrigin) -> Self {
        Self {
            id: BusId::Hw(bus.id),
            origin,
            config: bus.i2c,
        }
    }

    /// Physical bus identity
    pub fn id(&self) -> BusId {
        self.id
    }

    /// Selector this handle was resolved from
    pub fn origin(&self) -> &BusOrigin {
        &self.origin
    }

    /// Bus clock settings from the board profile
    pub fn config(&self) -> I2cConfig {
        self.config
    }

    /// Check if this is the software bus
    pub fn is_soft(&self) -> bool {
        self.id == BusId::Soft
    }
}

impl fmt::Display for BusHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "I2C({})", self.id.index())
    }
}

/// Resolves bus selectors against a board profile
#[derive(Debug, Clone, Copy)]
pub struct BusResolver<'p> {
    profile: &'p BoardProfile,
}

impl<'p> BusResolver<'p> {
    /// Create a resolver for `profile`
    pub fn new(profile: &'p BoardProfile) -> Self {
        Self { profile }
    }

    /// Resolve a selector to a bus handle
    pub fn resolve<'a>(
        &self,
        selector: impl Into<BusSelector<'a>>,
    ) -> Result<BusHandle, ResolutionError> {
        match selector.into() {
            BusSelector::Index(index) => self.resolve_index(index),
            BusSelector::Name(name) => self.resolve_name(name),
        }
    }

    /// Resolve a numeric bus id
    pub fn resolve_index(&self, index: i32) -> Result<BusHandle, ResolutionError> {
        let origin = BusOrigin::Index(index);

        if index == BusId::SOFT_INDEX && self.profile.soft_i2c {
            return Ok(BusHandle::soft(origin));
        }

        u8::try_from(index)
            .ok()
            .and_then(|id| self.profile.find_bus(id))
            .map(|bus| BusHandle::hardware(bus, origin))
            .ok_or(ResolutionError::InvalidBusSelector(
                SelectorFault::UnknownIndex(index),
            ))
    }

    /// Resolve a symbolic bus name (case-sensitive)
    pub fn resolve_name(&self, name: &str) -> Result<BusHandle, ResolutionError> {
        self.profile
            .find_bus_by_name(name)
            .and_then(|bus| {
                let origin = BusOrigin::Name(bus.name.clone()?);
                Some(BusHandle::hardware(bus, origin))
            })
            .ok_or(ResolutionError::InvalidBusSelector(
                SelectorFault::UnknownName,
            ))
    }

    /// Every bus on the board, software bus first
    pub fn buses(&self) -> impl Iterator<Item = BusHandle> + 'p {
        let profile = self.profile;
        let soft = profile
            .soft_i2c
            .then(|| BusHandle::soft(BusOrigin::Index(BusId::SOFT_INDEX)));

        soft.into_iter().chain(
            profile
                .buses
                .iter()
                .map(|bus| BusHandle::hardware(bus, BusOrigin::Index(bus.id as i32))),
        )
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use proptest::prelude::*;
    use std::string::ToString;
    use std::vec::Vec;

    fn hydrabus() -> BoardProfile {
        BoardProfile::hydrabus()
    }

    #[test]
    fn test_probe_sequence() {
        let profile = hydrabus();
        let resolver = BusResolver::new(&profile);

        assert!(resolver.resolve(-1).unwrap().is_soft());
        assert_eq!(
            resolver.resolve(0),
            Err(ResolutionError::InvalidBusSelector(SelectorFault::UnknownIndex(0)))
        );
        for id in 1..=3 {
            let bus = resolver.resolve(id).unwrap();
            assert_eq!(bus.id(), BusId::Hw(id as u8));
            assert_eq!(*bus.origin(), BusSelector::Index(id));
        }
        assert_eq!(
            resolver.resolve("Z"),
            Err(ResolutionError::InvalidBusSelector(SelectorFault::UnknownName))
        );
    }

    #[test]
    fn test_unknown_index() {
        let profile = hydrabus();
        let resolver = BusResolver::new(&profile);

        let err = resolver.resolve(99).unwrap_err();
        assert!(err.is_bus());
        assert!(resolver.resolve(-2).is_err());
        assert!(resolver.resolve(i32::MIN).is_err());
        assert!(resolver.resolve(256 + 1).is_err());
    }

    #[test]
    fn test_resolve_by_name() {
        let profile = hydrabus();
        let resolver = BusResolver::new(&profile);

        let x = resolver.resolve("X").unwrap();
        assert_eq!(x.id(), BusId::Hw(1));
        assert_eq!(*x.origin(), BusSelector::Name("X"));
        assert_ne!(*x.origin(), BusSelector::Index(1));

        let y = resolver.resolve(BusSelector::Name("Y")).unwrap();
        assert_eq!(y.id(), BusId::Hw(2));

        // Case-sensitive
        assert!(resolver.resolve("x").is_err());
        assert!(resolver.resolve("").is_err());
        assert!(resolver.resolve("XX").is_err());
    }

    #[test]
    fn test_soft_bus_disabled() {
        let mut profile = hydrabus();
        profile.soft_i2c = false;
        let resolver = BusResolver::new(&profile);

        assert_eq!(
            resolver.resolve(-1),
            Err(ResolutionError::InvalidBusSelector(SelectorFault::UnknownIndex(-1)))
        );
        assert_eq!(resolver.buses().count(), 3);
    }

    #[test]
    fn test_handle_carries_config() {
        let mut profile = hydrabus();
        profile.buses[0].i2c = I2cConfig::STANDARD;
        let resolver = BusResolver::new(&profile);

        assert_eq!(resolver.resolve(1).unwrap().config(), I2cConfig::STANDARD);
        assert_eq!(resolver.resolve("X").unwrap().config(), I2cConfig::STANDARD);
        assert_eq!(resolver.resolve(2).unwrap().config(), I2cConfig::FAST);
    }

    #[test]
    fn test_enumerate_buses() {
        let profile = hydrabus();
        let resolver = BusResolver::new(&profile);

        let ids: Vec<i32> = resolver.buses().map(|b| b.id().index()).collect();
        assert_eq!(ids, [-1, 1, 2, 3]);

        // Every enumerated bus resolves back to itself
        for bus in resolver.buses() {
            assert_eq!(resolver.resolve(bus.id().index()), Ok(bus));
        }
    }

    #[test]
    fn test_display() {
        let profile = hydrabus();
        let resolver = BusResolver::new(&profile);

        assert_eq!(resolver.resolve(-1).unwrap().to_string(), "I2C(-1)");
        assert_eq!(resolver.resolve("Y").unwrap().to_string(), "I2C(2)");
    }

    proptest! {
        #[test]
        fn prop_only_profile_indices_resolve(index in any::<i32>()) {
            let profile = hydrabus();
            let resolver = BusResolver::new(&profile);
            let supported = [-1, 1, 2, 3].contains(&index);

            match resolver.resolve(index) {
                Ok(bus) => {
                    prop_assert!(supported);
                    prop_assert_eq!(bus.id().index(), index);
                    prop_assert_eq!(bus.origin(), &BusOrigin::Index(index));
                }
                Err(err) => {
                    prop_assert!(!supported);
                    prop_assert_eq!(
                        err,
                        ResolutionError::InvalidBusSelector(SelectorFault::UnknownIndex(index))
                    );
                }
            }
        }

        #[test]
        fn prop_only_profile_names_resolve(name in "[A-Za-z]{0,5}") {
            let profile = hydrabus();
            let resolver = BusResolver::new(&profile);
            let supported = name == "X" || name == "Y";

            prop_assert_eq!(resolver.resolve(name.as_str()).is_ok(), supported);
        }
    }
}
