//! Status indicator control
//!
//! The controller owns the physical outputs for all `N` indicators of a
//! board. Handles are plain values carrying only the ordinal, so every
//! handle to the same indicator reads and writes the same output.
//!
//! Intensity follows a binary state machine:
//!
//! ```text
//!            on() / toggle()
//!     ┌─────┐ ─────────────► ┌─────┐
//!     │  0  │                │ 255 │
//!     └─────┘ ◄───────────── └─────┘
//!            off() / toggle()
//! ```
//!
//! `set_intensity` can leave a dimmable output between the extremes.
//! `toggle` treats any nonzero level as on and turns it off.

use core::cell::RefCell;
use core::fmt;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use hydra_hal::{IntensityOutput, INTENSITY_MAX, INTENSITY_OFF};

use crate::error::ResolutionError;

/// A validated indicator of a board with `N` indicators
///
/// Obtained from [`IndicatorController::construct`]; the ordinal is
/// always in `1..=N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IndicatorHandle<const N: usize> {
    index: usize,
}

impl<const N: usize> IndicatorHandle<N> {
    /// 1-based ordinal
    pub fn ordinal(&self) -> usize {
        self.index + 1
    }
}

impl<const N: usize> fmt::Display for IndicatorHandle<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LED({})", self.ordinal())
    }
}

/// Owner of the board's indicator outputs
///
/// Every operation runs under the mutex `M`, so on/off/toggle/read calls
/// for the same indicator are serialized even across tasks.
pub struct IndicatorController<M: RawMutex, O, const N: usize> {
    outputs: Mutex<M, RefCell<[O; N]>>,
}

impl<M: RawMutex, O: IntensityOutput, const N: usize> IndicatorController<M, O, N> {
    /// Take ownership of the outputs; `outputs[0]` is ordinal 1
    pub const fn new(outputs: [O; N]) -> Self {
        Self {
            outputs: Mutex::new(RefCell::new(outputs)),
        }
    }

    /// Number of indicators on the board
    pub const fn count(&self) -> usize {
        N
    }

    /// Validate `ordinal` and return a handle to that indicator
    pub fn construct(&self, ordinal: i32) -> Result<IndicatorHandle<N>, ResolutionError> {
        usize::try_from(ordinal)
            .ok()
            .filter(|o| (1..=N).contains(o))
            .map(|o| IndicatorHandle { index: o - 1 })
            .ok_or(ResolutionError::InvalidIndex(ordinal))
    }

    /// Handles for every indicator, in ordinal order
    pub fn handles(&self) -> impl Iterator<Item = IndicatorHandle<N>> {
        (0..N).map(|index| IndicatorHandle { index })
    }

    /// Light the indicator fully
    pub fn on(&self, led: IndicatorHandle<N>) {
        self.with_output(led, |out| out.set_intensity(INTENSITY_MAX));
    }

    /// Turn the indicator off
    pub fn off(&self, led: IndicatorHandle<N>) {
        self.with_output(led, |out| out.set_intensity(INTENSITY_OFF));
    }

    /// Flip between off and fully on
    ///
    /// Off goes to 255; any nonzero level, including intermediate ones,
    /// goes to 0.
    pub fn toggle(&self, led: IndicatorHandle<N>) {
        self.with_output(led, |out| {
            let next = if out.intensity() == INTENSITY_OFF {
                INTENSITY_MAX
            } else {
                INTENSITY_OFF
            };
            out.set_intensity(next);
        });
    }

    /// Current physical intensity (0-255)
    pub fn intensity(&self, led: IndicatorHandle<N>) -> u8 {
        self.with_output(led, |out| out.intensity())
    }

    /// Drive the indicator to `level`
    ///
    /// Outputs that are not dimmable light fully for any nonzero level.
    pub fn set_intensity(&self, led: IndicatorHandle<N>, level: u8) {
        self.with_output(led, |out| out.set_intensity(level));
    }

    /// Whether the indicator can hold intermediate levels
    pub fn is_dimmable(&self, led: IndicatorHandle<N>) -> bool {
        self.with_output(led, |out| out.is_dimmable())
    }

    /// Check if the indicator is lit at any level
    pub fn is_on(&self, led: IndicatorHandle<N>) -> bool {
        self.intensity(led) != INTENSITY_OFF
    }

    /// Turn every indicator off
    pub fn all_off(&self) {
        self.outputs.lock(|outputs| {
            for out in outputs.borrow_mut().iter_mut() {
                out.set_intensity(INTENSITY_OFF);
            }
        });
    }

    fn with_output<U>(&self, led: IndicatorHandle<N>, f: impl FnOnce(&mut O) -> U) -> U {
        self.outputs
            .lock(|outputs| f(&mut outputs.borrow_mut()[led.index]))
    }
}
