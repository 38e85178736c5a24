//! Position tracking for stepper axes.
//!
//! Positions are counted in 1/32-step units, the finest divisor the driver
//! supports. One pulse at any divisor moves a whole number of units, so the
//! logical position never drifts no matter how many pulses are emitted.

use crate::config::units::{Degrees, Microsteps};
use crate::motion::Direction;

/// Sub-step units per full step.
pub const UNITS_PER_STEP: i64 = Microsteps::MAX as i64;

/// Exact logical position of an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Position {
    units: i64,
}

impl Position {
    /// The origin.
    pub const ZERO: Self = Self { units: 0 };

    /// Position at a whole number of steps.
    ///
    /// Returns `None` if the value does not fit the unit range.
    #[inline]
    pub fn from_steps(steps: i64) -> Option<Self> {
        steps.checked_mul(UNITS_PER_STEP).map(Self::from_units)
    }

    /// Position from raw 1/32-step units.
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Self { units }
    }

    /// Raw 1/32-step units.
    #[inline]
    pub const fn units(self) -> i64 {
        self.units
    }

    /// Whole steps, rounded toward negative infinity.
    #[inline]
    pub fn whole_steps(self) -> i64 {
        self.units.div_euclid(UNITS_PER_STEP)
    }

    /// Position in steps as a float, for display only.
    #[inline]
    pub fn as_f64(self) -> f64 {
        self.units as f64 / UNITS_PER_STEP as f64
    }

    /// Angle of this position on a motor with `steps_per_revolution` full steps.
    pub fn degrees(self, steps_per_revolution: u16) -> Degrees {
        if steps_per_revolution == 0 {
            return Degrees(0.0);
        }
        let units_per_rev = steps_per_revolution as f64 * UNITS_PER_STEP as f64;
        Degrees((self.units as f64 * 360.0 / units_per_rev) as f32)
    }

    /// Account for one pulse in `direction` at `microsteps`.
    #[inline]
    pub fn advance(&mut self, direction: Direction, microsteps: Microsteps) {
        self.units += direction.sign() * microsteps.units_per_pulse();
    }

    /// Position reached after `pulses` pulses (positive = CCW) at `microsteps`.
    pub fn offset_by(self, pulses: i64, microsteps: Microsteps) -> Option<Self> {
        pulses
            .checked_mul(microsteps.units_per_pulse())
            .and_then(|delta| self.units.checked_add(delta))
            .map(Self::from_units)
    }

    /// Signed pulses needed to reach `target` at `microsteps`.
    ///
    /// Truncates toward zero when the distance is not a whole number of
    /// pulses at this divisor, so the move never overshoots. Returns `None`
    /// if the distance does not fit the unit range.
    pub fn pulses_to(self, target: Position, microsteps: Microsteps) -> Option<i64> {
        target
            .units
            .checked_sub(self.units)
            .map(|delta| delta / microsteps.units_per_pulse())
    }
}
