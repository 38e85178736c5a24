//! Unit types for physical quantities.
//!
//! Provides type-safe representations of speeds, angles and the microstep
//! divisor to prevent unit confusion at compile time.

use serde::Deserialize;

use crate::error::ConfigError;

/// Step rate in steps per second.
///
/// Only the magnitude matters for timing; the sign never implies a direction.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[serde(transparent)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepsPerSec(pub f32);

impl StepsPerSec {
    /// Create a new StepsPerSec value.
    #[inline]
    pub const fn new(value: f32) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> f32 {
        self.0
    }
}

/// Rotational speed in revolutions per minute.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[serde(transparent)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rpm(pub f32);

impl Rpm {
    /// Create a new Rpm value.
    #[inline]
    pub const fn new(value: f32) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> f32 {
        self.0
    }
}

/// Angular position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Degrees(pub f32);

impl Degrees {
    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> f32 {
        self.0
    }
}

/// Microstep divisor (1, 2, 4, 8, 16, 32).
///
/// Validated at construction to be one of the modes the driver's three mode
/// lines can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Microsteps(u16);

impl Microsteps {
    /// Full step (no microstepping).
    pub const FULL: Self = Self(1);
    /// Half step.
    pub const HALF: Self = Self(2);
    /// Quarter step.
    pub const QUARTER: Self = Self(4);
    /// Eighth step.
    pub const EIGHTH: Self = Self(8);
    /// Sixteenth step.
    pub const SIXTEENTH: Self = Self(16);
    /// Thirty-second step (maximum resolution).
    pub const THIRTY_SECOND: Self = Self(32);

    /// Finest supported divisor.
    pub const MAX: u16 = 32;

    /// Valid microstep values with their (M0, M1, M2) line levels.
    const TABLE: [(u16, [bool; 3]); 6] = [
        (1, [false, false, false]),
        (2, [true, false, false]),
        (4, [false, true, false]),
        (8, [true, true, false]),
        (16, [false, false, true]),
        (32, [true, false, true]),
    ];

    /// Create a new Microsteps value with validation.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidMicrosteps` if the value is not in the table.
    pub fn new(value: u16) -> Result<Self, ConfigError> {
        if Self::is_valid(value) {
            Ok(Self(value))
        } else {
            Err(ConfigError::InvalidMicrosteps(value))
        }
    }

    /// Get the raw divisor value.
    #[inline]
    pub const fn value(self) -> u16 {
        self.0
    }

    /// Check if a value is valid.
    #[inline]
    pub fn is_valid(value: u16) -> bool {
        Self::TABLE.iter().any(|(v, _)| *v == value)
    }

    /// Levels for the M0, M1 and M2 mode lines selecting this divisor.
    pub fn mode_lines(self) -> [bool; 3] {
        Self::TABLE
            .iter()
            .find(|(v, _)| *v == self.0)
            .map(|(_, lines)| *lines)
            .unwrap_or([false; 3])
    }

    /// Sub-step units covered by one physical pulse at this divisor.
    ///
    /// Positions are tracked in 1/32-step units, so this is always exact.
    #[inline]
    pub const fn units_per_pulse(self) -> i64 {
        (Self::MAX / self.0) as i64
    }
}

impl Default for Microsteps {
    fn default() -> Self {
        Self::FULL
    }
}

impl TryFrom<u16> for Microsteps {
    type Error = ConfigError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for Microsteps {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use core::fmt::Write;
        let value = u16::deserialize(deserializer)?;
        Microsteps::new(value).map_err(|e| {
            let mut buf = heapless::String::<128>::new();
            let _ = write!(buf, "{}", e);
            serde::de::Error::custom(buf.as_str())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_microsteps_valid_values() {
        for &(v, _) in &Microsteps::TABLE {
            assert!(Microsteps::new(v).is_ok());
        }
    }

    #[test]
    fn test_microsteps_invalid_values() {
        assert!(Microsteps::new(0).is_err());
        assert!(Microsteps::new(3).is_err());
        assert!(Microsteps::new(17).is_err());
        assert!(Microsteps::new(64).is_err());
        assert!(Microsteps::new(256).is_err());
    }

    #[test]
    fn test_mode_line_table() {
        assert_eq!(Microsteps::FULL.mode_lines(), [false, false, false]);
        assert_eq!(Microsteps::HALF.mode_lines(), [true, false, false]);
        assert_eq!(Microsteps::QUARTER.mode_lines(), [false, true, false]);
        assert_eq!(Microsteps::EIGHTH.mode_lines(), [true, true, false]);
        assert_eq!(Microsteps::SIXTEENTH.mode_lines(), [false, false, true]);
        assert_eq!(Microsteps::THIRTY_SECOND.mode_lines(), [true, false, true]);
    }

    #[test]
    fn test_units_per_pulse() {
        assert_eq!(Microsteps::FULL.units_per_pulse(), 32);
        assert_eq!(Microsteps::EIGHTH.units_per_pulse(), 4);
        assert_eq!(Microsteps::THIRTY_SECOND.units_per_pulse(), 1);
    }
}
