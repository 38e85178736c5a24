//! Rotation sense and its mapping onto the DIR line.

use crate::error::ValidationError;

/// Direction of motor rotation.
///
/// Counter-clockwise is the positive sense: CCW pulses increase the logical
/// position and positive step counts move CCW.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Clockwise (negative step count).
    Clockwise,
    /// Counter-clockwise (positive step count).
    CounterClockwise,
}

impl Direction {
    /// Get direction from signed step count.
    #[inline]
    pub fn from_steps(steps: i64) -> Self {
        if steps >= 0 {
            Direction::CounterClockwise
        } else {
            Direction::Clockwise
        }
    }

    /// Get the sign multiplier.
    #[inline]
    pub fn sign(self) -> i64 {
        match self {
            Direction::CounterClockwise => 1,
            Direction::Clockwise => -1,
        }
    }
}

/// Raw direction codes: 0 = CCW, 1 = CW.
impl TryFrom<u8> for Direction {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Direction::CounterClockwise),
            1 => Ok(Direction::Clockwise),
            other => Err(ValidationError::InvalidDirection(other)),
        }
    }
}

/// How an axis maps directions onto DIR line levels.
///
/// Two identical axes mounted facing each other use opposite polarities so
/// that the same logical direction moves both the same physical way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// CW drives DIR high, CCW drives it low.
    #[default]
    Normal,
    /// CW drives DIR low, CCW drives it high.
    Flipped,
}

impl Polarity {
    /// DIR line level (`true` = high) for `direction`.
    #[inline]
    pub fn level(self, direction: Direction) -> bool {
        let cw = direction == Direction::Clockwise;
        match self {
            Polarity::Normal => cw,
            Polarity::Flipped => !cw,
        }
    }

    /// The other polarity.
    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            Polarity::Normal => Polarity::Flipped,
            Polarity::Flipped => Polarity::Normal,
        }
    }
}
