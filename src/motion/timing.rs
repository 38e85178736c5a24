//! Speed to step-interval conversion.

use libm::{fabs, round};

use crate::config::units::{Rpm, StepsPerSec};

const MICROS_PER_SEC: f64 = 1_000_000.0;

/// Longest a blocking loop sleeps before polling the interlock again, in microseconds.
pub const MAX_WAIT_US: u32 = 1_000;

/// Time between consecutive step pulses, in microseconds.
///
/// Zero means no usable speed is configured; moves are refused until a
/// non-zero speed is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepInterval(u32);

impl StepInterval {
    /// No speed configured.
    pub const UNSET: Self = Self(0);

    /// Create an interval from a raw microsecond count.
    #[inline]
    pub const fn from_micros(us: u32) -> Self {
        Self(us)
    }

    /// Interval for a step rate: `round(1e6 / |v|)`.
    ///
    /// Zero or non-finite rates give [`StepInterval::UNSET`].
    pub fn from_speed(speed: StepsPerSec) -> Self {
        let v = fabs(speed.value() as f64);
        if v == 0.0 || !v.is_finite() {
            return Self::UNSET;
        }
        Self::saturating(round(MICROS_PER_SEC / v))
    }

    /// Interval for a rotational speed: `round(60e6 / (steps_per_revolution * |rpm|))`.
    pub fn from_rpm(rpm: Rpm, steps_per_revolution: u16) -> Self {
        let denominator = steps_per_revolution as f64 * fabs(rpm.value() as f64);
        if denominator == 0.0 || !denominator.is_finite() {
            return Self::UNSET;
        }
        Self::saturating(round(60.0 * MICROS_PER_SEC / denominator))
    }

    fn saturating(us: f64) -> Self {
        if us >= u32::MAX as f64 {
            Self(u32::MAX)
        } else {
            Self(us as u32)
        }
    }

    /// Interval in microseconds.
    #[inline]
    pub const fn micros(self) -> u32 {
        self.0
    }

    /// Whether a usable speed is configured.
    #[inline]
    pub const fn is_set(self) -> bool {
        self.0 > 0
    }

    /// Step rate this interval corresponds to.
    pub fn speed(self) -> Option<StepsPerSec> {
        if self.is_set() {
            Some(StepsPerSec((MICROS_PER_SEC / self.0 as f64) as f32))
        } else {
            None
        }
    }

    /// Whether `elapsed_us` since the last pulse is enough for the next one.
    #[inline]
    pub fn is_due(self, elapsed_us: u64) -> bool {
        elapsed_us >= self.0 as u64
    }

    /// Microseconds left before the next pulse is due.
    #[inline]
    pub fn remaining(self, elapsed_us: u64) -> u64 {
        (self.0 as u64).saturating_sub(elapsed_us)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_from_speed() {
        assert_eq!(StepInterval::from_speed(StepsPerSec(500.0)).micros(), 2000);
        assert_eq!(StepInterval::from_speed(StepsPerSec(300.0)).micros(), 3333);
        assert_eq!(StepInterval::from_speed(StepsPerSec(3.0)).micros(), 333_333);
    }

    #[test]
    fn test_sign_is_ignored() {
        assert_eq!(
            StepInterval::from_speed(StepsPerSec(-500.0)),
            StepInterval::from_speed(StepsPerSec(500.0))
        );
    }

    #[test]
    fn test_zero_and_non_finite_are_unset() {
        assert_eq!(StepInterval::from_speed(StepsPerSec(0.0)), StepInterval::UNSET);
        assert_eq!(StepInterval::from_speed(StepsPerSec(f32::NAN)), StepInterval::UNSET);
        assert!(!StepInterval::from_speed(StepsPerSec(f32::INFINITY)).is_set());
    }

    #[test]
    fn test_interval_from_rpm() {
        // 60 RPM on a 200 step motor = 200 steps/s = 5000 us
        assert_eq!(StepInterval::from_rpm(Rpm(60.0), 200).micros(), 5000);
        assert_eq!(StepInterval::from_rpm(Rpm(0.0), 200), StepInterval::UNSET);
        assert_eq!(StepInterval::from_rpm(Rpm(60.0), 0), StepInterval::UNSET);
    }

    #[test]
    fn test_very_slow_speed_saturates() {
        assert_eq!(StepInterval::from_speed(StepsPerSec(1e-9)).micros(), u32::MAX);
    }

    #[test]
    fn test_due() {
        let interval = StepInterval::from_micros(2000);
        assert!(!interval.is_due(1999));
        assert!(interval.is_due(2000));
        assert_eq!(interval.remaining(500), 1500);
        assert_eq!(interval.remaining(5000), 0);
    }
}
