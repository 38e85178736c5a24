//! Collaborator contracts beyond embedded-hal.
//!
//! Lines come from `embedded_hal::digital` and sleeping from
//! `embedded_hal::delay::DelayNs`; this module adds the monotonic time source
//! the scheduler reads, a placeholder for unwired optional lines, and std
//! implementations for hosted targets.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

/// Something which reports monotonically non-decreasing time.
///
/// The reference point (device startup, process start) is clock specific; only
/// differences between readings are used.
pub trait MonotonicClock {
    /// Microseconds elapsed since the clock's reference point.
    fn now_us(&self) -> u64;
}

impl<F> MonotonicClock for F
where
    F: Fn() -> u64,
{
    fn now_us(&self) -> u64 {
        self()
    }
}

/// Placeholder for a line that is not wired.
///
/// Writes are discarded and reads always report low, so an unwired limit line
/// never trips.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoPin;

impl ErrorType for NoPin {
    type Error = Infallible;
}

impl OutputPin for NoPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl InputPin for NoPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(false)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(true)
    }
}

/// A monotonic clock backed by the operating system.
#[cfg(feature = "std")]
#[derive(Debug, Clone, PartialEq)]
pub struct StdClock {
    created_at: std::time::Instant,
}

#[cfg(feature = "std")]
impl StdClock {
    /// Create a clock whose reference point is now.
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(feature = "std")]
impl Default for StdClock {
    fn default() -> Self {
        Self {
            created_at: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl MonotonicClock for StdClock {
    fn now_us(&self) -> u64 {
        self.created_at.elapsed().as_micros() as u64
    }
}

/// Delay provider that sleeps the current thread.
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy, Default)]
pub struct StdDelay;

#[cfg(feature = "std")]
impl embedded_hal::delay::DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(ns as u64));
    }
}
