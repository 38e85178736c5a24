//! Limit-switch interlock.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;
use heapless::Vec;

use crate::error::{OperationError, Result, ValidationError};

/// Maximum number of sense lines one interlock watches.
pub const MAX_LIMIT_LINES: usize = 4;

/// Default delay after a trip before control returns, in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u32 = 50;

/// An ordered set of limit-switch inputs.
///
/// The interlock trips when any line reads high. It keeps no state between
/// polls; after a trip the caller applies [`LimitInterlock::debounce`] so the
/// switch contacts settle before anything reacts again.
#[derive(Debug)]
pub struct LimitInterlock<IN> {
    lines: Vec<IN, MAX_LIMIT_LINES>,
    debounce_ms: u32,
}

impl<IN> LimitInterlock<IN>
where
    IN: InputPin,
{
    /// Create an interlock over `lines`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::TooManyLimitLines` if more than
    /// [`MAX_LIMIT_LINES`] lines are given.
    pub fn new<I>(lines: I, debounce_ms: u32) -> Result<Self>
    where
        I: IntoIterator<Item = IN>,
    {
        let mut collected = Vec::new();
        for line in lines {
            collected.push(line).map_err(|_| ValidationError::TooManyLimitLines {
                max: MAX_LIMIT_LINES,
            })?;
        }

        Ok(Self {
            lines: collected,
            debounce_ms,
        })
    }

    /// An interlock with no lines; it never trips.
    pub fn none() -> Self {
        Self {
            lines: Vec::new(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }

    /// Read every line and report whether any is active.
    ///
    /// An empty interlock always reports `false`.
    pub fn poll(&mut self) -> Result<bool> {
        for line in self.lines.iter_mut() {
            if line.is_high().map_err(|_| OperationError::PinError)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Block for the debounce duration.
    pub fn debounce<D: DelayNs>(&self, delay: &mut D) {
        if self.debounce_ms > 0 {
            delay.delay_ms(self.debounce_ms);
        }
    }

    /// Debounce duration in milliseconds.
    #[inline]
    pub fn debounce_ms(&self) -> u32 {
        self.debounce_ms
    }

    /// Change the debounce duration.
    #[inline]
    pub fn set_debounce_ms(&mut self, debounce_ms: u32) {
        self.debounce_ms = debounce_ms;
    }

    /// Number of lines watched.
    #[inline]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether no lines are watched.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl<IN> Default for LimitInterlock<IN>
where
    IN: InputPin,
{
    fn default() -> Self {
        Self::none()
    }
}
