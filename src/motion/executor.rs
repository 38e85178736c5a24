//! Move execution state - pulse bookkeeping for one move.

use super::direction::Direction;

/// Result of a single scheduler tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickOutcome {
    /// No move in progress.
    Idle,
    /// Axis is disabled; nothing was done.
    Disabled,
    /// Interlock is latched; nothing was done, or it tripped on this tick.
    Tripped,
    /// Interlock clear, next pulse not yet due.
    Waiting {
        /// Microseconds until the next pulse is due.
        due_in_us: u64,
    },
    /// One pulse was emitted and more remain.
    Stepped,
    /// The final pulse of the move was emitted.
    Completed,
}

impl TickOutcome {
    /// Whether the axis still has a move in progress after this tick.
    #[inline]
    pub fn is_moving(self) -> bool {
        matches!(self, TickOutcome::Waiting { .. } | TickOutcome::Stepped)
    }
}

/// How a move ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MoveOutcome {
    /// Every requested pulse was emitted.
    Completed,
    /// The interlock stopped the move early.
    Tripped,
    /// The axis was disabled before the move finished.
    Aborted,
}

/// Summary of a finished (or truncated) move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MoveReport {
    /// Pulses the move asked for.
    pub requested: u64,
    /// Pulses actually emitted.
    pub completed: u64,
    /// Pulses not emitted (non-zero only after a trip or abort).
    pub remaining: u64,
    /// How the move ended.
    pub outcome: MoveOutcome,
}

impl MoveReport {
    /// Report for a request that needed no pulses.
    pub const fn empty() -> Self {
        Self {
            requested: 0,
            completed: 0,
            remaining: 0,
            outcome: MoveOutcome::Completed,
        }
    }

    /// Whether the interlock truncated the move.
    #[inline]
    pub fn tripped(&self) -> bool {
        self.outcome == MoveOutcome::Tripped
    }
}

/// Runtime state of one move.
#[derive(Debug, Clone)]
pub struct MoveExecutor {
    /// Direction every pulse of this move uses.
    direction: Direction,

    /// Total pulses requested.
    requested: u64,

    /// Pulses emitted so far.
    completed: u64,

    /// Clock reading of the last pulse (or of the move start).
    last_step_us: u64,
}

impl MoveExecutor {
    /// Create an executor for `pulses` pulses starting at `now_us`.
    ///
    /// The first pulse becomes due one interval after `now_us`.
    pub fn new(direction: Direction, pulses: u64, now_us: u64) -> Self {
        Self {
            direction,
            requested: pulses,
            completed: 0,
            last_step_us: now_us,
        }
    }

    /// Direction of this move.
    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Check if every pulse has been emitted.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.completed >= self.requested
    }

    /// Pulses emitted so far.
    #[inline]
    pub fn completed(&self) -> u64 {
        self.completed
    }

    /// Pulses still to emit.
    #[inline]
    pub fn remaining(&self) -> u64 {
        self.requested.saturating_sub(self.completed)
    }

    /// Microseconds since the last pulse.
    #[inline]
    pub fn elapsed(&self, now_us: u64) -> u64 {
        now_us.wrapping_sub(self.last_step_us)
    }

    /// Record a pulse emitted at `now_us`.
    pub fn record_step(&mut self, now_us: u64) {
        self.completed += 1;
        self.last_step_us = now_us;
    }

    /// Summarize the move with the given outcome.
    pub fn report(&self, outcome: MoveOutcome) -> MoveReport {
        MoveReport {
            requested: self.requested,
            completed: self.completed,
            remaining: self.remaining(),
            outcome,
        }
    }
}
