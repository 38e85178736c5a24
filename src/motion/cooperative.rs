//! Cooperative driving of several axes from one thread.

use embedded_hal::delay::DelayNs;

use crate::error::{Error, OperationError, Result};

use super::executor::TickOutcome;
use super::timing::MAX_WAIT_US;

/// An axis that can be advanced one scheduling decision at a time.
///
/// Object safe, so axes with different pin types can share one driver loop.
pub trait StepTick {
    /// Perform at most one interlock poll and one pulse.
    fn step_tick(&mut self) -> Result<TickOutcome>;

    /// Whether a move is in progress.
    fn is_moving(&self) -> bool;

    /// Drive the enable line inactive and stop any move.
    fn disable(&mut self) -> Result<()>;
}

/// Tick every axis round-robin until none has a move in progress.
///
/// Between rounds the loop sleeps for the shortest wait any axis reported,
/// capped at [`MAX_WAIT_US`]. `abort` is checked once per round. When it
/// fires, or when any axis returns an error, every axis is disabled before
/// the error is returned.
pub fn run_cooperative<D, F>(axes: &mut [&mut dyn StepTick], delay: &mut D, mut abort: F) -> Result<()>
where
    D: DelayNs,
    F: FnMut() -> bool,
{
    loop {
        if abort() {
            warn!("cooperative run aborted");
            disable_all(axes);
            return Err(Error::Operation(OperationError::Aborted));
        }

        let mut any_moving = false;
        let mut wait_us = MAX_WAIT_US as u64;
        let mut failure = None;

        for axis in axes.iter_mut() {
            match axis.step_tick() {
                Ok(outcome) => {
                    any_moving |= outcome.is_moving();
                    if let TickOutcome::Waiting { due_in_us } = outcome {
                        wait_us = wait_us.min(due_in_us);
                    }
                }
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            }
        }

        if let Some(e) = failure {
            disable_all(axes);
            return Err(e);
        }

        if !any_moving {
            return Ok(());
        }

        if wait_us > 0 {
            delay.delay_us(wait_us as u32);
        }
    }
}

fn disable_all(axes: &mut [&mut dyn StepTick]) {
    for axis in axes.iter_mut() {
        let _ = axis.disable();
    }
}
