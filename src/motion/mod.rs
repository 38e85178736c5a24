//! Motion module for stepper-axis.
//!
//! Provides step timing, direction handling and per-move execution state.

mod cooperative;
mod direction;
mod executor;
mod timing;

pub use cooperative::{run_cooperative, StepTick};
pub use direction::{Direction, Polarity};
pub use executor::{MoveExecutor, MoveOutcome, MoveReport, TickOutcome};
pub use timing::{StepInterval, MAX_WAIT_US};
