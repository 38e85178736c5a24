//! Motor module for stepper-axis.
//!
//! Provides the single-axis driver, its builder and exact position tracking.

mod axis;
mod builder;
mod position;
pub mod state;

pub use axis::{Axis, ENABLE_SETTLE_US, PULSE_WIDTH_US};
pub use builder::AxisBuilder;
pub use position::{Position, UNITS_PER_STEP};
pub use state::AxisState;
