//! # stepper-axis
//!
//! Single-axis step/direction stepper motion core with embedded-hal 1.0 support.
//!
//! ## Features
//!
//! - **Tick-based timing**: non-blocking [`Axis::step_tick`] or blocking [`Axis::move_steps`]
//! - **embedded-hal 1.0**: `OutputPin` for STEP/DIR/ENABLE/mode lines, `InputPin` for limit switches
//! - **Exact position tracking**: integer sub-step units, no drift at any microstep scale
//! - **Limit interlock**: any active limit line truncates the move and trips the axis
//! - **Per-axis polarity**: mirror-mounted axes flip their own direction mapping
//! - **no_std compatible**: core library works without standard library
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stepper_axis::{AxisBuilder, StdClock, StdDelay};
//!
//! let mut axis = AxisBuilder::new()
//!     .step_pin(step_pin)
//!     .dir_pin(dir_pin)
//!     .enable_pin(enable_pin)
//!     .clock(StdClock::new())
//!     .delay(StdDelay)
//!     .build()?;
//!
//! axis.set_speed(500.0);
//! axis.enable()?;
//! let report = axis.move_to_absolute(2000)?;
//! axis.disable()?;
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O, TOML parsing and the std clock/delay
//! - `alloc`: Enables heap allocation for no_std with allocator
//! - `defmt`: Enables defmt logging for embedded targets
//! - `log`: Enables logging through the `log` facade

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

#[cfg(feature = "alloc")]
extern crate alloc;

// Must come first so the logging macros are visible to the other modules.
#[macro_use]
mod fmt;

// Core modules
pub mod config;
pub mod error;
pub mod hal;
pub mod motion;
pub mod motor;
pub mod safety;

// Re-exports for ergonomic API
pub use config::{validate_config, AxisConfig, SystemConfig};
pub use error::{ConfigError, Error, OperationError, Result, ValidationError};
pub use hal::{MonotonicClock, NoPin};
pub use motion::{
    run_cooperative, Direction, MoveOutcome, MoveReport, Polarity, StepInterval, StepTick,
    TickOutcome,
};
pub use motor::{Axis, AxisBuilder, AxisState, Position};
pub use safety::LimitInterlock;

#[cfg(feature = "std")]
pub use hal::{StdClock, StdDelay};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};

// Unit types
pub use config::units::{Degrees, Microsteps, Rpm, StepsPerSec};
