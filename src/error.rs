//! Error types for stepper-axis.
//!
//! Errors are grouped by when they are detected: argument validation, missing or
//! invalid configuration, and operations the axis cannot perform in its current
//! state. A limit-switch trip is not an error; it is reported as a move outcome.

use core::fmt;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all stepper-axis operations.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// An argument was rejected before any line was touched
    Validation(ValidationError),
    /// Configuration parsing, validation or missing setup
    Config(ConfigError),
    /// The axis cannot perform the operation right now
    Operation(OperationError),
}

/// Argument validation errors.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ValidationError {
    /// Direction value is not 0 (CCW) or 1 (CW)
    InvalidDirection(u8),
    /// More interlock lines than the interlock can hold
    TooManyLimitLines {
        /// Interlock capacity
        max: usize,
    },
    /// A pinned-direction move was given a negative step count
    NegativeStepCount(i64),
    /// Requested move does not fit the position range
    StepCountOutOfRange(i64),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// No speed configured, or speed set to zero
    SpeedNotSet,
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Invalid microstep value (must be 1, 2, 4, 8, 16 or 32)
    InvalidMicrosteps(u16),
    /// Axis name not found in configuration
    AxisNotFound(heapless::String<32>),
    /// Steps per revolution must be > 0
    InvalidStepsPerRevolution(u16),
    /// Initial speed must be finite and >= 0
    InvalidSpeed(f32),
    /// Both a steps/second and an RPM initial speed were given
    ConflictingSpeeds,
    /// A required builder component was not provided
    MissingComponent(&'static str),
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Operation errors.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OperationError {
    /// Motion requested while the axis is disabled
    Disabled,
    /// A step was requested before any direction was set
    DirectionNotSet,
    /// Motion requested while the interlock trip is still latched
    Tripped,
    /// Motion requested while another move is in progress
    Busy,
    /// The blocking loop was interrupted by its abort check
    Aborted,
    /// GPIO pin operation failed
    PinError,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Validation(e) => write!(f, "Validation error: {}", e),
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Operation(e) => write!(f, "Operation error: {}", e),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidDirection(v) => {
                write!(f, "Invalid direction: {}. Valid values: 0 (CCW), 1 (CW)", v)
            }
            ValidationError::TooManyLimitLines { max } => {
                write!(f, "Too many limit lines (max {})", max)
            }
            ValidationError::NegativeStepCount(n) => {
                write!(f, "Step count {} is negative", n)
            }
            ValidationError::StepCountOutOfRange(n) => {
                write!(f, "Step count {} is out of range", n)
            }
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::SpeedNotSet => write!(f, "Speed not set (or set to zero)"),
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::InvalidMicrosteps(v) => {
                write!(f, "Invalid microsteps: {}. Valid values: 1, 2, 4, 8, 16, 32", v)
            }
            ConfigError::AxisNotFound(name) => write!(f, "Axis '{}' not found", name),
            ConfigError::InvalidStepsPerRevolution(v) => {
                write!(f, "Invalid steps per revolution: {}. Must be > 0", v)
            }
            ConfigError::InvalidSpeed(v) => {
                write!(f, "Invalid speed: {}. Must be finite and >= 0", v)
            }
            ConfigError::ConflictingSpeeds => {
                write!(f, "Only one of initial_speed_steps_per_sec and initial_speed_rpm may be set")
            }
            ConfigError::MissingComponent(what) => write!(f, "{} is required", what),
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for OperationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationError::Disabled => write!(f, "Axis is disabled"),
            OperationError::DirectionNotSet => write!(f, "Direction not set"),
            OperationError::Tripped => write!(f, "Limit interlock tripped; clear the trip first"),
            OperationError::Busy => write!(f, "A move is already in progress"),
            OperationError::Aborted => write!(f, "Move aborted"),
            OperationError::PinError => write!(f, "GPIO pin operation failed"),
        }
    }
}

// Conversion impls
impl From<ValidationError> for Error {
    fn from(e: ValidationError) -> Self {
        Error::Validation(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<OperationError> for Error {
    fn from(e: OperationError) -> Self {
        Error::Operation(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ValidationError {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for OperationError {}
