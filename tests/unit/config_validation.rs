//! Unit tests for configuration validation.

use stepper_axis::config::{parse_config, validate_config, AxisConfig, SystemConfig};
use stepper_axis::error::{ConfigError, Error};
use stepper_axis::{Rpm, StepsPerSec};

/// Test validation of a valid configuration.
#[test]
fn test_valid_config_passes_validation() {
    let toml_str = r#"
[axes.x]
name = "X"
step_mode = 8
initial_speed_steps_per_sec = 500.0
"#;

    let config = parse_config(toml_str).expect("Failed to parse TOML");
    assert!(validate_config(&config).is_ok());
}

/// Test that parsing runs validation.
#[test]
fn test_parse_rejects_conflicting_speeds() {
    let toml_str = r#"
[axes.x]
name = "X"
initial_speed_steps_per_sec = 500.0
initial_speed_rpm = 60.0
"#;

    assert_eq!(
        parse_config(toml_str).map(|_| ()),
        Err(Error::Config(ConfigError::ConflictingSpeeds))
    );
}

/// Test that zero steps per revolution is rejected.
#[test]
fn test_zero_steps_per_revolution_rejected() {
    let toml_str = r#"
[axes.x]
name = "X"
steps_per_revolution = 0
"#;

    assert_eq!(
        parse_config(toml_str).map(|_| ()),
        Err(Error::Config(ConfigError::InvalidStepsPerRevolution(0)))
    );
}

/// Test that negative speeds are rejected.
#[test]
fn test_negative_speed_rejected() {
    let mut axis = AxisConfig::new("x");
    axis.initial_rpm = Some(Rpm(-5.0));

    let mut config = SystemConfig::default();
    config
        .axes
        .insert(axis.name.clone(), axis)
        .expect("Axis table full");

    assert_eq!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidSpeed(-5.0)))
    );
}

/// Test that a zero initial speed is accepted (the axis simply has no speed).
#[test]
fn test_zero_speed_accepted() {
    let mut axis = AxisConfig::new("x");
    axis.initial_speed = Some(StepsPerSec(0.0));

    let mut config = SystemConfig::default();
    config
        .axes
        .insert(axis.name.clone(), axis)
        .expect("Axis table full");

    assert!(validate_config(&config).is_ok());
}
