//! Unit tests for TOML configuration parsing.

use stepper_axis::config::{load_config, parse_config, SystemConfig};
use stepper_axis::error::{ConfigError, Error};
use stepper_axis::{Microsteps, Rpm, StepsPerSec};

/// Test parsing a single fully specified axis.
#[test]
fn test_parse_axis_config() {
    let toml_str = r#"
[axes.pan]
name = "pan"
step_mode = 16
steps_per_revolution = 400
initial_speed_steps_per_sec = 800.0
flip_polarity = true
debounce_ms = 10
"#;

    let config = parse_config(toml_str).expect("Failed to parse TOML");
    let axis = config.axis("pan").expect("Axis not found");

    assert_eq!(axis.name.as_str(), "pan");
    assert_eq!(axis.step_mode, Microsteps::SIXTEENTH);
    assert_eq!(axis.steps_per_revolution, 400);
    assert_eq!(axis.initial_speed, Some(StepsPerSec(800.0)));
    assert_eq!(axis.initial_rpm, None);
    assert!(axis.flip_polarity);
    assert_eq!(axis.debounce_ms, 10);
    assert_eq!(axis.pulses_per_revolution(), 6400);
}

/// Test that omitted fields take their defaults.
#[test]
fn test_parse_defaults() {
    let toml_str = r#"
[axes.tilt]
name = "tilt"
"#;

    let config = parse_config(toml_str).expect("Failed to parse TOML");
    let axis = config.axis("tilt").expect("Axis not found");

    assert_eq!(axis.step_mode, Microsteps::FULL);
    assert_eq!(axis.steps_per_revolution, 200);
    assert!(axis.initial_speed.is_none());
    assert!(!axis.flip_polarity);
    assert_eq!(axis.debounce_ms, 50);
}

/// Test parsing several axes, keeping their file order.
#[test]
fn test_parse_multiple_axes() {
    let toml_str = r#"
[axes.x]
name = "X"
initial_speed_rpm = 60.0

[axes.y]
name = "Y"
step_mode = 4
"#;

    let config = parse_config(toml_str).expect("Failed to parse TOML");
    let names: Vec<&str> = config.axis_names().collect();

    assert_eq!(names, ["x", "y"]);
    assert_eq!(config.axis("x").unwrap().initial_rpm, Some(Rpm(60.0)));
    assert_eq!(config.axis("y").unwrap().step_mode, Microsteps::QUARTER);
}

/// Test that an empty document is a valid, empty system.
#[test]
fn test_parse_empty() {
    let config: SystemConfig = parse_config("").expect("Failed to parse TOML");
    assert_eq!(config.axis_names().count(), 0);
}

/// Test that unsupported step modes are rejected while parsing.
#[test]
fn test_invalid_step_mode_rejected() {
    let toml_str = r#"
[axes.x]
name = "X"
step_mode = 64
"#;

    assert!(matches!(
        parse_config(toml_str),
        Err(Error::Config(ConfigError::ParseError(_)))
    ));
}

/// Test loading configuration from a file.
#[test]
fn test_load_config_from_file() {
    let path = std::env::temp_dir().join(format!("stepper-axis-{}.toml", std::process::id()));
    std::fs::write(
        &path,
        r#"
[axes.z]
name = "Z"
step_mode = 2
"#,
    )
    .expect("Failed to write config");

    let config = load_config(&path).expect("Failed to load config");
    let _ = std::fs::remove_file(&path);

    assert_eq!(config.axis("z").unwrap().step_mode, Microsteps::HALF);
}
