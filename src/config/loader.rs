//! Configuration loading from files (std only).

use std::fs;
use std::path::Path;

use crate::error::{ConfigError, Error, Result};

use super::SystemConfig;

/// Read, parse and validate an axis configuration file.
///
/// ```rust,ignore
/// let config = stepper_axis::load_config("axes.toml")?;
/// let x = config.axis("x");
/// ```
///
/// # Errors
///
/// `ConfigError::IoError` if the file cannot be read, otherwise as
/// [`parse_config`].
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SystemConfig> {
    let content = fs::read_to_string(path.as_ref())
        .map_err(|e| Error::Config(ConfigError::IoError(truncated(&e.to_string()))))?;

    parse_config(&content)
}

/// Parse and validate an axis configuration from TOML text.
///
/// # Errors
///
/// `ConfigError::ParseError` for malformed TOML or unsupported values (such as
/// a step mode outside 1..=32 powers of two), or the first validation error.
pub fn parse_config(content: &str) -> Result<SystemConfig> {
    let config: SystemConfig = toml::from_str(content)
        .map_err(|e| Error::Config(ConfigError::ParseError(truncated(e.message()))))?;

    super::validate_config(&config)?;
    Ok(config)
}

/// Copy as much of `text` as fits, cutting on a character boundary.
fn truncated<const N: usize>(text: &str) -> heapless::String<N> {
    let mut out = heapless::String::new();
    for c in text.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::units::Microsteps;

    #[test]
    fn test_parse_minimal_config() {
        let toml = r#"
[axes.x]
name = "X"
"#;

        let config = parse_config(toml).unwrap();
        let axis = config.axis("x").unwrap();
        assert_eq!(axis.step_mode, Microsteps::FULL);
        assert_eq!(axis.steps_per_revolution, 200);
    }

    #[test]
    fn test_parse_full_axis() {
        let toml = r#"
[axes.z]
name = "Z"
step_mode = 8
steps_per_revolution = 400
initial_speed_rpm = 30.0
flip_polarity = true
debounce_ms = 20
"#;

        let config = parse_config(toml).unwrap();
        let axis = config.axis("z").unwrap();
        assert_eq!(axis.step_mode, Microsteps::EIGHTH);
        assert_eq!(axis.steps_per_revolution, 400);
        assert!(axis.flip_polarity);
        assert_eq!(axis.debounce_ms, 20);
        assert!((axis.initial_rpm.unwrap().value() - 30.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_parse_rejects_invalid_step_mode() {
        let toml = r#"
[axes.x]
name = "X"
step_mode = 3
"#;

        assert!(matches!(
            parse_config(toml),
            Err(Error::Config(ConfigError::ParseError(_)))
        ));
    }

    #[test]
    fn test_long_messages_truncated() {
        let long = "x".repeat(300);
        let msg: heapless::String<128> = truncated(&long);
        assert_eq!(msg.len(), 128);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            load_config("/nonexistent/axes.toml"),
            Err(Error::Config(ConfigError::IoError(_)))
        ));
    }
}
