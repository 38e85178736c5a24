//! Configuration validation.

use crate::error::{ConfigError, Error, Result};

use super::{AxisConfig, SystemConfig};

/// Validate a system configuration.
///
/// Checks:
/// - Steps per revolution is non-zero
/// - Initial speeds are finite and non-negative
/// - At most one form of initial speed is given
pub fn validate_config(config: &SystemConfig) -> Result<()> {
    for (_, axis) in config.axes.iter() {
        validate_axis(axis)?;
    }

    Ok(())
}

/// Validate a single axis configuration.
pub fn validate_axis(config: &AxisConfig) -> Result<()> {
    if config.steps_per_revolution == 0 {
        return Err(Error::Config(ConfigError::InvalidStepsPerRevolution(
            config.steps_per_revolution,
        )));
    }

    if config.initial_speed.is_some() && config.initial_rpm.is_some() {
        return Err(Error::Config(ConfigError::ConflictingSpeeds));
    }

    let speed = config
        .initial_speed
        .map(|s| s.value())
        .or(config.initial_rpm.map(|r| r.value()));

    if let Some(v) = speed {
        if !v.is_finite() || v < 0.0 {
            return Err(Error::Config(ConfigError::InvalidSpeed(v)));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::units::{Rpm, StepsPerSec};

    #[test]
    fn test_zero_steps_per_revolution() {
        let mut config = AxisConfig::new("test");
        config.steps_per_revolution = 0;

        let result = validate_axis(&config);
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidStepsPerRevolution(0)))
        ));
    }

    #[test]
    fn test_negative_speed() {
        let mut config = AxisConfig::new("test");
        config.initial_speed = Some(StepsPerSec(-5.0));

        assert!(matches!(
            validate_axis(&config),
            Err(Error::Config(ConfigError::InvalidSpeed(_)))
        ));
    }

    #[test]
    fn test_conflicting_speeds() {
        let mut config = AxisConfig::new("test");
        config.initial_speed = Some(StepsPerSec(100.0));
        config.initial_rpm = Some(Rpm(30.0));

        assert_eq!(
            validate_axis(&config),
            Err(Error::Config(ConfigError::ConflictingSpeeds))
        );
    }
}
