//! Axis configuration from TOML.

use heapless::String;
use serde::Deserialize;

use super::units::{Microsteps, Rpm, StepsPerSec};
use crate::safety::DEFAULT_DEBOUNCE_MS;

/// Complete axis configuration from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct AxisConfig {
    /// Human-readable name (max 32 chars).
    pub name: String<32>,

    /// Microstep setting applied at construction (1, 2, 4, 8, 16 or 32).
    #[serde(default)]
    pub step_mode: Microsteps,

    /// Base steps per revolution (typically 200 for 1.8° motors).
    #[serde(default = "default_steps_per_revolution")]
    pub steps_per_revolution: u16,

    /// Speed configured at construction, in steps per second.
    #[serde(default, rename = "initial_speed_steps_per_sec")]
    pub initial_speed: Option<StepsPerSec>,

    /// Speed configured at construction, in RPM.
    #[serde(default, rename = "initial_speed_rpm")]
    pub initial_rpm: Option<Rpm>,

    /// Swap the CW/CCW direction line levels for this axis.
    #[serde(default)]
    pub flip_polarity: bool,

    /// Delay applied after an interlock trip, in milliseconds.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u32,
}

fn default_steps_per_revolution() -> u16 {
    200
}

fn default_debounce_ms() -> u32 {
    DEFAULT_DEBOUNCE_MS
}

impl AxisConfig {
    /// Create a configuration with defaults for everything but the name.
    pub fn new(name: &str) -> Self {
        Self {
            name: String::try_from(name).unwrap_or_default(),
            step_mode: Microsteps::FULL,
            steps_per_revolution: default_steps_per_revolution(),
            initial_speed: None,
            initial_rpm: None,
            flip_polarity: false,
            debounce_ms: default_debounce_ms(),
        }
    }

    /// Physical pulses per output revolution at the configured step mode.
    pub fn pulses_per_revolution(&self) -> u32 {
        self.steps_per_revolution as u32 * self.step_mode.value() as u32
    }
}
