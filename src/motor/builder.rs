//! Builder pattern for Axis.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::config::units::{Microsteps, Rpm, StepsPerSec};
use crate::config::{AxisConfig, SystemConfig};
use crate::error::{ConfigError, Error, OperationError, Result};
use crate::hal::{MonotonicClock, NoPin};
use crate::motion::Polarity;
use crate::safety::LimitInterlock;

use super::axis::Axis;

/// Speed applied when the axis is built.
#[derive(Debug, Clone, Copy, PartialEq)]
enum InitialSpeed {
    StepsPerSec(StepsPerSec),
    Rpm(Rpm),
}

/// Plain settings, carried unchanged across type-changing setters.
#[derive(Debug, Clone)]
struct Settings {
    name: Option<heapless::String<32>>,
    step_mode: Microsteps,
    steps_per_revolution: u16,
    speed: Option<InitialSpeed>,
    flip_polarity: bool,
    debounce_ms: Option<u32>,
    pending_error: Option<Error>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            name: None,
            step_mode: Microsteps::FULL,
            steps_per_revolution: 200,
            speed: None,
            flip_polarity: false,
            debounce_ms: None,
            pending_error: None,
        }
    }
}

/// Builder for creating [`Axis`] instances.
///
/// STEP, DIR, a clock and a delay provider are required. The enable line,
/// mode lines and limit lines are optional; setting one changes the builder's
/// type parameter from [`NoPin`] to the supplied pin type.
pub struct AxisBuilder<STEP, DIR, CLK, DELAY, EN = NoPin, MODE = NoPin, LIMIT = NoPin> {
    step_pin: Option<STEP>,
    dir_pin: Option<DIR>,
    clock: Option<CLK>,
    delay: Option<DELAY>,
    enable_pin: Option<EN>,
    mode_pins: [Option<MODE>; 3],
    interlock: Option<LimitInterlock<LIMIT>>,
    settings: Settings,
}

impl<STEP, DIR, CLK, DELAY> Default for AxisBuilder<STEP, DIR, CLK, DELAY> {
    fn default() -> Self {
        Self::new()
    }
}

impl<STEP, DIR, CLK, DELAY> AxisBuilder<STEP, DIR, CLK, DELAY> {
    /// Create a new builder with no optional lines wired.
    pub fn new() -> Self {
        Self {
            step_pin: None,
            dir_pin: None,
            clock: None,
            delay: None,
            enable_pin: None,
            mode_pins: [None, None, None],
            interlock: None,
            settings: Settings::default(),
        }
    }
}

impl<STEP, DIR, CLK, DELAY, EN, MODE, LIMIT> AxisBuilder<STEP, DIR, CLK, DELAY, EN, MODE, LIMIT> {
    /// Set the STEP pin.
    pub fn step_pin(mut self, pin: STEP) -> Self {
        self.step_pin = Some(pin);
        self
    }

    /// Set the DIR pin.
    pub fn dir_pin(mut self, pin: DIR) -> Self {
        self.dir_pin = Some(pin);
        self
    }

    /// Set the monotonic clock.
    pub fn clock(mut self, clock: CLK) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Set the delay provider.
    pub fn delay(mut self, delay: DELAY) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Set the axis name.
    pub fn name(mut self, name: &str) -> Self {
        self.settings.name = heapless::String::try_from(name).ok();
        self
    }

    /// Set the initial microstep divisor.
    pub fn step_mode(mut self, step_mode: Microsteps) -> Self {
        self.settings.step_mode = step_mode;
        self
    }

    /// Set full steps per revolution.
    pub fn steps_per_revolution(mut self, steps: u16) -> Self {
        self.settings.steps_per_revolution = steps;
        self
    }

    /// Set the initial speed in steps per second.
    pub fn initial_speed(mut self, speed: StepsPerSec) -> Self {
        self.settings.speed = Some(InitialSpeed::StepsPerSec(speed));
        self
    }

    /// Set the initial speed in revolutions per minute.
    pub fn initial_speed_rpm(mut self, rpm: Rpm) -> Self {
        self.settings.speed = Some(InitialSpeed::Rpm(rpm));
        self
    }

    /// Swap this axis's CW/CCW line levels.
    pub fn flip_polarity(mut self, flip: bool) -> Self {
        self.settings.flip_polarity = flip;
        self
    }

    /// Set the interlock debounce in milliseconds.
    pub fn debounce_ms(mut self, debounce_ms: u32) -> Self {
        self.settings.debounce_ms = Some(debounce_ms);
        self
    }

    /// Set the active-low ENABLE pin.
    pub fn enable_pin<E>(self, pin: E) -> AxisBuilder<STEP, DIR, CLK, DELAY, E, MODE, LIMIT> {
        AxisBuilder {
            step_pin: self.step_pin,
            dir_pin: self.dir_pin,
            clock: self.clock,
            delay: self.delay,
            enable_pin: Some(pin),
            mode_pins: self.mode_pins,
            interlock: self.interlock,
            settings: self.settings,
        }
    }

    /// Set the M0, M1, M2 mode pins. Unwired lines are passed as `None`.
    pub fn mode_pins<M>(
        self,
        m0: Option<M>,
        m1: Option<M>,
        m2: Option<M>,
    ) -> AxisBuilder<STEP, DIR, CLK, DELAY, EN, M, LIMIT> {
        AxisBuilder {
            step_pin: self.step_pin,
            dir_pin: self.dir_pin,
            clock: self.clock,
            delay: self.delay,
            enable_pin: self.enable_pin,
            mode_pins: [m0, m1, m2],
            interlock: self.interlock,
            settings: self.settings,
        }
    }

    /// Set the limit-switch lines.
    ///
    /// More than [`crate::safety::MAX_LIMIT_LINES`] lines makes
    /// [`AxisBuilder::build`] fail.
    pub fn limit_pins<L, I>(mut self, lines: I) -> AxisBuilder<STEP, DIR, CLK, DELAY, EN, MODE, L>
    where
        L: InputPin,
        I: IntoIterator<Item = L>,
    {
        let interlock = match LimitInterlock::new(lines, crate::safety::DEFAULT_DEBOUNCE_MS) {
            Ok(interlock) => Some(interlock),
            Err(e) => {
                self.settings.pending_error = Some(e);
                None
            }
        };
        self.with_interlock(interlock)
    }

    /// Use a prepared interlock.
    pub fn interlock<L>(
        self,
        interlock: LimitInterlock<L>,
    ) -> AxisBuilder<STEP, DIR, CLK, DELAY, EN, MODE, L> {
        self.with_interlock(Some(interlock))
    }

    fn with_interlock<L>(
        self,
        interlock: Option<LimitInterlock<L>>,
    ) -> AxisBuilder<STEP, DIR, CLK, DELAY, EN, MODE, L> {
        AxisBuilder {
            step_pin: self.step_pin,
            dir_pin: self.dir_pin,
            clock: self.clock,
            delay: self.delay,
            enable_pin: self.enable_pin,
            mode_pins: self.mode_pins,
            interlock,
            settings: self.settings,
        }
    }

    /// Configure from an AxisConfig.
    pub fn from_axis_config(mut self, config: &AxisConfig) -> Self {
        self.settings.name = Some(config.name.clone());
        self.settings.step_mode = config.step_mode;
        self.settings.steps_per_revolution = config.steps_per_revolution;
        self.settings.flip_polarity = config.flip_polarity;
        self.settings.debounce_ms = Some(config.debounce_ms);
        self.settings.speed = match (config.initial_speed, config.initial_rpm) {
            (Some(speed), _) => Some(InitialSpeed::StepsPerSec(speed)),
            (None, Some(rpm)) => Some(InitialSpeed::Rpm(rpm)),
            (None, None) => None,
        };
        self
    }

    /// Configure from SystemConfig by axis name.
    pub fn from_config(self, config: &SystemConfig, axis_name: &str) -> Result<Self> {
        let axis_config = config.axis(axis_name).ok_or_else(|| {
            Error::Config(ConfigError::AxisNotFound(
                heapless::String::try_from(axis_name).unwrap_or_default(),
            ))
        })?;

        Ok(self.from_axis_config(axis_config))
    }
}

impl<STEP, DIR, CLK, DELAY, EN, MODE, LIMIT> AxisBuilder<STEP, DIR, CLK, DELAY, EN, MODE, LIMIT>
where
    STEP: OutputPin,
    DIR: OutputPin,
    EN: OutputPin,
    MODE: OutputPin,
    LIMIT: InputPin,
    CLK: MonotonicClock,
    DELAY: DelayNs,
{
    /// Build the Axis.
    ///
    /// The axis starts disabled: the ENABLE line, if wired, is driven inactive
    /// and the mode lines are set for the configured divisor.
    ///
    /// # Errors
    ///
    /// Returns an error if a required component is missing, a setting is
    /// invalid, or a line cannot be driven.
    pub fn build(self) -> Result<Axis<STEP, DIR, EN, MODE, LIMIT, CLK, DELAY>> {
        let settings = self.settings;
        if let Some(e) = settings.pending_error {
            return Err(e);
        }

        let step_pin = self
            .step_pin
            .ok_or(Error::Config(ConfigError::MissingComponent("step_pin")))?;
        let dir_pin = self
            .dir_pin
            .ok_or(Error::Config(ConfigError::MissingComponent("dir_pin")))?;
        let clock = self
            .clock
            .ok_or(Error::Config(ConfigError::MissingComponent("clock")))?;
        let delay = self
            .delay
            .ok_or(Error::Config(ConfigError::MissingComponent("delay")))?;

        if settings.steps_per_revolution == 0 {
            return Err(Error::Config(ConfigError::InvalidStepsPerRevolution(0)));
        }

        let mut interlock = self.interlock.unwrap_or_default();
        if let Some(debounce_ms) = settings.debounce_ms {
            interlock.set_debounce_ms(debounce_ms);
        }

        let mut enable_pin = self.enable_pin;
        if let Some(pin) = enable_pin.as_mut() {
            pin.set_high().map_err(|_| OperationError::PinError)?;
        }

        let name = settings
            .name
            .unwrap_or_else(|| heapless::String::try_from("axis").unwrap_or_default());
        let polarity = if settings.flip_polarity {
            Polarity::Flipped
        } else {
            Polarity::Normal
        };

        let mut axis = Axis::new(
            step_pin,
            dir_pin,
            enable_pin,
            self.mode_pins,
            interlock,
            clock,
            delay,
            name,
            settings.steps_per_revolution,
            polarity,
        );

        axis.set_microsteps(settings.step_mode)?;
        match settings.speed {
            Some(InitialSpeed::StepsPerSec(speed)) => axis.set_speed(speed.value()),
            Some(InitialSpeed::Rpm(rpm)) => axis.set_speed_rpm(rpm.value()),
            None => {}
        }

        debug!(
            "{}: built, 1/{} microsteps, {} steps/rev",
            axis.name(),
            settings.step_mode.value(),
            settings.steps_per_revolution
        );
        Ok(axis)
    }
}
