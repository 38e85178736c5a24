//! Single stepper axis driver.
//!
//! Generic over embedded-hal 1.0 line types, a monotonic clock and a delay
//! provider, so the same code runs on hardware and against in-memory fakes.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin, PinState};

use crate::config::units::{Degrees, Microsteps, Rpm, StepsPerSec};
use crate::error::{ConfigError, Error, OperationError, Result, ValidationError};
use crate::hal::MonotonicClock;
use crate::motion::{
    Direction, MoveExecutor, MoveOutcome, MoveReport, Polarity, StepInterval, StepTick,
    TickOutcome, MAX_WAIT_US,
};
use crate::safety::LimitInterlock;

use super::position::Position;
use super::state::AxisState;

/// STEP pulse high time in microseconds.
pub const PULSE_WIDTH_US: u32 = 2;

/// Time the driver needs after ENABLE goes active before it accepts steps.
pub const ENABLE_SETTLE_US: u32 = 1_000;

/// A single step/direction/enable stepper axis.
///
/// Generic over:
/// - `STEP`, `DIR`: STEP and DIR lines (must implement `OutputPin`)
/// - `EN`: optional active-low ENABLE line
/// - `MODE`: optional M0/M1/M2 microstep selection lines
/// - `LIMIT`: limit-switch inputs watched by the interlock
/// - `CLK`: monotonic time source
/// - `DELAY`: delay provider for pulse width, settle and debounce waits
///
/// Optional lines that are not wired use [`crate::NoPin`].
pub struct Axis<STEP, DIR, EN, MODE, LIMIT, CLK, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    EN: OutputPin,
    MODE: OutputPin,
    LIMIT: InputPin,
    CLK: MonotonicClock,
    DELAY: DelayNs,
{
    /// STEP line (one pulse = one microstep).
    step_pin: STEP,

    /// DIR line, level chosen by `polarity`.
    dir_pin: DIR,

    /// ENABLE line (active low), if wired.
    enable_pin: Option<EN>,

    /// M0, M1, M2 mode lines; unwired ones are skipped.
    mode_pins: [Option<MODE>; 3],

    /// Limit-switch interlock.
    interlock: LimitInterlock<LIMIT>,

    /// Time source for step scheduling.
    clock: CLK,

    /// Delay provider.
    delay: DELAY,

    /// Axis name for logging/debugging.
    name: heapless::String<32>,

    /// Current logical position.
    position: Position,

    /// Where the current or last move was headed.
    target_position: Position,

    /// Direction in effect for the next pulse.
    direction: Option<Direction>,

    /// Direction to DIR level mapping for this axis only.
    polarity: Polarity,

    /// Whether stepping is permitted.
    enabled: bool,

    /// Time between pulses; unset until a speed is configured.
    step_interval: StepInterval,

    /// Active microstep divisor.
    microsteps: Microsteps,

    /// Full steps per revolution, for RPM and angle conversions.
    steps_per_revolution: u16,

    /// Motion state.
    state: AxisState,

    /// Bookkeeping for the move in progress.
    executor: Option<MoveExecutor>,

    /// Summary of the last finished, tripped or abandoned move.
    last_report: Option<MoveReport>,
}

impl<STEP, DIR, EN, MODE, LIMIT, CLK, DELAY> Axis<STEP, DIR, EN, MODE, LIMIT, CLK, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    EN: OutputPin,
    MODE: OutputPin,
    LIMIT: InputPin,
    CLK: MonotonicClock,
    DELAY: DelayNs,
{
    /// Create a disabled axis at position 0 with no speed configured.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        step_pin: STEP,
        dir_pin: DIR,
        enable_pin: Option<EN>,
        mode_pins: [Option<MODE>; 3],
        interlock: LimitInterlock<LIMIT>,
        clock: CLK,
        delay: DELAY,
        name: heapless::String<32>,
        steps_per_revolution: u16,
        polarity: Polarity,
    ) -> Self {
        Self {
            step_pin,
            dir_pin,
            enable_pin,
            mode_pins,
            interlock,
            clock,
            delay,
            name,
            position: Position::ZERO,
            target_position: Position::ZERO,
            direction: None,
            polarity,
            enabled: false,
            step_interval: StepInterval::UNSET,
            microsteps: Microsteps::FULL,
            steps_per_revolution,
            state: AxisState::Disabled,
            executor: None,
            last_report: None,
        }
    }

    /// Get the axis name.
    #[inline]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Get the current logical position.
    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Get the current position as an angle.
    #[inline]
    pub fn position_degrees(&self) -> Degrees {
        self.position.degrees(self.steps_per_revolution)
    }

    /// Get the target of the current or last move.
    #[inline]
    pub fn target_position(&self) -> Position {
        self.target_position
    }

    /// Get the direction in effect, if one has been set.
    #[inline]
    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    /// Get this axis's direction polarity.
    #[inline]
    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    /// Whether stepping is permitted.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Get the current motion state.
    #[inline]
    pub fn state(&self) -> AxisState {
        self.state
    }

    /// Whether a move is in progress.
    #[inline]
    pub fn is_moving(&self) -> bool {
        self.state == AxisState::Moving
    }

    /// Get the configured step interval.
    #[inline]
    pub fn step_interval(&self) -> StepInterval {
        self.step_interval
    }

    /// Get the configured speed, if any.
    #[inline]
    pub fn speed(&self) -> Option<StepsPerSec> {
        self.step_interval.speed()
    }

    /// Get the active microstep divisor.
    #[inline]
    pub fn microsteps(&self) -> Microsteps {
        self.microsteps
    }

    /// Get full steps per revolution.
    #[inline]
    pub fn steps_per_revolution(&self) -> u16 {
        self.steps_per_revolution
    }

    /// Pulses left in the current move, or left over by the last one.
    pub fn remaining_steps(&self) -> u64 {
        match &self.executor {
            Some(executor) => executor.remaining(),
            None => self.last_report.map(|r| r.remaining).unwrap_or(0),
        }
    }

    /// Summary of the last finished, tripped or abandoned move.
    #[inline]
    pub fn last_report(&self) -> Option<MoveReport> {
        self.last_report
    }

    /// Get the interlock.
    #[inline]
    pub fn interlock(&self) -> &LimitInterlock<LIMIT> {
        &self.interlock
    }

    /// Get the interlock mutably (e.g. to change its debounce).
    #[inline]
    pub fn interlock_mut(&mut self) -> &mut LimitInterlock<LIMIT> {
        &mut self.interlock
    }

    /// Set the speed in steps per second.
    ///
    /// Only the magnitude is used. Zero leaves the axis without a usable
    /// speed, and every move fails until a non-zero speed is set.
    pub fn set_speed(&mut self, steps_per_sec: f32) {
        self.step_interval = StepInterval::from_speed(StepsPerSec(steps_per_sec));
        debug!("{}: step interval {} us", self.name.as_str(), self.step_interval.micros());
    }

    /// Set the speed in revolutions per minute.
    pub fn set_speed_rpm(&mut self, rpm: f32) {
        self.step_interval = StepInterval::from_rpm(Rpm(rpm), self.steps_per_revolution);
        debug!("{}: step interval {} us", self.name.as_str(), self.step_interval.micros());
    }

    /// Set the step interval directly.
    #[inline]
    pub fn set_step_interval(&mut self, interval: StepInterval) {
        self.step_interval = interval;
    }

    /// Set the direction and drive the DIR line accordingly.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::Busy` during a move, or `PinError` if the line
    /// cannot be driven.
    pub fn set_direction(&mut self, direction: Direction) -> Result<()> {
        if self.is_moving() {
            return Err(Error::Operation(OperationError::Busy));
        }
        self.write_direction(direction)
    }

    /// Set the direction from its raw code (0 = CCW, 1 = CW).
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidDirection` for any other value, without
    /// touching the DIR line.
    pub fn set_direction_code(&mut self, code: u8) -> Result<()> {
        let direction = Direction::try_from(code)?;
        self.set_direction(direction)
    }

    /// Swap this axis's CW/CCW line levels.
    ///
    /// If a direction is in effect the DIR line is rewritten at once, so the
    /// next pulse still moves in the recorded direction.
    pub fn flip_polarity(&mut self) -> Result<()> {
        self.polarity = self.polarity.flipped();
        if let Some(direction) = self.direction {
            self.write_direction(direction)?;
        }
        Ok(())
    }

    /// Select a microstep divisor by its numeric value.
    ///
    /// Returns `Ok(true)` when the mode was applied. Values outside
    /// {1, 2, 4, 8, 16, 32} leave the divisor and mode lines untouched and
    /// return `Ok(false)`. Changing mode during a move fails with
    /// `OperationError::Busy`.
    pub fn set_step_mode(&mut self, mode: u16) -> Result<bool> {
        match Microsteps::new(mode) {
            Ok(microsteps) => {
                self.set_microsteps(microsteps)?;
                Ok(true)
            }
            Err(_) => {
                warn!("{}: ignoring unsupported step mode {}", self.name.as_str(), mode);
                Ok(false)
            }
        }
    }

    /// Select a microstep divisor and drive the wired mode lines.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::Busy` during a move, without touching any line.
    pub fn set_microsteps(&mut self, microsteps: Microsteps) -> Result<()> {
        if self.is_moving() {
            return Err(Error::Operation(OperationError::Busy));
        }
        for (pin, high) in self.mode_pins.iter_mut().zip(microsteps.mode_lines()) {
            if let Some(pin) = pin {
                pin.set_state(PinState::from(high))
                    .map_err(|_| OperationError::PinError)?;
            }
        }
        self.microsteps = microsteps;
        debug!("{}: microsteps 1/{}", self.name.as_str(), microsteps.value());
        Ok(())
    }

    /// Drive ENABLE active and allow stepping.
    ///
    /// Waits [`ENABLE_SETTLE_US`] for the driver to wake. Also clears a
    /// latched interlock trip.
    pub fn enable(&mut self) -> Result<()> {
        if let Some(pin) = self.enable_pin.as_mut() {
            pin.set_low().map_err(|_| OperationError::PinError)?;
        }
        self.enabled = true;
        self.delay.delay_us(ENABLE_SETTLE_US);

        if matches!(self.state, AxisState::Disabled | AxisState::Tripped) {
            self.state = AxisState::Idle;
        }
        info!("{}: enabled", self.name.as_str());
        Ok(())
    }

    /// Drive ENABLE inactive and forbid stepping.
    ///
    /// Always writes the line, whatever the previous state. A move in progress
    /// is abandoned; its report stays available through [`Axis::last_report`].
    pub fn disable(&mut self) -> Result<()> {
        self.enabled = false;
        if let Some(executor) = self.executor.take() {
            self.last_report = Some(executor.report(MoveOutcome::Aborted));
        }
        self.state = AxisState::Disabled;

        if let Some(pin) = self.enable_pin.as_mut() {
            pin.set_high().map_err(|_| OperationError::PinError)?;
        }
        info!("{}: disabled", self.name.as_str());
        Ok(())
    }

    /// Return a tripped axis to `Idle`.
    ///
    /// Does nothing in any other state.
    pub fn clear_trip(&mut self) {
        if self.state == AxisState::Tripped {
            self.state = AxisState::Idle;
            debug!("{}: trip cleared", self.name.as_str());
        }
    }

    /// Declare the current position to be `steps`.
    pub fn set_position(&mut self, steps: i64) -> Result<()> {
        if self.is_moving() {
            return Err(Error::Operation(OperationError::Busy));
        }
        let position =
            Position::from_steps(steps).ok_or(ValidationError::StepCountOutOfRange(steps))?;
        self.position = position;
        self.target_position = position;
        Ok(())
    }

    /// Set the current position as the origin (zero).
    pub fn set_origin(&mut self) -> Result<()> {
        self.set_position(0)
    }

    /// Emit one STEP pulse and account for it.
    ///
    /// # Errors
    ///
    /// Fails without pulsing if the axis is disabled, no direction is set, or a
    /// move is in progress (its pulses belong to [`Axis::step_tick`]).
    pub fn emit_one(&mut self) -> Result<()> {
        if !self.enabled {
            return Err(Error::Operation(OperationError::Disabled));
        }
        if self.is_moving() {
            return Err(Error::Operation(OperationError::Busy));
        }
        let direction = self.direction.ok_or(OperationError::DirectionNotSet)?;
        self.pulse(direction)
    }

    /// Pulse STEP once and account for it.
    ///
    /// The position only changes once the pulse has been fully emitted.
    fn pulse(&mut self, direction: Direction) -> Result<()> {
        self.step_pin.set_high().map_err(|_| OperationError::PinError)?;
        self.delay.delay_us(PULSE_WIDTH_US);
        self.step_pin.set_low().map_err(|_| OperationError::PinError)?;

        self.position.advance(direction, self.microsteps);
        Ok(())
    }

    /// Start a move of `steps` pulses without waiting for it.
    ///
    /// Positive counts move counter-clockwise. Drive the move with
    /// [`Axis::step_tick`] or [`Axis::run_until`].
    ///
    /// # Errors
    ///
    /// Fails without side effects if the axis is disabled, tripped, already
    /// moving, or has no speed configured.
    pub fn start_move(&mut self, steps: i64) -> Result<()> {
        self.begin(Direction::from_steps(steps), steps.unsigned_abs())
    }

    /// Start a move of `count` pulses in a caller-chosen direction.
    ///
    /// # Errors
    ///
    /// As [`Axis::start_move`], plus `ValidationError::NegativeStepCount`.
    pub fn start_move_in(&mut self, direction: Direction, count: i64) -> Result<()> {
        if count < 0 {
            return Err(Error::Validation(ValidationError::NegativeStepCount(count)));
        }
        self.begin(direction, count as u64)
    }

    /// Start a move to the absolute position `target` (in full steps).
    ///
    /// Does nothing if the axis is already there.
    pub fn start_move_to_absolute(&mut self, target: i64) -> Result<()> {
        let target =
            Position::from_steps(target).ok_or(ValidationError::StepCountOutOfRange(target))?;
        self.start_move_to(target)
    }

    /// Start a move of `delta` full steps from the current position.
    pub fn start_move_to_relative(&mut self, delta: i64) -> Result<()> {
        let target = Position::from_steps(delta)
            .and_then(|d| self.position.units().checked_add(d.units()))
            .map(Position::from_units)
            .ok_or(ValidationError::StepCountOutOfRange(delta))?;
        self.start_move_to(target)
    }

    fn start_move_to(&mut self, target: Position) -> Result<()> {
        if target == self.position {
            self.last_report = Some(MoveReport::empty());
            return Ok(());
        }
        let pulses = self
            .position
            .pulses_to(target, self.microsteps)
            .ok_or(ValidationError::StepCountOutOfRange(target.whole_steps()))?;
        self.start_move(pulses)
    }

    fn begin(&mut self, direction: Direction, pulses: u64) -> Result<()> {
        match self.state {
            AxisState::Disabled => return Err(Error::Operation(OperationError::Disabled)),
            AxisState::Tripped => return Err(Error::Operation(OperationError::Tripped)),
            AxisState::Moving => return Err(Error::Operation(OperationError::Busy)),
            AxisState::Idle => {}
        }
        if !self.enabled {
            return Err(Error::Operation(OperationError::Disabled));
        }
        if !self.step_interval.is_set() {
            return Err(Error::Config(ConfigError::SpeedNotSet));
        }

        let signed = i64::try_from(pulses)
            .ok()
            .map(|p| p * direction.sign())
            .ok_or(ValidationError::StepCountOutOfRange(i64::MIN))?;
        let target = self
            .position
            .offset_by(signed, self.microsteps)
            .ok_or(ValidationError::StepCountOutOfRange(signed))?;

        if pulses == 0 {
            self.target_position = target;
            self.last_report = Some(MoveReport::empty());
            return Ok(());
        }

        self.write_direction(direction)?;
        self.target_position = target;
        self.executor = Some(MoveExecutor::new(direction, pulses, self.clock.now_us()));
        self.state = AxisState::Moving;

        debug!(
            "{}: moving {} pulses {:?}, interval {} us",
            self.name.as_str(),
            pulses,
            direction,
            self.step_interval.micros()
        );
        Ok(())
    }

    /// Make at most one polling/stepping decision.
    ///
    /// The interlock is polled first on every call while moving. A trip
    /// applies the debounce delay and latches `Tripped`; otherwise a pulse is
    /// emitted if a full interval has elapsed since the previous one.
    pub fn step_tick(&mut self) -> Result<TickOutcome> {
        match self.state {
            AxisState::Disabled => return Ok(TickOutcome::Disabled),
            AxisState::Idle => return Ok(TickOutcome::Idle),
            AxisState::Tripped => return Ok(TickOutcome::Tripped),
            AxisState::Moving => {}
        }

        if self.interlock.poll()? {
            self.trip();
            return Ok(TickOutcome::Tripped);
        }

        if !self.step_interval.is_set() {
            // Speed was zeroed mid-move; stop rather than step without pacing.
            self.finish(MoveOutcome::Aborted);
            return Err(Error::Config(ConfigError::SpeedNotSet));
        }

        let now = self.clock.now_us();
        let (direction, elapsed) = match &self.executor {
            Some(executor) => (executor.direction(), executor.elapsed(now)),
            None => {
                self.state = AxisState::Idle;
                return Ok(TickOutcome::Idle);
            }
        };

        if !self.step_interval.is_due(elapsed) {
            return Ok(TickOutcome::Waiting {
                due_in_us: self.step_interval.remaining(elapsed),
            });
        }

        self.pulse(direction)?;

        let complete = match self.executor.as_mut() {
            Some(executor) => {
                executor.record_step(now);
                executor.is_complete()
            }
            None => true,
        };

        if complete {
            self.finish(MoveOutcome::Completed);
            Ok(TickOutcome::Completed)
        } else {
            Ok(TickOutcome::Stepped)
        }
    }

    /// Drive the current move to its end on this thread.
    ///
    /// `abort` is checked on every iteration. When it returns `true`, or when
    /// any error escapes the loop, the axis is disabled before the error is
    /// returned. Called with no move in progress, it returns an empty report.
    pub fn run_until<F>(&mut self, mut abort: F) -> Result<MoveReport>
    where
        F: FnMut() -> bool,
    {
        if !self.is_moving() {
            return Ok(MoveReport::empty());
        }

        loop {
            if self.is_moving() && abort() {
                warn!("{}: move aborted", self.name.as_str());
                let _ = self.disable();
                return Err(Error::Operation(OperationError::Aborted));
            }

            match self.step_tick() {
                Ok(TickOutcome::Waiting { due_in_us }) => {
                    self.delay.delay_us(due_in_us.min(MAX_WAIT_US as u64) as u32);
                }
                Ok(TickOutcome::Stepped) => {}
                Ok(_) => return Ok(self.last_report.unwrap_or(MoveReport::empty())),
                Err(e) => {
                    let _ = self.disable();
                    return Err(e);
                }
            }
        }
    }

    /// Move `steps` pulses and wait for the move to end.
    ///
    /// A trip is not an error: the report shows how far the move got.
    pub fn move_steps(&mut self, steps: i64) -> Result<MoveReport> {
        self.start_move(steps)?;
        self.run_until(|| false)
    }

    /// Move `count` pulses in `direction` and wait for the move to end.
    pub fn move_in(&mut self, direction: Direction, count: i64) -> Result<MoveReport> {
        self.start_move_in(direction, count)?;
        self.run_until(|| false)
    }

    /// Move to the absolute position `target` and wait.
    ///
    /// Emits no pulses if the axis is already at `target`.
    pub fn move_to_absolute(&mut self, target: i64) -> Result<MoveReport> {
        self.start_move_to_absolute(target)?;
        self.run_until(|| false)
    }

    /// Move `delta` full steps from the current position and wait.
    pub fn move_to_relative(&mut self, delta: i64) -> Result<MoveReport> {
        self.start_move_to_relative(delta)?;
        self.run_until(|| false)
    }

    fn write_direction(&mut self, direction: Direction) -> Result<()> {
        let state = PinState::from(self.polarity.level(direction));
        self.dir_pin
            .set_state(state)
            .map_err(|_| OperationError::PinError)?;
        self.direction = Some(direction);
        Ok(())
    }

    fn trip(&mut self) {
        let completed = self.executor.as_ref().map(|e| e.completed()).unwrap_or(0);
        warn!(
            "{}: limit interlock tripped after {} pulses",
            self.name.as_str(),
            completed
        );
        self.interlock.debounce(&mut self.delay);
        if let Some(executor) = self.executor.take() {
            self.last_report = Some(executor.report(MoveOutcome::Tripped));
        }
        self.state = AxisState::Tripped;
    }

    fn finish(&mut self, outcome: MoveOutcome) {
        if let Some(executor) = self.executor.take() {
            self.last_report = Some(executor.report(outcome));
        }
        self.state = AxisState::Idle;
        debug!("{}: move finished {:?}", self.name.as_str(), outcome);
    }
}

impl<STEP, DIR, EN, MODE, LIMIT, CLK, DELAY> StepTick for Axis<STEP, DIR, EN, MODE, LIMIT, CLK, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    EN: OutputPin,
    MODE: OutputPin,
    LIMIT: InputPin,
    CLK: MonotonicClock,
    DELAY: DelayNs,
{
    fn step_tick(&mut self) -> Result<TickOutcome> {
        Axis::step_tick(self)
    }

    fn is_moving(&self) -> bool {
        Axis::is_moving(self)
    }

    fn disable(&mut self) -> Result<()> {
        Axis::disable(self)
    }
}

/// An enabled axis is disabled when dropped, including during unwinding.
impl<STEP, DIR, EN, MODE, LIMIT, CLK, DELAY> Drop for Axis<STEP, DIR, EN, MODE, LIMIT, CLK, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    EN: OutputPin,
    MODE: OutputPin,
    LIMIT: InputPin,
    CLK: MonotonicClock,
    DELAY: DelayNs,
{
    fn drop(&mut self) {
        if self.enabled {
            let _ = self.disable();
        }
    }
}
