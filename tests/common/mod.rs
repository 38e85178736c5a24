//! Shared fakes for the integration tests.

#![allow(dead_code)]

use core::convert::Infallible;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use stepper_axis::{Axis, AxisBuilder, MonotonicClock};

/// Clock and delay in one: sleeping advances the time it reports.
#[derive(Debug, Clone, Default)]
pub struct FakeClock {
    now_ns: Rc<Cell<u64>>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ns(&self) -> u64 {
        self.now_ns.get()
    }

    pub fn advance_us(&self, us: u64) {
        self.now_ns.set(self.now_ns.get() + us * 1_000);
    }
}

impl MonotonicClock for FakeClock {
    fn now_us(&self) -> u64 {
        self.now_ns.get() / 1_000
    }
}

impl DelayNs for FakeClock {
    fn delay_ns(&mut self, ns: u32) {
        self.now_ns.set(self.now_ns.get() + ns as u64);
    }
}

#[derive(Debug, Default)]
struct PinRecord {
    level: bool,
    rising: u64,
    sampled: Vec<bool>,
}

/// Output line that counts rising edges.
///
/// A pin built with [`RecordingPin::watching`] also samples another pin's level
/// on each of its own rising edges.
#[derive(Debug, Clone, Default)]
pub struct RecordingPin {
    record: Rc<RefCell<PinRecord>>,
    watch: Option<Rc<RefCell<PinRecord>>>,
}

impl RecordingPin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn watching(other: &RecordingPin) -> Self {
        Self {
            record: Rc::default(),
            watch: Some(other.record.clone()),
        }
    }

    pub fn is_high(&self) -> bool {
        self.record.borrow().level
    }

    pub fn rising_edges(&self) -> u64 {
        self.record.borrow().rising
    }

    /// Watched line level at each rising edge, oldest first.
    pub fn sampled(&self) -> Vec<bool> {
        self.record.borrow().sampled.clone()
    }
}

impl ErrorType for RecordingPin {
    type Error = Infallible;
}

impl OutputPin for RecordingPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.record.borrow_mut().level = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        let watched = self.watch.as_ref().map(|w| w.borrow().level);
        let mut record = self.record.borrow_mut();
        if !record.level {
            record.rising += 1;
            if let Some(level) = watched {
                record.sampled.push(level);
            }
        }
        record.level = true;
        Ok(())
    }
}

/// Input line driven by the test, or tripping by itself after some polls.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    high: Rc<Cell<bool>>,
    polls: Rc<Cell<u32>>,
    trip_after: Option<u32>,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads high from poll number `polls + 1` onwards.
    pub fn trips_after(polls: u32) -> Self {
        Self {
            trip_after: Some(polls),
            ..Self::default()
        }
    }

    pub fn set_high(&self, high: bool) {
        self.high.set(high);
    }

    pub fn polls(&self) -> u32 {
        self.polls.get()
    }
}

impl ErrorType for ScriptedInput {
    type Error = Infallible;
}

impl InputPin for ScriptedInput {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        let polls = self.polls.get() + 1;
        self.polls.set(polls);
        let scripted = self.trip_after.map_or(false, |k| polls > k);
        Ok(self.high.get() || scripted)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

pub type TestAxis = Axis<
    RecordingPin,
    RecordingPin,
    RecordingPin,
    RecordingPin,
    ScriptedInput,
    FakeClock,
    FakeClock,
>;

/// Handles onto every line of a [`TestAxis`].
pub struct Rig {
    pub clock: FakeClock,
    pub step: RecordingPin,
    pub dir: RecordingPin,
    pub enable: RecordingPin,
    pub modes: [RecordingPin; 3],
    pub limit: ScriptedInput,
}

impl Rig {
    pub fn new() -> Self {
        Self::with_limit(ScriptedInput::new())
    }

    pub fn with_limit(limit: ScriptedInput) -> Self {
        let dir = RecordingPin::new();
        Self {
            clock: FakeClock::new(),
            step: RecordingPin::watching(&dir),
            dir,
            enable: RecordingPin::new(),
            modes: [RecordingPin::new(), RecordingPin::new(), RecordingPin::new()],
            limit,
        }
    }

    pub fn builder(
        &self,
    ) -> AxisBuilder<
        RecordingPin,
        RecordingPin,
        FakeClock,
        FakeClock,
        RecordingPin,
        RecordingPin,
        ScriptedInput,
    > {
        AxisBuilder::new()
            .name("test")
            .step_pin(self.step.clone())
            .dir_pin(self.dir.clone())
            .clock(self.clock.clone())
            .delay(self.clock.clone())
            .enable_pin(self.enable.clone())
            .mode_pins(
                Some(self.modes[0].clone()),
                Some(self.modes[1].clone()),
                Some(self.modes[2].clone()),
            )
            .limit_pins([self.limit.clone()])
    }

    pub fn axis(&self) -> TestAxis {
        self.builder().build().unwrap()
    }

    pub fn mode_levels(&self) -> [bool; 3] {
        [
            self.modes[0].is_high(),
            self.modes[1].is_high(),
            self.modes[2].is_high(),
        ]
    }
}
