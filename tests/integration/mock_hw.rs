//! Mock hardware adapter for integration tests.
//!
//! Records every actuator call and serves scripted sensor results so
//! tests can assert on the full command history without real GPIO.

use std::collections::VecDeque;

use fireguard::app::events::AppEvent;
use fireguard::app::ports::{ActuatorPort, EventSink, SensorPort};
use fireguard::control::patrol::Direction;
use fireguard::error::{Error, Result};
use fireguard::sensors::frame::{Peak, VALID_ROWS, ValidatedFrame, WINDOW};

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum ActuatorCall {
    Step(Direction),
    Range,
    Alarm,
    Indicator(u8),
    Pause(u32),
}

// ── Frame helpers ─────────────────────────────────────────────

/// A frame whose hottest accepted cell is `value` at `(row, col)`.
pub fn frame_with_peak(value: i16, row: u8, col: u8) -> ValidatedFrame {
    let mut cells = [[2_000; WINDOW]; VALID_ROWS];
    cells[row as usize][col as usize] = value;
    ValidatedFrame {
        cells,
        excluded_row: 7,
        peak: Some(Peak { value, row, col }),
    }
}

pub fn cold_frame() -> ValidatedFrame {
    frame_with_peak(2_500, 0, 0)
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub calls: Vec<ActuatorCall>,
    /// Served in order; a cold frame once exhausted.
    pub frames: VecDeque<Result<ValidatedFrame>>,
    /// Served in order; `Ok` once exhausted.
    pub init_results: VecDeque<Result<()>>,
    pub init_calls: usize,
    pub acquisitions: usize,
    pub distance_cm: f32,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            frames: VecDeque::new(),
            init_results: VecDeque::new(),
            init_calls: 0,
            acquisitions: 0,
            distance_cm: 150.0,
        }
    }

    pub fn push_frame(&mut self, frame: ValidatedFrame) {
        self.frames.push_back(Ok(frame));
    }

    pub fn push_error(&mut self, error: Error) {
        self.frames.push_back(Err(error));
    }

    pub fn steps(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, ActuatorCall::Step(_)))
            .count()
    }

    pub fn last_step(&self) -> Option<Direction> {
        self.calls.iter().rev().find_map(|c| match c {
            ActuatorCall::Step(d) => Some(*d),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockHardware {
    fn init_sensor(&mut self) -> Result<()> {
        self.init_calls += 1;
        self.init_results.pop_front().unwrap_or(Ok(()))
    }

    fn acquire_frame(&mut self) -> Result<ValidatedFrame> {
        self.acquisitions += 1;
        self.frames.pop_front().unwrap_or_else(|| Ok(cold_frame()))
    }
}

impl ActuatorPort for MockHardware {
    fn advance_step(&mut self, direction: Direction) {
        self.calls.push(ActuatorCall::Step(direction));
    }

    fn range_distance(&mut self) -> f32 {
        self.calls.push(ActuatorCall::Range);
        self.distance_cm
    }

    fn sound_alarm(&mut self) {
        self.calls.push(ActuatorCall::Alarm);
    }

    fn set_indicator_angle(&mut self, degrees: u8) {
        self.calls.push(ActuatorCall::Indicator(degrees));
    }

    fn pause_ms(&mut self, ms: u32) {
        self.calls.push(ActuatorCall::Pause(ms));
    }
}

// ── MockSink ──────────────────────────────────────────────────

#[derive(Default)]
pub struct MockSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl MockSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for MockSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
