//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by rendering application events into the
//! serial lines the dashboard parses and writing them through the `log`
//! facade (UART / USB-CDC in production).

use core::fmt::Write;

use log::{Level, log};

use crate::app::events::{AppEvent, DirectionReason};
use crate::app::ports::EventSink;
use crate::report::{self, Line};

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        render(event, |level, line| log!(level, "{}", line));
    }
}

fn owned(text: &str) -> Line {
    let mut line = Line::new();
    let _ = line.push_str(text);
    line
}

/// Render one event as dashboard lines.
pub fn render(event: &AppEvent, mut out: impl FnMut(Level, &str)) {
    match event {
        AppEvent::Started(state) => {
            let mut line = Line::new();
            let _ = write!(line, "START | initial_state={:?}", state);
            out(Level::Info, &line);
        }
        AppEvent::StateChanged { from, to } => {
            let mut line = Line::new();
            let _ = write!(line, "STATE | {:?} -> {:?}", from, to);
            out(Level::Info, &line);
        }
        AppEvent::Reading(reading) => out(Level::Info, &report::reading_line(reading)),
        AppEvent::DirectionChanged { direction, reason } => match reason {
            DirectionReason::SweepBoundary => {
                let mut line = owned("Changing direction: ");
                let _ = line.push_str(report::direction_label(*direction));
                out(Level::Info, &line);
            }
            DirectionReason::Homing => out(Level::Info, "Changing direction to right"),
        },
        AppEvent::HazardConfirmed { peak, frame } => {
            out(Level::Warn, &report::peak_line("FIRE DETECTED! Temp", peak));
            report::write_matrix(frame, |line| out(Level::Info, line));
        }
        AppEvent::AlertTick {
            peak,
            distance_cm,
            frame,
        } => {
            out(Level::Warn, &report::peak_line("Alert! Temp", peak));
            report::write_matrix(frame, |line| out(Level::Info, line));
            out(Level::Info, &report::distance_line(*distance_cm));
        }
        AppEvent::AlertCleared => out(Level::Info, "Fire alert mode ended"),
        AppEvent::AcquisitionFailed(_) => out(Level::Warn, "Error reading thermal data"),
        AppEvent::SensorDegraded(e) => {
            let mut line = owned("SENSOR | init failed, running degraded: ");
            let _ = write!(line, "{}", e);
            out(Level::Error, &line);
        }
        AppEvent::SensorRecovered => out(Level::Info, "SENSOR | recovered"),
    }
}
