//! Outbound application events.
//!
//! The [`SentryService`](super::service::SentryService) emits these through
//! the [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them; the firmware renders them as the
//! serial lines the dashboard parses.

use crate::control::patrol::Direction;
use crate::error::Error;
use crate::fsm::StateId;
use crate::sensors::frame::{Peak, ValidatedFrame};

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The service has started (carries initial state).
    Started(StateId),

    /// The FSM transitioned between states.
    StateChanged { from: StateId, to: StateId },

    /// A patrol check produced a frame.
    Reading(ReadingReport),

    /// The sweep direction changed.
    DirectionChanged {
        direction: Direction,
        reason: DirectionReason,
    },

    /// A hot spot entered the band; the head stops.
    HazardConfirmed { peak: Peak, frame: ValidatedFrame },

    /// One alert cadence with the hazard still present, and the frame
    /// that showed it.
    AlertTick {
        peak: Peak,
        distance_cm: f32,
        frame: ValidatedFrame,
    },

    /// The hazard is gone; patrol resumes.
    AlertCleared,

    /// Acquisition or processing failed; the cycle was skipped.
    AcquisitionFailed(Error),

    /// Sensor bring-up failed; acquisitions are expected to fail.
    SensorDegraded(Error),

    /// A re-initialisation succeeded.
    SensorRecovered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectionReason {
    /// End of a sweep leg.
    SweepBoundary,
    /// Turned towards a hot spot below the band.
    Homing,
}

/// Patrol reading as reported on the status line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadingReport {
    pub position: u16,
    pub sweep_range: u16,
    pub peak: Option<Peak>,
}
