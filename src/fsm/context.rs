//! Shared mutable context threaded through every FSM handler.
//!
//! `FsmContext` is the blackboard state handlers read from and write to:
//! the patrol and alert controllers, the frame acquired for this tick, the
//! outcome the service must act on, and configuration.

use crate::config::{ConfigError, SentryConfig};
use crate::control::alert::{AlertMonitor, AlertRoutine};
use crate::control::hazard::HazardRule;
use crate::control::patrol::{Direction, PatrolController};
use crate::sensors::frame::{Peak, ValidatedFrame};

// ---------------------------------------------------------------------------
// Control outcome (written by state handlers; consumed by the service)
// ---------------------------------------------------------------------------

/// What the last handler decided that needs hardware or an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlOutcome {
    /// Hot spot below the band; `flipped` is false if already homing.
    Homing {
        peak: Peak,
        flipped: bool,
        direction: Direction,
    },
    HazardConfirmed(Peak),
    /// Hazard still present: run the alert routine.
    AlertSustained(Peak),
    AlertCleared,
}

// ---------------------------------------------------------------------------
// FsmContext
// ---------------------------------------------------------------------------

pub struct FsmContext {
    // -- Controllers --
    pub patrol: PatrolController,
    pub alert: AlertMonitor,
    pub routine: AlertRoutine,

    // -- Per-tick data --
    /// Frame acquired for this tick; handlers take it.  `None` when the
    /// acquisition failed or no check was due.
    pub reading: Option<ValidatedFrame>,
    /// Set by handlers, drained by the service after each tick.
    pub outcome: Option<ControlOutcome>,

    // -- Configuration --
    pub config: SentryConfig,
}

impl FsmContext {
    pub fn new(config: SentryConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            patrol: PatrolController::new(&config)?,
            alert: AlertMonitor::new(HazardRule::from_config(&config)),
            routine: AlertRoutine::from_config(&config),
            reading: None,
            outcome: None,
            config,
        })
    }
}
