//! Concrete state handler functions and table builder.
//!
//! Each state is defined by plain `fn` pointers, no closures and no
//! dynamic dispatch.  Handlers only run when the service has a decision
//! to make; a tick without a frame in `ctx.reading` is a skipped cycle.
//!
//! ```text
//!  SCANNING ──[peak > threshold, col in band]──▶ ALERT
//!     ▲  │                                          │
//!     │  └─[peak > threshold, col < band]─ homing   │
//!     │                                             │
//!     └───────────────[hazard gone]─────────────────┘
//! ```

use super::context::{ControlOutcome, FsmContext};
use super::{StateDescriptor, StateId};
use crate::control::alert::AlertDecision;
use crate::control::patrol::PatrolDecision;
use log::{info, warn};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0: Scanning
        StateDescriptor {
            name: "Scanning",
            on_enter: None,
            on_exit: None,
            on_update: scanning_update,
        },
        // Index 1: Alert
        StateDescriptor {
            name: "Alert",
            on_enter: Some(alert_enter),
            on_exit: Some(alert_exit),
            on_update: alert_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  SCANNING state: sweeping and looking for a hot spot
// ═══════════════════════════════════════════════════════════════════════════

fn scanning_update(ctx: &mut FsmContext) -> Option<StateId> {
    let frame = ctx.reading.take()?;

    match ctx.patrol.evaluate(&frame) {
        PatrolDecision::Hold => None,
        PatrolDecision::Homing { peak, flipped } => {
            ctx.outcome = Some(ControlOutcome::Homing {
                peak,
                flipped,
                direction: ctx.patrol.direction(),
            });
            None
        }
        PatrolDecision::HazardConfirmed(peak) => {
            warn!(
                "SCANNING: hazard {} cd at [{}][{}], position {}",
                peak.value,
                peak.row,
                peak.col,
                ctx.patrol.position()
            );
            ctx.alert.arm(frame);
            ctx.outcome = Some(ControlOutcome::HazardConfirmed(peak));
            Some(StateId::Alert)
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  ALERT state: head stopped, hazard re-measured every cadence
// ═══════════════════════════════════════════════════════════════════════════

fn alert_enter(_ctx: &mut FsmContext) {
    info!("Motor stopped - FIRE ALERT MODE");
}

fn alert_exit(ctx: &mut FsmContext) {
    ctx.alert.disarm();
    ctx.patrol.resume();
    info!(
        "ALERT: resuming patrol {:?} from position 0",
        ctx.patrol.direction()
    );
}

fn alert_update(ctx: &mut FsmContext) -> Option<StateId> {
    let frame = ctx.reading.take()?;

    match ctx.alert.observe(frame) {
        AlertDecision::Sustain(peak) => {
            ctx.outcome = Some(ControlOutcome::AlertSustained(peak));
            None
        }
        AlertDecision::Clear => {
            ctx.outcome = Some(ControlOutcome::AlertCleared);
            Some(StateId::Scanning)
        }
    }
}
