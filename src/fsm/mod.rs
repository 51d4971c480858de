//! Two-state control machine driven by function-pointer tables.
//!
//! ```text
//!  ┌──────────┬──────────┬──────────┬────────────────────┐
//!  │ StateId  │ on_enter │ on_exit  │ on_update          │
//!  ├──────────┼──────────┼──────────┼────────────────────┤
//!  │ Scanning │ -        │ -        │ scanning_update    │
//!  │ Alert    │ announce │ resume   │ alert_update       │
//!  └──────────┴──────────┴──────────┴────────────────────┘
//! ```
//!
//! The service ticks the machine once per detection decision, after it has
//! put a frame (or nothing) into [`FsmContext::reading`].  An update that
//! returns `Some(next)` runs `on_exit` of the old state and `on_enter` of
//! the new one before the tick returns.

pub mod context;
pub mod states;

use context::FsmContext;
use log::info;

/// Control states.  The discriminant indexes the state table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StateId {
    Scanning = 0,
    Alert = 1,
}

impl StateId {
    pub const COUNT: usize = 2;
}

/// Runs once on entering or leaving a state.
pub type StateActionFn = fn(&mut FsmContext);

/// Per-decision handler; `Some(next)` requests a transition.
pub type StateUpdateFn = fn(&mut FsmContext) -> Option<StateId>;

/// One row of the state table.
pub struct StateDescriptor {
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

pub struct Fsm {
    table: [StateDescriptor; StateId::COUNT],
    current: StateId,
}

impl Fsm {
    pub fn new(table: [StateDescriptor; StateId::COUNT], initial: StateId) -> Self {
        Self {
            table,
            current: initial,
        }
    }

    fn row(&self, id: StateId) -> &StateDescriptor {
        &self.table[id as usize]
    }

    /// Enter the initial state.  Call once before the first tick.
    pub fn start(&mut self, ctx: &mut FsmContext) {
        info!("FSM starting in state: {}", self.row(self.current).name);
        if let Some(enter) = self.row(self.current).on_enter {
            enter(ctx);
        }
    }

    /// One detection decision.
    pub fn tick(&mut self, ctx: &mut FsmContext) {
        let update = self.row(self.current).on_update;
        if let Some(next) = update(ctx) {
            if next != self.current {
                self.transition(next, ctx);
            }
        }
    }

    pub fn current_state(&self) -> StateId {
        self.current
    }

    fn transition(&mut self, next: StateId, ctx: &mut FsmContext) {
        info!(
            "FSM transition: {} -> {}",
            self.row(self.current).name,
            self.row(next).name
        );
        if let Some(exit) = self.row(self.current).on_exit {
            exit(ctx);
        }
        self.current = next;
        if let Some(enter) = self.row(next).on_enter {
            enter(ctx);
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::context::FsmContext;
    use super::*;
    use crate::config::SentryConfig;
    use crate::sensors::frame::{Peak, VALID_ROWS, ValidatedFrame, WINDOW};
    use proptest::prelude::*;

    fn arb_reading() -> impl Strategy<Value = Option<(i16, u8)>> {
        proptest::option::of((0i16..10_000, 0u8..16))
    }

    proptest! {
        #[test]
        fn alert_iff_in_band_hazard(readings in proptest::collection::vec(arb_reading(), 1..100)) {
            let mut fsm = Fsm::new(states::build_state_table(), StateId::Scanning);
            let mut ctx = FsmContext::new(SentryConfig::default()).unwrap();
            fsm.start(&mut ctx);

            for reading in readings {
                let before = fsm.current_state();
                ctx.reading = reading.map(|(value, col)| ValidatedFrame {
                    cells: [[0; WINDOW]; VALID_ROWS],
                    excluded_row: 7,
                    peak: Some(Peak { value, row: 0, col }),
                });
                fsm.tick(&mut ctx);

                let hazard = matches!(reading, Some((v, c)) if v > 5000 && (13..=15).contains(&c));
                match reading {
                    Some(_) => prop_assert_eq!(
                        fsm.current_state() == StateId::Alert,
                        hazard,
                        "from {:?} with {:?}", before, reading
                    ),
                    None => prop_assert_eq!(fsm.current_state(), before),
                }
                prop_assert_eq!(fsm.current_state() == StateId::Alert, ctx.alert.is_armed());
            }
        }
    }
}
