//! Application service: the hexagonal core.
//!
//! [`SentryService`] owns the FSM and shared context.  It exposes a
//! clean, hardware-agnostic API.  All I/O flows through port traits
//! injected at call sites, making the entire service testable with mock
//! adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                 │     SentryService      │
//! ActuatorPort ◀──│  FSM · Patrol · Alert  │
//!                 └────────────────────────┘
//! ```
//!
//! One [`tick`](SentryService::tick) is one actuator step while
//! scanning, or one alert cadence while alerting.

use log::{error, info, warn};

use crate::config::{ConfigError, InitFailurePolicy, SentryConfig};
use crate::control::patrol::Direction;
use crate::error::Result;
use crate::fsm::context::{ControlOutcome, FsmContext};
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, StateId};

use super::events::{AppEvent, DirectionReason, ReadingReport};
use super::ports::{ActuatorPort, EventSink, SensorPort};

// ───────────────────────────────────────────────────────────────
// SentryService
// ───────────────────────────────────────────────────────────────

pub struct SentryService {
    fsm: Fsm,
    ctx: FsmContext,
    /// Sensor bring-up failed and has not been recovered.
    sensor_degraded: bool,
    tick_count: u64,
}

impl SentryService {
    /// Construct the service from a configuration that passes
    /// [`SentryConfig::validate`].
    ///
    /// Does **not** start the FSM; call [`bring_up`](Self::bring_up) and
    /// [`start`](Self::start) next.
    pub fn new(config: SentryConfig) -> core::result::Result<Self, ConfigError> {
        config.validate()?;
        let ctx = FsmContext::new(config)?;
        let fsm = Fsm::new(build_state_table(), StateId::Scanning);
        Ok(Self {
            fsm,
            ctx,
            sensor_degraded: false,
            tick_count: 0,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Initialise the sensor and apply the init-failure policy.  Returns
    /// the error only under [`InitFailurePolicy::Halt`].
    pub fn bring_up(&mut self, hw: &mut impl SensorPort, sink: &mut impl EventSink) -> Result<()> {
        match hw.init_sensor() {
            Ok(()) => {
                self.sensor_degraded = false;
                Ok(())
            }
            Err(e) => {
                error!("Sensor initialization failed: {}", e);
                if self.ctx.config.init_failure == InitFailurePolicy::Halt {
                    return Err(e);
                }
                self.sensor_degraded = true;
                sink.emit(&AppEvent::SensorDegraded(e));
                Ok(())
            }
        }
    }

    /// Start the FSM in its initial state (Scanning).
    pub fn start(&mut self, sink: &mut impl EventSink) {
        self.fsm.start(&mut self.ctx);
        sink.emit(&AppEvent::Started(self.fsm.current_state()));
        info!(
            "SentryService started in {:?}, sweeping {:?}",
            self.fsm.current_state(),
            self.ctx.patrol.direction()
        );
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one control cycle.
    ///
    /// `hw` satisfies **both** [`SensorPort`] and [`ActuatorPort`].
    pub fn tick(&mut self, hw: &mut (impl SensorPort + ActuatorPort), sink: &mut impl EventSink) {
        self.tick_count += 1;
        match self.fsm.current_state() {
            StateId::Scanning => self.patrol_step(hw, sink),
            StateId::Alert => self.alert_step(hw, sink),
        }
    }

    fn patrol_step(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort),
        sink: &mut impl EventSink,
    ) {
        // 1. Step in the current direction
        hw.advance_step(self.ctx.patrol.direction());
        let report = self.ctx.patrol.advance();
        if report.reversed {
            sink.emit(&AppEvent::DirectionChanged {
                direction: self.ctx.patrol.direction(),
                reason: DirectionReason::SweepBoundary,
            });
        }
        if !report.check_due {
            return;
        }

        // 2. Re-run sensor init while degraded, if the policy asks for it
        if self.sensor_degraded && self.ctx.config.init_failure == InitFailurePolicy::Reinitialize {
            match hw.init_sensor() {
                Ok(()) => {
                    info!("Sensor recovered");
                    self.sensor_degraded = false;
                    sink.emit(&AppEvent::SensorRecovered);
                }
                Err(e) => {
                    sink.emit(&AppEvent::AcquisitionFailed(e));
                    return;
                }
            }
        }

        // 3. Acquire
        if !self.acquire(hw, sink) {
            return;
        }
        if let Some(frame) = &self.ctx.reading {
            sink.emit(&AppEvent::Reading(ReadingReport {
                position: self.ctx.patrol.position(),
                sweep_range: self.ctx.patrol.sweep_range(),
                peak: frame.peak,
            }));
        }

        // 4. Decide
        self.decide(hw, sink);
    }

    fn alert_step(&mut self, hw: &mut (impl SensorPort + ActuatorPort), sink: &mut impl EventSink) {
        if self.acquire(hw, sink) {
            self.decide(hw, sink);
        }
        hw.pause_ms(self.ctx.config.alert_interval_ms);
    }

    /// Put the next frame into the context; `false` if the cycle is skipped.
    fn acquire(&mut self, hw: &mut impl SensorPort, sink: &mut impl EventSink) -> bool {
        match hw.acquire_frame() {
            Ok(frame) => {
                self.ctx.reading = Some(frame);
                true
            }
            Err(e) => {
                warn!("Error reading thermal data: {}", e);
                sink.emit(&AppEvent::AcquisitionFailed(e));
                false
            }
        }
    }

    /// Tick the FSM on the frame in the context and act on its outcome.
    fn decide(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        let prev_state = self.fsm.current_state();
        self.fsm.tick(&mut self.ctx);

        match self.ctx.outcome.take() {
            Some(ControlOutcome::Homing {
                flipped: true,
                direction,
                ..
            }) => {
                sink.emit(&AppEvent::DirectionChanged {
                    direction,
                    reason: DirectionReason::Homing,
                });
            }
            Some(ControlOutcome::HazardConfirmed(peak)) => {
                if let Some(state) = self.ctx.alert.state() {
                    sink.emit(&AppEvent::HazardConfirmed {
                        peak,
                        frame: state.last_frame.clone(),
                    });
                }
            }
            Some(ControlOutcome::AlertSustained(peak)) => {
                let distance_cm = self.ctx.routine.run(hw);
                if let Some(state) = self.ctx.alert.state() {
                    sink.emit(&AppEvent::AlertTick {
                        peak,
                        distance_cm,
                        frame: state.last_frame.clone(),
                    });
                }
            }
            Some(ControlOutcome::AlertCleared) => sink.emit(&AppEvent::AlertCleared),
            Some(ControlOutcome::Homing { flipped: false, .. }) | None => {}
        }

        let new_state = self.fsm.current_state();
        if new_state != prev_state {
            sink.emit(&AppEvent::StateChanged {
                from: prev_state,
                to: new_state,
            });
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current FSM state.
    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    pub fn direction(&self) -> Direction {
        self.ctx.patrol.direction()
    }

    pub fn position(&self) -> u16 {
        self.ctx.patrol.position()
    }

    pub fn is_sensor_degraded(&self) -> bool {
        self.sensor_degraded
    }

    /// Total control ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}
