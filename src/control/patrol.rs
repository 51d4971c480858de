//! Sweep bookkeeping and the per-check patrol decision.
//!
//! ```text
//!   step ─▶ position += 1 ─▶ position ≥ range ? flip, position = 0
//!                                   │
//!                      position % steps_per_check == 0 ?
//!                                   ▼
//!                          evaluate(frame)
//!              Cold / BeyondBand ─▶ Hold
//!              BelowBand         ─▶ Homing (flip unless already homing)
//!              InBand            ─▶ HazardConfirmed
//! ```

use core::num::NonZeroU16;

use log::info;
use serde::{Deserialize, Serialize};

use super::hazard::{HazardRule, Sighting};
use crate::config::{ConfigError, SentryConfig};
use crate::sensors::frame::{Peak, ValidatedFrame};

/// Sweep direction of the head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Clockwise; stepper DIR line high.
    Advancing,
    /// Counter-clockwise; stepper DIR line low.
    Retreating,
}

impl Direction {
    pub fn flip(self) -> Self {
        match self {
            Self::Advancing => Self::Retreating,
            Self::Retreating => Self::Advancing,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatrolState {
    pub direction: Direction,
    /// Steps taken in the current sweep leg, `< sweep_range`.
    pub position: u16,
}

/// Result of one actuator step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepReport {
    /// The sweep bound was reached and the direction flipped.
    pub reversed: bool,
    /// A reading is due at this position.
    pub check_due: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatrolDecision {
    Hold,
    /// Hot spot below the band; `flipped` is false if already homing.
    Homing { peak: Peak, flipped: bool },
    HazardConfirmed(Peak),
}

pub struct PatrolController {
    state: PatrolState,
    rule: HazardRule,
    sweep_range: NonZeroU16,
    steps_per_check: NonZeroU16,
    homing: Direction,
}

impl PatrolController {
    /// Fails if the sweep range or the check interval is zero.
    pub fn new(config: &SentryConfig) -> Result<Self, ConfigError> {
        let sweep_range = NonZeroU16::new(config.sweep_range_steps)
            .ok_or(ConfigError::ValidationFailed("sweep_range_steps is zero"))?;
        let steps_per_check = NonZeroU16::new(config.steps_per_check)
            .ok_or(ConfigError::ValidationFailed("steps_per_check is zero"))?;
        Ok(Self {
            state: PatrolState {
                direction: config.initial_direction,
                position: 0,
            },
            rule: HazardRule::from_config(config),
            sweep_range,
            steps_per_check,
            homing: config.homing_direction,
        })
    }

    pub fn direction(&self) -> Direction {
        self.state.direction
    }

    pub fn position(&self) -> u16 {
        self.state.position
    }

    pub fn sweep_range(&self) -> u16 {
        self.sweep_range.get()
    }

    /// Account for one step already taken in the current direction.
    pub fn advance(&mut self) -> StepReport {
        self.state.position += 1;

        let reversed = self.state.position >= self.sweep_range.get();
        if reversed {
            self.state.direction = self.state.direction.flip();
            self.state.position = 0;
        }

        StepReport {
            reversed,
            check_due: self.state.position % self.steps_per_check.get() == 0,
        }
    }

    pub fn evaluate(&mut self, frame: &ValidatedFrame) -> PatrolDecision {
        match self.rule.classify(frame) {
            Sighting::Cold | Sighting::BeyondBand(_) => PatrolDecision::Hold,
            Sighting::InBand(peak) => PatrolDecision::HazardConfirmed(peak),
            Sighting::BelowBand(peak) => {
                let flipped = self.state.direction != self.homing;
                if flipped {
                    self.state.direction = self.state.direction.flip();
                } else {
                    info!("No need to change direction, keep moving");
                }
                PatrolDecision::Homing { peak, flipped }
            }
        }
    }

    /// Back to the start of a sweep leg, keeping the last direction.
    pub fn resume(&mut self) {
        self.state.position = 0;
    }
}
