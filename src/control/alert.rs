//! Alert mode: re-measure the confirmed hazard and drive the alarm outputs.

use log::info;

use super::hazard::{HazardRule, Sighting};
use crate::app::ports::ActuatorPort;
use crate::config::SentryConfig;
use crate::sensors::frame::{Peak, ValidatedFrame};

/// The last frame consumed in alert mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertState {
    pub last_frame: ValidatedFrame,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertDecision {
    /// The hazard still holds at `Peak`.
    Sustain(Peak),
    Clear,
}

pub struct AlertMonitor {
    rule: HazardRule,
    state: Option<AlertState>,
}

impl AlertMonitor {
    pub fn new(rule: HazardRule) -> Self {
        Self { rule, state: None }
    }

    /// Enter alert mode with the frame that confirmed the hazard.
    pub fn arm(&mut self, trigger: ValidatedFrame) {
        self.state = Some(AlertState {
            last_frame: trigger,
        });
    }

    pub fn disarm(&mut self) {
        self.state = None;
    }

    pub fn is_armed(&self) -> bool {
        self.state.is_some()
    }

    pub fn state(&self) -> Option<&AlertState> {
        self.state.as_ref()
    }

    pub fn observe(&mut self, frame: ValidatedFrame) -> AlertDecision {
        let decision = match self.rule.classify(&frame) {
            Sighting::InBand(peak) => AlertDecision::Sustain(peak),
            _ => AlertDecision::Clear,
        };
        self.state = Some(AlertState { last_frame: frame });
        decision
    }
}

/// Range, sound, then sweep the indicator between two angles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertRoutine {
    pub rest_deg: u8,
    pub raised_deg: u8,
    pub hold_ms: u32,
}

impl AlertRoutine {
    pub fn from_config(config: &SentryConfig) -> Self {
        Self {
            rest_deg: config.indicator_rest_deg,
            raised_deg: config.indicator_raised_deg,
            hold_ms: config.indicator_hold_ms,
        }
    }

    /// Returns the measured distance in centimetres.
    pub fn run(&self, hw: &mut impl ActuatorPort) -> f32 {
        let distance = hw.range_distance();
        info!("alert: distance {:.2} cm", distance);
        hw.sound_alarm();
        hw.set_indicator_angle(self.rest_deg);
        hw.pause_ms(self.hold_ms);
        hw.set_indicator_angle(self.raised_deg);
        hw.pause_ms(self.hold_ms);
        distance
    }
}
