//! System configuration parameters
//!
//! All tunable parameters for the FireGuard sentry.  Defaults match the
//! deployed unit; per-unit overrides arrive as JSON via
//! [`SentryConfig::from_json`] and are validated before use.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::bus::{BusTiming, RetryPolicy};
use crate::control::patrol::Direction;
use crate::sensors::frame::{FrameCalibration, WINDOW};
use crate::sensors::mlx90640::SensorSettings;

/// What the service does when sensor bring-up fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InitFailurePolicy {
    /// Keep patrolling with the sensor marked degraded; acquisitions fail
    /// and are skipped cycle by cycle.
    Continue,
    /// Like `Continue`, but re-run sensor init at every check interval
    /// until it succeeds.
    Reinitialize,
    /// Refuse to start patrolling.
    Halt,
}

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentryConfig {
    // --- Detection ---
    /// Peak temperature (centidegrees) that counts as a hazard.
    pub threshold_cdeg: i16,
    /// First column of the target band (compacted frame coordinates).
    pub band_min_col: u8,
    /// Last column of the target band, inclusive.
    pub band_max_col: u8,

    // --- Patrol ---
    /// Steps per sweep leg before the direction flips.
    pub sweep_range_steps: u16,
    /// A reading is taken every this many steps.
    pub steps_per_check: u16,
    /// Direction the head starts sweeping in.
    pub initial_direction: Direction,
    /// Direction that moves a peak below the band towards it.
    pub homing_direction: Direction,
    /// Stepper pulse half-width (microseconds).
    pub step_pulse_us: u32,
    /// Settle delay after each step (milliseconds).
    pub step_delay_ms: u32,

    // --- Alert ---
    /// Alert re-measurement cadence (milliseconds).
    pub alert_interval_ms: u32,
    /// Indicator servo angle at the start of the alert sweep.
    pub indicator_rest_deg: u8,
    /// Indicator servo angle at the end of the alert sweep.
    pub indicator_raised_deg: u8,
    /// Hold after each indicator move (milliseconds).
    pub indicator_hold_ms: u32,

    // --- Sensor ---
    pub sensor: SensorSettings,
    pub bus_timing: BusTiming,
    pub retry: RetryPolicy,
    pub calibration: FrameCalibration,
    pub init_failure: InitFailurePolicy,
}

impl Default for SentryConfig {
    fn default() -> Self {
        Self {
            // Detection
            threshold_cdeg: 5000, // 50.00 °C
            band_min_col: 13,
            band_max_col: 15,

            // Patrol
            sweep_range_steps: 800, // ~120° of travel
            steps_per_check: 20,
            initial_direction: Direction::Retreating,
            homing_direction: Direction::Retreating,
            step_pulse_us: 2000,
            step_delay_ms: 10,

            // Alert
            alert_interval_ms: 1000, // 1 Hz
            indicator_rest_deg: 0,
            indicator_raised_deg: 105,
            indicator_hold_ms: 1000,

            // Sensor
            sensor: SensorSettings::default(),
            bus_timing: BusTiming::default(),
            retry: RetryPolicy::default(),
            calibration: FrameCalibration::default(),
            init_failure: InitFailurePolicy::Reinitialize,
        }
    }
}

impl SentryConfig {
    /// Parse a JSON override document.  Missing fields keep their defaults;
    /// the result is validated before it is returned.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|_| ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the control loop cannot run with.  Nothing is clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.band_min_col > self.band_max_col {
            return Err(ConfigError::ValidationFailed("band_min_col > band_max_col"));
        }
        if self.band_max_col as usize >= WINDOW {
            return Err(ConfigError::ValidationFailed("band_max_col outside frame"));
        }
        if self.sweep_range_steps == 0 {
            return Err(ConfigError::ValidationFailed("sweep_range_steps is zero"));
        }
        if self.steps_per_check == 0 {
            return Err(ConfigError::ValidationFailed("steps_per_check is zero"));
        }
        if self.indicator_rest_deg > 180 || self.indicator_raised_deg > 180 {
            return Err(ConfigError::ValidationFailed("indicator angle above 180"));
        }
        if self.retry.attempts == 0 {
            return Err(ConfigError::ValidationFailed("retry.attempts is zero"));
        }
        self.sensor.validate()?;
        self.calibration.validate()?;
        Ok(())
    }
}

/// Errors from parsing or validating a [`SentryConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The override document is not valid JSON for this schema.
    Parse,
    /// A field failed range validation.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse => write!(f, "config parse error"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}
