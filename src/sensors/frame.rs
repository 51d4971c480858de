//! Frame validation and peak search.
//!
//! The driver reads a fixed square window out of the sensor's 24×32 field.
//! One row of that window carries non-temperature data, so processing is
//! two passes over the raw samples:
//!
//! 1. **Defect scan**: the first cell whose magnitude exceeds
//!    `extreme_threshold` marks its row for exclusion.  Without such a
//!    cell the calibrated fallback row is excluded.
//! 2. **Validate, compact, search**: every other row is copied into a
//!    dense `(WINDOW-1) × WINDOW` matrix.  Cells on the reference-pixel
//!    row become `ambient`; all others are clamped to the valid range.
//!    The peak is the largest copied value strictly below
//!    `reasonable_ceiling`, first occurrence in row-major order, reported
//!    in compacted coordinates.
//!
//! All temperatures are centidegrees.

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::error::{Error, Result};

/// Sensor field height (rows).
pub const SENSOR_ROWS: usize = 24;
/// Sensor field width (columns).
pub const SENSOR_COLS: usize = 32;
/// Edge length of the square window read from the centre of the field.
pub const WINDOW: usize = 16;
/// Rows left after the defect row is removed.
pub const VALID_ROWS: usize = WINDOW - 1;

/// Sensor-specific calibration facts.  Overridable per deployed unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameCalibration {
    /// First sensor row of the window.
    pub origin_row: u8,
    /// First sensor column of the window.
    pub origin_col: u8,
    /// Magnitude above which a raw cell marks its row as defective.
    pub extreme_threshold: i16,
    /// Window row excluded when no cell crosses `extreme_threshold`.
    pub fallback_defect_row: u8,
    /// Sensor row that carries reference pixels.
    pub reference_row: u8,
    /// Value substituted for every reference-row cell.
    pub ambient: i16,
    pub min_valid: i16,
    pub max_valid: i16,
    /// Peak candidates must be strictly below this.
    pub reasonable_ceiling: i16,
}

impl Default for FrameCalibration {
    fn default() -> Self {
        Self {
            origin_row: ((SENSOR_ROWS - WINDOW) / 2) as u8,
            origin_col: ((SENSOR_COLS - WINDOW) / 2) as u8,
            extreme_threshold: 14_000, // 140 °C
            fallback_defect_row: 7,
            reference_row: 9,
            ambient: -2_000,
            min_valid: -4_000, // -40 °C
            max_valid: 30_000, // 300 °C
            reasonable_ceiling: 10_000, // 100 °C
        }
    }
}

impl FrameCalibration {
    pub fn validate(&self) -> core::result::Result<(), ConfigError> {
        if self.origin_row as usize + WINDOW > SENSOR_ROWS
            || self.origin_col as usize + WINDOW > SENSOR_COLS
        {
            return Err(ConfigError::ValidationFailed("window outside sensor field"));
        }
        if self.fallback_defect_row as usize >= WINDOW {
            return Err(ConfigError::ValidationFailed("fallback_defect_row outside window"));
        }
        let window_rows = self.origin_row..self.origin_row.saturating_add(WINDOW as u8);
        if !window_rows.contains(&self.reference_row) {
            return Err(ConfigError::ValidationFailed("reference_row outside window"));
        }
        if self.min_valid >= self.max_valid {
            return Err(ConfigError::ValidationFailed("min_valid >= max_valid"));
        }
        if !(self.min_valid..=self.max_valid).contains(&self.ambient) {
            return Err(ConfigError::ValidationFailed("ambient outside valid range"));
        }
        if self.extreme_threshold < 0 {
            return Err(ConfigError::ValidationFailed("extreme_threshold negative"));
        }
        Ok(())
    }
}

/// Raw window samples, row-major, in centidegrees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    pub cells: [[i16; WINDOW]; WINDOW],
}

impl RawFrame {
    pub fn filled(value: i16) -> Self {
        Self {
            cells: [[value; WINDOW]; WINDOW],
        }
    }
}

/// Hottest accepted cell of a frame, in compacted coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Peak {
    pub value: i16,
    pub row: u8,
    pub col: u8,
}

/// A frame with the defect row removed and every cell validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedFrame {
    pub cells: [[i16; WINDOW]; VALID_ROWS],
    /// Window row that was dropped.
    pub excluded_row: u8,
    /// `None` when no cell was below the reasonable ceiling.
    pub peak: Option<Peak>,
}

impl ValidatedFrame {
    /// Peak value, or `i16::MIN` when the frame has no acceptable cell.
    pub fn peak_value(&self) -> i16 {
        self.peak.map_or(i16::MIN, |p| p.value)
    }
}

/// Turns raw windows into validated frames.
#[derive(Debug, Clone, Copy)]
pub struct FrameProcessor {
    cal: FrameCalibration,
}

impl FrameProcessor {
    pub fn new(cal: FrameCalibration) -> Self {
        Self { cal }
    }

    pub fn process(&self, raw: &RawFrame) -> Result<ValidatedFrame> {
        let excluded = self.find_defect_row(raw);
        log::debug!("frame: removing row {} with extreme values", excluded);

        let mut cells = [[0i16; WINDOW]; VALID_ROWS];
        let mut peak: Option<Peak> = None;
        let mut valid_readings = 0usize;

        for (src_row, row) in raw.cells.iter().enumerate() {
            if src_row == excluded {
                continue;
            }
            let dest_row = if src_row > excluded { src_row - 1 } else { src_row };
            let sensor_row = src_row + self.cal.origin_row as usize;

            for (col, &value) in row.iter().enumerate() {
                let validated = self.validate_cell(value, sensor_row);
                cells[dest_row][col] = validated;
                valid_readings += 1;

                let beats_peak = peak.is_none_or(|p| validated > p.value);
                if validated < self.cal.reasonable_ceiling && beats_peak {
                    peak = Some(Peak {
                        value: validated,
                        row: dest_row as u8,
                        col: col as u8,
                    });
                }
            }
        }

        if valid_readings == 0 {
            return Err(Error::NoValidReadings);
        }

        Ok(ValidatedFrame {
            cells,
            excluded_row: excluded as u8,
            peak,
        })
    }

    /// Pass 1: window row of the first extreme cell, else the fallback.
    pub fn find_defect_row(&self, raw: &RawFrame) -> usize {
        let limit = self.cal.extreme_threshold.unsigned_abs();
        raw.cells
            .iter()
            .position(|row| row.iter().any(|v| v.unsigned_abs() > limit))
            .unwrap_or(self.cal.fallback_defect_row as usize)
    }

    /// Clamp law for one cell.  `sensor_row` is in full-field coordinates.
    pub fn validate_cell(&self, value: i16, sensor_row: usize) -> i16 {
        if sensor_row == self.cal.reference_row as usize {
            return self.cal.ambient;
        }
        value.clamp(self.cal.min_valid, self.cal.max_valid)
    }
}

impl Default for FrameProcessor {
    fn default() -> Self {
        Self::new(FrameCalibration::default())
    }
}
