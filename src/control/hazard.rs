//! Hazard classification of a validated frame against the target band.

use crate::config::SentryConfig;
use crate::sensors::frame::{Peak, ValidatedFrame};

/// Where the hottest cell of a frame sits relative to the band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sighting {
    /// No cell above the threshold.
    Cold,
    /// Hot, left of the band.
    BelowBand(Peak),
    /// Hot and inside `[band_min, band_max]`: a confirmed hazard.
    InBand(Peak),
    /// Hot, right of the band.
    BeyondBand(Peak),
}

/// Threshold plus column band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HazardRule {
    pub threshold: i16,
    pub band_min: u8,
    pub band_max: u8,
}

impl HazardRule {
    pub fn new(threshold: i16, band_min: u8, band_max: u8) -> Self {
        Self {
            threshold,
            band_min,
            band_max,
        }
    }

    pub fn from_config(config: &SentryConfig) -> Self {
        Self::new(config.threshold_cdeg, config.band_min_col, config.band_max_col)
    }

    pub fn classify(&self, frame: &ValidatedFrame) -> Sighting {
        let Some(peak) = frame.peak.filter(|p| p.value > self.threshold) else {
            return Sighting::Cold;
        };
        if peak.col < self.band_min {
            Sighting::BelowBand(peak)
        } else if peak.col <= self.band_max {
            Sighting::InBand(peak)
        } else {
            Sighting::BeyondBand(peak)
        }
    }

    pub fn is_hazard(&self, frame: &ValidatedFrame) -> bool {
        matches!(self.classify(frame), Sighting::InBand(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensors::frame::{VALID_ROWS, WINDOW};

    fn frame_with_peak(value: i16, col: u8) -> ValidatedFrame {
        ValidatedFrame {
            cells: [[0; WINDOW]; VALID_ROWS],
            excluded_row: 7,
            peak: Some(Peak { value, row: 3, col }),
        }
    }

    #[test]
    fn threshold_is_strict() {
        let rule = HazardRule::new(5000, 13, 15);
        assert_eq!(rule.classify(&frame_with_peak(5000, 14)), Sighting::Cold);
        assert!(rule.is_hazard(&frame_with_peak(5001, 14)));
    }

    #[test]
    fn band_edges_are_inclusive() {
        let rule = HazardRule::new(5000, 13, 15);
        assert!(rule.is_hazard(&frame_with_peak(6000, 13)));
        assert!(rule.is_hazard(&frame_with_peak(6000, 15)));
        assert!(matches!(
            rule.classify(&frame_with_peak(6000, 12)),
            Sighting::BelowBand(_)
        ));
    }

    #[test]
    fn beyond_band_is_not_a_hazard() {
        let rule = HazardRule::new(5000, 10, 12);
        assert!(matches!(
            rule.classify(&frame_with_peak(6000, 13)),
            Sighting::BeyondBand(_)
        ));
    }

    #[test]
    fn frame_without_peak_is_cold() {
        let rule = HazardRule::new(i16::MIN, 0, 15);
        let frame = ValidatedFrame {
            cells: [[0; WINDOW]; VALID_ROWS],
            excluded_row: 7,
            peak: None,
        };
        assert_eq!(rule.classify(&frame), Sighting::Cold);
    }
}
