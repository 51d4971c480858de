//! Frame processing and hazard classification through the public API.

use fireguard::control::hazard::{HazardRule, Sighting};
use fireguard::sensors::frame::{FrameCalibration, FrameProcessor, RawFrame, WINDOW};

fn processor() -> FrameProcessor {
    FrameProcessor::new(FrameCalibration::default())
}

#[test]
fn hot_spot_in_band_is_a_hazard() {
    let mut raw = RawFrame::filled(2_400);
    raw.cells[3][14] = 6_500;

    let frame = processor().process(&raw).unwrap();
    // no extreme cell: fallback row 7 dropped, row 3 keeps its index
    assert_eq!(frame.excluded_row, 7);
    let rule = HazardRule::new(5_000, 13, 15);
    assert!(matches!(rule.classify(&frame), Sighting::InBand(p) if p.row == 3 && p.col == 14));
    assert!(rule.is_hazard(&frame));
}

#[test]
fn extreme_row_shifts_later_rows_up() {
    let mut raw = RawFrame::filled(2_400);
    raw.cells[2][0] = -15_000;
    raw.cells[10][1] = 6_500;

    let frame = processor().process(&raw).unwrap();
    assert_eq!(frame.excluded_row, 2);
    let peak = frame.peak.unwrap();
    assert_eq!((peak.row, peak.col), (9, 1));

    let rule = HazardRule::new(5_000, 13, 15);
    assert!(matches!(rule.classify(&frame), Sighting::BelowBand(_)));
}

#[test]
fn readings_above_ceiling_never_become_the_peak() {
    let mut raw = RawFrame::filled(2_400);
    raw.cells[0][15] = 12_000;
    raw.cells[1][15] = 5_500;

    let frame = processor().process(&raw).unwrap();
    assert_eq!(frame.cells[0][15], 12_000);
    assert_eq!(frame.peak_value(), 5_500);
}

#[test]
fn cold_frame_has_no_sighting() {
    let frame = processor().process(&RawFrame::filled(2_000)).unwrap();
    let rule = HazardRule::new(5_000, 13, 15);
    assert!(matches!(rule.classify(&frame), Sighting::Cold));
    assert_eq!(frame.cells[0].len(), WINDOW);
}
