//! Fuzz target: `FrameProcessor::process`
//!
//! Interprets the input as little-endian window samples and checks that
//! validation never panics, keeps every cell in range, and only reports
//! a peak below the ceiling.
//!
//! cargo fuzz run fuzz_frame_processor

#![no_main]

use fireguard::sensors::frame::{FrameCalibration, FrameProcessor, RawFrame, WINDOW};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut raw = RawFrame::filled(0);
    for (i, pair) in data.chunks_exact(2).take(WINDOW * WINDOW).enumerate() {
        raw.cells[i / WINDOW][i % WINDOW] = i16::from_le_bytes([pair[0], pair[1]]);
    }

    let cal = FrameCalibration::default();
    let Ok(frame) = FrameProcessor::new(cal).process(&raw) else {
        return;
    };

    assert!((frame.excluded_row as usize) < WINDOW);
    for row in frame.cells.iter() {
        for &cell in row {
            assert!(cell >= cal.min_valid && cell <= cal.max_valid);
        }
    }
    if let Some(peak) = frame.peak {
        assert!(peak.value < cal.reasonable_ceiling);
        assert_eq!(frame.cells[peak.row as usize][peak.col as usize], peak.value);
    }
});
