//! Serial status lines read by the companion dashboard.
//!
//! Lines are built into fixed-capacity [`heapless::String`]s; the longest
//! (a matrix row) is well under [`LINE_CAPACITY`].

use core::fmt::{self, Write};

use heapless::String;

use crate::app::events::ReadingReport;
use crate::control::patrol::Direction;
use crate::sensors::frame::{Peak, ValidatedFrame, WINDOW};

pub const LINE_CAPACITY: usize = 128;
pub type Line = String<LINE_CAPACITY>;

pub const MATRIX_TITLE: &str = "Center Matrix Data (abnormal row removed):";
pub const MATRIX_END: &str = "---";

/// Centidegrees shown as degrees with two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Centidegrees(pub i16);

impl fmt::Display for Centidegrees {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

/// Dashboard name of a sweep direction.
pub fn direction_label(direction: Direction) -> &'static str {
    match direction {
        Direction::Advancing => "Clockwise",
        Direction::Retreating => "Counter-clockwise",
    }
}

fn line(args: fmt::Arguments<'_>) -> Line {
    let mut out = Line::new();
    // truncated on overflow; no caller comes close
    let _ = out.write_fmt(args);
    out
}

pub fn reading_line(report: &ReadingReport) -> Line {
    match report.peak {
        Some(p) => line(format_args!(
            "Pos: {}/{} | Max: {}\u{00b0}C at [{}][{}]",
            report.position,
            report.sweep_range,
            Centidegrees(p.value),
            p.row,
            p.col
        )),
        None => line(format_args!(
            "Pos: {}/{} | Max: none",
            report.position, report.sweep_range
        )),
    }
}

/// `"{prefix}: {t}°C at [r][c]"`.
pub fn peak_line(prefix: &str, peak: &Peak) -> Line {
    line(format_args!(
        "{}: {}\u{00b0}C at [{}][{}]",
        prefix,
        Centidegrees(peak.value),
        peak.row,
        peak.col
    ))
}

pub fn distance_line(distance_cm: f32) -> Line {
    line(format_args!("Distance to fire: {:.2} cm", distance_cm))
}

/// Matrix dump in whole degrees, one line per call of `emit`.
pub fn write_matrix(frame: &ValidatedFrame, mut emit: impl FnMut(&str)) {
    emit(MATRIX_TITLE);

    let mut header = Line::new();
    let _ = header.push_str("     ");
    for col in 0..WINDOW {
        let _ = write!(header, "{:4}", col);
    }
    emit(&header);

    let mut rule = Line::new();
    for _ in 0..5 + WINDOW * 4 {
        let _ = rule.push('-');
    }
    emit(&rule);

    for (i, row) in frame.cells.iter().enumerate() {
        let mut out = line(format_args!("{:2} | ", i));
        for &cell in row {
            let _ = write!(out, "{:4}", cell / 100);
        }
        emit(&out);
    }

    emit(MATRIX_END);
}
