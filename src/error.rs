//! Unified error types for the FireGuard firmware.
//!
//! Every fallible operation in the sensing path funnels into [`Error`], so
//! the control loop can log a failure and skip the current decision cycle
//! with one match.  All variants are `Copy`; nothing here allocates.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible sensing operation returns this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A bus transaction failed after the retry policy was exhausted.
    Bus(BusError),
    /// The sensor was not identified, or rejected a configuration write.
    Config(ConfigStep),
    /// The data-ready flag never set within the bounded poll count.
    AcquisitionTimeout,
    /// Frame processing produced an empty matrix.
    NoValidReadings,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus(e) => write!(f, "bus: {e}"),
            Self::Config(step) => write!(f, "config: {step} failed"),
            Self::AcquisitionTimeout => write!(f, "timeout waiting for data ready flag"),
            Self::NoValidReadings => write!(f, "no valid readings obtained"),
        }
    }
}

// ---------------------------------------------------------------------------
// Bus errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusError {
    /// The device did not acknowledge on any attempt.
    Nack,
    /// Driving or sampling one of the bus lines failed.
    Line,
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nack => write!(f, "no acknowledge after retries"),
            Self::Line => write!(f, "line I/O failed"),
        }
    }
}

impl From<BusError> for Error {
    fn from(e: BusError) -> Self {
        Self::Bus(e)
    }
}

// ---------------------------------------------------------------------------
// Configuration steps
// ---------------------------------------------------------------------------

/// The sensor bring-up step that failed.  `Identity` doubles as the
/// "device absent" condition: the identity register could not be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigStep {
    Identity,
    RefreshRate,
    Resolution,
    ChessMode,
}

impl fmt::Display for ConfigStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identity => write!(f, "device identification"),
            Self::RefreshRate => write!(f, "refresh rate"),
            Self::Resolution => write!(f, "resolution"),
            Self::ChessMode => write!(f, "chess mode"),
        }
    }
}

impl From<ConfigStep> for Error {
    fn from(step: ConfigStep) -> Self {
        Self::Config(step)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
