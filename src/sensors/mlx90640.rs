//! MLX90640 thermal array driver.
//!
//! Register protocol on top of the [`TwoWire`] primitives: every register
//! access is one complete transaction
//!
//! ```text
//!   read : S addr+W regHi regLo  Sr addr+R (msb A lsb A/N)… P
//!   write: S addr+W regHi regLo  dataHi dataLo                P
//! ```
//!
//! retried as a whole on any missing acknowledge, up to
//! [`RetryPolicy::attempts`] times.  Configuration steps are
//! read-modify-write on the control register and report which step failed.
//!
//! Pixel values are converted with the linear approximation
//! `raw * 10 - 1000` into centidegrees; the full Melexis calibration
//! pipeline is not used.

use embedded_hal::delay::DelayNs;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::frame::{RawFrame, SENSOR_COLS};
use crate::bus::{RetryPolicy, TwoWire};
use crate::config::ConfigError;
use crate::error::{BusError, ConfigStep, Error, Result};

// ---------------------------------------------------------------------------
// Register map
// ---------------------------------------------------------------------------

/// 7-bit bus address.
pub const DEVICE_ADDRESS: u8 = 0x33;

/// Device identity word; only used to confirm presence.
pub const REG_DEVICE_ID: u16 = 0x2407;

pub const REG_STATUS: u16 = 0x8000;
/// New frame available.
pub const STATUS_DATA_READY: u16 = 0x0008;
/// Written to the status register to acknowledge a frame.
pub const STATUS_CLEAR: u16 = 0x0030;

pub const REG_CONTROL: u16 = 0x800D;
const REFRESH_SHIFT: u16 = 7;
const REFRESH_MASK: u16 = 0x07 << REFRESH_SHIFT;
const RESOLUTION_SHIFT: u16 = 10;
const RESOLUTION_MASK: u16 = 0x03 << RESOLUTION_SHIFT;
const CHESS_BIT: u16 = 1 << 12;

pub const PIXEL_RAM_BASE: u16 = 0x0400;

/// Register address of a pixel in full-field coordinates.
pub const fn pixel_address(row: usize, col: usize) -> u16 {
    PIXEL_RAM_BASE + ((row * SENSOR_COLS + col) * 2) as u16
}

/// Raw pixel word to centidegrees, 16-bit wrapping.
pub fn raw_to_centidegrees(word: u16) -> i16 {
    (word as i16).wrapping_mul(10).wrapping_sub(1000)
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Values written once at bring-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorSettings {
    /// Control register bits 9:7 (3 = 4 Hz).
    pub refresh_rate: u8,
    /// Control register bits 11:10 (2 = 18-bit).
    pub resolution: u8,
    /// Chess pixel ordering (bit 12); interleaved when false.
    pub chess: bool,
    /// Status polls before an acquisition times out.
    pub ready_poll_attempts: u8,
    /// Sleep between not-ready polls (milliseconds).
    pub ready_poll_interval_ms: u32,
    /// Settle time before the identity read (milliseconds).
    pub power_up_ms: u32,
}

impl Default for SensorSettings {
    fn default() -> Self {
        Self {
            refresh_rate: 0x03,
            resolution: 0x02,
            chess: true,
            ready_poll_attempts: 10,
            ready_poll_interval_ms: 10,
            power_up_ms: 50,
        }
    }
}

impl SensorSettings {
    pub fn validate(&self) -> core::result::Result<(), ConfigError> {
        if self.refresh_rate > 0x07 {
            return Err(ConfigError::ValidationFailed("refresh_rate code above 7"));
        }
        if self.resolution > 0x03 {
            return Err(ConfigError::ValidationFailed("resolution code above 3"));
        }
        if self.ready_poll_attempts == 0 {
            return Err(ConfigError::ValidationFailed("ready_poll_attempts is zero"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

pub struct Mlx90640<B, D> {
    bus: B,
    delay: D,
    address: u8,
    settings: SensorSettings,
    retry: RetryPolicy,
    origin_row: usize,
    origin_col: usize,
}

impl<B, D> Mlx90640<B, D>
where
    B: TwoWire,
    D: DelayNs,
{
    /// Driver for the window whose top-left sensor pixel is
    /// `(origin_row, origin_col)`.
    pub fn new(
        bus: B,
        delay: D,
        settings: SensorSettings,
        retry: RetryPolicy,
        origin: (u8, u8),
    ) -> Self {
        Self {
            bus,
            delay,
            address: DEVICE_ADDRESS,
            settings,
            retry,
            origin_row: origin.0 as usize,
            origin_col: origin.1 as usize,
        }
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    // ── Bring-up ──────────────────────────────────────────────

    /// Confirm the device answers, then apply refresh rate, resolution and
    /// pixel ordering.  Returns the identity word.
    pub fn init(&mut self) -> Result<u16> {
        self.delay.delay_ms(self.settings.power_up_ms);

        let id = self.read_register(REG_DEVICE_ID).map_err(|e| {
            warn!("mlx90640: failed to read device ID ({})", e);
            ConfigStep::Identity
        })?;
        info!("mlx90640: device ID 0x{:04X}", id);

        let refresh = (self.settings.refresh_rate as u16) << REFRESH_SHIFT;
        self.update_control(ConfigStep::RefreshRate, REFRESH_MASK, refresh)?;

        let resolution = (self.settings.resolution as u16) << RESOLUTION_SHIFT;
        self.update_control(ConfigStep::Resolution, RESOLUTION_MASK, resolution)?;

        let chess = if self.settings.chess { CHESS_BIT } else { 0 };
        self.update_control(ConfigStep::ChessMode, CHESS_BIT, chess)?;

        info!("mlx90640: configured successfully");
        Ok(id)
    }

    fn update_control(&mut self, step: ConfigStep, mask: u16, bits: u16) -> Result<()> {
        let current = self.read_register(REG_CONTROL).map_err(|e| {
            warn!("mlx90640: {} - control read failed ({})", step, e);
            step
        })?;
        let next = (current & !mask) | (bits & mask);
        self.write_register(REG_CONTROL, next).map_err(|e| {
            warn!("mlx90640: failed to set {} ({})", step, e);
            step
        })?;
        Ok(())
    }

    // ── Acquisition ───────────────────────────────────────────

    /// Poll the status register until a new frame is flagged, then clear
    /// the flag.  A failed status read uses up a poll without sleeping.
    pub fn wait_data_ready(&mut self) -> Result<()> {
        for _ in 0..self.settings.ready_poll_attempts {
            let Ok(status) = self.read_register(REG_STATUS) else {
                continue;
            };
            if status & STATUS_DATA_READY != 0 {
                if let Err(e) = self.write_register(REG_STATUS, STATUS_CLEAR) {
                    warn!("mlx90640: could not clear data-ready flag ({})", e);
                }
                return Ok(());
            }
            self.delay.delay_ms(self.settings.ready_poll_interval_ms);
        }
        Err(Error::AcquisitionTimeout)
    }

    /// Block for the next frame and read the configured window.
    pub fn acquire_frame(&mut self) -> Result<RawFrame> {
        self.wait_data_ready()?;

        let mut raw = RawFrame::filled(0);
        for (i, row) in raw.cells.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                let addr = pixel_address(self.origin_row + i, self.origin_col + j);
                *cell = raw_to_centidegrees(self.read_register(addr)?);
            }
        }
        Ok(raw)
    }

    // ── Register transactions ─────────────────────────────────

    pub fn read_register(&mut self, reg: u16) -> core::result::Result<u16, BusError> {
        let mut word = [0u16; 1];
        self.read_registers(reg, &mut word)?;
        Ok(word[0])
    }

    /// Read `out.len()` consecutive words starting at `reg`.
    pub fn read_registers(
        &mut self,
        reg: u16,
        out: &mut [u16],
    ) -> core::result::Result<(), BusError> {
        for attempt in 1..=self.retry.attempts {
            if self.try_read(reg, out)? {
                return Ok(());
            }
            debug!("mlx90640: read 0x{:04X} not acknowledged (attempt {})", reg, attempt);
        }
        Err(BusError::Nack)
    }

    pub fn write_register(&mut self, reg: u16, value: u16) -> core::result::Result<(), BusError> {
        for attempt in 1..=self.retry.attempts {
            if self.try_write(reg, value)? {
                return Ok(());
            }
            debug!("mlx90640: write 0x{:04X} not acknowledged (attempt {})", reg, attempt);
        }
        Err(BusError::Nack)
    }

    /// Write bytes until one is not acknowledged.
    fn send(&mut self, bytes: &[u8]) -> core::result::Result<bool, BusError> {
        for &b in bytes {
            if !self.bus.write_byte(b)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn abort(&mut self) -> core::result::Result<bool, BusError> {
        self.bus.stop()?;
        Ok(false)
    }

    fn try_read(&mut self, reg: u16, out: &mut [u16]) -> core::result::Result<bool, BusError> {
        let [hi, lo] = reg.to_be_bytes();
        self.bus.start()?;
        if !self.send(&[self.address << 1, hi, lo])? {
            return self.abort();
        }
        self.bus.start()?;
        if !self.send(&[(self.address << 1) | 1])? {
            return self.abort();
        }

        let last = out.len().saturating_sub(1);
        for (i, word) in out.iter_mut().enumerate() {
            let msb = self.bus.read_byte(true)?;
            let lsb = self.bus.read_byte(i < last)?;
            *word = u16::from_be_bytes([msb, lsb]);
        }
        self.bus.stop()?;
        Ok(true)
    }

    fn try_write(&mut self, reg: u16, value: u16) -> core::result::Result<bool, BusError> {
        let [hi, lo] = reg.to_be_bytes();
        let [vhi, vlo] = value.to_be_bytes();
        self.bus.start()?;
        if !self.send(&[self.address << 1, hi, lo, vhi, vlo])? {
            return self.abort();
        }
        self.bus.stop()?;
        Ok(true)
    }
}
