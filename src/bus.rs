//! Software-timed two-wire bus master.
//!
//! The thermal sensor hangs off two general-purpose pins that are toggled
//! directly rather than through an I2C peripheral.  Both lines are treated
//! as open-drain: `set_high` releases the line to its pull-up, `set_low`
//! drives it to ground.
//!
//! ```text
//!   SDA ──┐ ┌──bit──┐ ┌──bit──      data changes only while SCL is low,
//!   SCL ────┘ └─────┘ └──           is sampled while SCL is high
//! ```
//!
//! The primitives never retry.  A missing acknowledge is reported through
//! the `bool` returned by [`TwoWire::write_byte`]; composite transactions
//! and their retry policy live in the sensor driver.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use serde::{Deserialize, Serialize};

use crate::error::BusError;

/// Bit-level bus primitives.  Implemented by [`BitBangBus`] on hardware
/// and by scripted fakes in tests.
pub trait TwoWire {
    /// Start (or repeated start) condition.
    fn start(&mut self) -> Result<(), BusError>;

    /// Stop condition; leaves both lines released.
    fn stop(&mut self) -> Result<(), BusError>;

    /// Shift out one byte MSB first.  Returns `true` if the device
    /// acknowledged.
    fn write_byte(&mut self, byte: u8) -> Result<bool, BusError>;

    /// Shift in one byte MSB first, then acknowledge it if `ack` is set.
    fn read_byte(&mut self, ack: bool) -> Result<u8, BusError>;
}

/// Settle delays of the bit-banged waveform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusTiming {
    /// Delay between asserting a line and the next edge (microseconds).
    pub half_bit_us: u32,
    /// Idle time with both lines released before the bus-reset stop.
    pub idle_reset_ms: u32,
}

impl Default for BusTiming {
    fn default() -> Self {
        Self {
            half_bit_us: 5,
            idle_reset_ms: 10,
        }
    }
}

/// How many times a composite register transaction is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub attempts: u8,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { attempts: 3 }
    }
}

/// Bit-banged bus master over two GPIO lines.
pub struct BitBangBus<SDA, SCL, D> {
    sda: SDA,
    scl: SCL,
    delay: D,
    timing: BusTiming,
}

impl<SDA, SCL, D> BitBangBus<SDA, SCL, D>
where
    SDA: OutputPin + InputPin,
    SCL: OutputPin,
    D: DelayNs,
{
    /// Take ownership of the lines and reset the bus: release both lines,
    /// let them idle, then issue a stop to terminate any transaction a
    /// device may still think is in progress.
    pub fn new(sda: SDA, scl: SCL, delay: D, timing: BusTiming) -> Result<Self, BusError> {
        let mut bus = Self {
            sda,
            scl,
            delay,
            timing,
        };
        bus.sda_release()?;
        bus.scl_high()?;
        bus.delay.delay_ms(timing.idle_reset_ms);
        bus.stop()?;
        log::debug!("bus: lines released, idle reset done");
        Ok(bus)
    }

    fn settle(&mut self) {
        self.delay.delay_us(self.timing.half_bit_us);
    }

    fn sda_release(&mut self) -> Result<(), BusError> {
        self.sda.set_high().map_err(|_| BusError::Line)
    }

    fn sda_drive_low(&mut self) -> Result<(), BusError> {
        self.sda.set_low().map_err(|_| BusError::Line)
    }

    fn sda_set(&mut self, high: bool) -> Result<(), BusError> {
        if high {
            self.sda_release()
        } else {
            self.sda_drive_low()
        }
    }

    fn sda_is_high(&mut self) -> Result<bool, BusError> {
        self.sda.is_high().map_err(|_| BusError::Line)
    }

    fn scl_high(&mut self) -> Result<(), BusError> {
        self.scl.set_high().map_err(|_| BusError::Line)?;
        self.settle();
        Ok(())
    }

    fn scl_low(&mut self) -> Result<(), BusError> {
        self.scl.set_low().map_err(|_| BusError::Line)?;
        self.settle();
        Ok(())
    }
}

impl<SDA, SCL, D> TwoWire for BitBangBus<SDA, SCL, D>
where
    SDA: OutputPin + InputPin,
    SCL: OutputPin,
    D: DelayNs,
{
    fn start(&mut self) -> Result<(), BusError> {
        self.sda_release()?;
        self.scl_high()?;
        self.settle();
        // SDA falling while SCL is high
        self.sda_drive_low()?;
        self.settle();
        self.scl_low()
    }

    fn stop(&mut self) -> Result<(), BusError> {
        self.sda_drive_low()?;
        self.settle();
        self.scl_high()?;
        self.settle();
        // SDA rising while SCL is high
        self.sda_release()?;
        self.settle();
        Ok(())
    }

    fn write_byte(&mut self, byte: u8) -> Result<bool, BusError> {
        for bit in (0..8).rev() {
            self.sda_set(byte & (1 << bit) != 0)?;
            self.settle();
            self.scl_high()?;
            self.scl_low()?;
        }

        // Ninth clock: release SDA and let the device pull it low.
        self.sda_release()?;
        self.settle();
        self.scl_high()?;
        let nack = self.sda_is_high()?;
        self.scl_low()?;

        Ok(!nack)
    }

    fn read_byte(&mut self, ack: bool) -> Result<u8, BusError> {
        let mut data = 0u8;
        self.sda_release()?;

        for _ in 0..8 {
            data <<= 1;
            self.scl_high()?;
            if self.sda_is_high()? {
                data |= 1;
            }
            self.scl_low()?;
        }

        self.sda_set(!ack)?;
        self.settle();
        self.scl_high()?;
        self.scl_low()?;
        self.sda_release()?;

        Ok(data)
    }
}
