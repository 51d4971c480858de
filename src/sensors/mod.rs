//! Sensor subsystem: thermal array driver, frame processing and the
//! rangefinder.
//!
//! [`ThermalCamera`] pairs the MLX90640 driver with a [`FrameProcessor`]
//! and is what the service sees through [`SensorPort`].

pub mod frame;
pub mod mlx90640;
pub mod rangefinder;

use embedded_hal::delay::DelayNs;
use log::debug;

use crate::app::ports::SensorPort;
use crate::bus::TwoWire;
use crate::config::SentryConfig;
use crate::error::Result;
use frame::{FrameProcessor, ValidatedFrame};
use mlx90640::Mlx90640;

/// MLX90640 plus frame validation behind [`SensorPort`].
pub struct ThermalCamera<B, D> {
    driver: Mlx90640<B, D>,
    processor: FrameProcessor,
}

impl<B, D> ThermalCamera<B, D>
where
    B: TwoWire,
    D: DelayNs,
{
    pub fn new(bus: B, delay: D, config: &SentryConfig) -> Self {
        let cal = config.calibration;
        let driver = Mlx90640::new(
            bus,
            delay,
            config.sensor,
            config.retry,
            (cal.origin_row, cal.origin_col),
        );
        Self {
            driver,
            processor: FrameProcessor::new(cal),
        }
    }

    pub fn driver_mut(&mut self) -> &mut Mlx90640<B, D> {
        &mut self.driver
    }
}

impl<B, D> SensorPort for ThermalCamera<B, D>
where
    B: TwoWire,
    D: DelayNs,
{
    fn init_sensor(&mut self) -> Result<()> {
        self.driver.init().map(|_| ())
    }

    fn acquire_frame(&mut self) -> Result<ValidatedFrame> {
        let raw = self.driver.acquire_frame()?;
        let frame = self.processor.process(&raw)?;
        debug!(
            "thermal: peak {} cd, excluded row {}",
            frame.peak_value(),
            frame.excluded_row
        );
        Ok(frame)
    }
}
