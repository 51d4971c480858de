//! HC-SR04 style ultrasonic rangefinder.
//!
//! Polled, no interrupts: the echo line is sampled once per microsecond
//! with a bounded wait on both edges.  A missing or overlong echo reads as
//! [`MAX_RANGE_CM`].

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use log::debug;

/// Reported when nothing echoes back in time.
pub const MAX_RANGE_CM: f32 = 400.0;
/// Echo wait budget in microseconds.
pub const ECHO_TIMEOUT_US: u32 = 30_000;
/// Speed of sound, cm per microsecond.
const SOUND_CM_PER_US: f32 = 0.0343;

pub struct Rangefinder<TRIG, ECHO, D> {
    trig: TRIG,
    echo: ECHO,
    delay: D,
    timeout_us: u32,
}

impl<TRIG, ECHO, D> Rangefinder<TRIG, ECHO, D>
where
    TRIG: OutputPin,
    ECHO: InputPin,
    D: DelayNs,
{
    pub fn new(trig: TRIG, echo: ECHO, delay: D) -> Self {
        Self {
            trig,
            echo,
            delay,
            timeout_us: ECHO_TIMEOUT_US,
        }
    }

    /// Fire one ping and return the distance in centimetres, capped.
    pub fn measure_cm(&mut self) -> f32 {
        match self.ping_us() {
            Some(us) => (us as f32 * SOUND_CM_PER_US / 2.0).min(MAX_RANGE_CM),
            None => MAX_RANGE_CM,
        }
    }

    /// Echo pulse width in microseconds, `None` on timeout or pin error.
    fn ping_us(&mut self) -> Option<u32> {
        self.trig.set_low().ok()?;
        self.delay.delay_us(2);
        self.trig.set_high().ok()?;
        self.delay.delay_us(10);
        self.trig.set_low().ok()?;

        let mut waited = 0u32;
        while !self.echo.is_high().ok()? {
            if waited >= self.timeout_us {
                debug!("rangefinder: no echo");
                return None;
            }
            self.delay.delay_us(1);
            waited += 1;
        }

        let mut width = 0u32;
        while self.echo.is_high().ok()? {
            if waited + width >= self.timeout_us {
                debug!("rangefinder: echo too long");
                return None;
            }
            self.delay.delay_us(1);
            width += 1;
        }
        Some(width)
    }
}
