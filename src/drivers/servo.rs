//! Hobby servo on a 16 ms PWM period.
//!
//! 0° maps to a 750 µs pulse and 180° to 2250 µs, linearly.  Angles
//! above 180 are clamped.

use embedded_hal::pwm::SetDutyCycle;

use super::PinFault;

pub const PERIOD_US: u16 = 16_000;
pub const MIN_PULSE_US: u16 = 750;
pub const MAX_PULSE_US: u16 = 2_250;
pub const MAX_ANGLE: u8 = 180;

pub fn pulse_width_us(degrees: u8) -> u16 {
    let deg = degrees.min(MAX_ANGLE) as u32;
    let span = (MAX_PULSE_US - MIN_PULSE_US) as u32;
    MIN_PULSE_US + (deg * span / MAX_ANGLE as u32) as u16
}

pub struct ServoDriver<P> {
    pwm: P,
    angle: u8,
}

impl<P: SetDutyCycle> ServoDriver<P> {
    pub fn new(pwm: P) -> Self {
        Self { pwm, angle: 0 }
    }

    pub fn set_angle(&mut self, degrees: u8) -> Result<(), PinFault> {
        let degrees = degrees.min(MAX_ANGLE);
        self.pwm
            .set_duty_cycle_fraction(pulse_width_us(degrees), PERIOD_US)
            .map_err(|_| PinFault("servo PWM"))?;
        self.angle = degrees;
        Ok(())
    }

    pub fn angle(&self) -> u8 {
        self.angle
    }
}
