//! Actuator drivers, generic over `embedded-hal` pins and PWM channels.

pub mod buzzer;
pub mod servo;
pub mod stepper;

use core::fmt;

/// A pin or PWM operation failed.  Carries the line's role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinFault(pub &'static str);

impl fmt::Display for PinFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} write failed", self.0)
    }
}
