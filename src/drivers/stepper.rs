//! Step/direction stepper driver (A4988 class).
//!
//! DIR high advances (clockwise), low retreats.  One step is a full
//! STEP pulse followed by the settle delay, so the call blocks for
//! `2 * pulse_us` plus `settle_ms`.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use super::PinFault;
use crate::control::patrol::Direction;

pub struct StepperDriver<STEP, DIR, D> {
    step: STEP,
    dir: DIR,
    delay: D,
    pulse_us: u32,
    settle_ms: u32,
    steps_taken: u64,
}

impl<STEP, DIR, D> StepperDriver<STEP, DIR, D>
where
    STEP: OutputPin,
    DIR: OutputPin,
    D: DelayNs,
{
    pub fn new(step: STEP, dir: DIR, delay: D, pulse_us: u32, settle_ms: u32) -> Self {
        Self {
            step,
            dir,
            delay,
            pulse_us,
            settle_ms,
            steps_taken: 0,
        }
    }

    pub fn step(&mut self, direction: Direction) -> Result<(), PinFault> {
        let dir = match direction {
            Direction::Advancing => self.dir.set_high(),
            Direction::Retreating => self.dir.set_low(),
        };
        dir.map_err(|_| PinFault("stepper DIR"))?;

        self.step.set_high().map_err(|_| PinFault("stepper STEP"))?;
        self.delay.delay_us(self.pulse_us);
        self.step.set_low().map_err(|_| PinFault("stepper STEP"))?;
        self.delay.delay_us(self.pulse_us);

        self.delay.delay_ms(self.settle_ms);
        self.steps_taken += 1;
        Ok(())
    }

    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }
}
