//! Passive piezo buzzer on a PWM channel.
//!
//! The channel's timer runs at [`TONE_HZ`]; a tone is 50 % duty and
//! silence is fully off.

use embedded_hal::delay::DelayNs;
use embedded_hal::pwm::SetDutyCycle;

use super::PinFault;

pub const TONE_HZ: u32 = 5_000;
const BEEPS: u8 = 12;
const BEEP_MS: u32 = 50;
const GAP_MS: u32 = 50;

pub struct Buzzer<P, D> {
    pwm: P,
    delay: D,
}

impl<P, D> Buzzer<P, D>
where
    P: SetDutyCycle,
    D: DelayNs,
{
    pub fn new(pwm: P, delay: D) -> Self {
        Self { pwm, delay }
    }

    /// Twelve short beeps; blocks for 1.2 s.
    pub fn sound_alarm(&mut self) -> Result<(), PinFault> {
        for _ in 0..BEEPS {
            self.pwm
                .set_duty_cycle_percent(50)
                .map_err(|_| PinFault("buzzer PWM"))?;
            self.delay.delay_ms(BEEP_MS);
            self.silence()?;
            self.delay.delay_ms(GAP_MS);
        }
        Ok(())
    }

    pub fn silence(&mut self) -> Result<(), PinFault> {
        self.pwm
            .set_duty_cycle_fully_off()
            .map_err(|_| PinFault("buzzer PWM"))
    }
}
