//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! [`HardwareAdapter`] pairs a sensor (normally a
//! [`ThermalCamera`](crate::sensors::ThermalCamera)) with an
//! [`ActuatorBank`] so the service gets one `SensorPort + ActuatorPort`
//! value.  Pin failures in the actuators are logged and otherwise
//! ignored; the control loop keeps running.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::pwm::SetDutyCycle;
use log::warn;

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::control::patrol::Direction;
use crate::drivers::buzzer::Buzzer;
use crate::drivers::servo::ServoDriver;
use crate::drivers::stepper::StepperDriver;
use crate::error::Result;
use crate::sensors::frame::ValidatedFrame;
use crate::sensors::rangefinder::Rangefinder;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<C, A> {
    camera: C,
    actuators: A,
}

impl<C, A> HardwareAdapter<C, A> {
    pub fn new(camera: C, actuators: A) -> Self {
        Self { camera, actuators }
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<C: SensorPort, A> SensorPort for HardwareAdapter<C, A> {
    fn init_sensor(&mut self) -> Result<()> {
        self.camera.init_sensor()
    }

    fn acquire_frame(&mut self) -> Result<ValidatedFrame> {
        self.camera.acquire_frame()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<C, A: ActuatorPort> ActuatorPort for HardwareAdapter<C, A> {
    fn advance_step(&mut self, direction: Direction) {
        self.actuators.advance_step(direction);
    }

    fn range_distance(&mut self) -> f32 {
        self.actuators.range_distance()
    }

    fn sound_alarm(&mut self) {
        self.actuators.sound_alarm();
    }

    fn set_indicator_angle(&mut self, degrees: u8) {
        self.actuators.set_indicator_angle(degrees);
    }

    fn pause_ms(&mut self, ms: u32) {
        self.actuators.pause_ms(ms);
    }
}

// ───────────────────────────────────────────────────────────────
// Actuator bank
// ───────────────────────────────────────────────────────────────

/// Stepper, indicator servo, buzzer and rangefinder plus a delay for
/// pauses.
pub struct ActuatorBank<S, V, B, R, D> {
    pub stepper: S,
    pub servo: V,
    pub buzzer: B,
    pub rangefinder: R,
    delay: D,
}

impl<S, V, B, R, D> ActuatorBank<S, V, B, R, D> {
    pub fn new(stepper: S, servo: V, buzzer: B, rangefinder: R, delay: D) -> Self {
        Self {
            stepper,
            servo,
            buzzer,
            rangefinder,
            delay,
        }
    }
}

impl<STEP, DIR, SD, PWM, BP, BD, TRIG, ECHO, RD, D> ActuatorPort
    for ActuatorBank<
        StepperDriver<STEP, DIR, SD>,
        ServoDriver<PWM>,
        Buzzer<BP, BD>,
        Rangefinder<TRIG, ECHO, RD>,
        D,
    >
where
    STEP: OutputPin,
    DIR: OutputPin,
    SD: DelayNs,
    PWM: SetDutyCycle,
    BP: SetDutyCycle,
    BD: DelayNs,
    TRIG: OutputPin,
    ECHO: InputPin,
    RD: DelayNs,
    D: DelayNs,
{
    fn advance_step(&mut self, direction: Direction) {
        if let Err(e) = self.stepper.step(direction) {
            warn!("stepper: {}", e);
        }
    }

    fn range_distance(&mut self) -> f32 {
        self.rangefinder.measure_cm()
    }

    fn sound_alarm(&mut self) {
        if let Err(e) = self.buzzer.sound_alarm() {
            warn!("buzzer: {}", e);
        }
    }

    fn set_indicator_angle(&mut self, degrees: u8) {
        if let Err(e) = self.servo.set_angle(degrees) {
            warn!("servo: {}", e);
        }
    }

    fn pause_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}
