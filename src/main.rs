//! FireGuard Firmware: Main Entry Point
//!
//! Hexagonal architecture, single control thread.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter                         LogEventSink          │
//! │  (ThermalCamera + ActuatorBank)          (EventSink)           │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │             SentryService (pure logic)                 │    │
//! │  │  FSM · Patrol · Alert                                  │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::{Result, anyhow};
use esp_idf_hal::delay::{Delay, Ets, FreeRtos};
use esp_idf_hal::gpio::{AnyIOPin, AnyInputPin, AnyOutputPin, PinDriver};
use esp_idf_hal::ledc::{LedcDriver, LedcTimerDriver, config::TimerConfig};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::units::FromValueType;
use log::{error, info, warn};

use fireguard::adapters::hardware::{ActuatorBank, HardwareAdapter};
use fireguard::adapters::log_sink::LogEventSink;
use fireguard::app::service::SentryService;
use fireguard::bus::BitBangBus;
use fireguard::config::SentryConfig;
use fireguard::drivers::buzzer::{self, Buzzer};
use fireguard::drivers::servo::ServoDriver;
use fireguard::drivers::stepper::StepperDriver;
use fireguard::pins;
use fireguard::sensors::ThermalCamera;
use fireguard::sensors::rangefinder::Rangefinder;

/// Closest whole-hertz rate to the servo's 16 ms frame.
const SERVO_PWM_HZ: u32 = 62;

/// Per-unit overrides baked in at build time, if any.
fn load_config() -> SentryConfig {
    let Some(json) = option_env!("FIREGUARD_CONFIG") else {
        info!("Config: defaults");
        return SentryConfig::default();
    };
    match SentryConfig::from_json(json) {
        Ok(config) => {
            info!("Config: build-time overrides applied");
            config
        }
        Err(e) => {
            warn!("Config override rejected ({}), using defaults", e);
            SentryConfig::default()
        }
    }
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  FireGuard v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let config = load_config();
    let peripherals = Peripherals::take()?;

    // ── 2. Thermal array on the bit-banged bus ────────────────
    // SAFETY: every pin number in `pins` is distinct and claimed once here.
    let sda = PinDriver::input_output_od(unsafe { AnyIOPin::new(pins::THERMAL_SDA_GPIO) })?;
    let scl = PinDriver::input_output_od(unsafe { AnyIOPin::new(pins::THERMAL_SCL_GPIO) })?;
    let bus = BitBangBus::new(sda, scl, Ets, config.bus_timing)
        .map_err(|e| anyhow!("bus bring-up failed: {}", e))?;
    let camera = ThermalCamera::new(bus, Delay::new_default(), &config);

    // ── 3. Actuators ──────────────────────────────────────────
    let stepper = StepperDriver::new(
        PinDriver::output(unsafe { AnyOutputPin::new(pins::STEPPER_STEP_GPIO) })?,
        PinDriver::output(unsafe { AnyOutputPin::new(pins::STEPPER_DIR_GPIO) })?,
        Delay::new_default(),
        config.step_pulse_us,
        config.step_delay_ms,
    );

    let servo_timer = LedcTimerDriver::new(
        peripherals.ledc.timer0,
        &TimerConfig::new().frequency(SERVO_PWM_HZ.Hz()),
    )?;
    let servo = ServoDriver::new(LedcDriver::new(
        peripherals.ledc.channel0,
        &servo_timer,
        unsafe { AnyOutputPin::new(pins::SERVO_PWM_GPIO) },
    )?);

    let buzzer_timer = LedcTimerDriver::new(
        peripherals.ledc.timer1,
        &TimerConfig::new().frequency(buzzer::TONE_HZ.Hz()),
    )?;
    let mut buzzer = Buzzer::new(
        LedcDriver::new(
            peripherals.ledc.channel1,
            &buzzer_timer,
            unsafe { AnyOutputPin::new(pins::BUZZER_PWM_GPIO) },
        )?,
        Delay::new_default(),
    );
    buzzer.silence().map_err(|e| anyhow!("{}", e))?;

    let rangefinder = Rangefinder::new(
        PinDriver::output(unsafe { AnyOutputPin::new(pins::RANGE_TRIG_GPIO) })?,
        PinDriver::input(unsafe { AnyInputPin::new(pins::RANGE_ECHO_GPIO) })?,
        Ets,
    );

    let actuators = ActuatorBank::new(stepper, servo, buzzer, rangefinder, Delay::new_default());
    let mut hw = HardwareAdapter::new(camera, actuators);
    let mut sink = LogEventSink::new();

    // ── 4. Service ────────────────────────────────────────────
    let mut app =
        SentryService::new(config).map_err(|e| anyhow!("config rejected: {}", e))?;
    if let Err(e) = app.bring_up(&mut hw, &mut sink) {
        error!("Sensor bring-up failed ({}), head parked", e);
        loop {
            FreeRtos::delay_ms(10_000);
            error!("Sensor unavailable ({}), head parked", e);
        }
    }
    app.start(&mut sink);

    // ── 5. Control loop ───────────────────────────────────────
    loop {
        app.tick(&mut hw, &mut sink);
    }
}
