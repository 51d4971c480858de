//! GPIO / peripheral pin assignments for the FireGuard head board.
//!
//! Single source of truth: `main` claims every pin through this module
//! rather than hard-coding numbers.  Change a pin here and it propagates
//! everywhere.

// ---------------------------------------------------------------------------
// Thermal array (MLX90640, bit-banged two-wire bus)
// ---------------------------------------------------------------------------

/// Open-drain data line, external 4.7 kΩ pull-up.
pub const THERMAL_SDA_GPIO: i32 = 8;
/// Open-drain clock line, external 4.7 kΩ pull-up.
pub const THERMAL_SCL_GPIO: i32 = 9;

// ---------------------------------------------------------------------------
// Sweep stepper (A4988)
// ---------------------------------------------------------------------------

pub const STEPPER_STEP_GPIO: i32 = 4;
/// HIGH = clockwise (advancing), LOW = counter-clockwise.
pub const STEPPER_DIR_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// Alert outputs
// ---------------------------------------------------------------------------

/// Indicator servo signal, LEDC channel 0.
pub const SERVO_PWM_GPIO: i32 = 6;
/// Passive buzzer, LEDC channel 1.
pub const BUZZER_PWM_GPIO: i32 = 7;

// ---------------------------------------------------------------------------
// Ultrasonic rangefinder (HC-SR04)
// ---------------------------------------------------------------------------

pub const RANGE_TRIG_GPIO: i32 = 15;
/// 5 V echo through a resistive divider.
pub const RANGE_ECHO_GPIO: i32 = 16;
