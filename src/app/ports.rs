//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ SentryService (domain)
//! ```
//!
//! Driven adapters (thermal camera, stepper, alarm outputs, event sinks)
//! implement these traits.  The [`SentryService`](super::service::SentryService)
//! consumes them via generics, so the domain core never touches hardware
//! directly.

use crate::control::patrol::Direction;
use crate::error::Result;
use crate::sensors::frame::ValidatedFrame;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this to obtain thermal frames.
pub trait SensorPort {
    /// Identify and configure the sensor.  Safe to call again after a
    /// failure.
    fn init_sensor(&mut self) -> Result<()>;

    /// Block until the next frame is available and return it validated.
    fn acquire_frame(&mut self) -> Result<ValidatedFrame>;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to command actuators.  Every
/// call blocks for a bounded time.
pub trait ActuatorPort {
    /// One stepper step in `direction`, including the settle delay.
    fn advance_step(&mut self, direction: Direction);

    /// Distance to the nearest object in centimetres, capped on timeout.
    fn range_distance(&mut self) -> f32;

    /// Play the fixed alarm pattern.
    fn sound_alarm(&mut self);

    /// Move the indicator servo; the adapter clamps to 0..=180.
    fn set_indicator_angle(&mut self, degrees: u8);

    /// Block for `ms` milliseconds.
    fn pause_ms(&mut self, ms: u32);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Never required for correctness.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
