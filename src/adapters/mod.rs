//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements   | Connects to                          |
//! |------------|--------------|--------------------------------------|
//! | `hardware` | SensorPort   | MLX90640 over the bit-banged bus     |
//! |            | ActuatorPort | stepper, servo, buzzer, rangefinder  |
//! | `log_sink` | EventSink    | Serial log output (dashboard lines)  |

pub mod hardware;
pub mod log_sink;
