//! FireGuard firmware library.
//!
//! A stepper-driven head sweeps an MLX90640 thermal array across an arc,
//! stops when a hot spot sits in the target band, and raises the alarm
//! until it clears.  Everything except `main` is target-independent and
//! tested on the host; hardware is reached through `embedded-hal` traits.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod bus;
pub mod config;
pub mod control;
pub mod drivers;
pub mod error;
pub mod fsm;
pub mod pins;
pub mod report;
pub mod sensors;
