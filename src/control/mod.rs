//! Control logic: hazard rule, sweep patrol and alert mode.
//!
//! Pure decision code.  The FSM handlers in [`crate::fsm::states`] call
//! into these types; hardware is only reached through the port traits.

pub mod alert;
pub mod hazard;
pub mod patrol;
