//! The access controller: the kiosk's core state machine.
//!
//! Consumes keypad input events from the actuator link, enforces the
//! password-attempt and lockout policy, invokes the face verifier on a
//! correct password, and signals every outcome back over the link.

pub mod controller;
pub mod error;
pub mod state;

pub use controller::{AccessController, AccessPolicy};
pub use error::{ControllerError, Result};
pub use state::ControllerState;
