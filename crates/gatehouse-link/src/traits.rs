//! Link trait definition.
//!
//! [`ActuatorPort`] is the contract between the access controller and the
//! serial channel. The controller holds the port exclusively and lends it to
//! the face verifier for command sends during a scan, so the trait is kept
//! object-safe (`&mut dyn ActuatorPort`).

use crate::error::Result;
use gatehouse_core::ActuatorCommand;

/// The serial channel to the keypad/actuator microcontroller.
pub trait ActuatorPort {
    /// Send one actuator command.
    ///
    /// Fire-and-forget: a write failure or a closed port is logged and
    /// dropped. Loss of a single command is non-fatal because the physical
    /// lock holds its last (or fail-safe) state.
    fn send(&mut self, command: ActuatorCommand);

    /// Read the next inbound line, blocking up to the configured timeout.
    ///
    /// Returns `Ok(Some(line))` for a completed line (whitespace-trimmed),
    /// `Ok(None)` when the timeout elapses or a completed line cannot be
    /// decoded, and `Err` only for a hard channel failure. The distinction
    /// lets the caller's loop keep polling through transient conditions and
    /// bail out on real faults.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying channel fails in a way that is not
    /// a timeout (device unplugged, OS-level I/O fault).
    fn read_line(&mut self) -> Result<Option<String>>;
}
