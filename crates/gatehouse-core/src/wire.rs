//! Serial wire vocabulary: outbound actuator commands and inbound keypad events.

use crate::constants::{
    CMD_ACCESS_DENIED, CMD_ACCESS_GRANTED, CMD_LOCKED, CMD_RESET_ACK, CMD_SCAN_IN_PROGRESS,
    KEY_BACKSPACE, KEY_RESET, KEY_SUBMIT,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single-byte command sent to the actuator microcontroller.
///
/// Commands are fire-and-forget: the firmware does not acknowledge them and
/// the controller does not track delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActuatorCommand {
    /// A face scan has started (`P`).
    ScanInProgress,

    /// Access granted; release the lock (`G`).
    AccessGranted,

    /// Access denied (`R`).
    AccessDenied,

    /// Lockout engaged after too many failed attempts (`L`).
    Locked,

    /// Credential and attempt counter were reset (`X`).
    ResetAck,
}

impl ActuatorCommand {
    /// Get the wire byte for this command.
    #[inline]
    #[must_use]
    pub fn wire_byte(self) -> u8 {
        match self {
            ActuatorCommand::ScanInProgress => CMD_SCAN_IN_PROGRESS,
            ActuatorCommand::AccessGranted => CMD_ACCESS_GRANTED,
            ActuatorCommand::AccessDenied => CMD_ACCESS_DENIED,
            ActuatorCommand::Locked => CMD_LOCKED,
            ActuatorCommand::ResetAck => CMD_RESET_ACK,
        }
    }

    /// Decode a wire byte back into a command.
    ///
    /// Returns `None` for bytes outside the outbound vocabulary. The
    /// controller never receives commands; this exists for test harnesses
    /// and wire-level diagnostics.
    #[must_use]
    pub fn from_wire_byte(byte: u8) -> Option<Self> {
        match byte {
            CMD_SCAN_IN_PROGRESS => Some(ActuatorCommand::ScanInProgress),
            CMD_ACCESS_GRANTED => Some(ActuatorCommand::AccessGranted),
            CMD_ACCESS_DENIED => Some(ActuatorCommand::AccessDenied),
            CMD_LOCKED => Some(ActuatorCommand::Locked),
            CMD_RESET_ACK => Some(ActuatorCommand::ResetAck),
            _ => None,
        }
    }
}

impl fmt::Display for ActuatorCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActuatorCommand::ScanInProgress => "ScanInProgress",
            ActuatorCommand::AccessGranted => "AccessGranted",
            ActuatorCommand::AccessDenied => "AccessDenied",
            ActuatorCommand::Locked => "Locked",
            ActuatorCommand::ResetAck => "ResetAck",
        };
        write!(f, "{}", name)
    }
}

/// An input event parsed from one inbound serial line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeypadEvent {
    /// A digit-string line; the parsed value is appended to the credential.
    Digit(u8),

    /// Backspace key (`A`): remove the last credential element.
    Backspace,

    /// Submit key (`B`): compare the credential to the configured target.
    Submit,

    /// Reset key (`D`): clear the credential and attempt counter.
    Reset,
}

impl KeypadEvent {
    /// Parse one inbound line into an event.
    ///
    /// Matching is case-sensitive. Digit strings that overflow `u8` and any
    /// other token return `None` and are ignored by the controller, which is
    /// the contract for firmware noise on the line.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        match line {
            "" => None,
            KEY_BACKSPACE => Some(KeypadEvent::Backspace),
            KEY_SUBMIT => Some(KeypadEvent::Submit),
            KEY_RESET => Some(KeypadEvent::Reset),
            digits if digits.bytes().all(|b| b.is_ascii_digit()) => {
                digits.parse::<u8>().ok().map(KeypadEvent::Digit)
            }
            _ => None,
        }
    }
}
