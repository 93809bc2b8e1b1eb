//! Controller states.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The two states of the access controller.
///
/// `Locked` is transient: it is held for the configured lockout duration
/// while the controller blocks, then reverts to `AwaitingInput`. There is
/// no terminal state; the kiosk runs until the process is stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControllerState {
    /// Collecting keypad input.
    AwaitingInput,

    /// Cooling down after too many failed password attempts.
    Locked,
}

impl fmt::Display for ControllerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ControllerState::AwaitingInput => "AwaitingInput",
            ControllerState::Locked => "Locked",
        };
        write!(f, "{}", name)
    }
}
