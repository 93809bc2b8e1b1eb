//! The access-control state machine.

use crate::error::Result;
use crate::state::ControllerState;
use gatehouse_core::{ActuatorCommand, KeypadEvent, KioskConfig, PinBuffer, PinSequence};
use gatehouse_link::ActuatorPort;
use gatehouse_vision::FaceScanner;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Password and lockout policy for the entry point.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    /// The configured target PIN.
    pub target: PinSequence,
    /// Failed password submissions tolerated before lockout.
    pub max_password_attempts: u32,
    /// Lockout duration.
    pub lockout: Duration,
}

impl AccessPolicy {
    /// Build the policy from resolved configuration.
    ///
    /// # Errors
    /// Returns an error if the configured PIN string is invalid.
    pub fn from_config(config: &KioskConfig) -> gatehouse_core::Result<Self> {
        Ok(Self {
            target: config.target_pin()?,
            max_password_attempts: config.max_password_attempts,
            lockout: config.lockout(),
        })
    }
}

/// The kiosk's core state machine.
///
/// Deliberately small: one credential buffer and one attempt counter. The
/// safety property that matters is monotonic attempt accounting with an
/// enforced cool-down. The controller holds the actuator link exclusively
/// and lends it to the face scanner during verification.
pub struct AccessController<L, S> {
    link: L,
    scanner: S,
    policy: AccessPolicy,
    credential: PinBuffer,
    password_attempts: u32,
    state: ControllerState,
}

impl<L: ActuatorPort, S: FaceScanner> AccessController<L, S> {
    #[must_use]
    pub fn new(link: L, scanner: S, policy: AccessPolicy) -> Self {
        Self {
            link,
            scanner,
            policy,
            credential: PinBuffer::new(),
            password_attempts: 0,
            state: ControllerState::AwaitingInput,
        }
    }

    #[must_use]
    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Failed password submissions since the last reset or lockout.
    #[must_use]
    pub fn password_attempts(&self) -> u32 {
        self.password_attempts
    }

    /// Length of the credential currently being typed.
    #[must_use]
    pub fn credential_len(&self) -> usize {
        self.credential.len()
    }

    /// Run the access loop until the shutdown flag is set.
    ///
    /// Each iteration first services a pending lockout, then blocks for one
    /// inbound line (bounded by the link's read timeout). Transient read
    /// conditions keep the loop polling.
    ///
    /// # Errors
    /// Returns an error only on a hard link failure; the caller logs it and
    /// tears the process down.
    pub fn run(&mut self, shutdown: &AtomicBool) -> Result<()> {
        info!("access controller running");
        while !shutdown.load(Ordering::Relaxed) {
            if self.service_lockout() {
                continue;
            }
            if let Some(line) = self.link.read_line()? {
                self.handle_line(&line);
            }
        }
        info!("access controller stopped");
        Ok(())
    }

    /// Enforce the lockout policy; polled before reading input.
    ///
    /// When the attempt counter has reached its maximum this signals
    /// `Locked`, blocks for the lockout duration, zeroes the counter, and
    /// returns `true` so the caller skips reading input this cycle. Input
    /// arriving during the block is not read until the sleep completes.
    pub fn service_lockout(&mut self) -> bool {
        if self.password_attempts < self.policy.max_password_attempts {
            return false;
        }

        warn!(
            attempts = self.password_attempts,
            "too many failed attempts, system locked"
        );
        self.link.send(ActuatorCommand::Locked);
        self.state = ControllerState::Locked;

        std::thread::sleep(self.policy.lockout);

        self.password_attempts = 0;
        self.state = ControllerState::AwaitingInput;
        info!("lockout elapsed, accepting input again");
        true
    }

    /// Parse and dispatch one inbound line. Unrecognized lines are ignored.
    pub fn handle_line(&mut self, line: &str) {
        debug!(line, "received");
        if let Some(event) = KeypadEvent::parse(line) {
            self.handle_event(event);
        }
    }

    /// Apply one keypad event to the state machine.
    pub fn handle_event(&mut self, event: KeypadEvent) {
        match event {
            KeypadEvent::Digit(value) => {
                self.credential.push(value);
                info!(entered = self.credential.len(), "credential digit accepted");
            }
            KeypadEvent::Backspace => {
                self.credential.backspace();
                debug!(entered = self.credential.len(), "credential backspace");
            }
            KeypadEvent::Submit => self.submit(),
            KeypadEvent::Reset => {
                self.credential.clear();
                self.password_attempts = 0;
                self.link.send(ActuatorCommand::ResetAck);
                info!("system reset");
            }
        }
    }

    /// Compare the entered credential to the target and act on the verdict.
    ///
    /// The credential is cleared on every path out of here.
    fn submit(&mut self) {
        if self.credential.matches(&self.policy.target) {
            info!("password correct, starting face verification");
            let Self { link, scanner, .. } = self;
            if scanner.perform_scan(link) {
                // the verifier already signalled the grant
                info!("full access granted");
            } else {
                self.password_attempts += 1;
            }
        } else {
            self.password_attempts += 1;
            warn!(attempts = self.password_attempts, "incorrect password");
            self.link.send(ActuatorCommand::AccessDenied);
        }
        self.credential.clear();
    }
}
