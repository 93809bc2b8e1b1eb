//! Mock actuator link for testing and development.
//!
//! Simulates the serial channel without physical hardware: a
//! [`MockLinkHandle`] scripts inbound lines and records every outbound
//! command, mirroring the read-timeout behavior of the real port.

use crate::error::{LinkError, Result};
use crate::traits::ActuatorPort;
use gatehouse_core::ActuatorCommand;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug)]
enum InboundLine {
    Line(String),
    /// Scripted hard channel failure.
    Failure,
}

/// Mock serial link.
///
/// `read_line` pops scripted lines from an internal channel, returning
/// `Ok(None)` after a short poll timeout when nothing is queued, just as the
/// real link does on a read timeout.
#[derive(Debug)]
pub struct MockLink {
    line_rx: mpsc::Receiver<InboundLine>,
    sent: Arc<Mutex<Vec<ActuatorCommand>>>,
    poll_timeout: Duration,
}

impl MockLink {
    /// Create a mock link with a 10ms poll timeout.
    pub fn new() -> (Self, MockLinkHandle) {
        Self::with_poll_timeout(Duration::from_millis(10))
    }

    /// Create a mock link with a custom poll timeout.
    pub fn with_poll_timeout(poll_timeout: Duration) -> (Self, MockLinkHandle) {
        let (line_tx, line_rx) = mpsc::channel();
        let sent = Arc::new(Mutex::new(Vec::new()));

        let link = Self {
            line_rx,
            sent: Arc::clone(&sent),
            poll_timeout,
        };
        let handle = MockLinkHandle { line_tx, sent };

        (link, handle)
    }
}

impl ActuatorPort for MockLink {
    fn send(&mut self, command: ActuatorCommand) {
        self.sent
            .lock()
            .expect("sent-command log poisoned")
            .push(command);
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        match self.line_rx.recv_timeout(self.poll_timeout) {
            Ok(InboundLine::Line(line)) => Ok(Some(line)),
            Ok(InboundLine::Failure) => Err(LinkError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "scripted link failure",
            ))),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(LinkError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "mock line channel closed",
            ))),
        }
    }
}

/// Handle for scripting a [`MockLink`].
///
/// Can be cloned and shared across threads.
#[derive(Debug, Clone)]
pub struct MockLinkHandle {
    line_tx: mpsc::Sender<InboundLine>,
    sent: Arc<Mutex<Vec<ActuatorCommand>>>,
}

impl MockLinkHandle {
    /// Queue one inbound line.
    pub fn push_line(&self, line: &str) {
        let _ = self.line_tx.send(InboundLine::Line(line.to_string()));
    }

    /// Queue several inbound lines in order.
    pub fn push_lines(&self, lines: &[&str]) {
        for line in lines {
            self.push_line(line);
        }
    }

    /// Script a hard channel failure on the next read.
    pub fn fail_link(&self) {
        let _ = self.line_tx.send(InboundLine::Failure);
    }

    /// Snapshot of every command sent so far, in order.
    #[must_use]
    pub fn sent(&self) -> Vec<ActuatorCommand> {
        self.sent.lock().expect("sent-command log poisoned").clone()
    }

    /// Number of times `command` has been sent.
    #[must_use]
    pub fn sent_count(&self, command: ActuatorCommand) -> usize {
        self.sent
            .lock()
            .expect("sent-command log poisoned")
            .iter()
            .filter(|c| **c == command)
            .count()
    }

    /// Forget previously recorded commands.
    pub fn clear_sent(&self) {
        self.sent.lock().expect("sent-command log poisoned").clear();
    }
}
