//! Error types for the actuator link.
//!
//! Only hard channel failures are errors. Transient conditions (a read
//! timeout, an undecodable line) surface as `Ok(None)` from
//! [`ActuatorPort::read_line`](crate::traits::ActuatorPort::read_line) so
//! the controller loop can keep polling.

/// Result type alias for link operations.
pub type Result<T> = std::result::Result<T, LinkError>;

/// Errors that can occur on the serial channel.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    /// The serial endpoint could not be opened. Fatal at startup: without a
    /// channel to the entry point there is no safe degraded mode.
    #[error("Failed to open serial port {port}: {message}")]
    OpenFailed { port: String, message: String },

    /// Hard I/O failure on an established link.
    #[error("Serial link failure: {0}")]
    Io(#[from] std::io::Error),
}

impl LinkError {
    /// Create a new open-failure error.
    pub fn open_failed(port: impl Into<String>, message: impl Into<String>) -> Self {
        Self::OpenFailed {
            port: port.into(),
            message: message.into(),
        }
    }
}
