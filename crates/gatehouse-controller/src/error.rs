use thiserror::Error;

/// Result type alias for controller operations.
pub type Result<T> = std::result::Result<T, ControllerError>;

/// Errors that abort the access loop.
///
/// Policy failures (wrong password, failed face match, lockout) are not
/// errors; they are counted and signalled. The loop only ends on a hard
/// channel fault or an operator shutdown.
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("actuator link failed: {0}")]
    Link(#[from] gatehouse_link::LinkError),
}
