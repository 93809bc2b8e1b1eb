pub mod config;
pub mod constants;
pub mod error;
pub mod pin;
pub mod wire;

pub use config::KioskConfig;
pub use error::{Error, Result};
pub use pin::{PinBuffer, PinSequence};
pub use wire::{ActuatorCommand, KeypadEvent};

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
