//! Kiosk configuration.
//!
//! Configuration is resolved in three layers: compiled defaults, an optional
//! TOML file, then `GATEHOUSE_*` environment variable overrides.

use crate::{
    Result,
    constants::{
        DEFAULT_ATTEMPT_DELAY_MS, DEFAULT_BAUD_RATE, DEFAULT_FACE_MATCH_THRESHOLD,
        DEFAULT_GALLERY_DIR, DEFAULT_LOCKOUT_SECS, DEFAULT_LOG_DIR, DEFAULT_MAX_FACE_ATTEMPTS,
        DEFAULT_MAX_PASSWORD_ATTEMPTS, DEFAULT_PIN, DEFAULT_READ_TIMEOUT_MS,
        DEFAULT_SCAN_DEADLINE_SECS, DEFAULT_SERIAL_PORT, ENV_PREFIX,
    },
    error::Error,
    pin::PinSequence,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Resolved kiosk configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KioskConfig {
    /// Serial endpoint of the keypad/actuator microcontroller.
    pub serial_port: String,
    /// Serial baud rate.
    pub baud_rate: u32,
    /// Blocking-read timeout on the serial link, in milliseconds.
    pub read_timeout_ms: u64,
    /// Directory of enrolled reference images.
    pub gallery_dir: PathBuf,
    /// Target PIN as a digit string.
    pub pin: String,
    /// Euclidean distance threshold for a face match.
    pub face_match_threshold: f32,
    /// Failed password submissions tolerated before lockout.
    pub max_password_attempts: u32,
    /// Capture attempts per face scan.
    pub max_face_attempts: u32,
    /// Lockout duration, in seconds.
    pub lockout_secs: u64,
    /// Delay between face-scan attempts, in milliseconds.
    pub attempt_delay_ms: u64,
    /// Wall-clock bound on one face scan, in seconds.
    pub scan_deadline_secs: u64,
    /// Directory for the rotating log file.
    pub log_dir: PathBuf,
}

impl Default for KioskConfig {
    fn default() -> Self {
        Self {
            serial_port: DEFAULT_SERIAL_PORT.to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
            gallery_dir: PathBuf::from(DEFAULT_GALLERY_DIR),
            pin: DEFAULT_PIN.to_string(),
            face_match_threshold: DEFAULT_FACE_MATCH_THRESHOLD,
            max_password_attempts: DEFAULT_MAX_PASSWORD_ATTEMPTS,
            max_face_attempts: DEFAULT_MAX_FACE_ATTEMPTS,
            lockout_secs: DEFAULT_LOCKOUT_SECS,
            attempt_delay_ms: DEFAULT_ATTEMPT_DELAY_MS,
            scan_deadline_secs: DEFAULT_SCAN_DEADLINE_SECS,
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
        }
    }
}

impl KioskConfig {
    /// Load configuration: defaults, then the TOML file if given, then
    /// environment overrides, then validation.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if the
    /// resolved values fail [`validate`](Self::validate).
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut config = match file {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML file. Missing keys take defaults.
    ///
    /// # Errors
    /// Returns `Error::Io` if the file cannot be read and `Error::Config`
    /// if it is not valid TOML for this schema.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    /// Apply `GATEHOUSE_*` environment overrides on top of current values.
    ///
    /// Unparseable values are ignored, leaving the prior layer in place.
    pub fn apply_env(&mut self) {
        env_override(&mut self.serial_port, "SERIAL_PORT");
        env_override(&mut self.baud_rate, "BAUD_RATE");
        env_override(&mut self.read_timeout_ms, "READ_TIMEOUT_MS");
        env_override(&mut self.gallery_dir, "GALLERY_DIR");
        env_override(&mut self.pin, "PIN");
        env_override(&mut self.face_match_threshold, "FACE_MATCH_THRESHOLD");
        env_override(&mut self.max_password_attempts, "MAX_PASSWORD_ATTEMPTS");
        env_override(&mut self.max_face_attempts, "MAX_FACE_ATTEMPTS");
        env_override(&mut self.lockout_secs, "LOCKOUT_SECS");
        env_override(&mut self.attempt_delay_ms, "ATTEMPT_DELAY_MS");
        env_override(&mut self.scan_deadline_secs, "SCAN_DEADLINE_SECS");
        env_override(&mut self.log_dir, "LOG_DIR");
    }

    /// Check resolved values for internal consistency.
    ///
    /// # Errors
    /// Returns `Error::Config` or `Error::InvalidPin` on out-of-range values.
    pub fn validate(&self) -> Result<()> {
        self.target_pin()?;
        if self.max_password_attempts == 0 {
            return Err(Error::Config(
                "max_password_attempts must be at least 1".to_string(),
            ));
        }
        if self.max_face_attempts == 0 {
            return Err(Error::Config(
                "max_face_attempts must be at least 1".to_string(),
            ));
        }
        if !(self.face_match_threshold > 0.0) {
            return Err(Error::Config(format!(
                "face_match_threshold must be positive, got {}",
                self.face_match_threshold
            )));
        }
        Ok(())
    }

    /// The configured PIN as a validated sequence.
    ///
    /// # Errors
    /// Returns `Error::InvalidPin` if the configured string is not all digits.
    pub fn target_pin(&self) -> Result<PinSequence> {
        self.pin.parse()
    }

    #[must_use]
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    #[must_use]
    pub fn lockout(&self) -> Duration {
        Duration::from_secs(self.lockout_secs)
    }

    #[must_use]
    pub fn attempt_delay(&self) -> Duration {
        Duration::from_millis(self.attempt_delay_ms)
    }

    #[must_use]
    pub fn scan_deadline(&self) -> Duration {
        Duration::from_secs(self.scan_deadline_secs)
    }
}

fn env_override<T>(slot: &mut T, key: &str)
where
    T: std::str::FromStr,
{
    if let Ok(raw) = std::env::var(format!("{ENV_PREFIX}{key}")) {
        if let Ok(value) = raw.parse() {
            *slot = value;
        }
    }
}
