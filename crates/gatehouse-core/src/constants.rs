//! Protocol and policy constants for the kiosk.
//!
//! This module defines the fixed serial wire vocabulary shared with the
//! keypad/actuator microcontroller, plus the compiled policy defaults used
//! when neither a configuration file nor environment overrides are present.
//!
//! # Wire Protocol
//!
//! The wire contract is deliberately minimal: line-delimited ASCII inbound,
//! single ASCII bytes outbound.
//!
//! | Direction | Token | Meaning |
//! |-----------|-------|---------|
//! | inbound | digit string | append value to the entered credential |
//! | inbound | `A` | backspace (remove last credential element) |
//! | inbound | `B` | submit the entered credential |
//! | inbound | `D` | reset credential and attempt counter |
//! | outbound | `P` | face scan in progress |
//! | outbound | `G` | access granted |
//! | outbound | `R` | access denied |
//! | outbound | `L` | system locked |
//! | outbound | `X` | reset acknowledged |
//!
//! Anything else inbound is ignored. These bytes are a bit-exact contract
//! with the firmware; changing them breaks the installation.

// ============================================================================
// Outbound actuator command bytes
// ============================================================================

/// Face scan in progress.
pub const CMD_SCAN_IN_PROGRESS: u8 = b'P';

/// Access granted; the actuator should release the lock.
pub const CMD_ACCESS_GRANTED: u8 = b'G';

/// Access denied.
pub const CMD_ACCESS_DENIED: u8 = b'R';

/// Too many failed attempts; the kiosk is in lockout.
pub const CMD_LOCKED: u8 = b'L';

/// Reset acknowledged.
pub const CMD_RESET_ACK: u8 = b'X';

// ============================================================================
// Inbound keypad tokens
// ============================================================================

/// Backspace key line.
pub const KEY_BACKSPACE: &str = "A";

/// Submit key line.
pub const KEY_SUBMIT: &str = "B";

/// Reset key line.
pub const KEY_RESET: &str = "D";

// ============================================================================
// Policy defaults
// ============================================================================

/// Default serial endpoint for the keypad/actuator microcontroller.
pub const DEFAULT_SERIAL_PORT: &str = "/dev/ttyACM0";

/// Default serial baud rate.
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Default blocking-read timeout on the serial link, in milliseconds.
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 1000;

/// Default directory of enrolled reference images.
pub const DEFAULT_GALLERY_DIR: &str = "known_faces";

/// Default target PIN, as a digit string.
pub const DEFAULT_PIN: &str = "123";

/// Default face-match distance threshold. A probe descriptor within this
/// Euclidean distance of a gallery descriptor counts as a match.
pub const DEFAULT_FACE_MATCH_THRESHOLD: f32 = 0.6;

/// Default maximum failed password submissions before lockout.
pub const DEFAULT_MAX_PASSWORD_ATTEMPTS: u32 = 3;

/// Default maximum capture attempts per face scan.
pub const DEFAULT_MAX_FACE_ATTEMPTS: u32 = 3;

/// Default lockout duration, in seconds.
pub const DEFAULT_LOCKOUT_SECS: u64 = 60;

/// Default delay between face-scan attempts, in milliseconds.
pub const DEFAULT_ATTEMPT_DELAY_MS: u64 = 1000;

/// Default wall-clock bound on one face scan, in seconds.
///
/// Failed frame captures retry for free inside the attempt budget; this
/// deadline keeps a camera that fails every read from spinning forever.
pub const DEFAULT_SCAN_DEADLINE_SECS: u64 = 30;

/// Default directory for the rotating log file.
pub const DEFAULT_LOG_DIR: &str = "logs";

// ============================================================================
// Gallery
// ============================================================================

/// File extensions accepted as gallery reference images (lowercase).
pub const GALLERY_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "GATEHOUSE_";
