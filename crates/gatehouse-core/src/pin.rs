//! Credential types: the configured target PIN and the transient entry buffer.

use crate::{Result, error::Error};
use std::fmt;
use subtle::ConstantTimeEq;

/// The configured target PIN: an ordered sequence of digits 0-9.
///
/// # Security
/// Comparison against an entered credential runs in constant time over the
/// full sequence to avoid leaking the match position through timing.
#[derive(Debug, Clone, Eq)]
pub struct PinSequence(Vec<u8>);

impl PinSequence {
    /// Create a target PIN from individual digit values.
    ///
    /// # Errors
    /// Returns `Error::InvalidPin` if the sequence is empty or any element
    /// is greater than 9.
    pub fn new(digits: &[u8]) -> Result<Self> {
        if digits.is_empty() {
            return Err(Error::InvalidPin("PIN must not be empty".to_string()));
        }
        if let Some(bad) = digits.iter().find(|d| **d > 9) {
            return Err(Error::InvalidPin(format!(
                "PIN digits must be 0-9, got {bad}"
            )));
        }
        Ok(PinSequence(digits.to_vec()))
    }

    /// Get the digit sequence.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Number of digits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::str::FromStr for PinSequence {
    type Err = Error;

    /// Parse a digit string such as `"123"`.
    fn from_str(s: &str) -> Result<Self> {
        let digits = s
            .chars()
            .map(|c| {
                c.to_digit(10)
                    .map(|d| d as u8)
                    .ok_or_else(|| Error::InvalidPin(format!("'{c}' is not a digit")))
            })
            .collect::<Result<Vec<u8>>>()?;
        PinSequence::new(&digits)
    }
}

/// Constant-time comparison for PIN sequences.
impl PartialEq for PinSequence {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

/// The credential currently being typed at the keypad.
///
/// Exists only as transient controller state: it is cleared after every
/// submission and on reset. Elements come from parsed inbound lines, so a
/// multi-digit line contributes its integer value as a single element; such
/// an element can exceed 9 and then simply never matches a target digit.
#[derive(Default, Clone)]
pub struct PinBuffer {
    digits: Vec<u8>,
}

impl PinBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one entered value.
    pub fn push(&mut self, value: u8) {
        self.digits.push(value);
    }

    /// Remove the last entered value. A no-op on an empty buffer.
    pub fn backspace(&mut self) {
        self.digits.pop();
    }

    /// Discard all entered values.
    pub fn clear(&mut self) {
        self.digits.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.digits.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    /// Compare the entered credential against the target, in constant time
    /// over the byte sequence. Buffers of a different length never match.
    #[must_use]
    pub fn matches(&self, target: &PinSequence) -> bool {
        self.digits.ct_eq(target.as_slice()).into()
    }
}

/// Redacting debug output: the entered digits never reach the log stream.
impl fmt::Debug for PinBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PinBuffer(len={})", self.digits.len())
    }
}
