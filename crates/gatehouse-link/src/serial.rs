//! Blocking serial implementation of the actuator link.

use crate::error::{LinkError, Result};
use crate::traits::ActuatorPort;
use gatehouse_core::ActuatorCommand;
use std::io::Read;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Incremental line assembly over a byte stream.
///
/// Bytes arrive in arbitrary chunks from the serial driver; a line is
/// complete at `\n`. Partial input is retained across reads.
#[derive(Debug, Default)]
struct LineAssembler {
    buf: Vec<u8>,
}

/// One completed line pulled out of the assembler.
#[derive(Debug, PartialEq, Eq)]
enum AssembledLine {
    /// A decoded, whitespace-trimmed line.
    Line(String),
    /// The terminator arrived but the bytes were not valid UTF-8.
    Undecodable,
}

impl LineAssembler {
    fn feed(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Extract the next completed line, if a terminator has arrived.
    fn pop(&mut self) -> Option<AssembledLine> {
        let end = self.buf.iter().position(|&b| b == b'\n')?;
        let raw: Vec<u8> = self.buf.drain(..=end).collect();
        match std::str::from_utf8(&raw) {
            Ok(text) => Some(AssembledLine::Line(text.trim().to_string())),
            Err(_) => Some(AssembledLine::Undecodable),
        }
    }

    #[cfg(test)]
    fn pending(&self) -> usize {
        self.buf.len()
    }
}

/// Serial actuator link over a blocking port with a read timeout.
pub struct SerialLink {
    port: Box<dyn serialport::SerialPort>,
    port_name: String,
    assembler: LineAssembler,
}

impl SerialLink {
    /// Open the configured serial endpoint.
    ///
    /// # Errors
    ///
    /// Returns `LinkError::OpenFailed` if the port cannot be opened. The
    /// caller treats this as fatal at startup.
    pub fn open(port: &str, baud_rate: u32, read_timeout: Duration) -> Result<Self> {
        let handle = serialport::new(port, baud_rate)
            .timeout(read_timeout)
            .open()
            .map_err(|e| LinkError::open_failed(port, e.to_string()))?;

        info!(port, baud_rate, "serial connection established");

        Ok(Self {
            port: handle,
            port_name: port.to_string(),
            assembler: LineAssembler::default(),
        })
    }

    /// The endpoint this link was opened on.
    #[must_use]
    pub fn port_name(&self) -> &str {
        &self.port_name
    }
}

impl ActuatorPort for SerialLink {
    fn send(&mut self, command: ActuatorCommand) {
        match std::io::Write::write_all(&mut self.port, &[command.wire_byte()]) {
            Ok(()) => debug!(%command, "sent actuator command"),
            Err(e) => error!(%command, error = %e, "failed to send actuator command"),
        }
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut chunk = [0u8; 64];
        loop {
            match self.assembler.pop() {
                Some(AssembledLine::Line(line)) => return Ok(Some(line)),
                Some(AssembledLine::Undecodable) => {
                    warn!(port = %self.port_name, "dropping undecodable line");
                    return Ok(None);
                }
                None => {}
            }

            match self.port.read(&mut chunk) {
                Ok(0) => return Ok(None),
                Ok(n) => self.assembler.feed(&chunk[..n]),
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => return Ok(None),
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(LinkError::Io(e)),
            }
        }
    }
}

impl Drop for SerialLink {
    fn drop(&mut self) {
        debug!(port = %self.port_name, "serial link closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assembler_single_line() {
        let mut assembler = LineAssembler::default();
        assembler.feed(b"123\n");
        assert_eq!(
            assembler.pop(),
            Some(AssembledLine::Line("123".to_string()))
        );
        assert_eq!(assembler.pop(), None);
    }

    #[test]
    fn test_assembler_partial_then_complete() {
        let mut assembler = LineAssembler::default();
        assembler.feed(b"1");
        assert_eq!(assembler.pop(), None);
        assert_eq!(assembler.pending(), 1);

        assembler.feed(b"2\r\n");
        assert_eq!(assembler.pop(), Some(AssembledLine::Line("12".to_string())));
        assert_eq!(assembler.pending(), 0);
    }

    #[test]
    fn test_assembler_multiple_lines_in_one_chunk() {
        let mut assembler = LineAssembler::default();
        assembler.feed(b"A\nB\n9\n");
        assert_eq!(assembler.pop(), Some(AssembledLine::Line("A".to_string())));
        assert_eq!(assembler.pop(), Some(AssembledLine::Line("B".to_string())));
        assert_eq!(assembler.pop(), Some(AssembledLine::Line("9".to_string())));
        assert_eq!(assembler.pop(), None);
    }

    #[test]
    fn test_assembler_trims_whitespace() {
        let mut assembler = LineAssembler::default();
        assembler.feed(b"  B \r\n");
        assert_eq!(assembler.pop(), Some(AssembledLine::Line("B".to_string())));
    }

    #[test]
    fn test_assembler_undecodable_line() {
        let mut assembler = LineAssembler::default();
        assembler.feed(&[0xFF, 0xFE, b'\n', b'D', b'\n']);
        assert_eq!(assembler.pop(), Some(AssembledLine::Undecodable));
        // the byte stream resynchronizes on the next terminator
        assert_eq!(assembler.pop(), Some(AssembledLine::Line("D".to_string())));
    }

    #[test]
    fn test_assembler_empty_line() {
        let mut assembler = LineAssembler::default();
        assembler.feed(b"\n");
        assert_eq!(assembler.pop(), Some(AssembledLine::Line(String::new())));
    }
}
