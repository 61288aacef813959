//! Diagnostic reporting over the output-only serial seam.
//!
//! The device talks to the outside world in plain text: a power-on dump of
//! the whole non-volatile region, and a violation report when the
//! fail-safe trips. Byte transmission is the transport collaborator's
//! concern; this module only builds the text.

use crate::storage::{NvRegion, StorageError};
use std::fmt::Write as _;

/// Banner line preceding the power-on region dump.
pub const BOOT_BANNER: &str = "===============[ Power-On Report ]===============";

/// Banner line preceding a violation record dump.
pub const VIOLATION_BANNER: &str = "Violation:";

/// Output-only sink for diagnostic text. The device never reads back.
pub trait DiagnosticPort {
    /// Transmit a chunk of already-formatted text.
    fn send(&mut self, text: &str);
}

/// A [`DiagnosticPort`] that accumulates everything sent, for host tests
/// and demos.
#[derive(Debug, Default, Clone)]
pub struct BufferPort {
    contents: String,
}

impl BufferPort {
    /// Create an empty buffer port.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything transmitted so far.
    pub fn contents(&self) -> &str {
        &self.contents
    }
}

impl DiagnosticPort for BufferPort {
    fn send(&mut self, text: &str) {
        self.contents.push_str(text);
    }
}

/// Format bytes as uppercase hex, two digits per byte, no separators.
pub fn hex_line(bytes: &[u8]) -> String {
    let mut line = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        // Infallible for String.
        let _ = write!(line, "{byte:02X}");
    }
    line
}

/// Build the power-on report: banner line, the full region contents as one
/// contiguous hex dump, and a trailing blank line.
pub fn boot_report<R: NvRegion>(region: &R) -> Result<String, StorageError> {
    let mut bytes = vec![0u8; region.size()];
    region.read(0, &mut bytes)?;
    Ok(format!("{BOOT_BANNER}\n{}\n\n", hex_line(&bytes)))
}

/// Build the violation report around an already-rendered record dump.
pub fn violation_report(record_dump: &str) -> String {
    format!("{VIOLATION_BANNER}\n{record_dump}")
}
