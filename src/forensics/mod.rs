//! Violation forensics store.
//!
//! On the first detected violation the supervisor commits the control tick
//! and the frozen history ring into non-volatile storage, where the record
//! survives resets and power cycles until the explicit reset procedure
//! erases it. The write path is crash-safe: the region is unlocked only
//! for the duration of the write, and the tick word is programmed before
//! the trace bytes so a power loss mid-write leaves either no record (the
//! erased sentinel) or a record with a valid detection tick, never a
//! silently plausible corruption.

pub mod error;
pub mod record;

pub use error::ForensicsError;
pub use record::{ViolationRecord, ERASED_TICK};

use crate::core::ControlTick;
use crate::diag::hex_line;
use crate::history::{HistorySnapshot, HISTORY_CAPACITY};
use crate::storage::{NvRegion, Unlocked};

/// Offset of the 4-byte detection-tick field.
pub const TICK_OFFSET: usize = 0;
/// Offset of the serialized history snapshot.
pub const TRACE_OFFSET: usize = 4;
/// Total bytes occupied by one record.
pub const RECORD_LEN: usize = TRACE_OFFSET + HISTORY_CAPACITY;

/// Store for at most one persisted [`ViolationRecord`].
pub struct ForensicsStore<R: NvRegion> {
    region: R,
}

impl<R: NvRegion> ForensicsStore<R> {
    /// Wrap a region, verifying it can hold one record.
    pub fn new(region: R) -> Result<Self, ForensicsError> {
        if region.size() < RECORD_LEN {
            return Err(ForensicsError::RegionTooSmall {
                size: region.size(),
                needed: RECORD_LEN,
            });
        }
        Ok(ForensicsStore { region })
    }

    /// Persist the violation record: tick word first, then the trace bytes
    /// in order, inside one scoped unlock.
    pub fn commit(
        &mut self,
        tick: ControlTick,
        snapshot: &HistorySnapshot,
    ) -> Result<(), ForensicsError> {
        let encoded = ViolationRecord::new(tick, snapshot).encode()?;
        let mut guard = Unlocked::begin(&mut self.region)?;
        guard.write(TICK_OFFSET, &encoded[..TRACE_OFFSET])?;
        guard.write(TRACE_OFFSET, &encoded[TRACE_OFFSET..])?;
        Ok(())
    }

    /// Read back the persisted record. A tick field in the erased state
    /// means no violation has been recorded.
    pub fn read(&self) -> Result<Option<ViolationRecord>, ForensicsError> {
        let mut bytes = [0u8; RECORD_LEN];
        self.region.read(TICK_OFFSET, &mut bytes)?;
        if bytes[..TRACE_OFFSET] == ERASED_TICK.to_le_bytes() {
            return Ok(None);
        }
        Ok(Some(ViolationRecord::decode(&bytes)?))
    }

    /// Format the persisted record bytes as a fixed-width hex dump, two
    /// digits per byte with no separators, newline-terminated. Reads back
    /// exactly what storage holds, so repeated calls are byte-identical.
    pub fn render(&self) -> Result<String, ForensicsError> {
        let mut bytes = [0u8; RECORD_LEN];
        self.region.read(TICK_OFFSET, &mut bytes)?;
        Ok(format!("{}\n", hex_line(&bytes)))
    }

    /// Erase the record: all-ones sentinel in the tick field, zeroed trace
    /// bytes. Invoked only by the explicit physical reset procedure.
    pub fn erase(&mut self) -> Result<(), ForensicsError> {
        let mut guard = Unlocked::begin(&mut self.region)?;
        guard.erase(TICK_OFFSET, TRACE_OFFSET)?;
        guard.write(TRACE_OFFSET, &[0u8; HISTORY_CAPACITY])?;
        Ok(())
    }

    /// The underlying region, e.g. for the power-on report.
    pub fn region(&self) -> &R {
        &self.region
    }

    /// Release the region, keeping its contents. Lets a host test rebuild
    /// the store around the same bytes to simulate a power cycle.
    pub fn into_region(self) -> R {
        self.region
    }
}
