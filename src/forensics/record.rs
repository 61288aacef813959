//! The persisted violation record.

use crate::core::ControlTick;
use crate::forensics::error::ForensicsError;
use crate::history::{HistorySnapshot, HISTORY_CAPACITY};
use serde::{Deserialize, Serialize};
use serde_big_array::BigArray;

/// Tick value that marks an erased record slot. Matches the all-ones
/// erased state of the storage medium, so a factory-new or freshly erased
/// region reads as "no violation recorded".
pub const ERASED_TICK: u32 = 0xFFFF_FFFF;

/// Everything persisted about a detected violation: the control tick at
/// detection and the frozen proposition history leading up to it.
///
/// The binary encoding is the persisted layout itself: the little-endian
/// tick word followed by the trace bytes in chronological order, with no
/// framing overhead. A layout test pins this so the encoding cannot drift
/// from the storage geometry.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ViolationRecord {
    /// Control tick at which the violation was detected.
    pub tick: ControlTick,
    /// Serialized history snapshot, oldest vector first, zero-padded.
    #[serde(with = "BigArray")]
    pub trace: [u8; HISTORY_CAPACITY],
}

impl ViolationRecord {
    /// Freeze a snapshot into a record for the given detection tick.
    pub fn new(tick: ControlTick, snapshot: &HistorySnapshot) -> Self {
        ViolationRecord {
            tick,
            trace: snapshot.to_trace_bytes(),
        }
    }

    /// The frozen history as proposition vectors.
    pub fn snapshot(&self) -> HistorySnapshot {
        HistorySnapshot::from_trace_bytes(&self.trace)
    }

    /// Encode into the persisted byte layout.
    pub fn encode(&self) -> Result<Vec<u8>, ForensicsError> {
        bincode::serialize(self).map_err(|e| ForensicsError::Encoding(e.to_string()))
    }

    /// Decode from the persisted byte layout.
    pub fn decode(bytes: &[u8]) -> Result<Self, ForensicsError> {
        bincode::deserialize(bytes).map_err(|e| ForensicsError::Encoding(e.to_string()))
    }
}
