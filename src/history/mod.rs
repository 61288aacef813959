//! Rolling record of recent proposition vectors.
//!
//! The recorder keeps the last [`HISTORY_CAPACITY`] vectors in a fixed ring
//! with O(1) append-with-eviction and no allocation after construction. It
//! runs upstream of the safety monitor: every tick is recorded before it is
//! checked, so the ring always covers the violating tick when a snapshot is
//! frozen for the forensics store.

use crate::core::{ControlTick, PropVector};
use serde::{Deserialize, Serialize};

/// Number of vectors retained, fixed at build time. Chosen to fill the
/// trace field of the persisted violation record exactly.
pub const HISTORY_CAPACITY: usize = 64;

/// Fixed-capacity ring of the most recent proposition vectors.
pub struct HistoryRecorder {
    ring: [PropVector; HISTORY_CAPACITY],
    head: usize,
    len: usize,
    last_tick: Option<ControlTick>,
}

impl Default for HistoryRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryRecorder {
    /// Create an empty recorder.
    pub fn new() -> Self {
        HistoryRecorder {
            ring: [PropVector::new(); HISTORY_CAPACITY],
            head: 0,
            len: 0,
            last_tick: None,
        }
    }

    /// Append one tick's vector, evicting the oldest entry once the ring
    /// is full.
    ///
    /// Recording happens only at tick boundaries in a single-threaded
    /// loop; out-of-order ticks are a contract bug, not a runtime error.
    pub fn record(&mut self, tick: ControlTick, props: PropVector) {
        debug_assert!(
            self.last_tick.map_or(true, |last| last < tick),
            "history recorded out of tick order"
        );
        self.last_tick = Some(tick);
        self.ring[self.head] = props;
        self.head = (self.head + 1) % HISTORY_CAPACITY;
        self.len = (self.len + 1).min(HISTORY_CAPACITY);
    }

    /// Number of vectors currently retained.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Freeze a copy-on-read view of the retained vectors, oldest first.
    ///
    /// Consistent by construction: recording and snapshotting both happen
    /// on the control-loop thread, never concurrently.
    pub fn snapshot(&self) -> HistorySnapshot {
        let start = (self.head + HISTORY_CAPACITY - self.len) % HISTORY_CAPACITY;
        let vectors = (0..self.len)
            .map(|i| self.ring[(start + i) % HISTORY_CAPACITY])
            .collect();
        HistorySnapshot { vectors }
    }
}

/// Immutable snapshot of the ring at one instant, oldest vector first.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct HistorySnapshot {
    vectors: Vec<PropVector>,
}

impl HistorySnapshot {
    /// The retained vectors in chronological order.
    pub fn vectors(&self) -> &[PropVector] {
        &self.vectors
    }

    /// Number of vectors in the snapshot.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Whether the snapshot holds no vectors.
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Serialize to the fixed trace field: one byte per vector, oldest
    /// first, zero-padded to [`HISTORY_CAPACITY`] bytes.
    pub fn to_trace_bytes(&self) -> [u8; HISTORY_CAPACITY] {
        let mut bytes = [0u8; HISTORY_CAPACITY];
        for (slot, vector) in bytes.iter_mut().zip(self.vectors.iter()) {
            *slot = vector.bits();
        }
        bytes
    }

    /// Reconstruct a snapshot from a persisted trace field. The byte
    /// format does not record how many entries were live, so all
    /// [`HISTORY_CAPACITY`] positions are restored.
    pub fn from_trace_bytes(bytes: &[u8; HISTORY_CAPACITY]) -> Self {
        HistorySnapshot {
            vectors: bytes.iter().map(|&b| PropVector::from_bits(b)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick(n: u32) -> ControlTick {
        ControlTick::from_raw(n)
    }

    fn vector(bits: u8) -> PropVector {
        PropVector::from_bits(bits)
    }

    #[test]
    fn new_recorder_is_empty() {
        let recorder = HistoryRecorder::new();
        assert!(recorder.is_empty());
        assert_eq!(recorder.snapshot().len(), 0);
    }

    #[test]
    fn snapshot_preserves_recording_order() {
        let mut recorder = HistoryRecorder::new();
        for n in 1..=5u32 {
            recorder.record(tick(n), vector(n as u8));
        }
        let snapshot = recorder.snapshot();
        assert_eq!(snapshot.len(), 5);
        let bits: Vec<u8> = snapshot.vectors().iter().map(|v| v.bits()).collect();
        assert_eq!(bits, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn ring_evicts_oldest_at_capacity() {
        let mut recorder = HistoryRecorder::new();
        let total = HISTORY_CAPACITY as u32 + 10;
        for n in 1..=total {
            recorder.record(tick(n), vector(n as u8));
        }
        let snapshot = recorder.snapshot();
        assert_eq!(snapshot.len(), HISTORY_CAPACITY);
        let bits: Vec<u8> = snapshot.vectors().iter().map(|v| v.bits()).collect();
        let expected: Vec<u8> = (11..=total).map(|n| n as u8).collect();
        assert_eq!(bits, expected);
    }

    #[test]
    fn snapshot_is_copy_on_read() {
        let mut recorder = HistoryRecorder::new();
        recorder.record(tick(1), vector(0xAA));
        let snapshot = recorder.snapshot();
        recorder.record(tick(2), vector(0xBB));
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.vectors()[0].bits(), 0xAA);
    }

    #[test]
    fn trace_bytes_are_zero_padded() {
        let mut recorder = HistoryRecorder::new();
        recorder.record(tick(1), vector(0x12));
        recorder.record(tick(2), vector(0x34));
        let bytes = recorder.snapshot().to_trace_bytes();
        assert_eq!(bytes[0], 0x12);
        assert_eq!(bytes[1], 0x34);
        assert!(bytes[2..].iter().all(|&b| b == 0));
    }

    #[test]
    fn trace_bytes_round_trip() {
        let mut recorder = HistoryRecorder::new();
        for n in 1..=HISTORY_CAPACITY as u32 {
            recorder.record(tick(n), vector((n % 251) as u8));
        }
        let snapshot = recorder.snapshot();
        let restored = HistorySnapshot::from_trace_bytes(&snapshot.to_trace_bytes());
        assert_eq!(restored, snapshot);
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let mut recorder = HistoryRecorder::new();
        recorder.record(tick(1), vector(0x05));
        let snapshot = recorder.snapshot();
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: HistorySnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }

    #[test]
    #[should_panic(expected = "out of tick order")]
    fn out_of_order_recording_is_a_contract_bug() {
        let mut recorder = HistoryRecorder::new();
        recorder.record(tick(5), vector(1));
        recorder.record(tick(4), vector(2));
    }
}
