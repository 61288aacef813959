//! Atomic proposition vectors and the control tick counter.
//!
//! A [`PropVector`] captures every monitored boolean fact about one control
//! tick in a single byte: the six lamp propositions of the two lanes plus
//! the two request-line samples. It is produced once per tick by the lane
//! controller, consumed by the safety monitor and the history recorder, and
//! never modified after production.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed-width bit set of atomic propositions, one bit per monitored fact.
///
/// Bit assignment (LSB first): lane-1 red, lane-1 yellow, lane-1 green,
/// lane-2 red, lane-2 yellow, lane-2 green, request line 1, request line 2.
/// The packing matches the serialized trace format byte for byte, so a
/// vector moves between the ring buffer and non-volatile storage without
/// translation.
///
/// # Example
///
/// ```rust
/// use ampel::core::PropVector;
///
/// let vector = PropVector::new()
///     .with(PropVector::LANE1_GREEN)
///     .with(PropVector::LANE2_RED);
///
/// assert!(vector.contains(PropVector::LANE1_GREEN));
/// assert!(!vector.contains(PropVector::LANE2_GREEN));
/// assert!(!vector.both_greens());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropVector(u8);

impl PropVector {
    /// Lane 1 red lamp lit.
    pub const LANE1_RED: u8 = 1 << 0;
    /// Lane 1 yellow lamp lit.
    pub const LANE1_YELLOW: u8 = 1 << 1;
    /// Lane 1 green lamp lit.
    pub const LANE1_GREEN: u8 = 1 << 2;
    /// Lane 2 red lamp lit.
    pub const LANE2_RED: u8 = 1 << 3;
    /// Lane 2 yellow lamp lit.
    pub const LANE2_YELLOW: u8 = 1 << 4;
    /// Lane 2 green lamp lit.
    pub const LANE2_GREEN: u8 = 1 << 5;
    /// Request line for lane 1 sampled high.
    pub const REQUEST1: u8 = 1 << 6;
    /// Request line for lane 2 sampled high.
    pub const REQUEST2: u8 = 1 << 7;

    /// Create an empty vector (no proposition holds).
    pub fn new() -> Self {
        PropVector(0)
    }

    /// Reconstruct a vector from its packed byte, e.g. when reading a
    /// persisted trace back.
    pub fn from_bits(bits: u8) -> Self {
        PropVector(bits)
    }

    /// The packed byte representation.
    pub fn bits(&self) -> u8 {
        self.0
    }

    /// Return a copy with the given proposition bits additionally set.
    pub fn with(self, mask: u8) -> Self {
        PropVector(self.0 | mask)
    }

    /// Check whether all bits of `mask` are set.
    pub fn contains(&self, mask: u8) -> bool {
        self.0 & mask == mask
    }

    /// The safety-critical instantaneous condition: both lanes showing
    /// green in the same tick.
    pub fn both_greens(&self) -> bool {
        self.contains(Self::LANE1_GREEN | Self::LANE2_GREEN)
    }
}

impl fmt::Debug for PropVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [&str; 8] = ["r1", "y1", "g1", "r2", "y2", "g2", "a1", "a2"];
        write!(f, "PropVector(")?;
        let mut first = true;
        for (bit, label) in NAMES.iter().enumerate() {
            if self.0 & (1 << bit) != 0 {
                if !first {
                    write!(f, " ")?;
                }
                write!(f, "{label}")?;
                first = false;
            }
        }
        write!(f, ")")
    }
}

/// Monotonically increasing counter of phase evaluations.
///
/// Incremented exactly once per control-loop iteration that performs a
/// phase evaluation; display refresh cycles do not advance it. Owned by the
/// lane controller, read by the history recorder and the forensics store.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ControlTick(u32);

impl ControlTick {
    /// The counter at power-on, before any phase evaluation.
    pub fn zero() -> Self {
        ControlTick(0)
    }

    /// Reconstruct a tick from its persisted representation.
    pub fn from_raw(raw: u32) -> Self {
        ControlTick(raw)
    }

    /// The raw counter value.
    pub fn value(&self) -> u32 {
        self.0
    }

    /// The counter after one more phase evaluation.
    pub fn next(self) -> Self {
        ControlTick(self.0.wrapping_add(1))
    }
}
