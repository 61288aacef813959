//! Safety monitor contract and the reference implementation.
//!
//! The monitor consumes one [`PropVector`] per control tick and returns a
//! [`Verdict`]. Concrete monitors may be generated from temporal-logic
//! specifications and track patterns across ticks; the control loop only
//! depends on the small [`SafetyMonitor`] seam so the checking algorithm
//! can be swapped or verified independently.

use crate::core::PropVector;
use serde::{Deserialize, Serialize};

/// Per-tick result of a safety check.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Verdict {
    /// The observed execution still satisfies the monitored property.
    Pass,
    /// The monitored property is violated as of this tick.
    Violation,
}

/// A stateful checker fed the proposition vector of every control tick.
///
/// # Contract
///
/// - `check` is called exactly once per control tick, always after the
///   tick's vector has been recorded into history.
/// - Monitors may keep internal history across ticks; callers must not
///   invoke `check` twice for the same tick.
/// - Once `Violation` has been returned, the monitor's internal state is
///   not designed to recover: the caller must never call `check` again for
///   the remaining process lifetime. The fail-safe supervisor enforces
///   this by construction.
pub trait SafetyMonitor {
    /// Feed one tick's proposition vector and obtain the verdict.
    fn check(&mut self, props: PropVector) -> Verdict;
}

/// Reference monitor for the lane mutual-exclusion property: the green
/// bits of the two lanes must never be set in the same vector.
///
/// The verdict latches; a tripped monitor keeps answering `Violation`
/// even though the contract forbids asking again.
#[derive(Clone, Debug, Default)]
pub struct MutualExclusionMonitor {
    tripped: bool,
}

impl MutualExclusionMonitor {
    /// Create a monitor that has observed nothing yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a violation has been observed.
    pub fn tripped(&self) -> bool {
        self.tripped
    }
}

impl SafetyMonitor for MutualExclusionMonitor {
    fn check(&mut self, props: PropVector) -> Verdict {
        if props.both_greens() {
            self.tripped = true;
        }
        if self.tripped {
            Verdict::Violation
        } else {
            Verdict::Pass
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(bits: u8) -> PropVector {
        PropVector::from_bits(bits)
    }

    #[test]
    fn exclusive_greens_pass() {
        let mut monitor = MutualExclusionMonitor::new();
        let lane1_green = vector(PropVector::LANE1_GREEN | PropVector::LANE2_RED);
        let lane2_green = vector(PropVector::LANE1_RED | PropVector::LANE2_GREEN);

        assert_eq!(monitor.check(lane1_green), Verdict::Pass);
        assert_eq!(monitor.check(lane2_green), Verdict::Pass);
        assert!(!monitor.tripped());
    }

    #[test]
    fn simultaneous_greens_violate() {
        let mut monitor = MutualExclusionMonitor::new();
        let both = vector(PropVector::LANE1_GREEN | PropVector::LANE2_GREEN);
        assert_eq!(monitor.check(both), Verdict::Violation);
        assert!(monitor.tripped());
    }

    #[test]
    fn verdict_latches_after_violation() {
        let mut monitor = MutualExclusionMonitor::new();
        let both = vector(PropVector::LANE1_GREEN | PropVector::LANE2_GREEN);
        let safe = vector(PropVector::LANE1_RED | PropVector::LANE2_RED);

        assert_eq!(monitor.check(both), Verdict::Violation);
        assert_eq!(monitor.check(safe), Verdict::Violation);
    }

    #[test]
    fn request_bits_do_not_affect_the_property() {
        let mut monitor = MutualExclusionMonitor::new();
        let requested = vector(
            PropVector::LANE1_RED | PropVector::LANE2_RED | PropVector::REQUEST1
                | PropVector::REQUEST2,
        );
        assert_eq!(monitor.check(requested), Verdict::Pass);
    }
}
