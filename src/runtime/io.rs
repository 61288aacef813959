//! Hardware-boundary seams of the control loop.
//!
//! Request lines may be interrupt-driven at the hardware boundary; the
//! interrupt context does nothing beyond setting single-bit flags on a
//! [`RequestLatch`], which the loop drains synchronously at the start of
//! each poll. Display and alarm outputs are write-only sinks.

use crate::controller::{PhaseMode, Requests};

/// Sink for the per-tick phase modes. Segment codes and multiplexing are
/// the display collaborator's concern.
pub trait DisplayPort {
    /// Present the given modes, lane 1 first.
    fn show(&mut self, modes: [PhaseMode; 2]);
}

/// Sink for the visual-alarm indicator driven in the faulted state.
pub trait AlarmPort {
    /// Switch the indicator on or off.
    fn set(&mut self, on: bool);
}

impl DisplayPort for () {
    fn show(&mut self, _modes: [PhaseMode; 2]) {}
}

impl AlarmPort for () {
    fn set(&mut self, _on: bool) {}
}

/// Latched input flags, set at the interrupt boundary and drained once per
/// poll.
///
/// Setting a flag is the only work permitted in interrupt context; all
/// evaluation happens synchronously in the control loop, which removes any
/// race between sampling and the phase machine.
#[derive(Clone, Debug, Default)]
pub struct RequestLatch {
    lane1: bool,
    lane2: bool,
    reset: bool,
}

impl RequestLatch {
    /// Create a latch with no pending flags.
    pub fn new() -> Self {
        Self::default()
    }

    /// Latch a request on lane 1's line.
    pub fn request_lane1(&mut self) {
        self.lane1 = true;
    }

    /// Latch a request on lane 2's line.
    pub fn request_lane2(&mut self) {
        self.lane2 = true;
    }

    /// Latch the physical reset line. Debounce happens upstream; by the
    /// time this flag is set the operator action is taken as confirmed.
    pub fn assert_reset(&mut self) {
        self.reset = true;
    }

    /// Drain all flags, returning the sampled inputs for this poll.
    pub fn take(&mut self) -> SampledInputs {
        let sampled = SampledInputs {
            requests: Requests {
                lane1: self.lane1,
                lane2: self.lane2,
            },
            reset: self.reset,
        };
        *self = Self::default();
        sampled
    }
}

/// Inputs sampled at the start of one poll.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SampledInputs {
    /// Request-line samples for the two lanes.
    pub requests: Requests,
    /// Whether the physical reset line was asserted.
    pub reset: bool,
}
