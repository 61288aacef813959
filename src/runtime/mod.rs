//! Control-loop runtime: input latching, output seams, and the fail-safe
//! supervisor.
//!
//! Everything mutable lives in one [`ControlLoop`] value owned by the
//! single control thread; there is no shared mutable state beyond the
//! interrupt-set flags of the [`RequestLatch`].

pub mod control;
pub mod io;

pub use control::{ControlLoop, LoopStep, SupervisorState, ALARM_HALF_PERIOD_MS};
pub use io::{AlarmPort, DisplayPort, RequestLatch, SampledInputs};
