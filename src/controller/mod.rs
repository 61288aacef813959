//! Lane controller: the time-triggered phase machine for the two lanes.
//!
//! The controller owns the control-tick counter and produces, per phase
//! evaluation, the displayed [`PhaseMode`]s and the [`PropVector`] consumed
//! by the safety monitor and the history recorder.
//!
//! [`PropVector`]: crate::core::PropVector

pub mod fsm;
pub mod phase;

pub use fsm::{
    derive_props, ControllerState, LaneController, Millis, Requests, TickOutput,
    ALL_RED_DWELL_MS, APPROACH_DWELL_MS, GREEN_DWELL_MS, LEAVE_DWELL_MS, REQUEST_CLAMP_MS,
};
pub use phase::{Lane, PhaseMode};
