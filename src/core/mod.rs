//! Core vocabulary shared by every part of the controller.
//!
//! - **State**: type-safe state representation via the [`State`] trait
//! - **PropVector**: the per-tick atomic-proposition bit set
//! - **ControlTick**: the phase-evaluation counter

pub mod macros;
pub mod props;
pub mod state;

pub use props::{ControlTick, PropVector};
pub use state::State;
