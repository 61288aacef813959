//! Ampel: a safety-monitored dual-lane signal controller core
//!
//! Ampel is the heart of a two-lane traffic-light controller that is
//! continuously checked by an online safety monitor and preserves forensic
//! evidence of any violation across power loss. The phase machine, the
//! monitor contract, the rolling proposition history, and the crash-safe
//! violation store are all host-testable: hardware sits behind small trait
//! seams with in-memory fakes.
//!
//! # Core Concepts
//!
//! - **LaneController**: time-triggered phase machine emitting one
//!   proposition vector per control tick
//! - **SafetyMonitor**: per-tick verdict over the vector stream, checked
//!   exactly once per tick
//! - **HistoryRecorder**: fixed ring of recent vectors, frozen the instant
//!   a violation is detected
//! - **ForensicsStore**: the persisted violation record, written once,
//!   erased only by the physical reset procedure
//! - **ControlLoop**: the single-threaded loop tying it all together,
//!   with a terminal fail-safe state instead of a hidden infinite loop
//!
//! # Example
//!
//! ```rust
//! use ampel::controller::{LaneController, PhaseMode, Requests};
//!
//! let mut controller = LaneController::new(0);
//! assert_eq!(controller.modes(), [PhaseMode::Red, PhaseMode::Red]);
//!
//! // The initial all-red clearance dwells one second.
//! assert!(controller.advance(500, Requests::default()).is_none());
//! let output = controller.advance(1_000, Requests::default()).unwrap();
//! assert_eq!(output.modes, [PhaseMode::ToGreen, PhaseMode::Red]);
//! ```

pub mod controller;
pub mod core;
pub mod diag;
pub mod forensics;
pub mod history;
pub mod monitor;
pub mod runtime;
pub mod storage;

// Re-export commonly used types
pub use crate::controller::{LaneController, PhaseMode, Requests};
pub use crate::core::{ControlTick, PropVector, State};
pub use crate::forensics::{ForensicsStore, ViolationRecord};
pub use crate::history::{HistoryRecorder, HistorySnapshot, HISTORY_CAPACITY};
pub use crate::monitor::{MutualExclusionMonitor, SafetyMonitor, Verdict};
pub use crate::runtime::{ControlLoop, LoopStep, SupervisorState};
pub use crate::storage::{MemoryRegion, NvRegion};
