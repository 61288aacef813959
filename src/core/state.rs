//! Core `State` trait for controller states.
//!
//! Every state enum in the controller core implements this trait: the lane
//! phase machine, the per-lane phase modes, and the fail-safe supervisor.
//! The methods are pure inspection; nothing here performs I/O.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for controller states.
///
/// All methods are pure. States are immutable values describing the current
/// position of a machine; advancing a machine replaces its state value
/// rather than mutating it.
///
/// # Required Traits
///
/// - `Clone`: states are copied into history and forensic records
/// - `PartialEq`: transition logic compares states
/// - `Debug`: states appear in diagnostics
/// - `Serialize` + `Deserialize`: states are persisted and exported
///
/// # Example
///
/// ```rust
/// use ampel::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum GateState {
///     Closed,
///     Opening,
///     Open,
///     Jammed,
/// }
///
/// impl State for GateState {
///     fn name(&self) -> &str {
///         match self {
///             Self::Closed => "Closed",
///             Self::Opening => "Opening",
///             Self::Open => "Open",
///             Self::Jammed => "Jammed",
///         }
///     }
///
///     fn is_final(&self) -> bool {
///         matches!(self, Self::Jammed)
///     }
///
///     fn is_error(&self) -> bool {
///         matches!(self, Self::Jammed)
///     }
/// }
/// ```
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Get the state's name for display and diagnostics.
    fn name(&self) -> &str;

    /// Check if this is a terminal state.
    ///
    /// Terminal states are never left without a full device reset.
    ///
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }

    /// Check if this is a fault state.
    ///
    /// Fault states represent the fail-safe configuration. They are
    /// typically also terminal, but this is not enforced.
    ///
    /// Default implementation returns `false`.
    fn is_error(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum TestState {
        Idle,
        Serving,
        Clearing,
        Faulted,
    }

    impl State for TestState {
        fn name(&self) -> &str {
            match self {
                Self::Idle => "Idle",
                Self::Serving => "Serving",
                Self::Clearing => "Clearing",
                Self::Faulted => "Faulted",
            }
        }

        fn is_final(&self) -> bool {
            matches!(self, Self::Faulted)
        }

        fn is_error(&self) -> bool {
            matches!(self, Self::Faulted)
        }
    }

    #[test]
    fn state_name_returns_correct_value() {
        assert_eq!(TestState::Idle.name(), "Idle");
        assert_eq!(TestState::Serving.name(), "Serving");
        assert_eq!(TestState::Clearing.name(), "Clearing");
        assert_eq!(TestState::Faulted.name(), "Faulted");
    }

    #[test]
    fn is_final_identifies_terminal_states() {
        assert!(!TestState::Idle.is_final());
        assert!(!TestState::Serving.is_final());
        assert!(!TestState::Clearing.is_final());
        assert!(TestState::Faulted.is_final());
    }

    #[test]
    fn is_error_identifies_fault_states() {
        assert!(!TestState::Idle.is_error());
        assert!(!TestState::Serving.is_error());
        assert!(TestState::Faulted.is_error());
    }

    #[test]
    fn state_serializes_correctly() {
        let state = TestState::Clearing;
        let json = serde_json::to_string(&state).unwrap();
        let deserialized: TestState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, deserialized);
    }
}
