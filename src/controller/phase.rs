//! Per-lane phase modes and lane identities.

use crate::state_enum;

state_enum! {
    /// Displayed phase of a single lane.
    ///
    /// One mode per lane per control tick, derived from the controller
    /// state and never set independently of it. `ToGreen` shows red and
    /// yellow together, `ToRed` shows yellow alone, matching the lamp
    /// conventions of the controlled signal heads.
    pub enum PhaseMode {
        /// Red lamp only.
        Red,
        /// Red and yellow lamps, green is imminent.
        ToGreen,
        /// Green lamp only.
        Green,
        /// Yellow lamp only, red is imminent.
        ToRed,
        /// Distinguished fail-safe display code.
        Fault,
    }
    final: [Fault]
    error: [Fault]
}

impl PhaseMode {
    /// Whether the red lamp is lit in this mode.
    pub fn red_lamp(&self) -> bool {
        matches!(self, PhaseMode::Red | PhaseMode::ToGreen)
    }

    /// Whether the yellow lamp is lit in this mode.
    pub fn yellow_lamp(&self) -> bool {
        matches!(self, PhaseMode::ToGreen | PhaseMode::ToRed)
    }

    /// Whether the green lamp is lit in this mode.
    pub fn green_lamp(&self) -> bool {
        matches!(self, PhaseMode::Green)
    }
}

/// Identity of one of the two controlled lanes.
#[derive(Clone, Copy, PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize)]
pub enum Lane {
    /// Lane 1.
    One,
    /// Lane 2.
    Two,
}

impl Lane {
    /// The opposite lane.
    pub fn other(&self) -> Lane {
        match self {
            Lane::One => Lane::Two,
            Lane::Two => Lane::One,
        }
    }
}
