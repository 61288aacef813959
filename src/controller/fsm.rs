//! The lane phase state machine.
//!
//! Eight macro-states cycle the two lanes through their phases with an
//! all-red clearance between green periods. Transitions are time-triggered
//! with a fixed dwell per phase; a pending request may shorten the current
//! dwell but never lengthen it, and never skips a yellow clearance.

use crate::controller::phase::{Lane, PhaseMode};
use crate::core::{ControlTick, PropVector};
use crate::state_enum;

/// Device-monotonic time in milliseconds, supplied by the caller.
pub type Millis = u64;

/// Dwell of the shared all-red clearance phase.
pub const ALL_RED_DWELL_MS: Millis = 1000;
/// Dwell of a red+yellow approach phase.
pub const APPROACH_DWELL_MS: Millis = 1000;
/// Dwell of a green phase.
pub const GREEN_DWELL_MS: Millis = 2000;
/// Dwell of a yellow leave phase.
pub const LEAVE_DWELL_MS: Millis = 1000;
/// Upper bound on remaining dwell once a request is pending.
pub const REQUEST_CLAMP_MS: Millis = 750;

state_enum! {
    /// Macro-state of the paired-lane cycle.
    ///
    /// `AllRed` doubles as the initial state and the clearance phase
    /// between green periods. `Fault` is terminal and entered only through
    /// [`LaneController::force_fault`].
    pub enum ControllerState {
        AllRed,
        ApproachOne,
        GreenOne,
        LeaveOne,
        ApproachTwo,
        GreenTwo,
        LeaveTwo,
        Fault,
    }
    final: [Fault]
    error: [Fault]
}

impl ControllerState {
    /// Phase modes displayed by the two lanes in this state.
    pub fn modes(&self) -> [PhaseMode; 2] {
        match self {
            Self::AllRed => [PhaseMode::Red, PhaseMode::Red],
            Self::ApproachOne => [PhaseMode::ToGreen, PhaseMode::Red],
            Self::GreenOne => [PhaseMode::Green, PhaseMode::Red],
            Self::LeaveOne => [PhaseMode::ToRed, PhaseMode::Red],
            Self::ApproachTwo => [PhaseMode::Red, PhaseMode::ToGreen],
            Self::GreenTwo => [PhaseMode::Red, PhaseMode::Green],
            Self::LeaveTwo => [PhaseMode::Red, PhaseMode::ToRed],
            Self::Fault => [PhaseMode::Fault, PhaseMode::Fault],
        }
    }

    /// Minimum dwell before the next time-triggered transition.
    pub fn dwell_ms(&self) -> Millis {
        match self {
            Self::AllRed => ALL_RED_DWELL_MS,
            Self::ApproachOne | Self::ApproachTwo => APPROACH_DWELL_MS,
            Self::GreenOne | Self::GreenTwo => GREEN_DWELL_MS,
            Self::LeaveOne | Self::LeaveTwo => LEAVE_DWELL_MS,
            Self::Fault => 0,
        }
    }
}

/// Request-line samples for one poll, reduced to booleans at the sampler
/// boundary.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Requests {
    /// Request line of lane 1.
    pub lane1: bool,
    /// Request line of lane 2.
    pub lane2: bool,
}

/// Result of one phase evaluation.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TickOutput {
    /// The control tick this evaluation was counted as.
    pub tick: ControlTick,
    /// Displayed phase mode per lane.
    pub modes: [PhaseMode; 2],
    /// Atomic propositions derived from the modes and request samples.
    pub props: PropVector,
}

/// Time-triggered controller for the paired-lane cycle.
///
/// [`advance`](LaneController::advance) is called at a bounded cadence with
/// the current monotonic time and the latest request samples. It blocks on
/// nothing and performs no I/O; a phase evaluation happens only when the
/// current phase's dwell has elapsed, and only evaluations advance the
/// control tick.
///
/// Request policy:
/// - a pending request clamps the remaining dwell to
///   [`REQUEST_CLAMP_MS`], shortening phases but never lengthening them;
/// - simultaneous requests are serviced round-robin from the clearance
///   state, so neither lane starves;
/// - a request sampled during its own lane's green phase is ignored for
///   that cycle, and the lane's latch clears when its green begins.
pub struct LaneController {
    state: ControllerState,
    deadline: Millis,
    tick: ControlTick,
    pending1: bool,
    pending2: bool,
    last_served: Lane,
}

impl LaneController {
    /// Create a controller at `now`, both lanes red.
    pub fn new(now: Millis) -> Self {
        LaneController {
            state: ControllerState::AllRed,
            deadline: now + ALL_RED_DWELL_MS,
            tick: ControlTick::zero(),
            pending1: false,
            pending2: false,
            last_served: Lane::Two,
        }
    }

    /// The current macro-state.
    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// The phase modes currently displayed.
    pub fn modes(&self) -> [PhaseMode; 2] {
        self.state.modes()
    }

    /// The number of phase evaluations performed so far.
    pub fn tick(&self) -> ControlTick {
        self.tick
    }

    /// Force the terminal fault state. Invoked by the fail-safe supervisor
    /// only; there is no way back short of a device reset.
    pub fn force_fault(&mut self) {
        self.state = ControllerState::Fault;
    }

    /// Advance time to `now` with the given request samples.
    ///
    /// Returns `Some` exactly when a phase evaluation occurred; `None`
    /// means the current phase is still dwelling (or the controller is in
    /// its terminal fault state).
    pub fn advance(&mut self, now: Millis, requests: Requests) -> Option<TickOutput> {
        if self.state == ControllerState::Fault {
            return None;
        }

        // Latch requests; a lane's own green ignores its request line.
        if requests.lane1 && self.state != ControllerState::GreenOne {
            self.pending1 = true;
        }
        if requests.lane2 && self.state != ControllerState::GreenTwo {
            self.pending2 = true;
        }

        // A pending request shortens the remaining dwell, never lengthens.
        if (self.pending1 || self.pending2) && self.deadline > now + REQUEST_CLAMP_MS {
            self.deadline = now + REQUEST_CLAMP_MS;
        }

        if now < self.deadline {
            return None;
        }

        let next = match self.state {
            ControllerState::AllRed => match self.pick_lane() {
                Lane::One => ControllerState::ApproachOne,
                Lane::Two => ControllerState::ApproachTwo,
            },
            ControllerState::ApproachOne => {
                self.pending1 = false;
                self.last_served = Lane::One;
                ControllerState::GreenOne
            }
            ControllerState::GreenOne => ControllerState::LeaveOne,
            ControllerState::LeaveOne => ControllerState::AllRed,
            ControllerState::ApproachTwo => {
                self.pending2 = false;
                self.last_served = Lane::Two;
                ControllerState::GreenTwo
            }
            ControllerState::GreenTwo => ControllerState::LeaveTwo,
            ControllerState::LeaveTwo => ControllerState::AllRed,
            ControllerState::Fault => return None,
        };

        self.state = next;
        self.deadline = now + next.dwell_ms();
        self.tick = self.tick.next();

        let modes = next.modes();
        Some(TickOutput {
            tick: self.tick,
            modes,
            props: derive_props(modes, requests),
        })
    }

    /// Which lane the clearance phase hands green to next.
    fn pick_lane(&self) -> Lane {
        match (self.pending1, self.pending2) {
            (true, false) => Lane::One,
            (false, true) => Lane::Two,
            // Both pending or neither: alternate.
            _ => self.last_served.other(),
        }
    }
}

/// Pack the lamp propositions of both lanes and the request samples into
/// one vector.
pub fn derive_props(modes: [PhaseMode; 2], requests: Requests) -> PropVector {
    let mut bits = 0u8;
    if modes[0].red_lamp() {
        bits |= PropVector::LANE1_RED;
    }
    if modes[0].yellow_lamp() {
        bits |= PropVector::LANE1_YELLOW;
    }
    if modes[0].green_lamp() {
        bits |= PropVector::LANE1_GREEN;
    }
    if modes[1].red_lamp() {
        bits |= PropVector::LANE2_RED;
    }
    if modes[1].yellow_lamp() {
        bits |= PropVector::LANE2_YELLOW;
    }
    if modes[1].green_lamp() {
        bits |= PropVector::LANE2_GREEN;
    }
    if requests.lane1 {
        bits |= PropVector::REQUEST1;
    }
    if requests.lane2 {
        bits |= PropVector::REQUEST2;
    }
    PropVector::from_bits(bits)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_until_output(
        controller: &mut LaneController,
        now: &mut Millis,
        requests: Requests,
    ) -> TickOutput {
        loop {
            *now += 50;
            if let Some(output) = controller.advance(*now, requests) {
                return output;
            }
            assert!(*now < 1_000_000, "controller stopped producing evaluations");
        }
    }

    #[test]
    fn starts_all_red() {
        let controller = LaneController::new(0);
        assert_eq!(controller.state(), ControllerState::AllRed);
        assert_eq!(controller.modes(), [PhaseMode::Red, PhaseMode::Red]);
        assert_eq!(controller.tick(), ControlTick::zero());
    }

    #[test]
    fn no_evaluation_before_dwell_elapses() {
        let mut controller = LaneController::new(0);
        assert!(controller.advance(500, Requests::default()).is_none());
        assert_eq!(controller.tick().value(), 0);
        assert!(controller.advance(1000, Requests::default()).is_some());
        assert_eq!(controller.tick().value(), 1);
    }

    #[test]
    fn unrequested_cycle_alternates_lanes() {
        let mut controller = LaneController::new(0);
        let mut now = 0;
        let mut states = Vec::new();
        for _ in 0..8 {
            run_until_output(&mut controller, &mut now, Requests::default());
            states.push(controller.state());
        }
        assert_eq!(
            states,
            vec![
                ControllerState::ApproachOne,
                ControllerState::GreenOne,
                ControllerState::LeaveOne,
                ControllerState::AllRed,
                ControllerState::ApproachTwo,
                ControllerState::GreenTwo,
                ControllerState::LeaveTwo,
                ControllerState::AllRed,
            ]
        );
    }

    #[test]
    fn request_steers_clearance_to_requesting_lane() {
        let mut controller = LaneController::new(0);
        let mut now = 0;
        // Request lane 2 during the initial clearance.
        run_until_output(
            &mut controller,
            &mut now,
            Requests {
                lane1: false,
                lane2: true,
            },
        );
        assert_eq!(controller.state(), ControllerState::ApproachTwo);
    }

    #[test]
    fn simultaneous_requests_are_served_round_robin() {
        let mut controller = LaneController::new(0);
        let mut now = 0;
        let both = Requests {
            lane1: true,
            lane2: true,
        };
        let mut greens = Vec::new();
        for _ in 0..10 {
            run_until_output(&mut controller, &mut now, both);
            match controller.state() {
                ControllerState::GreenOne => greens.push(Lane::One),
                ControllerState::GreenTwo => greens.push(Lane::Two),
                _ => {}
            }
        }
        assert!(greens.len() >= 2);
        for pair in greens.windows(2) {
            assert_ne!(pair[0], pair[1], "a lane was served twice in a row");
        }
    }

    #[test]
    fn pending_request_shortens_green_dwell() {
        let mut controller = LaneController::new(0);
        let mut now = 0;
        while controller.state() != ControllerState::GreenOne {
            run_until_output(&mut controller, &mut now, Requests::default());
        }
        let entered = now;
        // Lane 2 requests shortly after lane 1 turned green.
        let output = run_until_output(
            &mut controller,
            &mut now,
            Requests {
                lane1: false,
                lane2: true,
            },
        );
        assert_eq!(controller.state(), ControllerState::LeaveOne);
        assert!(output.props.contains(PropVector::REQUEST2));
        assert!(
            now - entered <= REQUEST_CLAMP_MS + 100,
            "green dwelled {} ms despite a pending request",
            now - entered
        );
    }

    #[test]
    fn request_never_lengthens_a_phase() {
        let mut controller = LaneController::new(0);
        // 200 ms before the clearance ends, a request arrives; the deadline
        // must not move out to now + clamp.
        assert!(controller
            .advance(
                800,
                Requests {
                    lane1: true,
                    lane2: false,
                }
            )
            .is_none());
        assert!(controller.advance(1000, Requests::default()).is_some());
    }

    #[test]
    fn request_during_own_green_is_ignored_for_the_cycle() {
        let mut controller = LaneController::new(0);
        let mut now = 0;
        while controller.state() != ControllerState::GreenOne {
            run_until_output(&mut controller, &mut now, Requests::default());
        }
        // Lane 1 requests while lane 1 is green.
        let own = Requests {
            lane1: true,
            lane2: false,
        };
        run_until_output(&mut controller, &mut now, own);
        assert_eq!(controller.state(), ControllerState::LeaveOne);
        // With no latched request, the clearance alternates to lane 2.
        run_until_output(&mut controller, &mut now, Requests::default());
        assert_eq!(controller.state(), ControllerState::AllRed);
        run_until_output(&mut controller, &mut now, Requests::default());
        assert_eq!(controller.state(), ControllerState::ApproachTwo);
    }

    #[test]
    fn requests_never_skip_the_yellow_clearance() {
        let mut controller = LaneController::new(0);
        let mut now = 0;
        let mut previous = controller.state();
        for _ in 0..40 {
            run_until_output(
                &mut controller,
                &mut now,
                Requests {
                    lane1: true,
                    lane2: true,
                },
            );
            let current = controller.state();
            if current == ControllerState::GreenOne {
                assert_eq!(previous, ControllerState::ApproachOne);
            }
            if current == ControllerState::GreenTwo {
                assert_eq!(previous, ControllerState::ApproachTwo);
            }
            previous = current;
        }
    }

    #[test]
    fn props_match_displayed_modes() {
        let mut controller = LaneController::new(0);
        let mut now = 0;
        for _ in 0..12 {
            let output = run_until_output(&mut controller, &mut now, Requests::default());
            let [one, two] = output.modes;
            assert_eq!(output.props.contains(PropVector::LANE1_RED), one.red_lamp());
            assert_eq!(
                output.props.contains(PropVector::LANE1_YELLOW),
                one.yellow_lamp()
            );
            assert_eq!(
                output.props.contains(PropVector::LANE1_GREEN),
                one.green_lamp()
            );
            assert_eq!(output.props.contains(PropVector::LANE2_RED), two.red_lamp());
            assert_eq!(
                output.props.contains(PropVector::LANE2_YELLOW),
                two.yellow_lamp()
            );
            assert_eq!(
                output.props.contains(PropVector::LANE2_GREEN),
                two.green_lamp()
            );
        }
    }

    #[test]
    fn fault_state_is_terminal() {
        let mut controller = LaneController::new(0);
        controller.force_fault();
        assert_eq!(controller.state(), ControllerState::Fault);
        assert_eq!(controller.modes(), [PhaseMode::Fault, PhaseMode::Fault]);
        assert!(controller
            .advance(
                1_000_000,
                Requests {
                    lane1: true,
                    lane2: true,
                }
            )
            .is_none());
        assert_eq!(controller.state(), ControllerState::Fault);
    }

    #[test]
    fn tick_counts_evaluations_not_polls() {
        let mut controller = LaneController::new(0);
        let mut evaluations = 0;
        for now in (0..20_000).step_by(50) {
            if controller.advance(now, Requests::default()).is_some() {
                evaluations += 1;
            }
        }
        assert_eq!(controller.tick().value(), evaluations);
        assert!(evaluations > 0);
    }
}
