//! The control loop and the fail-safe supervisor.
//!
//! A single sequential loop owns every mutable piece of the core: the lane
//! controller, the history ring, the monitor, and the forensics store. One
//! [`poll`](ControlLoop::poll) call performs at most one phase evaluation;
//! nothing blocks except the storage write on the (at most once per
//! lifetime) forensic commit.

use crate::controller::{LaneController, Millis, PhaseMode};
use crate::core::{ControlTick, State};
use crate::diag::{self, DiagnosticPort};
use crate::forensics::{ForensicsError, ForensicsStore};
use crate::history::HistoryRecorder;
use crate::monitor::{SafetyMonitor, Verdict};
use crate::runtime::io::{AlarmPort, DisplayPort, RequestLatch};
use crate::state_enum;
use crate::storage::NvRegion;

/// Half-period of the visual alarm: the indicator toggles this often.
pub const ALARM_HALF_PERIOD_MS: Millis = 500;

state_enum! {
    /// State of the fail-safe supervisor.
    ///
    /// The single transition `Monitoring -> Faulted` happens at most once
    /// per power-on; `Faulted` is left only by a physical device reset.
    pub enum SupervisorState {
        Monitoring,
        Faulted,
    }
    final: [Faulted]
    error: [Faulted]
}

/// What one poll of the control loop did.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LoopStep {
    /// Nothing was due: no phase evaluation, no alarm edge.
    Idle,
    /// A healthy phase evaluation completed.
    Evaluated {
        /// The control tick just counted.
        tick: ControlTick,
        /// The modes now displayed.
        modes: [PhaseMode; 2],
    },
    /// The monitor flagged this tick; the fault sequence ran and the
    /// forensic record is committed.
    Tripped {
        /// The control tick at detection.
        tick: ControlTick,
    },
    /// The reset line was serviced: record erased, alarm state entered.
    Erased,
    /// The visual alarm toggled while faulted.
    Alarm {
        /// Indicator level after the toggle.
        on: bool,
    },
}

/// The safety-monitored control loop.
///
/// Generic over the monitor, the storage region, and the three output
/// seams, so the whole loop runs against in-memory fakes on the host. On
/// construction it emits the power-on report (the full region dump) on the
/// diagnostic port.
pub struct ControlLoop<M, R, D, A, P>
where
    M: SafetyMonitor,
    R: NvRegion,
    D: DisplayPort,
    A: AlarmPort,
    P: DiagnosticPort,
{
    controller: LaneController,
    history: HistoryRecorder,
    monitor: M,
    forensics: ForensicsStore<R>,
    display: D,
    alarm: A,
    diag: P,
    latch: RequestLatch,
    state: SupervisorState,
    alarm_on: bool,
    alarm_deadline: Millis,
}

impl<M, R, D, A, P> ControlLoop<M, R, D, A, P>
where
    M: SafetyMonitor,
    R: NvRegion,
    D: DisplayPort,
    A: AlarmPort,
    P: DiagnosticPort,
{
    /// Build the loop at time `now` and emit the power-on report.
    pub fn new(
        now: Millis,
        monitor: M,
        forensics: ForensicsStore<R>,
        mut display: D,
        alarm: A,
        mut diag: P,
    ) -> Result<Self, ForensicsError> {
        diag.send(&diag::boot_report(forensics.region())?);
        let controller = LaneController::new(now);
        display.show(controller.modes());
        Ok(ControlLoop {
            controller,
            history: HistoryRecorder::new(),
            monitor,
            forensics,
            display,
            alarm,
            diag,
            latch: RequestLatch::new(),
            state: SupervisorState::Monitoring,
            alarm_on: false,
            alarm_deadline: 0,
        })
    }

    /// The latch fed by the interrupt boundary.
    pub fn latch(&mut self) -> &mut RequestLatch {
        &mut self.latch
    }

    /// Current supervisor state.
    pub fn supervisor_state(&self) -> SupervisorState {
        self.state
    }

    /// Modes currently displayed.
    pub fn modes(&self) -> [PhaseMode; 2] {
        self.controller.modes()
    }

    /// The forensics store, e.g. for rendering the persisted record.
    pub fn forensics(&self) -> &ForensicsStore<R> {
        &self.forensics
    }

    /// The diagnostic port, e.g. for inspecting emitted reports in tests.
    pub fn diagnostics(&self) -> &P {
        &self.diag
    }

    /// Tear the loop down, releasing the forensics store with its region
    /// contents intact. Used to simulate a power cycle in host tests.
    pub fn into_forensics(self) -> ForensicsStore<R> {
        self.forensics
    }

    /// Run one iteration of the control loop at time `now`.
    ///
    /// Drains the input latch, services the reset line, and while healthy
    /// advances the phase machine, records the tick's propositions and
    /// feeds them to the monitor: exactly once per tick, never again after
    /// a violation.
    pub fn poll(&mut self, now: Millis) -> Result<LoopStep, ForensicsError> {
        let inputs = self.latch.take();

        if inputs.reset {
            // Destructive operator action: wipe the record, then park in
            // the alarm state whatever the prior state was.
            self.forensics.erase()?;
            self.controller.force_fault();
            self.display.show(self.controller.modes());
            self.state = SupervisorState::Faulted;
            self.start_alarm(now);
            return Ok(LoopStep::Erased);
        }

        if self.state.is_final() {
            if now >= self.alarm_deadline {
                self.alarm_on = !self.alarm_on;
                self.alarm.set(self.alarm_on);
                self.alarm_deadline = now + ALARM_HALF_PERIOD_MS;
                return Ok(LoopStep::Alarm { on: self.alarm_on });
            }
            return Ok(LoopStep::Idle);
        }

        let Some(output) = self.controller.advance(now, inputs.requests) else {
            return Ok(LoopStep::Idle);
        };

        // History first: the ring must already cover this tick when the
        // monitor flags it.
        self.history.record(output.tick, output.props);

        match self.monitor.check(output.props) {
            Verdict::Pass => {
                self.display.show(output.modes);
                Ok(LoopStep::Evaluated {
                    tick: output.tick,
                    modes: output.modes,
                })
            }
            Verdict::Violation => self.trip(now, output.tick),
        }
    }

    /// The ordered fault sequence: fail-safe display, forensic commit,
    /// monitoring stopped for good, alarm started.
    fn trip(&mut self, now: Millis, tick: ControlTick) -> Result<LoopStep, ForensicsError> {
        self.controller.force_fault();
        self.display.show(self.controller.modes());
        let committed = self.forensics.commit(tick, &self.history.snapshot());
        self.state = SupervisorState::Faulted;
        self.start_alarm(now);
        // A storage fault surfaces only after the fail-safe is locked in;
        // there is no recovery path for it either way.
        committed?;
        self.diag
            .send(&diag::violation_report(&self.forensics.render()?));
        Ok(LoopStep::Tripped { tick })
    }

    fn start_alarm(&mut self, now: Millis) {
        self.alarm_on = true;
        self.alarm.set(true);
        self.alarm_deadline = now + ALARM_HALF_PERIOD_MS;
    }
}
