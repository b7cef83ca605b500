use std::fmt;
use std::time::Duration;

use constants::narration::script_for;
use constants::phase::{PHASE_COUNT, PhaseInfo, phase};
use serde::Serialize;

use super::error::{SimulationError, TransitionBlock};
use super::narration::{NarrationLog, ScriptRunner};

/// Phase index driving every derived visual. 0 is idle, 4 is complete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Step(u8);

impl Step {
    pub const IDLE: Step = Step(0);
    pub const COMPLETE: Step = Step(PHASE_COUNT);

    pub fn new(value: u8) -> Result<Self, SimulationError> {
        if value <= PHASE_COUNT {
            Ok(Self(value))
        } else {
            Err(SimulationError::IndexOutOfRange {
                kind: "step",
                index: value as usize,
                valid: "0..=4",
            })
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_idle(self) -> bool {
        self == Self::IDLE
    }

    pub fn is_complete(self) -> bool {
        self == Self::COMPLETE
    }

    pub fn next(self) -> Option<Step> {
        (self.0 < PHASE_COUNT).then(|| Step(self.0 + 1))
    }

    /// Descriptor of the phase this step shows. Fails on the idle step.
    pub fn phase(self) -> Result<&'static PhaseInfo, SimulationError> {
        phase(self.0).ok_or(SimulationError::IndexOutOfRange {
            kind: "phase",
            index: self.0 as usize,
            valid: "1..=4",
        })
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Exactly one of these holds at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "phase", rename_all = "snake_case")]
pub enum SessionStatus {
    Idle,
    Processing,
    AtPhase(u8),
    Complete,
}

/// A committed step change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepTransition {
    pub from: Step,
    pub to: Step,
}

/// Step counter with a single forward transition guarded by the in-flight script.
#[derive(Debug, Default)]
pub struct StepMachine {
    step: Step,
    in_flight: Option<ScriptRunner>,
}

impl StepMachine {
    pub fn step(&self) -> Step {
        self.step
    }

    pub fn is_processing(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn status(&self) -> SessionStatus {
        if self.in_flight.is_some() {
            SessionStatus::Processing
        } else if self.step.is_idle() {
            SessionStatus::Idle
        } else if self.step.is_complete() {
            SessionStatus::Complete
        } else {
            SessionStatus::AtPhase(self.step.value())
        }
    }

    /// Target of the script currently running, if any.
    pub fn pending_target(&self) -> Option<Step> {
        self.in_flight.as_ref().map(|r| Step(r.target_step()))
    }

    pub fn can_advance(&self) -> bool {
        self.in_flight.is_none() && !self.step.is_complete()
    }

    /// Start the transition to the next step. The step itself is committed by
    /// [`StepMachine::tick`] once the narration script has finished.
    pub fn advance(&mut self, log: &mut NarrationLog) -> Result<Step, SimulationError> {
        if self.in_flight.is_some() {
            return Err(SimulationError::InvalidTransition {
                step: self.step.value(),
                reason: TransitionBlock::Processing,
            });
        }
        let Some(target) = self.step.next() else {
            return Err(SimulationError::InvalidTransition {
                step: self.step.value(),
                reason: TransitionBlock::Complete,
            });
        };
        let script = script_for(target.value()).ok_or(SimulationError::IndexOutOfRange {
            kind: "script",
            index: target.value() as usize,
            valid: "1..=4",
        })?;

        self.in_flight = Some(ScriptRunner::start(target.value(), script, log));
        Ok(target)
    }

    /// Advance the in-flight script by `delta` and commit the step when it finishes.
    pub fn tick(&mut self, delta: Duration, log: &mut NarrationLog) -> Option<StepTransition> {
        let runner = self.in_flight.as_mut()?;
        if !runner.tick(delta, log) {
            return None;
        }
        let target = Step(runner.target_step());
        self.in_flight = None;
        let transition = StepTransition {
            from: self.step,
            to: target,
        };
        self.step = target;
        Some(transition)
    }

    /// Back to idle. Any in-flight script is dropped along with its pending
    /// lines and step commit.
    pub fn reset(&mut self, log: &mut NarrationLog) -> Option<Step> {
        let cancelled = self.pending_target();
        self.in_flight = None;
        self.step = Step::IDLE;
        log.restore_bootstrap();
        cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use constants::narration::{BOOTSTRAP_LINES, script_messages};

    const LONG: Duration = Duration::from_secs(2);

    #[test]
    fn step_bounds() {
        assert!(Step::new(4).is_ok());
        assert!(matches!(
            Step::new(5),
            Err(SimulationError::IndexOutOfRange { index: 5, .. })
        ));
        assert_eq!(Step::COMPLETE.next(), None);
        assert!(Step::IDLE.phase().is_err());
        assert_eq!(Step(2).phase().map(|p| p.number), Ok(2));
    }

    #[test]
    fn each_advance_moves_exactly_one_step() {
        for start in 0..4u8 {
            let mut machine = StepMachine {
                step: Step(start),
                in_flight: None,
            };
            let mut log = NarrationLog::default();
            let before = log.len();

            assert_eq!(machine.advance(&mut log), Ok(Step(start + 1)));
            assert_eq!(machine.step(), Step(start));
            assert!(machine.is_processing());

            let transition = machine.tick(LONG, &mut log);
            assert_eq!(
                transition,
                Some(StepTransition {
                    from: Step(start),
                    to: Step(start + 1)
                })
            );
            assert!(!machine.is_processing());

            let appended: Vec<&str> = log.messages()[before..].to_vec();
            assert_eq!(appended, script_messages(start + 1));
        }
    }

    #[test]
    fn advance_at_complete_is_rejected_without_side_effects() {
        let mut machine = StepMachine {
            step: Step::COMPLETE,
            in_flight: None,
        };
        let mut log = NarrationLog::default();
        let result = machine.advance(&mut log);
        assert_eq!(
            result,
            Err(SimulationError::InvalidTransition {
                step: 4,
                reason: TransitionBlock::Complete
            })
        );
        assert_eq!(machine.step(), Step::COMPLETE);
        assert!(!machine.is_processing());
        assert_eq!(log.messages(), BOOTSTRAP_LINES.to_vec());
        assert_eq!(machine.status(), SessionStatus::Complete);
    }

    #[test]
    fn second_advance_while_processing_is_not_queued() {
        let mut machine = StepMachine::default();
        let mut log = NarrationLog::default();

        assert!(machine.advance(&mut log).is_ok());
        assert!(matches!(
            machine.advance(&mut log),
            Err(SimulationError::InvalidTransition {
                reason: TransitionBlock::Processing,
                ..
            })
        ));

        assert!(machine.tick(LONG, &mut log).is_some());
        assert!(machine.tick(LONG, &mut log).is_none());
        assert_eq!(machine.step(), Step(1));
        assert_eq!(log.len(), 2 + 2);
    }

    #[test]
    fn reset_mid_script_cancels_the_commit() {
        let mut machine = StepMachine::default();
        let mut log = NarrationLog::default();
        machine.advance(&mut log).unwrap();
        machine.tick(LONG, &mut log);
        machine.advance(&mut log).unwrap();

        assert_eq!(machine.reset(&mut log), Some(Step(2)));
        assert_eq!(machine.step(), Step::IDLE);
        assert!(!machine.is_processing());
        assert_eq!(log.messages(), BOOTSTRAP_LINES.to_vec());

        // Nothing left to finish.
        assert!(machine.tick(LONG, &mut log).is_none());
        assert_eq!(log.messages(), BOOTSTRAP_LINES.to_vec());
        assert_eq!(machine.status(), SessionStatus::Idle);
    }

    #[test]
    fn status_reports_processing_over_phase() {
        let mut machine = StepMachine::default();
        let mut log = NarrationLog::default();
        assert_eq!(machine.status(), SessionStatus::Idle);
        machine.advance(&mut log).unwrap();
        assert_eq!(machine.status(), SessionStatus::Processing);
        assert_eq!(machine.pending_target(), Some(Step(1)));
        machine.tick(LONG, &mut log);
        assert_eq!(machine.status(), SessionStatus::AtPhase(1));
    }
}
