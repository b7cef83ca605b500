use std::time::Duration;

use bevy::prelude::*;
use constants::phase::{PHASES, PhaseInfo};

use super::error::SimulationError;
use super::narration::{LogEntry, NarrationLog};
use super::step_machine::{SessionStatus, Step, StepMachine, StepTransition};

/// The whole observable simulation state. `advance` and `reset` are the only
/// mutators the UI may call; the frame loop drives `tick`.
#[derive(Resource, Debug, Default)]
pub struct SimulationSession {
    machine: StepMachine,
    log: NarrationLog,
}

impl SimulationSession {
    pub fn current_step(&self) -> Step {
        self.machine.step()
    }

    pub fn is_processing(&self) -> bool {
        self.machine.is_processing()
    }

    pub fn status(&self) -> SessionStatus {
        self.machine.status()
    }

    pub fn can_advance(&self) -> bool {
        self.machine.can_advance()
    }

    pub fn log(&self) -> &NarrationLog {
        &self.log
    }

    pub fn log_entries(&self) -> impl DoubleEndedIterator<Item = &LogEntry> + ExactSizeIterator {
        self.log.entries()
    }

    pub fn phases(&self) -> &'static [PhaseInfo] {
        PHASES
    }

    /// Phase shown for the current step, `None` while idle.
    pub fn current_phase(&self) -> Option<&'static PhaseInfo> {
        self.machine.step().phase().ok()
    }

    pub fn advance(&mut self) -> Result<Step, SimulationError> {
        let target = self.machine.advance(&mut self.log)?;
        info!("Advancing to step {target}");
        Ok(target)
    }

    pub fn reset(&mut self) {
        if let Some(cancelled) = self.machine.reset(&mut self.log) {
            info!("Reset cancelled narration for step {cancelled}");
        }
        info!("Session reset to idle");
    }

    pub fn tick(&mut self, delta: Duration) -> Option<StepTransition> {
        let transition = self.machine.tick(delta, &mut self.log)?;
        info!("Step committed: {} -> {}", transition.from, transition.to);
        Some(transition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use constants::narration::{BOOTSTRAP_LINES, script_messages};

    #[test]
    fn four_sequential_advances_reach_completion() {
        let mut session = SimulationSession::default();
        for _ in 0..4 {
            session.advance().unwrap();
            while session.tick(Duration::from_millis(100)).is_none() {}
        }

        assert_eq!(session.current_step(), Step::COMPLETE);
        assert!(!session.is_processing());

        let mut expected: Vec<&str> = BOOTSTRAP_LINES.to_vec();
        for step in 1..=4 {
            expected.extend(script_messages(step));
        }
        assert_eq!(expected.len(), 2 + 9);
        assert_eq!(session.log().messages(), expected);
        assert!(session.advance().is_err());
    }

    #[test]
    fn reset_from_any_step_restores_bootstrap() {
        for steps in 0..=4 {
            let mut session = SimulationSession::default();
            for _ in 0..steps {
                session.advance().unwrap();
                session.tick(Duration::from_secs(2));
            }
            session.reset();
            assert_eq!(session.current_step(), Step::IDLE);
            assert_eq!(session.log().messages(), BOOTSTRAP_LINES.to_vec());
        }
    }

    #[test]
    fn current_phase_follows_step() {
        let mut session = SimulationSession::default();
        assert!(session.current_phase().is_none());
        session.advance().unwrap();
        session.tick(Duration::from_secs(1));
        assert_eq!(session.current_phase().map(|p| p.title), Some("Global Perception"));
    }
}
