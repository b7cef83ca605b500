use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    #[error("cannot advance from step {step}: {reason}")]
    InvalidTransition { step: u8, reason: TransitionBlock },

    #[error("{kind} index {index} out of range (valid: {valid})")]
    IndexOutOfRange {
        kind: &'static str,
        index: usize,
        valid: &'static str,
    },
}

/// Why an advance was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionBlock {
    #[error("a narration script is still running")]
    Processing,
    #[error("the session is already complete")]
    Complete,
}
