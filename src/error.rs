use thiserror::Error;

use crate::round::{Action, Phase};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("Card source exhausted")]
    Exhausted,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Cannot {action} during phase {phase:?}")]
    OutOfTurn { action: Action, phase: Phase },
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("Invalid table rules: {0}")]
    InvalidRules(String),
}
