//! Error types.

use thiserror::Error;

/// Errors raised while building a predictor from some configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{name} needs {bits} bits of storage, over the {budget}-bit budget")]
    StorageBudgetExceeded {
        name: &'static str,
        bits: usize,
        budget: usize,
    },

    #[error("invalid {name} geometry: {reason}")]
    InvalidGeometry {
        name: &'static str,
        reason: String,
    },

    #[error("unknown predictor '{0}'")]
    UnknownPredictor(String),
}

/// Errors raised while reading a branch trace.
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("line {line}: {reason}")]
    Parse {
        line: usize,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
