//! Error types shared by the calculator engine and its collaborators.

use thiserror::Error;

/// Failures surfaced by the calculator library.
#[derive(Debug, Error)]
pub enum CalcError {
    /// A configuration value is out of range or could not be read.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An operand is malformed or exceeds the configured bound.
    #[error("{0}")]
    Validation(String),

    /// `perform_operation` was called before an operation was set.
    #[error("No operation set")]
    OperationNotSet,

    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    /// A registration was rejected because the operation does not conform.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Arithmetic failure, or a wrapped failure from execution, save or load.
    #[error("{0}")]
    Operation(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CalcError {
    pub(crate) fn operation(message: impl Into<String>) -> Self {
        Self::Operation(message.into())
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

pub type Result<T, E = CalcError> = std::result::Result<T, E>;
