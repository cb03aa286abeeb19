//! Error types for algotrace-engine.

use algotrace_protocol::ProtocolViolation;
use serde::Serialize;
use thiserror::Error;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors surfaced to the caller driving a run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Input rejected by the algorithm's validator; carries its message
    /// verbatim. No event was produced.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The run was cancelled; events emitted before cancellation stay valid.
    #[error("run was cancelled")]
    Cancelled,

    /// The procedure failed unexpectedly.
    #[error(transparent)]
    Fault(#[from] RunFault),

    /// The procedure tried to build a malformed event.
    #[error("protocol violation: {0}")]
    Protocol(#[from] ProtocolViolation),

    /// No algorithm registered under this id.
    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),
}

/// A bug inside a procedure, reported at the point it surfaced.
///
/// `at_sequence` is the sequence the next event would have carried; every
/// event before it remains valid and replayable.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("run faulted at sequence {at_sequence}: {message}")]
pub struct RunFault {
    pub at_sequence: u64,
    pub message: String,
}

/// What a procedure body returns when it stops early.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlgorithmError {
    /// A constructor rejected an event.
    #[error(transparent)]
    Protocol(#[from] ProtocolViolation),

    /// Internal inconsistency in the algorithm body.
    #[error("{0}")]
    Fault(String),
}

impl AlgorithmError {
    pub fn fault(message: impl Into<String>) -> Self {
        AlgorithmError::Fault(message.into())
    }
}

/// Outcome of a procedure body.
pub type RunResult = std::result::Result<(), AlgorithmError>;
