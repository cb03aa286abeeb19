//! Error types for algotrace-protocol.

use thiserror::Error;

/// Result type for event construction.
pub type Result<T> = std::result::Result<T, ProtocolViolation>;

/// A malformed event caught at construction time.
///
/// Raised by the designated constructors so a defective algorithm fails
/// loudly instead of producing an unrenderable stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolViolation {
    /// An event that targets positions was given none.
    #[error("{kind} event requires at least one index")]
    EmptyIndices { kind: &'static str },

    /// A compare event must name exactly two positions.
    #[error("compare event requires exactly 2 indices, got {0}")]
    CompareArity(usize),

    /// An index falls outside the tracked structure.
    #[error("{kind} index {index} out of bounds for length {len}")]
    IndexOutOfBounds {
        kind: &'static str,
        index: usize,
        len: usize,
    },

    /// A required text field was empty.
    #[error("{kind} event has empty {field}")]
    EmptyField {
        kind: &'static str,
        field: &'static str,
    },

    /// Unrecognized mark type name.
    #[error("unknown mark type: {0}")]
    UnknownMark(String),

    /// Unrecognized auxiliary `type` discriminator.
    #[error("unknown auxiliary snapshot type: {0}")]
    UnknownAuxiliary(String),

    /// An auxiliary payload that could not be decoded.
    #[error("undecodable auxiliary snapshot: {0}")]
    Decode(String),

    /// A snapshot that is not self-consistent.
    #[error("malformed {kind} snapshot: {reason}")]
    MalformedSnapshot { kind: &'static str, reason: String },

    /// Highlight targets a pseudocode line that does not exist.
    #[error("highlight line {line} outside pseudocode listing of {available} lines")]
    InvalidLine { line: usize, available: usize },

    /// Something was emitted after the terminal result.
    #[error("{kind} event emitted after result")]
    AfterResult { kind: &'static str },
}

impl ProtocolViolation {
    pub(crate) fn malformed(kind: &'static str, reason: impl Into<String>) -> Self {
        ProtocolViolation::MalformedSnapshot {
            kind,
            reason: reason.into(),
        }
    }
}
