//! Error types for the assertion model.

use thiserror::Error;

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors raised while building candidate lists or resolving assertions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// The same name appears twice in a candidate list.
    #[error("duplicate candidate: {0}")]
    DuplicateCandidate(String),

    /// An assertion names a candidate that is not on the list.
    #[error("unknown candidate: {0}")]
    UnknownCandidate(String),

    /// The list does not fit the state bitmask.
    #[error("too many candidates: {count} (max {max})")]
    TooManyCandidates { count: usize, max: usize },

    /// An assertion whose high and low are the same candidate.
    #[error("assertion compares {0} with itself")]
    SelfAssertion(String),

    /// An indexed assertion refers to a candidate outside `0..count`.
    #[error("assertion {assertion} refers to candidates outside 0..{count}")]
    CandidateOutOfRange { assertion: String, count: usize },
}
