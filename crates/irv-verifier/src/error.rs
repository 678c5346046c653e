//! Error types for the winner-entailment verifier.

use irv_assertions::ModelError;
use thiserror::Error;

/// Result type for verifier operations.
pub type Result<T> = std::result::Result<T, VerifyError>;

/// Why a reported winner could not be verified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    /// The reported winner is not on the candidate list.
    #[error("reported winner {0} is not a candidate")]
    UnknownWinner(String),

    /// The assertions do not force the reported winner.
    #[error("assertions do not force {0} as the winner")]
    UnsatisfiableProof(String),

    /// Too many candidates for an exhaustive state search.
    #[error("search over {count} candidates exceeds the limit of {limit}")]
    TooManyCandidates { count: usize, limit: usize },

    /// The candidate list or an assertion was malformed.
    #[error(transparent)]
    Model(#[from] ModelError),
}
