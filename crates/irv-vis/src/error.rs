//! Error types for irv-vis.

use irv_assertions::ModelError;
use irv_tree::TreeError;
use irv_verifier::VerifyError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SessionError>;

/// Anything a proof session can fail with.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to read election: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid election file: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Verify(#[from] VerifyError),

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Worker(#[from] irv_worker::Error),
}
