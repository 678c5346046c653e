//! Error types for irv-worker.

use std::time::Duration;

use thiserror::Error;

/// Result type for irv-worker operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the background execution service.
///
/// Each one is scoped to the call that produced it; the service stays
/// usable afterwards unless it was terminated.
#[derive(Debug, Error)]
pub enum Error {
    /// The worker did not signal readiness in time.
    #[error("worker did not signal ready within {0:?}")]
    InitTimeout(Duration),

    /// The worker could not be started or exited before signalling ready.
    #[error("worker failed to start: {0}")]
    InitFailed(String),

    /// A call was issued before the worker signalled ready.
    #[error("worker is not ready")]
    NotReady,

    /// No reply arrived within the call timeout.
    #[error("call {id} timed out after {after:?}")]
    CallTimeout { id: String, after: Duration },

    /// The service was terminated while the call was pending.
    #[error("worker terminated")]
    Terminated,

    /// The worker thread exited on its own.
    #[error("worker exited unexpectedly")]
    WorkerGone,

    /// The task ran and reported failure.
    #[error("task failed: {0}")]
    TaskFailed(String),

    /// Arguments or results could not cross the wire.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
