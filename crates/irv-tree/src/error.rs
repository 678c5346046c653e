//! Error types for irv-tree.

use irv_assertions::{CandidateId, ModelError};
use thiserror::Error;

use crate::node::NodeId;

/// Result type for tree operations.
pub type Result<T> = std::result::Result<T, TreeError>;

/// Errors from building, expanding or storing elimination trees.
#[derive(Debug, Error)]
pub enum TreeError {
    /// The path does not address a node of the tree.
    #[error("no node at path {path:?}")]
    PathNotFound { path: Vec<CandidateId> },

    /// The winner index is outside the candidate list.
    #[error("winner {winner} is not one of {count} candidates")]
    WinnerOutOfRange { winner: CandidateId, count: usize },

    /// A node of a deserialized tree falls outside its candidates or
    /// assertions.
    #[error("malformed node {node} at path {path:?}")]
    Malformed { node: NodeId, path: Vec<CandidateId> },

    /// The store holds no tree for this root.
    #[error("no tree stored for root {0}")]
    NoTree(CandidateId),

    /// No root is currently selected.
    #[error("no root selected")]
    NoSelection,

    /// Exhaustive expansion visited more nodes than allowed.
    #[error("expansion exceeded {limit} nodes")]
    NodeLimit { limit: usize },

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("background expansion failed: {0}")]
    Worker(#[from] irv_worker::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
