//! Tree nodes and their identities.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use irv_assertions::{CandidateId, CandidateSet};
use serde::{Deserialize, Serialize};

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique node identity, assigned at creation and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl NodeId {
    /// Allocate a fresh id.
    pub fn next() -> Self {
        Self(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Where a node stands in the expansion process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    /// Children not yet computed.
    Unexpanded,
    /// Children computed; at least one exists.
    Expanded,
    /// Only the winner remains. Nothing to expand.
    Complete,
    /// No legal elimination exists from this state.
    ///
    /// `blocked_by` names the one assertion that failed only its context
    /// check, when there is exactly one such assertion.
    DeadEnd { blocked_by: Option<usize> },
}

/// One elimination state in the proof tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeNode {
    pub(crate) id: NodeId,
    pub(crate) path: Vec<CandidateId>,
    pub(crate) remaining: CandidateSet,
    pub(crate) remaining_assertions: Vec<usize>,
    pub(crate) eliminated_by: Option<usize>,
    pub(crate) status: NodeStatus,
    pub(crate) children: Vec<Arc<TreeNode>>,
}

impl TreeNode {
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Candidates eliminated on the way from the root, root move first.
    pub fn path(&self) -> &[CandidateId] {
        &self.path
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// The candidate whose elimination produced this node.
    pub fn last_eliminated(&self) -> Option<CandidateId> {
        self.path.last().copied()
    }

    /// Candidates still standing.
    pub fn remaining(&self) -> CandidateSet {
        self.remaining
    }

    /// Indices of the assertions that can still fire at or below this node.
    pub fn remaining_assertions(&self) -> &[usize] {
        &self.remaining_assertions
    }

    /// Index of the assertion that licensed the elimination into this node.
    pub fn eliminated_by(&self) -> Option<usize> {
        self.eliminated_by
    }

    pub fn status(&self) -> NodeStatus {
        self.status
    }

    pub fn children(&self) -> &[Arc<TreeNode>] {
        &self.children
    }

    /// Waiting for expansion.
    pub fn is_expandable(&self) -> bool {
        self.status == NodeStatus::Unexpanded
    }

    pub fn is_complete(&self) -> bool {
        self.status == NodeStatus::Complete
    }

    /// True for a dead end of the proof.
    pub fn pruned(&self) -> bool {
        matches!(self.status, NodeStatus::DeadEnd { .. })
    }

    /// The single near-miss assertion recorded for a dead end.
    pub fn pruned_by(&self) -> Option<usize> {
        match self.status {
            NodeStatus::DeadEnd { blocked_by } => blocked_by,
            _ => None,
        }
    }

    /// The child reached by eliminating `candidate`.
    pub fn child_for(&self, candidate: CandidateId) -> Option<&Arc<TreeNode>> {
        self.children
            .iter()
            .find(|child| child.last_eliminated() == Some(candidate))
    }
}
