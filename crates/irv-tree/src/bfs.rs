//! Exhaustive breadth-first expansion.

use std::collections::{HashSet, VecDeque};

use irv_assertions::CandidateId;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, TreeError};
use crate::tree::EliminationTree;

/// Limits for [`expand_exhaustively_with`].
#[derive(Debug, Clone, Default)]
pub struct BfsConfig {
    /// Abort once more than this many nodes have been visited.
    pub max_nodes: Option<usize>,
}

impl BfsConfig {
    #[must_use]
    pub fn with_max_nodes(mut self, limit: usize) -> Self {
        self.max_nodes = Some(limit);
        self
    }
}

/// A fully expanded tree and how much work it took.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BfsOutcome {
    pub tree: EliminationTree,
    /// Nodes expanded during this pass.
    pub expanded: usize,
    /// Distinct paths visited.
    pub visited: usize,
}

/// Expand every reachable node of `tree`, breadth first.
pub fn expand_exhaustively(tree: &EliminationTree) -> Result<BfsOutcome> {
    expand_exhaustively_with(tree, &BfsConfig::default())
}

/// [`expand_exhaustively`] with explicit limits.
///
/// Paths, not node ids, identify visited nodes; expansion replaces the
/// nodes along the copied path.
pub fn expand_exhaustively_with(tree: &EliminationTree, config: &BfsConfig) -> Result<BfsOutcome> {
    let mut current = tree.clone();
    let mut queue: VecDeque<Vec<CandidateId>> = VecDeque::from([Vec::new()]);
    let mut processed: HashSet<Vec<CandidateId>> = HashSet::new();
    let mut expanded = 0;

    while let Some(path) = queue.pop_front() {
        if processed.contains(&path) {
            continue;
        }
        if let Some(limit) = config.max_nodes {
            if processed.len() >= limit {
                return Err(TreeError::NodeLimit { limit });
            }
        }

        let eligible = lookup(&current, &path)?.is_expandable();
        if eligible {
            current = current.expand_node(&path)?;
            expanded += 1;
        }

        let node = lookup(&current, &path)?;
        queue.extend(node.children().iter().map(|child| child.path().to_vec()));
        processed.insert(path);
    }

    debug!(
        expanded,
        visited = processed.len(),
        winner = %current.winner(),
        "exhaustive expansion finished"
    );

    Ok(BfsOutcome {
        tree: current,
        expanded,
        visited: processed.len(),
    })
}

fn lookup<'t>(tree: &'t EliminationTree, path: &[CandidateId]) -> Result<&'t crate::TreeNode> {
    tree.node_at(path).ok_or_else(|| TreeError::PathNotFound {
        path: path.to_vec(),
    })
}
