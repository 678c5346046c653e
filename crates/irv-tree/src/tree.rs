//! The persistent elimination tree and point expansion.

use std::sync::Arc;

use irv_assertions::{Assertion, CandidateId, CandidateSet, ModelError, MAX_CANDIDATES};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{Result, TreeError};
use crate::node::{NodeId, NodeStatus, TreeNode};

/// Every surviving elimination branch for one reported winner.
///
/// Trees are values: [`expand_node`](Self::expand_node) returns a new tree
/// that shares every untouched subtree with the old one, so a holder of an
/// older tree never sees it change. Node ids survive path copying; only
/// newly created children get fresh ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EliminationTree {
    winner: CandidateId,
    candidate_count: usize,
    assertions: Arc<Vec<Assertion>>,
    root: Arc<TreeNode>,
}

impl EliminationTree {
    /// Seed a tree whose root has every candidate standing.
    pub fn new(winner: CandidateId, candidate_count: usize, assertions: Vec<Assertion>) -> Result<Self> {
        check_inputs(winner, candidate_count, &assertions)?;

        let remaining = CandidateSet::full(candidate_count);
        let remaining_assertions = assertions
            .iter()
            .enumerate()
            .filter(|(_, a)| a.is_relevant_at(remaining))
            .map(|(i, _)| i)
            .collect();
        let status = if remaining == CandidateSet::singleton(winner) {
            NodeStatus::Complete
        } else {
            NodeStatus::Unexpanded
        };

        let root = TreeNode {
            id: NodeId::next(),
            path: Vec::new(),
            remaining,
            remaining_assertions,
            eliminated_by: None,
            status,
            children: Vec::new(),
        };

        Ok(Self {
            winner,
            candidate_count,
            assertions: Arc::new(assertions),
            root: Arc::new(root),
        })
    }

    /// Check a tree that came from outside, such as over the worker wire.
    ///
    /// Every node must stand within the candidate range and refer only to
    /// assertions the tree holds.
    pub fn validate(&self) -> Result<()> {
        check_inputs(self.winner, self.candidate_count, &self.assertions)?;
        let all = CandidateSet::full(self.candidate_count);
        let count = self.assertions.len();
        for node in self.iter() {
            let indices_ok = node.remaining_assertions.iter().all(|&i| i < count)
                && node.eliminated_by.map_or(true, |i| i < count)
                && match node.status {
                    NodeStatus::DeadEnd { blocked_by: Some(i) } => i < count,
                    _ => true,
                };
            if !node.remaining.is_subset_of(all) || !indices_ok {
                return Err(TreeError::Malformed {
                    node: node.id,
                    path: node.path.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn winner(&self) -> CandidateId {
        self.winner
    }

    pub fn candidate_count(&self) -> usize {
        self.candidate_count
    }

    pub fn assertions(&self) -> &[Assertion] {
        &self.assertions
    }

    pub fn root(&self) -> &TreeNode {
        &self.root
    }

    /// Walk `path` from the root.
    pub fn node_at(&self, path: &[CandidateId]) -> Option<&TreeNode> {
        let mut node: &TreeNode = &self.root;
        for &step in path {
            node = node.child_for(step)?.as_ref();
        }
        Some(node)
    }

    /// Expand the node addressed by `path`.
    ///
    /// Expanding a node that is not [`NodeStatus::Unexpanded`] returns an
    /// identical tree.
    pub fn expand_node(&self, path: &[CandidateId]) -> Result<Self> {
        let target = self.node_at(path).ok_or_else(|| TreeError::PathNotFound {
            path: path.to_vec(),
        })?;
        if !target.is_expandable() {
            return Ok(self.clone());
        }

        let expanded = Arc::new(self.expanded(target));
        trace!(
            node = %expanded.id,
            path = ?path,
            children = expanded.children.len(),
            "expanded node"
        );

        Ok(Self {
            root: replace_at(&self.root, path, expanded),
            ..self.clone()
        })
    }

    fn expanded(&self, node: &TreeNode) -> TreeNode {
        let state = node.remaining;
        let mut children = Vec::new();

        for candidate in state.iter().filter(|&c| c != self.winner) {
            let licence = node.remaining_assertions.iter().copied().find(|&i| {
                let a = &self.assertions[i];
                a.low == candidate && a.permits_elimination(state)
            });
            if let Some(licence) = licence {
                children.push(Arc::new(self.child(node, candidate, licence)));
            }
        }

        let status = if children.is_empty() {
            NodeStatus::DeadEnd {
                blocked_by: self.sole_near_miss(node),
            }
        } else {
            NodeStatus::Expanded
        };

        TreeNode {
            status,
            children,
            ..node.clone()
        }
    }

    fn child(&self, parent: &TreeNode, eliminated: CandidateId, licence: usize) -> TreeNode {
        let remaining = parent.remaining.without(eliminated);
        let remaining_assertions = parent
            .remaining_assertions
            .iter()
            .copied()
            .filter(|&i| self.assertions[i].is_relevant_at(remaining))
            .collect();
        let mut path = parent.path.clone();
        path.push(eliminated);

        let status = if remaining == CandidateSet::singleton(self.winner) {
            NodeStatus::Complete
        } else {
            NodeStatus::Unexpanded
        };

        TreeNode {
            id: NodeId::next(),
            path,
            remaining,
            remaining_assertions,
            eliminated_by: Some(licence),
            status,
            children: Vec::new(),
        }
    }

    fn sole_near_miss(&self, node: &TreeNode) -> Option<usize> {
        let mut misses = node.remaining_assertions.iter().copied().filter(|&i| {
            let a = &self.assertions[i];
            a.low != self.winner && a.near_miss(node.remaining)
        });
        match (misses.next(), misses.next()) {
            (Some(only), None) => Some(only),
            _ => None,
        }
    }

    /// Depth-first, pre-order walk over every node.
    pub fn iter(&self) -> Nodes<'_> {
        Nodes {
            stack: vec![self.root.as_ref()],
        }
    }

    /// Paths of every node exactly `depth` eliminations below the root.
    pub fn paths_at_depth(&self, depth: usize) -> Vec<Vec<CandidateId>> {
        self.iter()
            .filter(|node| node.depth() == depth)
            .map(|node| node.path.clone())
            .collect()
    }

    /// Paths of the nodes at `depth` still waiting for expansion.
    pub fn expandable_paths_at_depth(&self, depth: usize) -> Vec<Vec<CandidateId>> {
        self.iter()
            .filter(|node| node.depth() == depth && node.is_expandable())
            .map(|node| node.path.clone())
            .collect()
    }

    /// Elimination orders that end with only the winner standing.
    pub fn complete_paths(&self) -> Vec<Vec<CandidateId>> {
        self.iter()
            .filter(|node| node.is_complete())
            .map(|node| node.path.clone())
            .collect()
    }

    /// True once no node is waiting for expansion.
    pub fn is_fully_expanded(&self) -> bool {
        self.iter().all(|node| !node.is_expandable())
    }

    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats::default();
        for node in self.iter() {
            stats.nodes += 1;
            stats.max_depth = stats.max_depth.max(node.depth());
            match node.status {
                NodeStatus::Unexpanded => stats.unexpanded += 1,
                NodeStatus::Expanded => stats.expanded += 1,
                NodeStatus::Complete => stats.complete += 1,
                NodeStatus::DeadEnd { .. } => stats.dead_ends += 1,
            }
        }
        stats
    }
}

fn check_inputs(winner: CandidateId, candidate_count: usize, assertions: &[Assertion]) -> Result<()> {
    if candidate_count > MAX_CANDIDATES {
        return Err(ModelError::TooManyCandidates {
            count: candidate_count,
            max: MAX_CANDIDATES,
        }
        .into());
    }
    if winner.index() >= candidate_count {
        return Err(TreeError::WinnerOutOfRange {
            winner,
            count: candidate_count,
        });
    }
    for assertion in assertions {
        assertion.check_range(candidate_count)?;
    }
    Ok(())
}

/// Copy the nodes along `path`, swapping in `replacement` at its end.
fn replace_at(node: &Arc<TreeNode>, path: &[CandidateId], replacement: Arc<TreeNode>) -> Arc<TreeNode> {
    let Some((&next, rest)) = path.split_first() else {
        return replacement;
    };

    let mut copy = TreeNode::clone(node);
    if let Some(i) = copy
        .children
        .iter()
        .position(|child| child.last_eliminated() == Some(next))
    {
        let updated = replace_at(&copy.children[i], rest, replacement);
        copy.children[i] = updated;
    }
    Arc::new(copy)
}

/// Pre-order iterator over a tree's nodes.
pub struct Nodes<'a> {
    stack: Vec<&'a TreeNode>,
}

impl<'a> Iterator for Nodes<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack
            .extend(node.children.iter().rev().map(|child| child.as_ref()));
        Some(node)
    }
}

/// Node counts by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeStats {
    pub nodes: usize,
    pub unexpanded: usize,
    pub expanded: usize,
    pub complete: usize,
    pub dead_ends: usize,
    pub max_depth: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const A: CandidateId = CandidateId(0);
    const B: CandidateId = CandidateId(1);
    const C: CandidateId = CandidateId(2);

    fn set(ids: &[CandidateId]) -> CandidateSet {
        ids.iter().copied().collect()
    }

    /// A beats both others everywhere.
    fn dominant() -> EliminationTree {
        EliminationTree::new(A, 3, vec![Assertion::universal(A, B), Assertion::universal(A, C)]).unwrap()
    }

    #[test]
    fn root_starts_unexpanded_with_everyone_standing() {
        let tree = dominant();
        let root = tree.root();
        assert_eq!(root.remaining(), CandidateSet::full(3));
        assert!(root.path().is_empty());
        assert!(root.is_expandable());
        assert_eq!(root.remaining_assertions(), &[0, 1]);
    }

    #[test]
    fn single_candidate_root_is_complete() {
        let tree = EliminationTree::new(A, 1, vec![]).unwrap();
        assert!(tree.root().is_complete());
        assert!(tree.is_fully_expanded());
    }

    #[test]
    fn winner_must_be_a_candidate() {
        let err = EliminationTree::new(C, 2, vec![]).unwrap_err();
        assert!(matches!(err, TreeError::WinnerOutOfRange { .. }));
    }

    #[test]
    fn out_of_range_assertion_is_rejected() {
        let err = EliminationTree::new(A, 3, vec![Assertion::universal(CandidateId(40), B)]).unwrap_err();
        assert!(matches!(
            err,
            TreeError::Model(ModelError::CandidateOutOfRange { count: 3, .. })
        ));

        let wide_context = Assertion::exact(A, B, set(&[A, B, CandidateId(7)]));
        assert!(EliminationTree::new(A, 3, vec![wide_context]).is_err());
    }

    #[test]
    fn validate_rejects_tampered_wire_trees() {
        let tree = dominant().expand_node(&[]).unwrap();
        assert!(tree.validate().is_ok());

        let mut json = serde_json::to_value(&tree).unwrap();
        json["assertions"][0]["high"] = serde_json::json!(40);
        let tampered: EliminationTree = serde_json::from_value(json).unwrap();
        assert!(matches!(
            tampered.validate(),
            Err(TreeError::Model(ModelError::CandidateOutOfRange { .. }))
        ));

        let mut json = serde_json::to_value(&tree).unwrap();
        json["root"]["remaining_assertions"] = serde_json::json!([0, 9]);
        let tampered: EliminationTree = serde_json::from_value(json).unwrap();
        assert!(matches!(tampered.validate(), Err(TreeError::Malformed { .. })));
    }

    #[test]
    fn expansion_creates_one_child_per_candidate() {
        // Two licences for eliminating B still produce one child.
        let tree = EliminationTree::new(
            A,
            3,
            vec![
                Assertion::universal(A, B),
                Assertion::universal(C, B),
                Assertion::universal(A, C),
            ],
        )
        .unwrap();
        let tree = tree.expand_node(&[]).unwrap();
        let root = tree.root();

        assert_eq!(root.status(), NodeStatus::Expanded);
        assert_eq!(root.children().len(), 2);
        let b_gone = root.child_for(B).unwrap();
        assert_eq!(b_gone.eliminated_by(), Some(0));
        assert_eq!(b_gone.remaining(), set(&[A, C]));
        assert_eq!(b_gone.path(), &[B]);
        // C > B can no longer fire once B is gone.
        assert_eq!(b_gone.remaining_assertions(), &[2]);
    }

    #[test]
    fn winner_only_child_is_complete() {
        let tree = EliminationTree::new(A, 2, vec![Assertion::universal(A, B)]).unwrap();
        let tree = tree.expand_node(&[]).unwrap();
        let child = tree.node_at(&[B]).unwrap();
        assert!(child.is_complete());
        assert!(tree.is_fully_expanded());
    }

    #[test]
    fn no_legal_move_is_a_dead_end() {
        let tree = EliminationTree::new(A, 2, vec![Assertion::universal(B, A)]).unwrap();
        let tree = tree.expand_node(&[]).unwrap();
        assert!(tree.root().pruned());
        assert!(tree.root().children().is_empty());
    }

    #[test]
    fn sole_near_miss_is_recorded() {
        let wrong_context = Assertion::exact(A, B, set(&[A, B]));
        let tree = EliminationTree::new(A, 3, vec![wrong_context]).unwrap();
        let tree = tree.expand_node(&[]).unwrap();
        assert_eq!(tree.root().pruned_by(), Some(0));
    }

    #[test]
    fn several_near_misses_record_nothing() {
        let tree = EliminationTree::new(
            A,
            3,
            vec![
                Assertion::exact(A, B, set(&[A, B])),
                Assertion::exact(A, C, set(&[A, C])),
            ],
        )
        .unwrap();
        let tree = tree.expand_node(&[]).unwrap();
        assert!(tree.root().pruned());
        assert_eq!(tree.root().pruned_by(), None);
    }

    #[test]
    fn re_expansion_is_a_no_op() {
        let once = dominant().expand_node(&[]).unwrap();
        let twice = once.expand_node(&[]).unwrap();

        let ids = |t: &EliminationTree| t.iter().map(|n| n.id()).collect::<Vec<_>>();
        assert_eq!(ids(&once), ids(&twice));
    }

    #[test]
    fn unknown_path_is_an_error() {
        let tree = dominant();
        let err = tree.expand_node(&[B]).unwrap_err();
        assert!(matches!(err, TreeError::PathNotFound { ref path } if path == &[B]));
    }

    #[test]
    fn older_trees_are_untouched() {
        let seeded = dominant();
        let expanded = seeded.expand_node(&[]).unwrap();
        assert!(seeded.root().children().is_empty());
        assert!(seeded.root().is_expandable());
        assert_eq!(expanded.root().children().len(), 2);
    }

    #[test]
    fn ids_stable_along_copied_path() {
        let tree = dominant().expand_node(&[]).unwrap();
        let root_id = tree.root().id();
        let sibling_id = tree.node_at(&[C]).unwrap().id();
        let target_id = tree.node_at(&[B]).unwrap().id();

        let tree = tree.expand_node(&[B]).unwrap();
        assert_eq!(tree.root().id(), root_id);
        assert_eq!(tree.node_at(&[B]).unwrap().id(), target_id);
        assert_eq!(tree.node_at(&[C]).unwrap().id(), sibling_id);
        assert!(tree.node_at(&[B, C]).unwrap().is_complete());
    }

    #[test]
    fn depth_queries_and_stats() {
        let tree = dominant()
            .expand_node(&[])
            .unwrap()
            .expand_node(&[B])
            .unwrap();
        assert_eq!(tree.paths_at_depth(1), vec![vec![B], vec![C]]);
        assert_eq!(tree.expandable_paths_at_depth(1), vec![vec![C]]);
        assert_eq!(tree.complete_paths(), vec![vec![B, C]]);

        let stats = tree.stats();
        assert_eq!(
            stats,
            TreeStats {
                nodes: 4,
                unexpanded: 1,
                expanded: 2,
                complete: 1,
                dead_ends: 0,
                max_depth: 2,
            }
        );
    }

    #[test]
    fn serde_preserves_structure() {
        let tree = dominant().expand_node(&[]).unwrap();
        let json = serde_json::to_string(&tree).unwrap();
        let back: EliminationTree = serde_json::from_str(&json).unwrap();
        assert_eq!(back.stats(), tree.stats());
        assert_eq!(back.node_at(&[C]).unwrap().id(), tree.node_at(&[C]).unwrap().id());
    }

    fn arbitrary_assertions(count: usize) -> impl Strategy<Value = Vec<Assertion>> {
        let id = move || (0..count).prop_map(CandidateId);
        let context = prop_oneof![
            Just(None),
            (1u32..(1u32 << count)).prop_map(Some),
        ];
        prop::collection::vec((id(), id(), context), 0..8).prop_map(|raw| {
            raw.into_iter()
                .filter(|(h, l, _)| h != l)
                .map(|(high, low, ctx)| match ctx {
                    None => Assertion::universal(high, low),
                    Some(bits) => Assertion::exact(high, low, CandidateSet::from_bits(bits)),
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn children_shrink_by_one(assertions in arbitrary_assertions(5)) {
            let tree = EliminationTree::new(A, 5, assertions).unwrap();
            let tree = tree.expand_node(&[]).unwrap();
            let root = tree.root();
            for child in root.children() {
                prop_assert!(child.remaining().is_strict_subset_of(root.remaining()));
                prop_assert_eq!(child.remaining().len() + 1, root.remaining().len());
                prop_assert!(child.remaining().contains(A));
            }
        }
    }
}
