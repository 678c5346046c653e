//! Boundaries with the application's tree store and root selection.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use irv_assertions::CandidateId;

use crate::tree::EliminationTree;

/// Holds one tree per root winner.
///
/// The engine never owns storage: it reads a tree, transforms it and hands
/// the new tree back.
pub trait TreeStore: Send + Sync {
    fn get_tree(&self, root: CandidateId) -> Option<EliminationTree>;
    fn set_tree(&self, root: CandidateId, tree: EliminationTree);
}

/// Which root the user is looking at.
pub trait Selection: Send + Sync {
    fn selected_root(&self) -> Option<CandidateId>;
}

/// In-memory [`TreeStore`].
#[derive(Debug, Default)]
pub struct MemoryTreeStore {
    trees: RwLock<HashMap<CandidateId, EliminationTree>>,
}

impl MemoryTreeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the tree for `root`.
    pub fn remove(&self, root: CandidateId) -> Option<EliminationTree> {
        self.trees
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&root)
    }

    pub fn len(&self) -> usize {
        self.trees.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TreeStore for MemoryTreeStore {
    fn get_tree(&self, root: CandidateId) -> Option<EliminationTree> {
        self.trees
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&root)
            .cloned()
    }

    fn set_tree(&self, root: CandidateId, tree: EliminationTree) {
        self.trees
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(root, tree);
    }
}

/// A settable [`Selection`].
#[derive(Debug, Default)]
pub struct SelectedRoot {
    current: RwLock<Option<CandidateId>>,
}

impl SelectedRoot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&self, root: CandidateId) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(root);
    }

    pub fn clear(&self) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl Selection for SelectedRoot {
    fn selected_root(&self) -> Option<CandidateId> {
        *self.current.read().unwrap_or_else(PoisonError::into_inner)
    }
}
