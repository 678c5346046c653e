//! The application context: one election, its trees and the worker.

use std::sync::Arc;

use irv_assertions::{Assertion, CandidateId};
use irv_tree::{
    expand_exhaustively_with, expand_in_background, BfsConfig, BfsOutcome, EliminationTree,
    LayeredConfig, LayeredExpansion, LayeredReport, MemoryTreeStore, SelectedRoot, Selection,
    TreeError, TreeStats, TreeStore,
};
use irv_verifier::{try_verify, VerifyError, WinnerProof};
use irv_worker::BackgroundService;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::election::Election;
use crate::error::{Result, SessionError};

/// Owns the store, the selection and (optionally) the background worker
/// for one election.
pub struct ProofSession {
    election: Election,
    assertions: Vec<Assertion>,
    store: Arc<dyn TreeStore>,
    selection: Arc<SelectedRoot>,
    service: Option<Arc<BackgroundService>>,
    layered: LayeredConfig,
    bfs: BfsConfig,
}

/// A JSON-friendly view of the selected tree.
#[derive(Debug, Clone, Serialize)]
pub struct ProofSummary {
    pub winner: String,
    /// Witness order from the verifier, if the assertions force the winner.
    pub witness: Option<Vec<String>>,
    pub stats: TreeStats,
    /// Every elimination order in the tree that leaves only the winner.
    pub complete_paths: Vec<Vec<String>>,
}

impl ProofSession {
    pub fn new(election: Election) -> Result<Self> {
        let assertions = election.resolved_assertions()?;
        Ok(Self {
            election,
            assertions,
            store: Arc::new(MemoryTreeStore::new()),
            selection: Arc::new(SelectedRoot::new()),
            service: None,
            layered: LayeredConfig::default(),
            bfs: BfsConfig::default(),
        })
    }

    /// Use an external tree store.
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn TreeStore>) -> Self {
        self.store = store;
        self
    }

    /// Run exhaustive expansion on `service` instead of inline.
    #[must_use]
    pub fn with_service(mut self, service: Arc<BackgroundService>) -> Self {
        self.service = Some(service);
        self
    }

    #[must_use]
    pub fn with_layered_config(mut self, config: LayeredConfig) -> Self {
        self.layered = config;
        self
    }

    #[must_use]
    pub fn with_bfs_config(mut self, config: BfsConfig) -> Self {
        self.bfs = config;
        self
    }

    pub fn election(&self) -> &Election {
        &self.election
    }

    pub fn store(&self) -> Arc<dyn TreeStore> {
        Arc::clone(&self.store)
    }

    /// Check the reported winner against the assertions.
    pub fn verify(&self) -> Result<WinnerProof> {
        self.verify_winner(&self.election.winner)
    }

    /// Check whether the assertions force `name` to win.
    pub fn verify_winner(&self, name: &str) -> Result<WinnerProof> {
        Ok(try_verify(
            &self.election.assertions,
            self.election.candidates.names(),
            name,
        )?)
    }

    /// Select `name` as the root, seeding a fresh tree for it when the
    /// root changes or nothing is stored yet.
    pub fn select(&self, name: &str) -> Result<CandidateId> {
        let root = self.election.candidate_id(name)?;
        let changed = self.selection.selected_root() != Some(root);

        if changed || self.store.get_tree(root).is_none() {
            let tree = EliminationTree::new(root, self.election.candidates.len(), self.assertions.clone())?;
            debug!(root = %root, node = %tree.root().id(), "seeded tree");
            self.store.set_tree(root, tree);
        }
        self.selection.select(root);
        info!(root = name, "selected root");
        Ok(root)
    }

    /// Select the reported winner.
    pub fn select_winner(&self) -> Result<CandidateId> {
        self.select(&self.election.winner)
    }

    fn selected_root(&self) -> Result<CandidateId> {
        Ok(self.selection.selected_root().ok_or(TreeError::NoSelection)?)
    }

    /// The tree for the selected root.
    pub fn tree(&self) -> Result<EliminationTree> {
        let root = self.selected_root()?;
        Ok(self.store.get_tree(root).ok_or(TreeError::NoTree(root))?)
    }

    /// Expand one node of the selected tree.
    pub fn expand(&self, path: &[CandidateId]) -> Result<EliminationTree> {
        let root = self.selected_root()?;
        let tree = self.tree()?.expand_node(path)?;
        self.store.set_tree(root, tree.clone());
        Ok(tree)
    }

    /// Expand the selected tree completely, on the worker when one is
    /// attached.
    pub async fn expand_all(&self) -> Result<BfsOutcome> {
        let root = self.selected_root()?;
        let tree = self.tree()?;

        let outcome = match &self.service {
            Some(service) => {
                service.init().await?;
                expand_in_background(service, &tree, &self.bfs).await?
            }
            None => expand_exhaustively_with(&tree, &self.bfs)?,
        };

        info!(
            root = %root,
            expanded = outcome.expanded,
            nodes = outcome.visited,
            "tree fully expanded"
        );
        self.store.set_tree(root, outcome.tree.clone());
        Ok(outcome)
    }

    /// Start a paced, layer-by-layer expansion of the selected tree.
    pub fn animate(&self) -> Result<JoinHandle<irv_tree::Result<LayeredReport>>> {
        let root = self.selected_root()?;
        Ok(LayeredExpansion::new(self.store(), root, self.layered.clone()).spawn())
    }

    /// Summarise the selected tree together with the verifier's answer for
    /// the same root.
    pub fn summary(&self) -> Result<ProofSummary> {
        let tree = self.tree()?;
        let winner = self
            .election
            .candidates
            .name(tree.winner())
            .unwrap_or_default()
            .to_string();
        let witness = match self.verify_winner(&winner) {
            Ok(proof) => Some(proof.path),
            Err(SessionError::Verify(VerifyError::UnsatisfiableProof(_))) => None,
            Err(e) => return Err(e),
        };

        Ok(ProofSummary {
            winner,
            witness,
            stats: tree.stats(),
            complete_paths: tree
                .complete_paths()
                .iter()
                .map(|path| self.election.names_of(path))
                .collect(),
        })
    }

    /// Stop the worker, if any.
    pub async fn shutdown(&self) {
        if let Some(service) = &self.service {
            service.terminate().await;
        }
    }
}
