//! Layer-by-layer animated expansion.
//!
//! Expands one depth at a time, pausing between siblings and between layers
//! so an observer of the store sees the tree grow. Every expansion is
//! published to the store as soon as it happens.

use std::sync::Arc;
use std::time::Duration;

use irv_assertions::CandidateId;
use serde::Serialize;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{Result, TreeError};
use crate::node::NodeId;
use crate::store::TreeStore;

/// Pacing for layered expansion.
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    /// Deepest layer visited, exclusive.
    pub layer_cap: usize,
    /// Pause between expansions in the same layer.
    pub sibling_delay: Duration,
    /// Pause between layers.
    pub layer_delay: Duration,
}

impl Default for LayeredConfig {
    fn default() -> Self {
        Self {
            layer_cap: 20,
            sibling_delay: Duration::from_millis(100),
            layer_delay: Duration::from_millis(500),
        }
    }
}

impl LayeredConfig {
    #[must_use]
    pub fn with_layer_cap(mut self, cap: usize) -> Self {
        self.layer_cap = cap;
        self
    }

    #[must_use]
    pub fn with_sibling_delay(mut self, delay: Duration) -> Self {
        self.sibling_delay = delay;
        self
    }

    #[must_use]
    pub fn with_layer_delay(mut self, delay: Duration) -> Self {
        self.layer_delay = delay;
        self
    }
}

/// Progress of a layered expansion, for anyone subscribed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExpansionEvent {
    NodeExpanded {
        root: CandidateId,
        node: NodeId,
        path: Vec<CandidateId>,
        children: usize,
    },
    LayerCompleted {
        root: CandidateId,
        depth: usize,
        expanded: usize,
    },
}

/// What a layered run did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LayeredReport {
    /// Expansions per depth, one entry per visited layer.
    pub per_layer: Vec<usize>,
    pub expanded: usize,
}

/// A layered expansion of the tree stored under one root.
pub struct LayeredExpansion {
    store: Arc<dyn TreeStore>,
    root: CandidateId,
    config: LayeredConfig,
    events: Option<broadcast::Sender<ExpansionEvent>>,
}

impl LayeredExpansion {
    pub fn new(store: Arc<dyn TreeStore>, root: CandidateId, config: LayeredConfig) -> Self {
        Self {
            store,
            root,
            config,
            events: None,
        }
    }

    /// Broadcast progress on `events`.
    #[must_use]
    pub fn with_events(mut self, events: broadcast::Sender<ExpansionEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Run to the layer cap.
    pub async fn run(&self) -> Result<LayeredReport> {
        let mut report = LayeredReport::default();

        for depth in 0..self.config.layer_cap {
            if depth > 0 {
                tokio::time::sleep(self.config.layer_delay).await;
            }

            let layer = self.current()?.expandable_paths_at_depth(depth);
            let mut expanded = 0;

            for path in &layer {
                // Skip work the store already has before pausing for it.
                if !self.still_expandable(path)? {
                    debug!(path = ?path, "node no longer expandable, skipping");
                    continue;
                }
                if expanded > 0 {
                    tokio::time::sleep(self.config.sibling_delay).await;
                }

                // Re-read: the store may have moved on during the pause.
                let tree = self.current()?;
                if !tree.node_at(path).is_some_and(|node| node.is_expandable()) {
                    debug!(path = ?path, "node expanded during pause, skipping");
                    continue;
                }
                let tree = match tree.expand_node(path) {
                    Ok(tree) => tree,
                    Err(TreeError::PathNotFound { path }) => {
                        warn!(path = ?path, "node vanished during layered expansion");
                        continue;
                    }
                    Err(e) => return Err(e),
                };

                if let Some(node) = tree.node_at(path) {
                    self.emit(ExpansionEvent::NodeExpanded {
                        root: self.root,
                        node: node.id(),
                        path: path.clone(),
                        children: node.children().len(),
                    });
                }
                self.store.set_tree(self.root, tree);
                expanded += 1;
            }

            debug!(root = %self.root, depth, expanded, "layer expanded");
            self.emit(ExpansionEvent::LayerCompleted {
                root: self.root,
                depth,
                expanded,
            });
            report.per_layer.push(expanded);
            report.expanded += expanded;
        }

        info!(
            root = %self.root,
            layers = report.per_layer.len(),
            expanded = report.expanded,
            "layered expansion finished"
        );
        Ok(report)
    }

    /// Start the run on the tokio runtime and return immediately.
    pub fn spawn(self) -> JoinHandle<Result<LayeredReport>> {
        tokio::spawn(async move { self.run().await })
    }

    fn current(&self) -> Result<crate::EliminationTree> {
        self.store
            .get_tree(self.root)
            .ok_or(TreeError::NoTree(self.root))
    }

    fn still_expandable(&self, path: &[CandidateId]) -> Result<bool> {
        Ok(self
            .current()?
            .node_at(path)
            .is_some_and(|node| node.is_expandable()))
    }

    fn emit(&self, event: ExpansionEvent) {
        if let Some(events) = &self.events {
            // No subscribers is fine.
            let _ = events.send(event);
        }
    }
}

/// Expand the tree stored under `root` one layer at a time.
pub async fn expand_layered(
    store: Arc<dyn TreeStore>,
    root: CandidateId,
    config: LayeredConfig,
) -> Result<LayeredReport> {
    LayeredExpansion::new(store, root, config).run().await
}

/// Fire-and-forget [`expand_layered`].
pub fn spawn_layered(
    store: Arc<dyn TreeStore>,
    root: CandidateId,
    config: LayeredConfig,
) -> JoinHandle<Result<LayeredReport>> {
    LayeredExpansion::new(store, root, config).spawn()
}
