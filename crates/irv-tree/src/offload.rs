//! Running tree expansion on the background worker.

use irv_assertions::CandidateId;
use irv_worker::{BackgroundService, TaskHandler, TaskKind};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::bfs::{expand_exhaustively_with, BfsConfig, BfsOutcome};
use crate::error::{Result, TreeError};
use crate::tree::EliminationTree;

/// The tree tasks the worker understands.
///
/// * `expand-tree-bfs` `[tree, max_nodes?]` → [`BfsOutcome`]
/// * `expand-node` `[tree, path]` → [`EliminationTree`]
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeTaskHandler;

impl TaskHandler for TreeTaskHandler {
    fn handle(&self, task: TaskKind, args: Vec<Value>) -> std::result::Result<Value, String> {
        let mut args = args.into_iter();
        let tree: EliminationTree = decode(args.next(), "tree")?;
        tree.validate().map_err(|e| e.to_string())?;

        let result = match task {
            TaskKind::ExpandTreeBfs => {
                let max_nodes: Option<usize> = match args.next() {
                    Some(value) => decode(Some(value), "max_nodes")?,
                    None => None,
                };
                let config = BfsConfig { max_nodes };
                let outcome = expand_exhaustively_with(&tree, &config).map_err(|e| e.to_string())?;
                serde_json::to_value(outcome)
            }
            TaskKind::ExpandNode => {
                let path: Vec<CandidateId> = decode(args.next(), "path")?;
                let tree = tree.expand_node(&path).map_err(|e| e.to_string())?;
                serde_json::to_value(tree)
            }
        };
        result.map_err(|e| e.to_string())
    }
}

fn decode<T: DeserializeOwned>(value: Option<Value>, name: &str) -> std::result::Result<T, String> {
    let value = value.ok_or_else(|| format!("missing argument `{}`", name))?;
    serde_json::from_value(value).map_err(|e| format!("bad argument `{}`: {}", name, e))
}

/// Expand `tree` exhaustively on the worker.
///
/// The service must already be initialised with a [`TreeTaskHandler`].
pub async fn expand_in_background(
    service: &BackgroundService,
    tree: &EliminationTree,
    config: &BfsConfig,
) -> Result<BfsOutcome> {
    let args = vec![serde_json::to_value(tree)?, serde_json::to_value(config.max_nodes)?];
    let outcome: BfsOutcome = service.call_as(TaskKind::ExpandTreeBfs, args).await?;
    debug!(expanded = outcome.expanded, visited = outcome.visited, "background expansion returned");
    Ok(outcome)
}

/// Expand one node on the worker.
pub async fn expand_node_in_background(
    service: &BackgroundService,
    tree: &EliminationTree,
    path: &[CandidateId],
) -> Result<EliminationTree> {
    tree.node_at(path).ok_or_else(|| TreeError::PathNotFound { path: path.to_vec() })?;
    let args = vec![serde_json::to_value(tree)?, serde_json::to_value(path)?];
    Ok(service.call_as(TaskKind::ExpandNode, args).await?)
}
