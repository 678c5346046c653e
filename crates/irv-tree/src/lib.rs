//! IRV Elimination Tree
//!
//! The tree behind the audit-proof visualisation: every elimination order
//! still open from a reported winner, grown on demand.
//!
//! # Design
//!
//! Trees are persistent values. Each expansion returns a new
//! [`EliminationTree`] that shares untouched subtrees with its predecessor;
//! nodes are addressed by their elimination path, not by pointer.
//!
//! # Expansion
//!
//! - [`EliminationTree::expand_node`]: one node, idempotent.
//! - [`expand_exhaustively`]: breadth first until no node is left to expand.
//! - [`expand_layered`]: one depth at a time, paced, publishing to a
//!   [`TreeStore`] after every step.
//! - [`expand_in_background`]: breadth first on the background worker.
//!
//! # Node status
//!
//! A node is `Unexpanded`, `Expanded` (has children), `Complete` (only the
//! winner stands) or a `DeadEnd` (no legal elimination remains).

mod bfs;
mod error;
mod layered;
mod node;
mod offload;
mod store;
mod tree;

pub use bfs::{expand_exhaustively, expand_exhaustively_with, BfsConfig, BfsOutcome};
pub use error::{Result, TreeError};
pub use layered::{
    expand_layered, spawn_layered, ExpansionEvent, LayeredConfig, LayeredExpansion, LayeredReport,
};
pub use node::{NodeId, NodeStatus, TreeNode};
pub use offload::{expand_in_background, expand_node_in_background, TreeTaskHandler};
pub use store::{MemoryTreeStore, SelectedRoot, Selection, TreeStore};
pub use tree::{EliminationTree, Nodes, TreeStats};
