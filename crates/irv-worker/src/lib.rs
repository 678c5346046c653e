//! IRV Worker - Background Execution Service
//!
//! Runs long, pure computations (exhaustive tree expansion, single node
//! expansion) on a dedicated thread so the caller's runtime stays
//! responsive.
//!
//! # Protocol
//!
//! - The worker announces itself once with `{"type":"ready"}`.
//! - Each call is a JSON request `{"id","fn","args"}` answered by exactly
//!   one reply carrying the same `id`.
//! - `fn` is one of a closed set of [`TaskKind`]s, dispatched to a
//!   [`TaskHandler`] registered when the service is built.
//! - Calls time out individually; late replies are dropped.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use irv_worker::{BackgroundService, TaskKind, WorkerConfig};
//!
//! let service = BackgroundService::new(WorkerConfig::default(), Arc::new(handler));
//! service.init().await?;
//! let tree = service.call(TaskKind::ExpandTreeBfs, vec![tree_json]).await?;
//! service.terminate().await;
//! ```
//!
//! The worker only ever runs handlers compiled into this process; no code
//! is accepted over the wire.

mod config;
mod error;
mod runner;
mod service;
mod wire;

pub use config::WorkerConfig;
pub use error::{Error, Result};
pub use runner::TaskHandler;
pub use service::BackgroundService;
pub use wire::{ReadySignal, Reply, Request, SignalKind, TaskKind, WorkerMessage};
