//! IRV Proof Visualisation Backend
//!
//! Wires the proof engine into one application context.
//!
//! # Architecture
//!
//! - **Election**: candidates, reported winner and named assertions, read
//!   from JSON
//! - **Session**: owns the tree store, the root selection and the optional
//!   background worker; every expansion is published to the store
//! - **Summary**: the verifier's witness next to the expanded tree
//!
//! # Usage
//!
//! ```ignore
//! let session = ProofSession::new(Election::load("contest.json")?)?
//!     .with_service(Arc::new(BackgroundService::new(
//!         WorkerConfig::default(),
//!         Arc::new(TreeTaskHandler),
//!     )));
//! session.select_winner()?;
//! session.expand_all().await?;
//! println!("{}", serde_json::to_string_pretty(&session.summary()?)?);
//! ```

mod election;
mod error;
mod session;

pub use election::Election;
pub use error::{Result, SessionError};
pub use session::{ProofSession, ProofSummary};
