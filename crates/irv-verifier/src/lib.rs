//! Winner-Entailment Verifier
//!
//! Given assertions over an election and a reported winner, decide whether
//! the assertions logically force that winner and reconstruct one
//! elimination order that witnesses it.
//!
//! # Search
//!
//! A state is the set of candidates still standing. The search starts from
//! the full set and looks for a sequence of legal eliminations ending with
//! the reported winner alone:
//!
//! ```text
//! {A, B, C} --(C > A [*])--> {B, C} --(C > B [*])--> {C}
//! ```
//!
//! Every state's answer is computed once and kept in a table of `2^n`
//! entries, so the cost is `O(2^n · n · m)` for `n` candidates and `m`
//! assertions. Lists longer than [`SEARCH_LIMIT`] are refused.
//!
//! # Determinism
//!
//! Candidates are tried in ascending index order and assertions in input
//! order. The witness is one valid order, not a unique or minimal one.

mod error;
mod proof;
mod search;

pub use error::{Result, VerifyError};
pub use proof::{try_verify, verify, WinnerProof};
pub use search::{Reach, ReachTable, Verifier, Witness, WitnessStep, SEARCH_LIMIT};
