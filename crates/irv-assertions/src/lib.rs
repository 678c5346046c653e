//! IRV Assertion Model
//!
//! Plain data describing the logical constraints an IRV audit proves about
//! an election.
//!
//! # Elimination States
//!
//! An IRV count eliminates one candidate per round. The set of candidates
//! still standing at some round is an *elimination state*, stored as a
//! bitmask over candidate indices ([`CandidateSet`]). Indices are positions
//! in the [`CandidateList`] of one call and mean nothing outside it.
//!
//! # Assertions
//!
//! An [`Assertion`] `high > low [context]` says that while `high` stands and
//! the context applies, eliminating `low` is a legal move. The verifier and
//! the elimination tree are both built from the two predicates
//! [`Assertion::permits_elimination`] and [`Assertion::is_relevant_at`].
//!
//! Callers supply [`AssertionSpec`]s that name candidates; the candidate
//! list resolves them into indices.

mod assertion;
mod candidate;
mod error;
mod roster;

pub use assertion::{Assertion, AssertionSpec, Context};
pub use candidate::{CandidateId, CandidateSet, Members, MAX_CANDIDATES};
pub use error::{ModelError, Result};
pub use roster::CandidateList;
