//! Assertions over elimination states.
//!
//! An assertion `high > low [context]` licenses one elimination move: while
//! `high` is still standing and the context applies to the standing set,
//! `low` may be eliminated.
//!
//! # Contexts
//!
//! - `Universal`: applies in every state (not-eliminated-before style).
//! - `Exact(S)`: applies only when the standing set is exactly `S`
//!   (not-eliminated-next style). `Exact({})` never applies.

use std::fmt;

use crate::error::{ModelError, Result};
use crate::{CandidateId, CandidateSet};

/// The set of standing candidates under which an assertion applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Context {
    /// Applies whatever the standing set.
    Universal,
    /// Applies only when exactly these candidates stand.
    Exact(CandidateSet),
}

impl Context {
    /// Does this context apply when `state` is the standing set?
    #[inline]
    pub fn applies_to(&self, state: CandidateSet) -> bool {
        match self {
            Context::Universal => true,
            Context::Exact(set) => *set == state,
        }
    }

    /// Can this context still apply to `state` or one of its subsets?
    #[inline]
    pub fn reachable_from(&self, state: CandidateSet) -> bool {
        match self {
            Context::Universal => true,
            Context::Exact(set) => !set.is_empty() && set.is_subset_of(state),
        }
    }

    pub fn is_universal(&self) -> bool {
        matches!(self, Context::Universal)
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Context::Universal => write!(f, "*"),
            Context::Exact(set) => write!(f, "{}", set),
        }
    }
}

/// One logical constraint over an election, in candidate indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Assertion {
    /// Candidate that must still be standing.
    pub high: CandidateId,
    /// Candidate that may be eliminated.
    pub low: CandidateId,
    /// Standing sets under which the assertion applies.
    pub context: Context,
}

impl Assertion {
    /// Assertion applying in every state.
    pub const fn universal(high: CandidateId, low: CandidateId) -> Self {
        Self {
            high,
            low,
            context: Context::Universal,
        }
    }

    /// Assertion applying only when exactly `context` stands.
    pub const fn exact(high: CandidateId, low: CandidateId, context: CandidateSet) -> Self {
        Self {
            high,
            low,
            context: Context::Exact(context),
        }
    }

    /// Does this assertion make eliminating `low` a legal move from `state`?
    #[inline]
    pub fn permits_elimination(&self, state: CandidateSet) -> bool {
        state.contains(self.low) && state.contains(self.high) && self.context.applies_to(state)
    }

    /// Could this assertion still license a move at `state` or below it?
    ///
    /// Moves only remove candidates, so an assertion whose `high` or `low`
    /// is gone, or whose exact context is not a subset of `state`, is dead
    /// for the whole subtree.
    #[inline]
    pub fn is_relevant_at(&self, state: CandidateSet) -> bool {
        state.contains(self.low) && state.contains(self.high) && self.context.reachable_from(state)
    }

    /// True when every condition but the context check holds.
    #[inline]
    pub fn near_miss(&self, state: CandidateSet) -> bool {
        state.contains(self.low) && state.contains(self.high) && !self.context.applies_to(state)
    }

    /// Check that every candidate the assertion mentions is below `count`
    /// and that `high` and `low` differ.
    pub fn check_range(&self, count: usize) -> Result<()> {
        if self.high == self.low {
            return Err(ModelError::SelfAssertion(self.high.to_string()));
        }
        let context_in_range = match self.context {
            Context::Universal => true,
            Context::Exact(set) => {
                count >= crate::MAX_CANDIDATES || set.is_subset_of(CandidateSet::full(count))
            }
        };
        let in_range = self.high.index() < count && self.low.index() < count && context_in_range;
        if in_range {
            Ok(())
        } else {
            Err(ModelError::CandidateOutOfRange {
                assertion: format!("{} > {}", self.high.0, self.low.0),
                count,
            })
        }
    }
}

impl fmt::Display for Assertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} > {} [{}]", self.high.0, self.low.0, self.context)
    }
}

/// An assertion as supplied by callers, naming candidates.
///
/// A missing or `null` context is universal; a list is an exact context.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssertionSpec {
    pub high: String,
    pub low: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub context: Option<Vec<String>>,
}

impl AssertionSpec {
    /// Assertion applying in every state.
    pub fn universal(high: impl Into<String>, low: impl Into<String>) -> Self {
        Self {
            high: high.into(),
            low: low.into(),
            context: None,
        }
    }

    /// Assertion applying only when exactly `context` stands.
    pub fn exact<I, S>(high: impl Into<String>, low: impl Into<String>, context: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            high: high.into(),
            low: low.into(),
            context: Some(context.into_iter().map(Into::into).collect()),
        }
    }
}
