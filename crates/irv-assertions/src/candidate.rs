//! Candidate indices and bitmask candidate sets.
//!
//! A candidate is addressed by its position in the candidate list of the
//! current call. A set of standing candidates is a bitmask over those
//! positions, so an elimination state is just an integer:
//!
//! ```text
//! candidates = [A, B, C]      state 0b101 = {A, C}
//! ```
//!
//! Removing a candidate always yields a numerically smaller state, which the
//! verifier relies on to fill its table in a single ascending pass.

use std::fmt;

/// Width of the bitmask, and so the largest supported candidate list.
pub const MAX_CANDIDATES: usize = 32;

/// Position of a candidate in the candidate list of one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CandidateId(pub usize);

impl CandidateId {
    /// Create from a raw index.
    #[inline]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Get the raw index value.
    #[inline]
    pub const fn index(&self) -> usize {
        self.0
    }

    #[inline]
    const fn bit(&self) -> u32 {
        1 << self.0
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A set of candidates, stored as a bitmask over candidate indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CandidateSet(u32);

impl CandidateSet {
    /// The empty set.
    pub const EMPTY: Self = Self(0);

    /// Build a set from its raw bitmask.
    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Raw bitmask; also the state's index in a verifier table.
    #[inline]
    pub const fn bits(&self) -> u32 {
        self.0
    }

    /// All of the first `count` candidates.
    ///
    /// # Panics
    ///
    /// Panics if `count` exceeds [`MAX_CANDIDATES`].
    pub const fn full(count: usize) -> Self {
        assert!(count <= MAX_CANDIDATES, "candidate count exceeds bitmask width");
        if count == MAX_CANDIDATES {
            Self(u32::MAX)
        } else {
            Self((1u32 << count) - 1)
        }
    }

    /// The set containing only `candidate`.
    #[inline]
    pub const fn singleton(candidate: CandidateId) -> Self {
        Self(candidate.bit())
    }

    #[inline]
    pub const fn contains(&self, candidate: CandidateId) -> bool {
        self.0 & candidate.bit() != 0
    }

    /// Copy of this set with `candidate` added.
    #[inline]
    #[must_use]
    pub const fn with(self, candidate: CandidateId) -> Self {
        Self(self.0 | candidate.bit())
    }

    /// Copy of this set with `candidate` removed.
    #[inline]
    #[must_use]
    pub const fn without(self, candidate: CandidateId) -> Self {
        Self(self.0 & !candidate.bit())
    }

    pub fn insert(&mut self, candidate: CandidateId) {
        self.0 |= candidate.bit();
    }

    pub fn remove(&mut self, candidate: CandidateId) {
        self.0 &= !candidate.bit();
    }

    /// Number of candidates in the set.
    #[inline]
    pub const fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// True if every member of `self` is also in `other`.
    #[inline]
    pub const fn is_subset_of(&self, other: CandidateSet) -> bool {
        self.0 & !other.0 == 0
    }

    /// True if `self` is a subset of `other` and smaller than it.
    #[inline]
    pub const fn is_strict_subset_of(&self, other: CandidateSet) -> bool {
        self.is_subset_of(other) && self.0 != other.0
    }

    /// Members in ascending index order.
    pub fn iter(&self) -> Members {
        Members { bits: self.0 }
    }
}

impl FromIterator<CandidateId> for CandidateSet {
    fn from_iter<I: IntoIterator<Item = CandidateId>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for candidate in iter {
            set.insert(candidate);
        }
        set
    }
}

impl IntoIterator for CandidateSet {
    type Item = CandidateId;
    type IntoIter = Members;

    fn into_iter(self) -> Members {
        self.iter()
    }
}

impl fmt::Display for CandidateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, candidate) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", candidate.0)?;
        }
        write!(f, "}}")
    }
}

/// Ascending iterator over the members of a [`CandidateSet`].
#[derive(Debug, Clone)]
pub struct Members {
    bits: u32,
}

impl Iterator for Members {
    type Item = CandidateId;

    fn next(&mut self) -> Option<CandidateId> {
        if self.bits == 0 {
            return None;
        }
        let index = self.bits.trailing_zeros() as usize;
        self.bits &= self.bits - 1;
        Some(CandidateId(index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.bits.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Members {}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn c(i: usize) -> CandidateId {
        CandidateId(i)
    }

    #[test]
    fn full_set_sizes() {
        assert_eq!(CandidateSet::full(0), CandidateSet::EMPTY);
        assert_eq!(CandidateSet::full(3).bits(), 0b111);
        assert_eq!(CandidateSet::full(MAX_CANDIDATES).len(), MAX_CANDIDATES);
    }

    #[test]
    fn insert_remove_contains() {
        let mut set = CandidateSet::EMPTY;
        set.insert(c(2));
        set.insert(c(5));
        assert!(set.contains(c(2)));
        assert!(set.contains(c(5)));
        assert!(!set.contains(c(3)));
        assert_eq!(set.len(), 2);

        set.remove(c(2));
        assert!(!set.contains(c(2)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn iteration_is_ascending() {
        let set: CandidateSet = [c(7), c(1), c(4)].into_iter().collect();
        let members: Vec<_> = set.iter().collect();
        assert_eq!(members, vec![c(1), c(4), c(7)]);
    }

    #[test]
    fn display_lists_indices() {
        let set: CandidateSet = [c(0), c(2)].into_iter().collect();
        assert_eq!(set.to_string(), "{0,2}");
        assert_eq!(CandidateSet::EMPTY.to_string(), "{}");
    }

    #[test]
    fn subset_relations() {
        let big = CandidateSet::full(4);
        let small = big.without(c(1));
        assert!(small.is_subset_of(big));
        assert!(small.is_strict_subset_of(big));
        assert!(big.is_subset_of(big));
        assert!(!big.is_strict_subset_of(big));
        assert!(!big.is_subset_of(small));
    }

    proptest! {
        #[test]
        fn removal_shrinks_numerically(bits in 1u32.., index in 0usize..32) {
            let set = CandidateSet::from_bits(bits);
            let candidate = c(index);
            if set.contains(candidate) {
                let smaller = set.without(candidate);
                prop_assert!(smaller.bits() < set.bits());
                prop_assert_eq!(smaller.len() + 1, set.len());
            }
        }

        #[test]
        fn iter_matches_len(bits in any::<u32>()) {
            let set = CandidateSet::from_bits(bits);
            prop_assert_eq!(set.iter().count(), set.len());
            let rebuilt: CandidateSet = set.iter().collect();
            prop_assert_eq!(rebuilt, set);
        }
    }
}
