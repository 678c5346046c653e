//! Memoised search over elimination states.
//!
//! Every state is a bitmask, and eliminating a candidate clears a bit, so a
//! state's successors are all numerically smaller than the state itself.
//! One ascending pass over `0..2^n` therefore sees every successor before
//! its predecessors and fills the whole table without recursion:
//!
//! ```text
//! reach[{w}] = accept
//! reach[S]   = first (c ascending, a in input order) with
//!              a.low == c, a permits eliminating c in S, reach[S \ {c}] != unreachable
//! ```
//!
//! The first candidate whose move leads to the accepting state is recorded,
//! justified by the first assertion that licenses it. This is the same
//! choice a depth-first search trying candidates in ascending order and
//! assertions in input order makes, so the witness is deterministic.

use irv_assertions::{Assertion, CandidateId, CandidateSet};

use crate::error::{Result, VerifyError};

/// Largest candidate list the search accepts. The table has `2^n` entries.
pub const SEARCH_LIMIT: usize = 20;

/// Answer recorded for one state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reach {
    /// No legal sequence of moves reaches the winner-only state.
    Unreachable,
    /// The winner-only state itself.
    Accepting,
    /// Eliminate `eliminated`, licensed by `assertion`, then continue.
    Step {
        eliminated: CandidateId,
        assertion: usize,
    },
}

/// One elimination in a witness, with the assertion that licensed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WitnessStep {
    pub eliminated: CandidateId,
    pub assertion: usize,
}

/// A concrete elimination order ending with the winner alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Witness {
    pub winner: CandidateId,
    pub steps: Vec<WitnessStep>,
}

impl Witness {
    /// Eliminated candidates, first elimination first.
    pub fn eliminations(&self) -> Vec<CandidateId> {
        self.steps.iter().map(|s| s.eliminated).collect()
    }
}

/// Exhaustive search for one (winner, assertions, candidate count) triple.
#[derive(Debug)]
pub struct Verifier<'a> {
    assertions: &'a [Assertion],
    count: usize,
    winner: CandidateId,
    /// Assertion indices grouped by their `low`, in input order.
    by_low: Vec<Vec<usize>>,
}

impl<'a> Verifier<'a> {
    /// Prepare a search over candidates `0..count`.
    pub fn new(assertions: &'a [Assertion], count: usize, winner: CandidateId) -> Result<Self> {
        if count > SEARCH_LIMIT {
            return Err(VerifyError::TooManyCandidates {
                count,
                limit: SEARCH_LIMIT,
            });
        }
        if winner.index() >= count {
            return Err(VerifyError::UnknownWinner(winner.to_string()));
        }
        for assertion in assertions {
            assertion.check_range(count)?;
        }

        let mut by_low = vec![Vec::new(); count];
        for (i, assertion) in assertions.iter().enumerate() {
            if let Some(group) = by_low.get_mut(assertion.low.index()) {
                group.push(i);
            }
        }

        Ok(Self {
            assertions,
            count,
            winner,
            by_low,
        })
    }

    /// First assertion, in input order, that lets `low` go from `state`.
    fn licensing_assertion(&self, state: CandidateSet, low: CandidateId) -> Option<usize> {
        self.by_low[low.index()]
            .iter()
            .copied()
            .find(|&i| self.assertions[i].permits_elimination(state))
    }

    /// Fill the state table.
    pub fn solve(&self) -> ReachTable {
        let size = 1usize << self.count;
        let mut table = vec![Reach::Unreachable; size];
        let accepting = CandidateSet::singleton(self.winner);
        table[accepting.bits() as usize] = Reach::Accepting;

        for bits in 0..size {
            let state = CandidateSet::from_bits(bits as u32);
            if !state.contains(self.winner) || state == accepting {
                continue;
            }

            for low in state.iter().filter(|&c| c != self.winner) {
                let next = state.without(low);
                if table[next.bits() as usize] == Reach::Unreachable {
                    continue;
                }
                if let Some(assertion) = self.licensing_assertion(state, low) {
                    table[bits] = Reach::Step {
                        eliminated: low,
                        assertion,
                    };
                    break;
                }
            }
        }

        ReachTable {
            table,
            winner: self.winner,
            start: CandidateSet::full(self.count),
        }
    }

    /// Search and reconstruct a witness from the full state, if one exists.
    pub fn witness(&self) -> Option<Witness> {
        self.solve().witness()
    }
}

/// The filled table of one search.
#[derive(Debug, Clone)]
pub struct ReachTable {
    table: Vec<Reach>,
    winner: CandidateId,
    start: CandidateSet,
}

impl ReachTable {
    /// Recorded answer for `state`.
    pub fn get(&self, state: CandidateSet) -> Reach {
        self.table
            .get(state.bits() as usize)
            .copied()
            .unwrap_or(Reach::Unreachable)
    }

    /// Number of states from which the winner-only state can be reached.
    pub fn reachable_states(&self) -> usize {
        self.table
            .iter()
            .filter(|r| **r != Reach::Unreachable)
            .count()
    }

    /// Follow recorded steps from the full state to the accepting state.
    pub fn witness(&self) -> Option<Witness> {
        let mut state = self.start;
        let mut steps = Vec::with_capacity(self.start.len().saturating_sub(1));

        loop {
            match self.get(state) {
                Reach::Unreachable => return None,
                Reach::Accepting => {
                    return Some(Witness {
                        winner: self.winner,
                        steps,
                    })
                }
                Reach::Step {
                    eliminated,
                    assertion,
                } => {
                    steps.push(WitnessStep {
                        eliminated,
                        assertion,
                    });
                    state = state.without(eliminated);
                }
            }
        }
    }
}
