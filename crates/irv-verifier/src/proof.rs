//! Name-level verification entry points.

use irv_assertions::{AssertionSpec, CandidateList};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, VerifyError};
use crate::search::Verifier;

/// A reported winner together with one elimination order forcing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinnerProof {
    pub winner: String,
    /// Eliminated candidates, first elimination first.
    pub path: Vec<String>,
}

/// Check that `assertions` force `reported_winner`, explaining failures.
pub fn try_verify<S: AsRef<str>>(
    assertions: &[AssertionSpec],
    candidates: &[S],
    reported_winner: &str,
) -> Result<WinnerProof> {
    let list = CandidateList::new(candidates.iter().map(|c| c.as_ref().to_string()))?;
    let winner = list
        .id_of(reported_winner)
        .ok_or_else(|| VerifyError::UnknownWinner(reported_winner.to_string()))?;

    if list.len() == 1 {
        return Ok(WinnerProof {
            winner: reported_winner.to_string(),
            path: Vec::new(),
        });
    }
    if list.len() > crate::SEARCH_LIMIT {
        return Err(VerifyError::TooManyCandidates {
            count: list.len(),
            limit: crate::SEARCH_LIMIT,
        });
    }

    let resolved = list.resolve_all(assertions)?;
    let witness = Verifier::new(&resolved, list.len(), winner)?
        .witness()
        .ok_or_else(|| VerifyError::UnsatisfiableProof(reported_winner.to_string()))?;

    let path = list.names_of(&witness.eliminations());
    debug!(
        winner = reported_winner,
        candidates = list.len(),
        assertions = resolved.len(),
        path = ?path,
        "verified reported winner"
    );

    Ok(WinnerProof {
        winner: reported_winner.to_string(),
        path,
    })
}

/// Check that `assertions` force `reported_winner`.
///
/// Returns `None` both for a winner missing from `candidates` and for
/// assertions that do not force it; [`try_verify`] tells them apart.
pub fn verify<S: AsRef<str>>(
    assertions: &[AssertionSpec],
    candidates: &[S],
    reported_winner: &str,
) -> Option<WinnerProof> {
    try_verify(assertions, candidates, reported_winner).ok()
}
