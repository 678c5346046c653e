//! Election input: candidates, reported winner and assertions.

use std::path::Path;

use irv_assertions::{Assertion, AssertionSpec, CandidateId, CandidateList, ModelError};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One audited contest.
///
/// ```json
/// {
///   "candidates": ["Alice", "Bob", "Chuan"],
///   "winner": "Alice",
///   "assertions": [{ "high": "Alice", "low": "Bob", "context": null }]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Election {
    pub candidates: CandidateList,
    pub winner: String,
    #[serde(default)]
    pub assertions: Vec<AssertionSpec>,
}

impl Election {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Index of the reported winner.
    pub fn winner_id(&self) -> Result<CandidateId> {
        self.candidate_id(&self.winner)
    }

    pub fn candidate_id(&self, name: &str) -> Result<CandidateId> {
        Ok(self
            .candidates
            .id_of(name)
            .ok_or_else(|| ModelError::UnknownCandidate(name.to_string()))?)
    }

    /// Assertions in candidate indices.
    pub fn resolved_assertions(&self) -> Result<Vec<Assertion>> {
        Ok(self.candidates.resolve_all(&self.assertions)?)
    }

    /// Candidate names along an elimination path.
    pub fn names_of(&self, path: &[CandidateId]) -> Vec<String> {
        self.candidates.names_of(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SessionError;

    #[test]
    fn parses_named_input() {
        let election = Election::from_json(
            r#"{
                "candidates": ["Alice", "Bob", "Chuan"],
                "winner": "Alice",
                "assertions": [
                    { "high": "Alice", "low": "Bob" },
                    { "high": "Alice", "low": "Chuan", "context": ["Alice", "Chuan"] }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(election.winner_id().unwrap(), CandidateId(0));
        let assertions = election.resolved_assertions().unwrap();
        assert_eq!(assertions.len(), 2);
        assert!(assertions[0].context.is_universal());
        assert!(!assertions[1].context.is_universal());
    }

    #[test]
    fn duplicate_candidates_rejected() {
        let err = Election::from_json(r#"{"candidates":["A","A"],"winner":"A"}"#).unwrap_err();
        assert!(matches!(err, SessionError::Json(_)));
    }

    #[test]
    fn unknown_winner_rejected() {
        let election = Election::from_json(r#"{"candidates":["A","B"],"winner":"Z"}"#).unwrap();
        let err = election.winner_id().unwrap_err();
        assert!(matches!(err, SessionError::Model(ModelError::UnknownCandidate(ref n)) if n == "Z"));
    }
}
