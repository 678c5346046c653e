//! Candidate names and their per-call indices.

use std::collections::HashMap;

use crate::error::{ModelError, Result};
use crate::{Assertion, AssertionSpec, CandidateId, CandidateSet, Context, MAX_CANDIDATES};

/// The ordered candidate list of one verification or tree-build call.
///
/// A candidate's index is its position in this list.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<String>", into = "Vec<String>"))]
pub struct CandidateList {
    names: Vec<String>,
    index: HashMap<String, CandidateId>,
}

impl CandidateList {
    /// Build a list, rejecting duplicates and lists wider than the bitmask.
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.len() > MAX_CANDIDATES {
            return Err(ModelError::TooManyCandidates {
                count: names.len(),
                max: MAX_CANDIDATES,
            });
        }

        let mut index = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            if index.insert(name.clone(), CandidateId(i)).is_some() {
                return Err(ModelError::DuplicateCandidate(name.clone()));
            }
        }

        Ok(Self { names, index })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Index of `name`, if it is on the list.
    pub fn id_of(&self, name: &str) -> Option<CandidateId> {
        self.index.get(name).copied()
    }

    /// Name at `id`.
    pub fn name(&self, id: CandidateId) -> Option<&str> {
        self.names.get(id.0).map(String::as_str)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Every candidate on the list.
    pub fn all(&self) -> CandidateSet {
        CandidateSet::full(self.names.len())
    }

    fn require(&self, name: &str) -> Result<CandidateId> {
        self.id_of(name)
            .ok_or_else(|| ModelError::UnknownCandidate(name.to_string()))
    }

    /// Translate a named assertion into indices.
    pub fn resolve(&self, spec: &AssertionSpec) -> Result<Assertion> {
        let high = self.require(&spec.high)?;
        let low = self.require(&spec.low)?;
        if high == low {
            return Err(ModelError::SelfAssertion(spec.high.clone()));
        }

        let context = match &spec.context {
            None => Context::Universal,
            Some(names) => {
                let mut set = CandidateSet::EMPTY;
                for name in names {
                    set.insert(self.require(name)?);
                }
                Context::Exact(set)
            }
        };

        Ok(Assertion { high, low, context })
    }

    /// Translate every spec, keeping input order.
    pub fn resolve_all(&self, specs: &[AssertionSpec]) -> Result<Vec<Assertion>> {
        specs.iter().map(|spec| self.resolve(spec)).collect()
    }

    /// Names of the given candidates, in the given order.
    pub fn names_of(&self, ids: &[CandidateId]) -> Vec<String> {
        ids.iter()
            .filter_map(|&id| self.name(id))
            .map(str::to_string)
            .collect()
    }

    /// Human-readable form of an indexed assertion.
    pub fn describe(&self, assertion: &Assertion) -> String {
        let name = |id: CandidateId| self.name(id).unwrap_or("?").to_string();
        let context = match assertion.context {
            Context::Universal => "*".to_string(),
            Context::Exact(set) => {
                let names: Vec<_> = set.iter().map(name).collect();
                format!("{{{}}}", names.join(", "))
            }
        };
        format!("{} > {} [{}]", name(assertion.high), name(assertion.low), context)
    }
}

impl TryFrom<Vec<String>> for CandidateList {
    type Error = ModelError;

    fn try_from(names: Vec<String>) -> Result<Self> {
        Self::new(names)
    }
}

impl From<CandidateList> for Vec<String> {
    fn from(list: CandidateList) -> Self {
        list.names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> CandidateList {
        CandidateList::new(["Alice", "Bob", "Chuan"]).unwrap()
    }

    #[test]
    fn indices_follow_position() {
        let list = abc();
        assert_eq!(list.id_of("Alice"), Some(CandidateId(0)));
        assert_eq!(list.id_of("Chuan"), Some(CandidateId(2)));
        assert_eq!(list.id_of("Diego"), None);
        assert_eq!(list.name(CandidateId(1)), Some("Bob"));
        assert_eq!(list.all().len(), 3);
    }

    #[test]
    fn duplicates_rejected() {
        let err = CandidateList::new(["A", "B", "A"]).unwrap_err();
        assert_eq!(err, ModelError::DuplicateCandidate("A".into()));
    }

    #[test]
    fn oversize_list_rejected() {
        let names: Vec<String> = (0..=MAX_CANDIDATES).map(|i| format!("c{}", i)).collect();
        assert!(matches!(
            CandidateList::new(names),
            Err(ModelError::TooManyCandidates { .. })
        ));
    }

    #[test]
    fn resolve_universal_and_exact() {
        let list = abc();
        let a = list.resolve(&AssertionSpec::universal("Alice", "Bob")).unwrap();
        assert_eq!(a, Assertion::universal(CandidateId(0), CandidateId(1)));

        let b = list
            .resolve(&AssertionSpec::exact("Chuan", "Alice", ["Alice", "Chuan"]))
            .unwrap();
        assert_eq!(b.context, Context::Exact(CandidateSet::from_bits(0b101)));
    }

    #[test]
    fn resolve_rejects_bad_names() {
        let list = abc();
        assert_eq!(
            list.resolve(&AssertionSpec::universal("Alice", "Zed")),
            Err(ModelError::UnknownCandidate("Zed".into()))
        );
        assert_eq!(
            list.resolve(&AssertionSpec::exact("Alice", "Bob", ["Nobody"])),
            Err(ModelError::UnknownCandidate("Nobody".into()))
        );
        assert_eq!(
            list.resolve(&AssertionSpec::universal("Bob", "Bob")),
            Err(ModelError::SelfAssertion("Bob".into()))
        );
    }

    #[test]
    fn describe_uses_names() {
        let list = abc();
        let a = list
            .resolve(&AssertionSpec::exact("Alice", "Bob", ["Alice", "Bob"]))
            .unwrap();
        assert_eq!(list.describe(&a), "Alice > Bob [{Alice, Bob}]");
    }
}
