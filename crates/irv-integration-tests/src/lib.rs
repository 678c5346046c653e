//! Shared fixtures for the cross-crate tests.

use irv_assertions::{Assertion, AssertionSpec, CandidateId, CandidateSet, Context};
use proptest::prelude::*;

/// `"C0"`, `"C1"`, ...
pub fn candidate_names(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("C{}", i)).collect()
}

/// Candidate 0 beats everyone, everywhere.
pub fn dominant(count: usize) -> Vec<Assertion> {
    (1..count)
        .map(|i| Assertion::universal(CandidateId(0), CandidateId(i)))
        .collect()
}

/// Name-level form of `assertions`.
pub fn to_specs(assertions: &[Assertion], names: &[String]) -> Vec<AssertionSpec> {
    let name = |id: CandidateId| names[id.index()].clone();
    assertions
        .iter()
        .map(|a| match a.context {
            Context::Universal => AssertionSpec::universal(name(a.high), name(a.low)),
            Context::Exact(set) => AssertionSpec::exact(name(a.high), name(a.low), set.iter().map(name)),
        })
        .collect()
}

/// A contest: candidate count, reported winner and assertions without
/// self-assertions.
pub fn contest(max_candidates: usize) -> impl Strategy<Value = (usize, CandidateId, Vec<Assertion>)> {
    (2..=max_candidates).prop_flat_map(|count| {
        let assertion = (0..count, 0..count, prop::option::weighted(0.4, 1u32..(1u32 << count)));
        (
            Just(count),
            (0..count).prop_map(CandidateId),
            prop::collection::vec(assertion, 0..3 * count),
        )
            .prop_map(|(count, winner, raw)| {
                let assertions = raw
                    .into_iter()
                    .filter(|(high, low, _)| high != low)
                    .map(|(high, low, context)| match context {
                        None => Assertion::universal(CandidateId(high), CandidateId(low)),
                        Some(bits) => Assertion::exact(
                            CandidateId(high),
                            CandidateId(low),
                            CandidateSet::from_bits(bits),
                        ),
                    })
                    .collect();
                (count, winner, assertions)
            })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn specs_keep_contexts() {
        let names = candidate_names(3);
        let assertions = vec![
            Assertion::universal(CandidateId(0), CandidateId(1)),
            Assertion::exact(CandidateId(2), CandidateId(0), CandidateSet::full(3)),
        ];
        let specs = to_specs(&assertions, &names);
        assert_eq!(specs[0], AssertionSpec::universal("C0", "C1"));
        assert_eq!(specs[1], AssertionSpec::exact("C2", "C0", ["C0", "C1", "C2"]));
    }
}
