//! The verifier and the exhaustively expanded tree must agree.

use irv_assertions::{Assertion, CandidateId, CandidateSet};
use irv_integration_tests::{candidate_names, contest, dominant, to_specs};
use irv_tree::{expand_exhaustively, EliminationTree};
use irv_verifier::{verify, Verifier};
use proptest::prelude::*;

fn expanded(count: usize, winner: CandidateId, assertions: &[Assertion]) -> EliminationTree {
    let tree = EliminationTree::new(winner, count, assertions.to_vec()).unwrap();
    expand_exhaustively(&tree).unwrap().tree
}

#[test]
fn dominant_winner_has_every_order() {
    let names = candidate_names(4);
    let assertions = dominant(4);
    let proof = verify(&to_specs(&assertions, &names), &names, "C0").unwrap();
    assert_eq!(proof.path, vec!["C1", "C2", "C3"]);

    let tree = expanded(4, CandidateId(0), &assertions);
    assert_eq!(tree.complete_paths().len(), 6);
}

#[test]
fn exact_chain_has_one_order() {
    // C3 can only go first, then C2, then C1.
    let assertions: Vec<Assertion> = (1..4)
        .rev()
        .map(|i| Assertion::exact(CandidateId(0), CandidateId(i), CandidateSet::full(i + 1)))
        .collect();
    let names = candidate_names(4);

    let proof = verify(&to_specs(&assertions, &names), &names, "C0").unwrap();
    assert_eq!(proof.path, vec!["C3", "C2", "C1"]);

    let tree = expanded(4, CandidateId(0), &assertions);
    assert_eq!(
        tree.complete_paths(),
        vec![vec![CandidateId(3), CandidateId(2), CandidateId(1)]]
    );
    // Only one first move is legal.
    assert_eq!(tree.root().children().len(), 1);
}

#[test]
fn forbidden_winner_prunes_the_root() {
    let names = candidate_names(2);
    let assertions = vec![Assertion::universal(CandidateId(1), CandidateId(0))];
    assert!(verify(&to_specs(&assertions, &names), &names, "C0").is_none());

    let tree = expanded(2, CandidateId(0), &assertions);
    assert!(tree.root().pruned());
    assert!(tree.complete_paths().is_empty());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn verifier_succeeds_iff_tree_has_complete_leaf((count, winner, assertions) in contest(6)) {
        let names = candidate_names(count);
        let specs = to_specs(&assertions, &names);
        let proof = verify(&specs, &names, &names[winner.index()]);
        let tree = expanded(count, winner, &assertions);
        let complete = tree.complete_paths();

        prop_assert_eq!(proof.is_some(), !complete.is_empty());

        if let Some(proof) = proof {
            let witness: Vec<CandidateId> = Verifier::new(&assertions, count, winner)
                .unwrap()
                .witness()
                .unwrap()
                .eliminations();
            prop_assert!(complete.contains(&witness));
            let named: Vec<String> = witness.iter().map(|c| names[c.index()].clone()).collect();
            prop_assert_eq!(proof.path, named);
        }
    }

    #[test]
    fn every_complete_path_eliminates_all_losers((count, winner, assertions) in contest(5)) {
        let tree = expanded(count, winner, &assertions);
        for path in tree.complete_paths() {
            prop_assert_eq!(path.len(), count - 1);
            prop_assert!(!path.contains(&winner));
        }
        prop_assert!(tree.is_fully_expanded());
    }
}
