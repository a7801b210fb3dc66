//! Property tests: message passing agrees with brute-force enumeration.

use proptest::prelude::*;

use pearl_core::constants::POSTERIOR_SUM_TOLERANCE;
use pearl_core::errors::{InferenceError, PearlError};
use pearl_inference::Network;
use test_fixtures::{max_abs_diff, random_binary_tree, TreeBlueprint};

/// Parent choices and row probabilities for a random tree of 2..=8 nodes.
fn tree_strategy() -> impl Strategy<Value = TreeBlueprint> {
    (1usize..8).prop_flat_map(|edges| {
        (
            prop::collection::vec(any::<usize>(), edges),
            prop::collection::vec(0.05f64..0.95, 2 * edges + 1),
        )
            .prop_map(|(choices, probs)| random_binary_tree(&choices, &probs))
    })
}

fn evidence_strategy() -> impl Strategy<Value = Vec<(usize, usize)>> {
    prop::collection::vec((any::<usize>(), 0usize..2), 0..4)
}

fn posteriors(network: &Network) -> Vec<Vec<f64>> {
    (0..network.node_count())
        .map(|n| network.posterior(n).unwrap().to_vec())
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn posteriors_match_enumeration(blueprint in tree_strategy(), raw in evidence_strategy()) {
        let n = blueprint.node_count();
        let mut network = blueprint.start();
        let prior = blueprint.brute_force(&[]).unwrap();
        prop_assert!(max_abs_diff(&posteriors(&network), &prior) < 1e-9);

        let mut applied: Vec<(usize, usize)> = Vec::new();
        for (node, state) in raw {
            let node = node % n;
            if applied.iter().any(|&(seen, _)| seen == node) {
                continue;
            }
            applied.push((node, state));
            network.observe(node, state).unwrap();

            // Row probabilities are strictly inside (0, 1): no evidence is impossible.
            let expected = blueprint.brute_force(&applied).unwrap();
            prop_assert!(max_abs_diff(&posteriors(&network), &expected) < 1e-9);
        }
    }

    #[test]
    fn every_posterior_is_normalized(blueprint in tree_strategy(), raw in evidence_strategy()) {
        let n = blueprint.node_count();
        let mut network = blueprint.start();
        for (node, state) in raw {
            let result = network.observe(node % n, state);
            let accepted = matches!(
                result,
                Ok(_) | Err(PearlError::Inference(InferenceError::ConflictingEvidence { .. }))
            );
            prop_assert!(accepted, "unexpected observe result: {:?}", result);
            for node in 0..n {
                let sum: f64 = network.posterior(node).unwrap().iter().sum();
                prop_assert!((sum - 1.0).abs() < POSTERIOR_SUM_TOLERANCE);
            }
        }
    }

    #[test]
    fn observation_order_does_not_matter(blueprint in tree_strategy(), a in any::<usize>(), b in any::<usize>()) {
        let n = blueprint.node_count();
        let (a, b) = (a % n, b % n);
        prop_assume!(a != b);

        let mut forward = blueprint.start();
        forward.observe(a, 1).unwrap();
        forward.observe(b, 0).unwrap();

        let mut backward = blueprint.start();
        backward.observe(b, 0).unwrap();
        backward.observe(a, 1).unwrap();

        prop_assert!(max_abs_diff(&posteriors(&forward), &posteriors(&backward)) < 1e-9);
    }

    #[test]
    fn each_observation_updates_a_node_at_most_once(blueprint in tree_strategy(), node in any::<usize>()) {
        let n = blueprint.node_count();
        let mut network = blueprint.start();
        let report = network.observe(node % n, 1).unwrap();
        for target in 0..n {
            prop_assert!(report.update_count(target) <= 1);
        }
        prop_assert_eq!(report.messages.len() + 1, report.updated.len());
    }
}
