//! Network construction, CPT assignment, structural edits, and reporting.

use pearl_core::config::PearlConfig;
use pearl_core::errors::{ConfigurationError, PearlError};
use pearl_inference::Network;
use test_fixtures::{chain, skill_tree, two_node_chain, LINK_TABLE};

fn config_err<T: std::fmt::Debug>(result: Result<T, PearlError>) -> ConfigurationError {
    match result {
        Err(PearlError::Configuration(e)) => e,
        other => panic!("expected configuration error, got {other:?}"),
    }
}

#[test]
fn empty_network_is_rejected() {
    assert_eq!(config_err(Network::create(0)), ConfigurationError::EmptyNetwork);
}

#[test]
fn invalid_default_cardinality_is_rejected() {
    let mut config = PearlConfig::default();
    config.inference.default_cardinality = 1;
    assert_eq!(
        config_err(Network::with_config(3, config)),
        ConfigurationError::InvalidCardinality {
            node: 0,
            cardinality: 1
        }
    );
}

#[test]
fn expected_len_follows_structure() {
    let mut network = Network::create(3).unwrap();
    assert_eq!(network.expected_len(1).unwrap(), 2);
    network.add_link(0, 1).unwrap();
    assert_eq!(network.expected_len(1).unwrap(), 4);
    network.set_cardinality(0, 3).unwrap();
    assert_eq!(network.expected_len(1).unwrap(), 6);
    network.set_cardinality(1, 4).unwrap();
    assert_eq!(network.expected_len(1).unwrap(), 12);
    assert!(network.expected_len(3).is_err());
}

#[test]
fn probability_count_must_match() {
    let mut network = two_node_chain().build();
    assert_eq!(
        config_err(network.set_probabilities(1, &[0.5, 0.5])),
        ConfigurationError::ProbabilityCountMismatch {
            node: 1,
            expected: 4,
            actual: 2
        }
    );
    // The previous table survives a rejected assignment.
    assert_eq!(network.probabilities(1), Some(&LINK_TABLE[..]));
}

#[test]
fn probabilities_must_be_valid() {
    let mut network = Network::create(1).unwrap();
    assert_eq!(
        config_err(network.set_probabilities(0, &[1.5, -0.5])),
        ConfigurationError::InvalidProbability {
            node: 0,
            index: 0,
            value: 1.5
        }
    );
    assert!(matches!(
        config_err(network.set_probabilities(0, &[0.5, 0.4])),
        ConfigurationError::UnnormalizedRow { node: 0, row: 0, .. }
    ));
}

#[test]
fn row_normalization_can_be_disabled() {
    let mut config = PearlConfig::default();
    config.validation.require_normalized_rows = false;
    let mut network = Network::with_config(2, config).unwrap();
    network.add_link(0, 1).unwrap();
    network.set_probabilities(0, &[2.0 / 3.0, 1.0 / 3.0]).unwrap();
    network.set_probabilities(1, &[0.5, 0.4, 0.1, 0.2]).unwrap();
    network.start_session().unwrap();
    let sum: f64 = network.posterior(1).unwrap().iter().sum();
    assert!((sum - 1.0).abs() < 1e-12);
}

#[test]
fn session_requires_every_table() {
    let mut network = Network::create(2).unwrap();
    network.add_link(0, 1).unwrap();
    network.set_probabilities(0, &[0.5, 0.5]).unwrap();
    assert_eq!(
        config_err(network.start_session()),
        ConfigurationError::MissingProbabilities { node: 1 }
    );
    assert!(!network.is_session_active());
}

#[test]
fn session_requires_a_single_root() {
    let mut network = Network::create(3).unwrap();
    network.add_link(0, 1).unwrap();
    for node in 0..3 {
        let len = network.expected_len(node).unwrap();
        let values: Vec<f64> = (0..len).map(|_| 0.5).collect();
        network.set_probabilities(node, &values).unwrap();
    }
    assert_eq!(
        config_err(network.start_session()),
        ConfigurationError::MultipleRoots { roots: vec![0, 2] }
    );
}

#[test]
fn structural_errors_are_reported_at_insertion() {
    let mut network = chain(3).build();
    assert_eq!(
        config_err(network.add_link(2, 0)),
        ConfigurationError::CycleDetected {
            path: "0 -> 1 -> 2 -> 0".to_string()
        }
    );
    assert_eq!(
        config_err(network.add_link(0, 2)),
        ConfigurationError::MultipleParents {
            child: 2,
            existing_parent: 1,
            requested_parent: 0
        }
    );
    assert_eq!(
        config_err(network.add_link(1, 1)),
        ConfigurationError::SelfLoop { node: 1 }
    );
    assert_eq!(
        config_err(network.remove_link(0, 2)),
        ConfigurationError::EdgeNotFound {
            parent: 0,
            child: 2
        }
    );
    // Rejected edits leave tables and structure alone.
    assert!(network.probabilities(2).is_some());
    network.start_session().unwrap();
}

#[test]
fn structural_edit_ends_session_and_discards_child_table() {
    let mut network = chain(3).start();
    network.observe(2, 1).unwrap();

    network.remove_link(1, 2).unwrap();
    assert!(!network.is_session_active());
    assert!(network.probabilities(2).is_none());
    assert!(network.probabilities(1).is_some());

    network.add_link(0, 2).unwrap();
    network.set_probabilities(2, &LINK_TABLE).unwrap();
    network.start_session().unwrap();
    assert!(network.evidence().is_empty());
    // Siblings under a uniform root share the same marginal.
    assert_eq!(network.posterior(1).unwrap(), network.posterior(2).unwrap());
}

#[test]
fn cardinality_change_discards_dependent_tables() {
    let mut network = chain(3).build();
    network.set_cardinality(1, 3).unwrap();
    assert!(network.probabilities(0).is_some());
    assert!(network.probabilities(1).is_none());
    assert!(network.probabilities(2).is_none());

    // Same cardinality again changes nothing.
    network.set_probabilities(1, &[0.2, 0.3, 0.5, 0.1, 0.1, 0.8]).unwrap();
    network.set_cardinality(1, 3).unwrap();
    assert!(network.probabilities(1).is_some());

    assert!(matches!(
        config_err(network.set_cardinality(1, 1)),
        ConfigurationError::InvalidCardinality { node: 1, cardinality: 1 }
    ));
    assert!(matches!(
        config_err(network.set_cardinality(7, 2)),
        ConfigurationError::NodeOutOfRange { node: 7, .. }
    ));
}

#[test]
fn setting_probabilities_ends_session() {
    let mut network = two_node_chain().start();
    network.set_probabilities(0, &[0.5, 0.5]).unwrap();
    assert!(!network.is_session_active());
    assert!(network.snapshot().is_err());
}

#[test]
fn display_lists_structure_tables_and_evidence() {
    let mut network = two_node_chain().build();
    network.set_label(0, "cause").unwrap();
    let before = network.display();
    assert!(before.contains("Structure:\n0 (cause) -> 1\n1 ->\n"));
    assert!(before.contains("Node #0: 0.7000, 0.3000\n"));
    assert!(before.contains("Node #1: 0.9000, 0.1000 | 0.2000, 0.8000\n"));
    assert!(!before.contains("Posteriors:"));
    assert!(before.ends_with("Evidence: none\n"));

    network.start_session().unwrap();
    network.observe(1, 1).unwrap();
    let after = network.to_string();
    assert!(after.contains("Posteriors:\n"));
    assert!(after.contains("Node #0: 0.2258, 0.7742\n"));
    assert!(after.contains("Node #1: 0.0000, 1.0000 (observed 1)\n"));
    assert!(after.ends_with("Evidence: 1=1\n"));
}

#[test]
fn unassigned_tables_are_marked() {
    let network = Network::create(2).unwrap();
    assert!(network.display().contains("Node #1: <unassigned>\n"));
}

#[test]
fn snapshot_serializes_beliefs() {
    let mut network = skill_tree().start();
    network.observe(4, 1).unwrap();
    let snapshot = network.snapshot().unwrap();
    assert_eq!(snapshot.nodes.len(), 7);
    assert_eq!(snapshot.evidence, vec![4]);

    let json = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(json["nodes"][4]["label"], "borrowing");
    assert_eq!(json["nodes"][4]["observed"], 1);
    assert!(json["nodes"][0].get("observed").is_none());

    let back: pearl_core::models::BeliefSnapshot = serde_json::from_value(json).unwrap();
    assert_eq!(back, snapshot);
}

#[test]
fn metrics_track_session_activity() {
    let mut network = chain(4).start();
    network.observe(3, 1).unwrap();
    network.observe(3, 1).unwrap();

    let metrics = network.metrics();
    assert_eq!(metrics.sessions_started, 1);
    assert_eq!(metrics.observations, 1);
    assert_eq!(metrics.duplicate_observations, 1);
    assert_eq!(metrics.pi_messages, 3);
    assert_eq!(metrics.lambda_messages, 3);
    assert_eq!(metrics.messages(), 6);

    let json = metrics.snapshot().unwrap();
    assert_eq!(json["observations"], 1);
}

#[test]
fn networks_are_independent_values() {
    fn assert_send<T: Send>() {}
    assert_send::<Network>();

    let mut a = two_node_chain().start();
    let b = a.clone();
    a.observe(1, 0).unwrap();
    assert_eq!(b.posterior(1).unwrap(), &[0.69, 0.31]);
    assert!(b.evidence().is_empty());
}
