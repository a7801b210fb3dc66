use pearl_core::config::ObservabilityConfig;
use pearl_core::models::{PropagationMessage, PropagationReport};
use pearl_observability::tracing_setup::spans::names;
use pearl_observability::{init_tracing, init_tracing_with_filter, InferenceMetrics};

fn sample_report() -> PropagationReport {
    PropagationReport {
        messages: vec![
            PropagationMessage::upward(2, 1),
            PropagationMessage::upward(1, 0),
            PropagationMessage::downward(0, 3),
        ],
        updated: vec![2, 1, 0, 3],
    }
}

#[test]
fn metrics_fold_reports() {
    let mut metrics = InferenceMetrics::new();
    metrics.session_started(&PropagationReport::default());
    metrics.observed(&sample_report());
    metrics.duplicate_observed();

    assert_eq!(metrics.sessions_started, 1);
    assert_eq!(metrics.observations, 1);
    assert_eq!(metrics.duplicate_observations, 1);
    assert_eq!(metrics.lambda_messages, 2);
    assert_eq!(metrics.pi_messages, 1);
    assert_eq!(metrics.messages(), 3);
    assert_eq!(metrics.posterior_updates, 4);

    metrics.reset();
    assert_eq!(metrics, InferenceMetrics::default());
}

#[test]
fn metrics_snapshot_is_json_object() {
    let mut metrics = InferenceMetrics::new();
    metrics.conflict_observed();
    metrics.propagation_failed();
    let json = metrics.snapshot().unwrap();
    assert_eq!(json["conflicting_observations"], 1);
    assert_eq!(json["failed_propagations"], 1);
}

#[test]
fn span_macros_use_named_spans() {
    init_tracing_with_filter("pearl=debug");
    let span = pearl_observability::session_span!(4);
    let _guard = span.enter();
    let observe = pearl_observability::observe_span!(2_usize, 1_usize);
    if let Some(meta) = observe.metadata() {
        assert_eq!(meta.name(), names::OBSERVE);
    }
}

#[test]
fn init_tracing_is_idempotent() {
    let config = ObservabilityConfig::default();
    // Whichever call wins, later calls must not panic.
    let _ = init_tracing(&config);
    assert!(!init_tracing(&config));
}
