mod common;

use common::*;
use hexarch::{AnalysisConfig, ConstraintId, Error, Severity};
use indoc::indoc;

#[test]
fn test_severity_override_from_toml_applies_to_analysis() {
    let config = AnalysisConfig::from_toml_str(indoc! {r#"
        [parallel]
        enabled = false

        [constraints]
        disabled = ["ddd:aggregate-repository"]

        [constraints.severity_overrides]
        "ddd:aggregate-cycle" = "CRITICAL"
    "#})
    .unwrap();

    let report = analyze_with(&cyclic_aggregates(), config);

    assert!(!report.is_blocking());
    assert!(report
        .violations
        .iter()
        .all(|v| v.constraint_id != ConstraintId::AggregateRepository));
    let cycle = report
        .violations
        .iter()
        .find(|v| v.constraint_id == ConstraintId::AggregateCycle)
        .unwrap();
    assert_eq!(cycle.severity, Severity::Critical);
}

#[test]
fn test_metric_thresholds_from_toml() {
    let config = AnalysisConfig::from_toml_str(indoc! {r#"
        [metrics]
        min_aggregate_boundary = 100.0
        max_propagation_cost = 1.0
    "#})
    .unwrap();

    let report = analyze_with(&order_graph(), config);
    let cost = report.metric("propagation.cost").unwrap();
    assert!(cost.is_breached());
    assert!(!report.metric("aggregate.boundary").unwrap().is_breached());
}

#[test]
fn test_unknown_constraint_is_rejected() {
    let err = AnalysisConfig::from_toml_str(indoc! {r#"
        [constraints]
        disabled = ["ddd:no-such-rule"]
    "#})
    .unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));
}

#[test]
fn test_malformed_toml_is_a_parse_error() {
    let err = AnalysisConfig::from_toml_str("[metrics\nmax_dependency_depth = ").unwrap_err();
    assert!(matches!(err, Error::ConfigParse(_)));
}
