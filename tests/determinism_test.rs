mod common;

use common::*;
use hexarch::classification::Classifier;
use hexarch::config::ClassificationConfig;
use hexarch::graph::{FieldNode, InMemoryTypeGraph, TypeDecl, TypeGraphQuery};
use hexarch::roles::{FieldRole, FieldRoleDetector};
use hexarch::{ElementKind, ParallelConfig};
use proptest::prelude::*;
use std::collections::HashMap;

#[test]
fn test_parallel_and_sequential_analysis_agree() {
    let graph = order_graph();
    let parallel = analyze(&graph);
    let sequential = analyze_with(&graph, sequential_config());

    assert_eq!(
        serde_json::to_string(&parallel.registry).unwrap(),
        serde_json::to_string(&sequential.registry).unwrap()
    );
    assert_eq!(parallel.relationships.edge_set(), sequential.relationships.edge_set());
    assert_eq!(parallel.violations, sequential.violations);
    assert_eq!(parallel.metrics, sequential.metrics);
}

#[test]
fn test_classifying_twice_is_identical() {
    let graph = order_graph();
    let classifier = Classifier::default();
    let config = ClassificationConfig::default();
    let first = classifier.classify_all(&graph, &config, &ParallelConfig::sequential());
    let second = classifier.classify_all(&graph, &config, &ParallelConfig::default());
    assert_eq!(
        first.iter().collect::<Vec<_>>(),
        second.iter().collect::<Vec<_>>()
    );
}

fn type_name() -> impl Strategy<Value = String> {
    ("[a-z]{1,6}", "[A-Z][a-z]{1,8}").prop_map(|(pkg, name)| format!("{pkg}.{name}"))
}

proptest! {
    #[test]
    fn prop_field_named_id_is_identity(declaring in type_name(), target in type_name()) {
        let graph = InMemoryTypeGraph::builder()
            .with_type(TypeDecl::class(&declaring).field("id", target.as_str()))
            .build();
        let kinds: HashMap<String, ElementKind> = HashMap::new();
        let node = graph.type_by_qualified_name(&declaring).unwrap();
        let field: &FieldNode = &graph.fields_of(node)[0];
        let roles = FieldRoleDetector::new(&graph, &kinds).detect(field);
        prop_assert!(roles.contains(&FieldRole::Identity));
    }
}

#[test]
fn test_foreign_key_is_not_identity() {
    let graph = InMemoryTypeGraph::builder()
        .with_type(TypeDecl::class("shop.OrderLine").field("orderId", "shop.OrderId"))
        .build();
    let kinds: HashMap<String, ElementKind> = HashMap::new();
    let node = graph.type_by_qualified_name("shop.OrderLine").unwrap();
    let roles = FieldRoleDetector::new(&graph, &kinds).detect(&graph.fields_of(node)[0]);
    assert!(!roles.contains(&FieldRole::Identity));
}
