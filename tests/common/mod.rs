// Shared fixtures for hexarch integration tests
#![allow(dead_code)]

use hexarch::graph::{InMemoryTypeGraph, MethodNode, ParameterNode, TypeDecl, TypeRef};
use hexarch::{AnalysisConfig, ArchitectureAnalyzer, ArchitectureReport, ParallelConfig};

pub const AGGREGATE_ROOT: &str = "org.jmolecules.ddd.annotation.AggregateRoot";
pub const ENTITY: &str = "org.jmolecules.ddd.annotation.Entity";
pub const IDENTIFIER: &str = "org.jmolecules.ddd.types.Identifier";
pub const DOMAIN_EVENT: &str = "org.jmolecules.event.annotation.DomainEvent";
pub const REPOSITORY: &str = "org.jmolecules.ddd.annotation.Repository";

fn list_of(element: &str) -> TypeRef {
    TypeRef::generic("java.util.List", vec![TypeRef::of(element)])
}

/// Order aggregate with identifier, line entity, event, repository and a
/// JPA adapter implementing the repository
pub fn order_graph() -> InMemoryTypeGraph {
    InMemoryTypeGraph::builder()
        .with_type(
            TypeDecl::class("shop.order.Order")
                .annotated(AGGREGATE_ROOT)
                .final_field("orderId", "shop.order.OrderId")
                .field("lines", list_of("shop.order.OrderLine"))
                .method(MethodNode::new("place", "shop.order.OrderPlaced"))
                .method(MethodNode::new("validateLines", "void")),
        )
        .with_type(
            TypeDecl::record("shop.order.OrderId")
                .implements(IDENTIFIER)
                .field("value", "java.util.UUID"),
        )
        .with_type(
            TypeDecl::class("shop.order.OrderLine")
                .annotated(ENTITY)
                .final_field("id", "long")
                .final_field("productId", "shop.order.ProductId")
                .final_field("quantity", "int"),
        )
        .with_type(
            TypeDecl::record("shop.order.ProductId")
                .implements(IDENTIFIER)
                .field("value", "java.util.UUID"),
        )
        .with_type(
            TypeDecl::record("shop.order.OrderPlaced")
                .annotated(DOMAIN_EVENT)
                .field("orderId", "shop.order.OrderId")
                .field("occurredAt", "java.time.Instant"),
        )
        .with_type(
            TypeDecl::interface("shop.order.OrderRepository")
                .annotated(REPOSITORY)
                .method(MethodNode::new("save", "void").param("order", "shop.order.Order"))
                .method(
                    MethodNode::new(
                        "findById",
                        TypeRef::generic(
                            "java.util.Optional",
                            vec![TypeRef::of("shop.order.Order")],
                        ),
                    )
                    .param("id", "shop.order.OrderId"),
                ),
        )
        .with_type(
            TypeDecl::class("shop.infrastructure.JpaOrderRepository")
                .implements("shop.order.OrderRepository")
                .constructor(vec![ParameterNode::new(
                    "entityManager",
                    "jakarta.persistence.EntityManager",
                )]),
        )
        .build()
}

/// Two aggregate roots depending on each other
pub fn cyclic_aggregates() -> InMemoryTypeGraph {
    InMemoryTypeGraph::builder()
        .with_type(
            TypeDecl::class("shop.a.A")
                .annotated(AGGREGATE_ROOT)
                .final_field("id", "long"),
        )
        .with_type(
            TypeDecl::class("shop.b.B")
                .annotated(AGGREGATE_ROOT)
                .final_field("id", "long"),
        )
        .depends_on("shop.a.A", "shop.b.B")
        .depends_on("shop.b.B", "shop.a.A")
        .build()
}

pub fn sequential_config() -> AnalysisConfig {
    AnalysisConfig {
        parallel: ParallelConfig::sequential(),
        ..Default::default()
    }
}

pub fn analyze(graph: &InMemoryTypeGraph) -> ArchitectureReport {
    ArchitectureAnalyzer::default()
        .analyze(graph, graph)
        .expect("analysis should succeed")
}

pub fn analyze_with(graph: &InMemoryTypeGraph, config: AnalysisConfig) -> ArchitectureReport {
    ArchitectureAnalyzer::new(config)
        .analyze(graph, graph)
        .expect("analysis should succeed")
}
