use tracing::debug;

use super::graph::{RelationType, RelationshipGraph};
use crate::model::{
    AggregateRoot, ArchType, DomainService, DrivenPort, Field, TypeId, TypeRegistry,
};
use crate::roles::FieldRole;

/// Derives the relationship graph from a frozen registry.
///
/// Building is a pure function of the registry: running it twice yields the
/// same edge set.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelationshipGraphBuilder;

impl RelationshipGraphBuilder {
    pub fn build(&self, registry: &TypeRegistry) -> RelationshipGraph {
        let mut graph = RelationshipGraph::new();
        for arch in registry.all() {
            match arch {
                ArchType::AggregateRoot(root) => add_aggregate_edges(root, &mut graph),
                ArchType::DrivenPort(port) => add_persistence_edge(port, registry, &mut graph),
                ArchType::DomainService(service) => {
                    add_injection_edges(service, registry, &mut graph)
                }
                ArchType::Entity(_)
                | ArchType::ValueObject(_)
                | ArchType::Identifier(_)
                | ArchType::DomainEvent(_)
                | ArchType::DrivingPort(_)
                | ArchType::ApplicationService(_)
                | ArchType::CommandHandler(_)
                | ArchType::QueryHandler(_)
                | ArchType::Unclassified(_) => {}
            }
            add_inheritance_edges(arch, registry, &mut graph);
            add_field_edges(arch, registry, &mut graph);
        }
        debug!(edges = graph.len(), "Relationship graph built");
        graph
    }
}

fn add_aggregate_edges(root: &AggregateRoot, graph: &mut RelationshipGraph) {
    for entity in &root.entities {
        graph.add(root.id.clone(), entity.clone(), RelationType::Contains);
    }
    for value_object in &root.value_objects {
        graph.add(root.id.clone(), value_object.clone(), RelationType::Contains);
    }
    for event in &root.domain_events {
        graph.add(root.id.clone(), event.clone(), RelationType::Emits);
    }
}

fn add_persistence_edge(port: &DrivenPort, registry: &TypeRegistry, graph: &mut RelationshipGraph) {
    if !port.is_repository() {
        return;
    }
    if let Some(aggregate) = port.managed_aggregate.as_ref().filter(|a| registry.contains(a)) {
        graph.add(port.id.clone(), aggregate.clone(), RelationType::Persists);
    }
}

fn add_injection_edges(
    service: &DomainService,
    registry: &TypeRegistry,
    graph: &mut RelationshipGraph,
) {
    for port in service.injected_ports.iter().filter(|p| registry.contains(p)) {
        graph.add(service.id.clone(), port.clone(), RelationType::DependsOn);
    }
}

fn add_inheritance_edges(arch: &ArchType, registry: &TypeRegistry, graph: &mut RelationshipGraph) {
    let structure = arch.structure();
    if let Some(super_type) = &structure.super_type {
        let target = TypeId::from(super_type);
        if registry.contains(&target) {
            graph.add(arch.id().clone(), target, RelationType::Extends);
        }
    }
    for interface in &structure.interfaces {
        let target = TypeId::from(interface);
        if registry.contains(&target) {
            graph.add(arch.id().clone(), target, RelationType::Implements);
        }
    }
}

/// Registered element type for collections, else the registered field type
fn field_target(field: &Field, registry: &TypeRegistry) -> Option<TypeId> {
    field
        .element_type
        .as_ref()
        .map(TypeId::from)
        .filter(|id| registry.contains(id))
        .or_else(|| Some(TypeId::from(&field.type_ref)).filter(|id| registry.contains(id)))
}

/// Aggregate whose declared or effective identity type is `identifier`
fn aggregate_for_identifier(identifier: &TypeId, registry: &TypeRegistry) -> Option<TypeId> {
    registry
        .all_of::<AggregateRoot>()
        .find(|root| root.is_identified_by(identifier))
        .map(|root| root.id.clone())
}

fn add_field_edges(arch: &ArchType, registry: &TypeRegistry, graph: &mut RelationshipGraph) {
    let source = arch.id();
    for field in &arch.structure().fields {
        let Some(target) = field_target(field, registry) else {
            continue;
        };
        if &target == source {
            continue;
        }
        let target_arch = registry.get(&target);

        if field.has_role(FieldRole::Identity) {
            graph.add(source.clone(), target, RelationType::Owns);
        } else if field.has_role(FieldRole::AggregateReference) {
            let aggregate = match target_arch {
                Some(ArchType::AggregateRoot(root)) => Some(root.id.clone()),
                _ => aggregate_for_identifier(&target, registry),
            };
            match aggregate {
                Some(aggregate) => graph.add(source.clone(), aggregate, RelationType::References),
                None => graph.add(source.clone(), target, RelationType::DependsOn),
            };
        } else if field.has_role(FieldRole::Embedded) {
            if let Some(ArchType::Identifier(_)) = target_arch {
                let owner = aggregate_for_identifier(&target, registry);
                if let Some(owner) = owner.filter(|o| o != source) {
                    graph.add(source.clone(), owner, RelationType::References);
                }
            }
            graph.add(source.clone(), target, RelationType::Contains);
        } else if field.has_role(FieldRole::Collection) {
            let relation = match target_arch {
                Some(ArchType::Entity(_) | ArchType::ValueObject(_) | ArchType::Identifier(_)) => {
                    RelationType::Contains
                }
                _ => RelationType::DependsOn,
            };
            graph.add(source.clone(), target, relation);
        } else if !field.has_role(FieldRole::Audit) && !field.has_role(FieldRole::Technical) {
            graph.add(source.clone(), target, RelationType::DependsOn);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::ElementKind;
    use crate::graph::{InMemoryTypeGraph, TypeDecl, TypeRef};
    use crate::model::builders::test_support::results;
    use crate::model::ModelBuilder;
    use crate::relationships::Relationship;
    use pretty_assertions::assert_eq;

    fn registry() -> TypeRegistry {
        let graph = InMemoryTypeGraph::builder()
            .with_type(
                TypeDecl::class("com.acme.Order")
                    .field("orderId", "com.acme.OrderId")
                    .field("customer", "com.acme.Customer")
                    .field(
                        "lines",
                        TypeRef::generic("java.util.List", vec!["com.acme.OrderLine".into()]),
                    )
                    .field("createdAt", "java.time.Instant"),
            )
            .with_type(TypeDecl::record("com.acme.OrderId").field("value", "java.util.UUID"))
            .with_type(
                TypeDecl::class("com.acme.OrderLine")
                    .field("orderLineId", "long")
                    .field("productId", "com.acme.ProductId"),
            )
            .with_type(TypeDecl::record("com.acme.ProductId").field("value", "java.util.UUID"))
            .with_type(TypeDecl::class("com.acme.Customer").field("customerId", "long"))
            .build();
        let classes = results(&[
            ("com.acme.Order", ElementKind::AggregateRoot),
            ("com.acme.OrderId", ElementKind::Identifier),
            ("com.acme.OrderLine", ElementKind::Entity),
            ("com.acme.ProductId", ElementKind::Identifier),
            ("com.acme.Customer", ElementKind::AggregateRoot),
        ]);
        ModelBuilder::default().build(&graph, &classes).unwrap()
    }

    fn has(graph: &RelationshipGraph, source: &str, target: &str, relation: RelationType) -> bool {
        graph.has_relation(&TypeId::from(source), &TypeId::from(target), relation)
    }

    #[test]
    fn test_identity_owns_and_foreign_id_does_not() {
        let graph = RelationshipGraphBuilder.build(&registry());

        assert!(has(&graph, "com.acme.Order", "com.acme.OrderId", RelationType::Owns));
        assert!(has(&graph, "com.acme.Order", "com.acme.OrderLine", RelationType::Contains));
        assert!(has(&graph, "com.acme.Order", "com.acme.Customer", RelationType::References));
        assert!(has(&graph, "com.acme.OrderLine", "com.acme.ProductId", RelationType::Contains));
        assert!(!has(&graph, "com.acme.OrderLine", "com.acme.ProductId", RelationType::Owns));
        assert_eq!(graph.of_type(RelationType::Owns).count(), 1);
    }

    #[test]
    fn test_building_twice_yields_same_edge_set() {
        let registry = registry();
        let first = RelationshipGraphBuilder.build(&registry);
        let second = RelationshipGraphBuilder.build(&registry);
        assert_eq!(first.edge_set(), second.edge_set());
        assert_eq!(
            first.all().cloned().collect::<Vec<Relationship>>(),
            second.all().cloned().collect::<Vec<Relationship>>()
        );
    }
}
