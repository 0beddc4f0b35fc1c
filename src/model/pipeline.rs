//! Orchestrates per-type builders into a frozen [`TypeRegistry`].

use rayon::prelude::*;
use tracing::{debug, warn};

use super::arch::{ArchType, UnclassifiedCategory};
use super::builders::{
    AggregateRootBuilder, ApplicationTypeBuilder, ArchTypeBuilder, DomainEventBuilder,
    DomainServiceBuilder, DrivenPortBuilder, DrivingPortBuilder, EntityBuilder,
    IdentifierBuilder, UnclassifiedTypeBuilder, ValueObjectBuilder,
};
use super::context::BuilderContext;
use super::registry::TypeRegistry;
use super::types::ClassificationTrace;
use crate::classification::{ClassificationResult, ClassificationResults, ElementKind};
use crate::config::{ClassificationConfig, ParallelConfig};
use crate::errors::Result;
use crate::graph::{TypeGraphQuery, TypeNode};
use crate::observability::{current_phase, with_phase};

/// Why a node enters the registry
#[derive(Debug, Clone, Copy)]
enum Admission<'r> {
    Classified(&'r ClassificationResult),
    /// Skipped by the classifier but carries a generation marker
    Generated,
}

pub struct ModelBuilder {
    classification: ClassificationConfig,
    parallel: ParallelConfig,
}

impl Default for ModelBuilder {
    fn default() -> Self {
        Self::new(ClassificationConfig::default(), ParallelConfig::default())
    }
}

impl ModelBuilder {
    pub fn new(classification: ClassificationConfig, parallel: ParallelConfig) -> Self {
        Self {
            classification,
            parallel,
        }
    }

    fn is_generated(&self, node: &TypeNode) -> bool {
        node.annotations
            .iter()
            .any(|a| self.classification.is_generated_marker(&a.qualified_name))
    }

    fn admitted<'g, 'r>(
        &self,
        graph: &'g dyn TypeGraphQuery,
        classifications: &'r ClassificationResults,
    ) -> Vec<(&'g TypeNode, Admission<'r>)> {
        let mut dropped = 0usize;
        let admitted = graph
            .all_types()
            .iter()
            .filter_map(|node| match classifications.get(&node.qualified_name) {
                Some(result) => Some((node, Admission::Classified(result))),
                None if self.is_generated(node) => Some((node, Admission::Generated)),
                None => {
                    dropped += 1;
                    None
                }
            })
            .collect();
        if dropped > 0 {
            debug!(dropped, "Dropped excluded types without generation marker");
        }
        admitted
    }

    /// Build every admitted type, then freeze the registry.
    ///
    /// Builders read only the graph and the classification results, so the
    /// parallel path yields exactly the registry of the sequential fold.
    pub fn build(
        &self,
        graph: &dyn TypeGraphQuery,
        classifications: &ClassificationResults,
    ) -> Result<TypeRegistry> {
        let admitted = self.admitted(graph, classifications);
        let mut registry = TypeRegistry::builder();

        if self.parallel.enabled {
            let ctx = BuilderContext::new(graph, classifications);
            let phase = current_phase();
            let built = admitted
                .par_iter()
                .map(|(node, admission)| {
                    with_phase(phase, || self.build_one(node, *admission, &ctx))
                })
                .collect::<Result<Vec<_>>>()?;
            for arch in built {
                registry.add(arch)?;
            }
        } else {
            let ctx = BuilderContext::new(graph, classifications);
            for (node, admission) in admitted {
                registry.add(self.build_one(node, admission, &ctx)?)?;
            }
        }

        let registry = registry.build();
        debug!(types = registry.len(), "Type registry frozen");
        Ok(registry)
    }

    fn build_one(
        &self,
        node: &TypeNode,
        admission: Admission<'_>,
        ctx: &BuilderContext<'_>,
    ) -> Result<ArchType> {
        let classification = match admission {
            Admission::Classified(result) => result,
            Admission::Generated => {
                return Ok(UnclassifiedTypeBuilder::with_category(
                    node,
                    ClassificationTrace::unclassified("Excluded from classification"),
                    UnclassifiedCategory::OutOfScope,
                    "Generated type outside the classified packages",
                    ctx,
                ));
            }
        };

        if classification.has_conflicts() {
            return UnclassifiedTypeBuilder.build(node, classification, ctx);
        }
        if classification.kind == ElementKind::Unclassified && self.is_generated(node) {
            return Ok(UnclassifiedTypeBuilder::with_category(
                node,
                ClassificationTrace::from(classification),
                UnclassifiedCategory::OutOfScope,
                "Generated type without architectural role",
                ctx,
            ));
        }

        let builder: &dyn ArchTypeBuilder = match classification.kind {
            ElementKind::AggregateRoot => &AggregateRootBuilder,
            ElementKind::Entity => &EntityBuilder,
            ElementKind::ValueObject => &ValueObjectBuilder,
            ElementKind::Identifier => &IdentifierBuilder,
            ElementKind::DomainEvent => &DomainEventBuilder,
            ElementKind::DomainService => &DomainServiceBuilder,
            ElementKind::DrivingPort => &DrivingPortBuilder,
            ElementKind::DrivenPort(_) => &DrivenPortBuilder,
            ElementKind::ApplicationService
            | ElementKind::CommandHandler
            | ElementKind::QueryHandler => &ApplicationTypeBuilder,
            ElementKind::Unclassified => &UnclassifiedTypeBuilder,
        };

        match builder.build(node, classification, ctx) {
            Err(err) if err.is_recoverable() => {
                warn!(
                    type_name = %node.qualified_name,
                    error = %err,
                    "Falling back to unclassified type"
                );
                Ok(UnclassifiedTypeBuilder::with_category(
                    node,
                    ClassificationTrace::from(classification),
                    UnclassifiedCategory::Ambiguous,
                    err.to_string(),
                    ctx,
                ))
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::Classifier;
    use crate::graph::{InMemoryTypeGraph, TypeDecl, TypeRef};
    use crate::model::arch::{AggregateRoot, UnclassifiedType};
    use crate::model::builders::test_support::results;
    use crate::model::types::TypeId;
    use pretty_assertions::assert_eq;

    fn order_graph() -> InMemoryTypeGraph {
        InMemoryTypeGraph::builder()
            .with_type(
                TypeDecl::class("com.acme.order.Order")
                    .field("id", "com.acme.order.OrderId")
                    .field(
                        "lines",
                        TypeRef::generic("java.util.List", vec!["com.acme.order.OrderLine".into()]),
                    ),
            )
            .with_type(TypeDecl::record("com.acme.order.OrderId").field("value", "java.util.UUID"))
            .with_type(
                TypeDecl::class("com.acme.order.OrderLine")
                    .field("id", "java.lang.Long")
                    .field("quantity", "int"),
            )
            .with_type(
                TypeDecl::interface("com.acme.order.OrderRepository")
                    .method(
                        crate::graph::MethodNode::new("save", "void")
                            .param("order", "com.acme.order.Order"),
                    ),
            )
            .with_type(
                TypeDecl::class("com.acme.generated.OrderMapperImpl")
                    .annotated("javax.annotation.processing.Generated"),
            )
            .with_type(TypeDecl::class("com.acme.generated.Plain"))
            .build()
    }

    fn config() -> ClassificationConfig {
        ClassificationConfig {
            excluded_packages: vec!["com.acme.generated".into()],
            ..Default::default()
        }
    }

    #[test]
    fn test_generated_types_are_admitted_out_of_scope() {
        let graph = order_graph();
        let classes =
            Classifier::default().classify_all(&graph, &config(), &ParallelConfig::sequential());
        let registry = ModelBuilder::new(config(), ParallelConfig::sequential())
            .build(&graph, &classes)
            .unwrap();

        let mapper = registry
            .get_as::<UnclassifiedType>(&TypeId::from("com.acme.generated.OrderMapperImpl"))
            .unwrap();
        assert_eq!(mapper.category, UnclassifiedCategory::OutOfScope);
        assert!(!registry.contains(&TypeId::from("com.acme.generated.Plain")));
    }

    #[test]
    fn test_aggregate_without_identity_becomes_ambiguous() {
        let graph = InMemoryTypeGraph::builder()
            .with_type(TypeDecl::class("com.acme.Cart").field("items", "int"))
            .build();
        let classes = results(&[("com.acme.Cart", ElementKind::AggregateRoot)]);
        let registry = ModelBuilder::default().build(&graph, &classes).unwrap();

        let cart = registry
            .get_as::<UnclassifiedType>(&TypeId::from("com.acme.Cart"))
            .unwrap();
        assert_eq!(cart.category, UnclassifiedCategory::Ambiguous);
        assert_eq!(cart.reason, "AggregateRoot 'com.acme.Cart' must have an identity field");
        assert_eq!(cart.trace.kind, ElementKind::AggregateRoot);
    }

    #[test]
    fn test_sequential_and_parallel_registries_match() {
        let graph = order_graph();
        let classes =
            Classifier::default().classify_all(&graph, &config(), &ParallelConfig::sequential());
        let sequential = ModelBuilder::new(config(), ParallelConfig::sequential())
            .build(&graph, &classes)
            .unwrap();
        let parallel = ModelBuilder::new(config(), ParallelConfig::default())
            .build(&graph, &classes)
            .unwrap();

        assert_eq!(sequential.all().collect::<Vec<_>>(), parallel.all().collect::<Vec<_>>());
        let order = sequential
            .get_as::<AggregateRoot>(&TypeId::from("com.acme.order.Order"))
            .unwrap();
        assert_eq!(order.driven_port, Some(TypeId::from("com.acme.order.OrderRepository")));
    }
}
