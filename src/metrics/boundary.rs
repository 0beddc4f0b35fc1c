use std::collections::BTreeSet;

use super::{DependencyGraph, Metric, MetricCalculator, MetricThreshold, MetricUnit};
use crate::model::{AggregateRoot, TypeRegistry};

/// Root, entities and value objects of one aggregate
pub fn aggregate_members(root: &AggregateRoot) -> BTreeSet<&str> {
    std::iter::once(&root.id)
        .chain(root.entities.iter())
        .chain(root.value_objects.iter())
        .map(|id| id.qualified_name())
        .collect()
}

/// Percentage of owned entities reached only from inside their aggregate
pub struct AggregateBoundaryCalculator {
    min_encapsulation: f64,
}

impl AggregateBoundaryCalculator {
    pub fn new(min_encapsulation: f64) -> Self {
        Self { min_encapsulation }
    }

    pub fn encapsulation(registry: &TypeRegistry, deps: &DependencyGraph) -> f64 {
        let mut owned = 0usize;
        let mut encapsulated = 0usize;
        for root in registry.all_of::<AggregateRoot>() {
            let inside = aggregate_members(root);
            for entity in &root.entities {
                owned += 1;
                let leaked = deps.edges().any(|(from, to)| {
                    to == entity.qualified_name() && !inside.contains(from)
                });
                if !leaked {
                    encapsulated += 1;
                }
            }
        }
        if owned == 0 {
            return 100.0;
        }
        encapsulated as f64 / owned as f64 * 100.0
    }
}

impl MetricCalculator for AggregateBoundaryCalculator {
    fn name(&self) -> &'static str {
        "aggregate.boundary"
    }

    fn calculate(&self, registry: &TypeRegistry, deps: &DependencyGraph) -> Metric {
        Metric::new(self.name(), Self::encapsulation(registry, deps), MetricUnit::Percent)
            .with_threshold(MetricThreshold::min(self.min_encapsulation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::ElementKind;
    use crate::graph::{InMemoryTypeGraph, TypeDecl, TypeRef};
    use crate::metrics::test_support::deps;
    use crate::model::builders::test_support::results;
    use crate::model::ModelBuilder;

    fn registry() -> TypeRegistry {
        let graph = InMemoryTypeGraph::builder()
            .with_type(
                TypeDecl::class("o.Order")
                    .field("id", "long")
                    .field("lines", TypeRef::generic("java.util.List", vec!["o.OrderLine".into()]))
                    .field("note", "o.Note"),
            )
            .with_type(TypeDecl::class("o.OrderLine").field("id", "long"))
            .with_type(TypeDecl::class("o.Note").field("id", "long"))
            .build();
        let classes = results(&[
            ("o.Order", ElementKind::AggregateRoot),
            ("o.OrderLine", ElementKind::Entity),
            ("o.Note", ElementKind::Entity),
        ]);
        ModelBuilder::default().build(&graph, &classes).unwrap()
    }

    #[test]
    fn test_no_aggregates_is_fully_encapsulated() {
        let metric = AggregateBoundaryCalculator::new(80.0)
            .calculate(&TypeRegistry::default(), &DependencyGraph::default());
        assert_eq!(metric.value, 100.0);
        assert!(!metric.is_breached());
    }

    #[test]
    fn test_outside_dependency_leaks_entity() {
        let g = DependencyGraph::from_dependencies(&deps(&[
            ("o.Order", vec!["o.OrderLine", "o.Note"]),
            ("o.OrderLine", vec![]),
            ("o.Note", vec![]),
            ("report.Printer", vec!["o.Note"]),
        ]));
        let metric = AggregateBoundaryCalculator::new(80.0).calculate(&registry(), &g);
        assert_eq!(metric.value, 50.0);
        assert!(metric.is_breached());
    }
}
