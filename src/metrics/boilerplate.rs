use super::{DependencyGraph, Metric, MetricCalculator, MetricThreshold, MetricUnit};
use crate::model::{ArchType, TypeRegistry};

/// Percentage of domain-type methods that are accessors, object methods,
/// factories or lifecycle hooks
pub struct BoilerplateRatioCalculator {
    max_ratio: f64,
}

impl BoilerplateRatioCalculator {
    pub fn new(max_ratio: f64) -> Self {
        Self { max_ratio }
    }

    /// Aggregate roots, entities, value objects and domain services with a
    /// hand-written body; interfaces and records are skipped
    pub fn ratio(registry: &TypeRegistry) -> f64 {
        let methods = registry
            .all()
            .filter(|arch| {
                matches!(
                    arch,
                    ArchType::AggregateRoot(_)
                        | ArchType::Entity(_)
                        | ArchType::ValueObject(_)
                        | ArchType::DomainService(_)
                )
            })
            .map(ArchType::structure)
            .filter(|s| !s.is_interface() && !s.is_record())
            .flat_map(|s| s.methods.iter());

        let (total, boilerplate) = methods.fold((0usize, 0usize), |(total, hits), m| {
            let is_boilerplate = m.roles.iter().any(|r| r.is_boilerplate());
            (total + 1, hits + usize::from(is_boilerplate))
        });
        if total == 0 {
            return 0.0;
        }
        boilerplate as f64 / total as f64 * 100.0
    }
}

impl MetricCalculator for BoilerplateRatioCalculator {
    fn name(&self) -> &'static str {
        "code.boilerplate.ratio"
    }

    fn calculate(&self, registry: &TypeRegistry, _deps: &DependencyGraph) -> Metric {
        Metric::new(self.name(), Self::ratio(registry), MetricUnit::Percent)
            .with_threshold(MetricThreshold::max(self.max_ratio))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::ElementKind;
    use crate::graph::{InMemoryTypeGraph, MethodNode, TypeDecl};
    use crate::model::builders::test_support::results;
    use crate::model::ModelBuilder;

    #[test]
    fn test_ratio_over_domain_classes() {
        let graph = InMemoryTypeGraph::builder()
            .with_type(
                TypeDecl::class("s.Order")
                    .field("id", "long")
                    .method(MethodNode::new("getId", "long"))
                    .method(MethodNode::new("setId", "void").param("id", "long"))
                    .method(MethodNode::new("toString", "java.lang.String"))
                    .method(MethodNode::new("cancel", "void").param("reason", "java.lang.String")),
            )
            // records and non-domain types are not counted
            .with_type(
                TypeDecl::record("s.Money")
                    .field("amount", "long")
                    .method(MethodNode::new("getAmount", "long")),
            )
            .with_type(
                TypeDecl::class("s.OrderService")
                    .method(MethodNode::new("getAll", "java.util.List")),
            )
            .build();
        let classes = results(&[
            ("s.Order", ElementKind::AggregateRoot),
            ("s.Money", ElementKind::ValueObject),
            ("s.OrderService", ElementKind::ApplicationService),
        ]);
        let registry = ModelBuilder::default().build(&graph, &classes).unwrap();

        let metric = BoilerplateRatioCalculator::new(50.0)
            .calculate(&registry, &DependencyGraph::default());
        assert_eq!(metric.value, 75.0);
        assert!(metric.is_breached());
    }

    #[test]
    fn test_no_methods_is_zero() {
        assert_eq!(BoilerplateRatioCalculator::ratio(&TypeRegistry::default()), 0.0);
    }
}
