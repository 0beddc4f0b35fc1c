use std::collections::BTreeSet;

use super::{DependencyGraph, Metric, MetricCalculator, MetricThreshold, MetricUnit};
use crate::model::TypeRegistry;

/// Implementors of any registered port
fn adapters<'d>(registry: &TypeRegistry, deps: &'d DependencyGraph) -> BTreeSet<&'d str> {
    deps.implementors()
        .iter()
        .filter(|(port, _)| {
            registry
                .get_by_name(port)
                .is_some_and(|arch| arch.is_port())
        })
        .flat_map(|(_, implementors)| implementors.iter().map(String::as_str))
        .collect()
}

/// Share of adapter dependencies that do not point at another adapter
pub struct AdapterIndependenceCalculator {
    min_independence: f64,
}

impl AdapterIndependenceCalculator {
    pub fn new(min_independence: f64) -> Self {
        Self { min_independence }
    }

    pub fn independence(registry: &TypeRegistry, deps: &DependencyGraph) -> f64 {
        let adapters = adapters(registry, deps);
        let (total, inter) = deps
            .edges()
            .filter(|(from, _)| adapters.contains(from))
            .fold((0usize, 0usize), |(total, inter), (_, to)| {
                (total + 1, inter + usize::from(adapters.contains(to)))
            });
        if total == 0 {
            return 100.0;
        }
        (1.0 - inter as f64 / total as f64) * 100.0
    }
}

impl MetricCalculator for AdapterIndependenceCalculator {
    fn name(&self) -> &'static str {
        "adapter.independence"
    }

    fn calculate(&self, registry: &TypeRegistry, deps: &DependencyGraph) -> Metric {
        Metric::new(self.name(), Self::independence(registry, deps), MetricUnit::Percent)
            .with_threshold(MetricThreshold::min(self.min_independence))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::ElementKind;
    use crate::graph::{InMemoryTypeGraph, TypeDecl};
    use crate::metrics::test_support::deps;
    use crate::model::builders::test_support::results;
    use crate::model::ModelBuilder;

    fn registry() -> TypeRegistry {
        let graph = InMemoryTypeGraph::builder()
            .with_type(TypeDecl::interface("app.OrderRepository"))
            .with_type(TypeDecl::interface("app.PaymentGateway"))
            .build();
        let classes = results(&[
            ("app.OrderRepository", ElementKind::REPOSITORY),
            (
                "app.PaymentGateway",
                ElementKind::DrivenPort(crate::classification::DrivenPortKind::Gateway),
            ),
        ]);
        ModelBuilder::default().build(&graph, &classes).unwrap()
    }

    #[test]
    fn test_no_adapter_edges_is_fully_independent() {
        let g = DependencyGraph::from_dependencies(&deps(&[("infra.JpaOrders", vec![])]))
            .with_implementors("app.OrderRepository", vec!["infra.JpaOrders".into()]);
        assert_eq!(AdapterIndependenceCalculator::independence(&registry(), &g), 100.0);
    }

    #[test]
    fn test_cross_adapter_edges_reduce_independence() {
        let g = DependencyGraph::from_dependencies(&deps(&[
            ("infra.JpaOrders", vec!["infra.StripePayments", "app.OrderRepository"]),
            ("infra.StripePayments", vec!["app.PaymentGateway"]),
            ("app.OrderRepository", vec![]),
            ("app.PaymentGateway", vec![]),
        ]))
        .with_implementors("app.OrderRepository", vec!["infra.JpaOrders".into()])
        .with_implementors("app.PaymentGateway", vec!["infra.StripePayments".into()]);
        let metric = AdapterIndependenceCalculator::new(80.0).calculate(&registry(), &g);
        // 1 of 3 adapter edges crosses to another adapter
        assert!((metric.value - 66.666_666).abs() < 1e-3);
        assert!(metric.is_breached());
    }
}
