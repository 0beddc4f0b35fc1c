//! Structural metrics over the registry and the type dependency graph.
//!
//! Every calculator is a pure function of the frozen registry and the
//! dependency graph, so the engine may run them concurrently.

mod adapter;
mod boilerplate;
mod boundary;
mod cohesion;
mod coupling;
mod dependency_graph;
mod depth;
mod propagation;

pub use adapter::AdapterIndependenceCalculator;
pub use boilerplate::BoilerplateRatioCalculator;
pub use boundary::{aggregate_members, AggregateBoundaryCalculator};
pub use cohesion::{lcom4, AggregateCohesionCalculator};
pub use coupling::{package_metrics, PackageCouplingCalculator, PackageMetrics, PackageZone};
pub use dependency_graph::DependencyGraph;
pub use depth::{longest_path, DependencyDepthCalculator};
pub use propagation::{propagation_cost, PropagationCostCalculator};

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::{MetricThresholds, ParallelConfig};
use crate::model::TypeRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetricUnit {
    Levels,
    Percent,
    Ratio,
    /// Connected components, as in LCOM4
    Components,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThresholdDirection {
    /// Warn when the value rises above the limit
    Max,
    /// Warn when the value falls below the limit
    Min,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricThreshold {
    pub direction: ThresholdDirection,
    pub value: f64,
}

impl MetricThreshold {
    pub fn max(value: f64) -> Self {
        Self {
            direction: ThresholdDirection::Max,
            value,
        }
    }

    pub fn min(value: f64) -> Self {
        Self {
            direction: ThresholdDirection::Min,
            value,
        }
    }

    pub fn is_breached(&self, value: f64) -> bool {
        match self.direction {
            ThresholdDirection::Max => value > self.value,
            ThresholdDirection::Min => value < self.value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub name: String,
    pub value: f64,
    pub unit: MetricUnit,
    pub threshold: Option<MetricThreshold>,
}

impl Metric {
    pub fn new(name: impl Into<String>, value: f64, unit: MetricUnit) -> Self {
        Self {
            name: name.into(),
            value,
            unit,
            threshold: None,
        }
    }

    #[must_use]
    pub fn with_threshold(mut self, threshold: MetricThreshold) -> Self {
        self.threshold = Some(threshold);
        self
    }

    pub fn is_breached(&self) -> bool {
        self.threshold.is_some_and(|t| t.is_breached(self.value))
    }
}

pub trait MetricCalculator: Send + Sync {
    fn name(&self) -> &'static str;

    fn calculate(&self, registry: &TypeRegistry, deps: &DependencyGraph) -> Metric;
}

pub struct MetricsEngine {
    calculators: Vec<Box<dyn MetricCalculator>>,
    parallel: bool,
}

impl Default for MetricsEngine {
    fn default() -> Self {
        Self::from_config(&MetricThresholds::default(), &ParallelConfig::default())
    }
}

impl MetricsEngine {
    pub fn new(calculators: Vec<Box<dyn MetricCalculator>>, parallel: bool) -> Self {
        Self {
            calculators,
            parallel,
        }
    }

    /// The seven built-in calculators with configured thresholds
    pub fn from_config(thresholds: &MetricThresholds, parallel: &ParallelConfig) -> Self {
        Self::new(
            vec![
                Box::new(DependencyDepthCalculator::new(thresholds.max_dependency_depth)),
                Box::new(PropagationCostCalculator::new(thresholds.max_propagation_cost)),
                Box::new(AdapterIndependenceCalculator::new(
                    thresholds.min_adapter_independence,
                )),
                Box::new(PackageCouplingCalculator::new(
                    thresholds.max_main_sequence_distance,
                )),
                Box::new(AggregateBoundaryCalculator::new(
                    thresholds.min_aggregate_boundary,
                )),
                Box::new(BoilerplateRatioCalculator::new(thresholds.max_boilerplate_ratio)),
                Box::new(AggregateCohesionCalculator::new(thresholds.max_aggregate_lcom4)),
            ],
            parallel.enabled,
        )
    }

    /// Run every calculator; results keep calculator order
    pub fn calculate_all(&self, registry: &TypeRegistry, deps: &DependencyGraph) -> Vec<Metric> {
        let metrics: Vec<Metric> = if self.parallel {
            self.calculators
                .par_iter()
                .map(|c| c.calculate(registry, deps))
                .collect()
        } else {
            self.calculators
                .iter()
                .map(|c| c.calculate(registry, deps))
                .collect()
        };

        for metric in &metrics {
            if metric.is_breached() {
                warn!(
                    metric = %metric.name,
                    value = metric.value,
                    threshold = metric.threshold.map(|t| t.value),
                    "Metric threshold breached"
                );
            } else {
                debug!(metric = %metric.name, value = metric.value, "Metric calculated");
            }
        }
        metrics
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_directions() {
        assert!(MetricThreshold::max(7.0).is_breached(8.0));
        assert!(!MetricThreshold::max(7.0).is_breached(7.0));
        assert!(MetricThreshold::min(80.0).is_breached(79.9));
        assert!(!Metric::new("x", 100.0, MetricUnit::Percent).is_breached());
    }

    #[test]
    fn test_engine_keeps_calculator_order() {
        let registry = TypeRegistry::default();
        let deps = DependencyGraph::default();
        let names: Vec<String> = MetricsEngine::default()
            .calculate_all(&registry, &deps)
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(
            names,
            vec![
                "dependency.depth",
                "propagation.cost",
                "adapter.independence",
                "package.coupling",
                "aggregate.boundary",
                "code.boilerplate.ratio",
                "aggregate.cohesion.lcom4"
            ]
        );
    }
}
