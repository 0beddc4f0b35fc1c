use std::collections::VecDeque;

use super::{DependencyGraph, Metric, MetricCalculator, MetricThreshold, MetricUnit};
use crate::model::TypeRegistry;

/// Mean share of the system reachable from a node, itself included, in percent.
///
/// Sum of reachable-set sizes over N², times 100. A graph with nodes but no
/// edges scores 100/N; a strongly connected graph scores 100.
pub fn propagation_cost(deps: &DependencyGraph) -> f64 {
    let n = deps.node_count();
    if n == 0 {
        return 0.0;
    }
    let adj = deps.adjacency();

    let mut total_reachable = 0usize;
    for start in 0..n {
        let mut visited = vec![false; n];
        let mut queue = VecDeque::new();
        queue.push_back(start);
        visited[start] = true;
        let mut count = 1;

        while let Some(current) = queue.pop_front() {
            for &neighbor in &adj[current] {
                if !visited[neighbor] {
                    visited[neighbor] = true;
                    count += 1;
                    queue.push_back(neighbor);
                }
            }
        }
        total_reachable += count;
    }

    total_reachable as f64 / (n * n) as f64 * 100.0
}

pub struct PropagationCostCalculator {
    max_cost: f64,
}

impl PropagationCostCalculator {
    pub fn new(max_cost: f64) -> Self {
        Self { max_cost }
    }
}

impl MetricCalculator for PropagationCostCalculator {
    fn name(&self) -> &'static str {
        "propagation.cost"
    }

    fn calculate(&self, _registry: &TypeRegistry, deps: &DependencyGraph) -> Metric {
        Metric::new(self.name(), propagation_cost(deps), MetricUnit::Percent)
            .with_threshold(MetricThreshold::max(self.max_cost))
    }
}
