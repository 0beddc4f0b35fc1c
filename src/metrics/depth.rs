use petgraph::algo::tarjan_scc;
use std::collections::VecDeque;

use super::{DependencyGraph, Metric, MetricCalculator, MetricThreshold, MetricUnit};
use crate::model::TypeRegistry;

/// Longest dependency chain, with each strongly connected component
/// contracted into one super-node first.
pub fn longest_path(deps: &DependencyGraph) -> usize {
    let n = deps.node_count();
    if n == 0 {
        return 0;
    }

    let sccs = tarjan_scc(deps.petgraph());
    let mut component = vec![0usize; n];
    for (c, members) in sccs.iter().enumerate() {
        for node in members {
            component[node.index()] = c;
        }
    }

    let condensed = condense(deps.adjacency(), &component, sccs.len());
    relax_longest(&condensed)
}

/// Super-node adjacency without intra-component or duplicate edges
fn condense(adj: &[Vec<usize>], component: &[usize], count: usize) -> Vec<Vec<usize>> {
    let mut condensed: Vec<Vec<usize>> = vec![Vec::new(); count];
    for (from, targets) in adj.iter().enumerate() {
        let cf = component[from];
        for &to in targets {
            let ct = component[to];
            if cf != ct && !condensed[cf].contains(&ct) {
                condensed[cf].push(ct);
            }
        }
    }
    condensed
}

/// Kahn traversal from zero in-degree nodes, relaxing `dist[v] = max(dist[v], dist[u] + 1)`
fn relax_longest(adj: &[Vec<usize>]) -> usize {
    let n = adj.len();
    let mut in_degree = vec![0usize; n];
    for targets in adj {
        for &t in targets {
            in_degree[t] += 1;
        }
    }

    let mut queue: VecDeque<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
    let mut dist = vec![0usize; n];
    while let Some(u) = queue.pop_front() {
        for &v in &adj[u] {
            dist[v] = dist[v].max(dist[u] + 1);
            in_degree[v] -= 1;
            if in_degree[v] == 0 {
                queue.push_back(v);
            }
        }
    }
    dist.into_iter().max().unwrap_or(0)
}

pub struct DependencyDepthCalculator {
    max_depth: usize,
}

impl DependencyDepthCalculator {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }
}

impl MetricCalculator for DependencyDepthCalculator {
    fn name(&self) -> &'static str {
        "dependency.depth"
    }

    fn calculate(&self, _registry: &TypeRegistry, deps: &DependencyGraph) -> Metric {
        Metric::new(self.name(), longest_path(deps) as f64, MetricUnit::Levels)
            .with_threshold(MetricThreshold::max(self.max_depth as f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::test_support::deps;

    fn graph(edges: &[(&str, Vec<&str>)]) -> DependencyGraph {
        DependencyGraph::from_dependencies(&deps(edges))
    }

    #[test]
    fn test_chain_depth() {
        let g = graph(&[
            ("A", vec!["B"]),
            ("B", vec!["C"]),
            ("C", vec!["D"]),
            ("D", vec![]),
        ]);
        assert_eq!(longest_path(&g), 3);
    }

    #[test]
    fn test_cycle_is_contracted() {
        // A -> {B <-> C} -> D
        let g = graph(&[
            ("A", vec!["B"]),
            ("B", vec!["C"]),
            ("C", vec!["B", "D"]),
            ("D", vec![]),
        ]);
        assert_eq!(longest_path(&g), 2);
    }

    #[test]
    fn test_full_cycle_has_zero_depth() {
        let g = graph(&[("A", vec!["B"]), ("B", vec!["A"])]);
        assert_eq!(longest_path(&g), 0);
    }

    #[test]
    fn test_breach_above_threshold() {
        let names: Vec<String> = (0..10).map(|i| format!("T{i}")).collect();
        let edges: Vec<(&str, Vec<&str>)> = names
            .iter()
            .enumerate()
            .map(|(i, n)| {
                let next = names.get(i + 1).map(|s| vec![s.as_str()]).unwrap_or_default();
                (n.as_str(), next)
            })
            .collect();
        let metric =
            DependencyDepthCalculator::new(7).calculate(&TypeRegistry::default(), &graph(&edges));
        assert_eq!(metric.value, 9.0);
        assert!(metric.is_breached());
    }
}
