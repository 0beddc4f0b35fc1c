//! Elementary circuit enumeration (Johnson, 1975).
//!
//! Each circuit is reported once, starting at its smallest node index and
//! listed in traversal order without repeating the start node.

use std::collections::BTreeSet;

struct Frame {
    node: usize,
    next_edge: usize,
    found_cycle: bool,
}

/// Clear `node` and, transitively, everything waiting on it
fn unblock(node: usize, blocked: &mut [bool], waiting: &mut [BTreeSet<usize>]) {
    let mut stack = vec![node];
    while let Some(current) = stack.pop() {
        if blocked[current] {
            blocked[current] = false;
            stack.extend(std::mem::take(&mut waiting[current]));
        }
    }
}

/// Every elementary cycle of `adjacency`.
///
/// Duplicate edges are ignored. Cycles come out grouped by their smallest
/// node, in ascending order.
pub fn find_cycles(adjacency: &[Vec<usize>]) -> Vec<Vec<usize>> {
    let n = adjacency.len();
    let adjacency: Vec<Vec<usize>> = adjacency
        .iter()
        .map(|targets| {
            let set: BTreeSet<usize> = targets.iter().copied().filter(|t| *t < n).collect();
            set.into_iter().collect()
        })
        .collect();

    let mut cycles = Vec::new();
    for start in 0..n {
        let mut blocked = vec![false; n];
        let mut waiting: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); n];
        let mut path = vec![start];
        blocked[start] = true;
        let mut stack = vec![Frame {
            node: start,
            next_edge: 0,
            found_cycle: false,
        }];

        while let Some(frame) = stack.last_mut() {
            let node = frame.node;
            if let Some(&next) = adjacency[node].get(frame.next_edge) {
                frame.next_edge += 1;
                if next < start {
                    continue;
                }
                if next == start {
                    cycles.push(path.clone());
                    frame.found_cycle = true;
                } else if !blocked[next] {
                    blocked[next] = true;
                    path.push(next);
                    stack.push(Frame {
                        node: next,
                        next_edge: 0,
                        found_cycle: false,
                    });
                }
                continue;
            }

            let Some(done) = stack.pop() else { break };
            if done.found_cycle {
                unblock(done.node, &mut blocked, &mut waiting);
            } else {
                for &next in adjacency[done.node].iter().filter(|t| **t >= start) {
                    waiting[next].insert(done.node);
                }
            }
            path.pop();
            if let Some(parent) = stack.last_mut() {
                parent.found_cycle |= done.found_cycle;
            }
        }
    }
    cycles
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_two_node_cycle() {
        assert_eq!(find_cycles(&[vec![1], vec![0]]), vec![vec![0, 1]]);
    }

    #[test]
    fn test_acyclic_graph_has_no_cycles() {
        assert!(find_cycles(&[vec![1, 2], vec![2], vec![]]).is_empty());
    }

    #[test]
    fn test_overlapping_cycles() {
        // 0 -> 1 -> 0 and 0 -> 1 -> 2 -> 0
        let cycles = find_cycles(&[vec![1], vec![0, 2], vec![0]]);
        assert_eq!(cycles, vec![vec![0, 1], vec![0, 1, 2]]);
    }

    #[test]
    fn test_complete_graph_of_three() {
        let adjacency = vec![vec![1, 2], vec![0, 2], vec![0, 1]];
        // three 2-cycles and two 3-cycles
        assert_eq!(find_cycles(&adjacency).len(), 5);
    }

    #[test]
    fn test_self_loop_and_duplicate_edges() {
        assert_eq!(find_cycles(&[vec![0, 0]]), vec![vec![0]]);
        assert_eq!(find_cycles(&[vec![1, 1], vec![0]]), vec![vec![0, 1]]);
    }

    fn arb_graph() -> impl Strategy<Value = Vec<Vec<usize>>> {
        (1usize..7).prop_flat_map(|n| {
            prop::collection::vec(prop::collection::vec(0..n, 0..n), n)
        })
    }

    proptest! {
        #[test]
        fn prop_cycles_are_distinct_and_elementary(adjacency in arb_graph()) {
            let cycles = find_cycles(&adjacency);
            let distinct: BTreeSet<&Vec<usize>> = cycles.iter().collect();
            prop_assert_eq!(distinct.len(), cycles.len());
            for cycle in &cycles {
                let nodes: BTreeSet<&usize> = cycle.iter().collect();
                prop_assert_eq!(nodes.len(), cycle.len());
                prop_assert_eq!(cycle.iter().min(), cycle.first());
                for pair in cycle.windows(2) {
                    prop_assert!(adjacency[pair[0]].contains(&pair[1]));
                }
                let last = *cycle.last().unwrap();
                prop_assert!(adjacency[last].contains(&cycle[0]));
            }
        }
    }
}
