use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::graph::{DependencyGraphQuery, TypeGraphQuery};

/// Type-level dependency graph restricted to declared types.
///
/// Nodes are the keys of the dependency map in sorted order, so node
/// indexes are stable across runs. Self edges are dropped. Edges to
/// undeclared types (JDK classes, third-party libraries) stay out of the
/// graph and are kept per source as external dependencies.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    graph: DiGraph<String, ()>,
    index: HashMap<String, NodeIndex>,
    adjacency: Vec<Vec<usize>>,
    external: BTreeMap<String, BTreeSet<String>>,
    implementors: BTreeMap<String, Vec<String>>,
    abstract_types: BTreeSet<String>,
}

impl DependencyGraph {
    pub fn from_dependencies(dependencies: &BTreeMap<String, BTreeSet<String>>) -> Self {
        let mut graph = DiGraph::new();
        let mut index = HashMap::new();
        for name in dependencies.keys() {
            let node = graph.add_node(name.clone());
            index.insert(name.clone(), node);
        }

        let mut adjacency = vec![Vec::new(); graph.node_count()];
        let mut external: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (from, targets) in dependencies {
            let Some(&from_node) = index.get(from) else {
                continue;
            };
            for to in targets {
                match index.get(to) {
                    Some(&to_node) if to_node != from_node => {
                        graph.add_edge(from_node, to_node, ());
                        adjacency[from_node.index()].push(to_node.index());
                    }
                    Some(_) => {}
                    None => {
                        external.entry(from.clone()).or_default().insert(to.clone());
                    }
                }
            }
        }

        Self {
            graph,
            index,
            adjacency,
            external,
            implementors: BTreeMap::new(),
            abstract_types: BTreeSet::new(),
        }
    }

    /// Dependencies from `query`, plus the implementors of each of `ports`
    pub fn from_query<'p>(
        query: &dyn DependencyGraphQuery,
        ports: impl IntoIterator<Item = &'p str>,
    ) -> Self {
        let mut graph = Self::from_dependencies(&query.all_type_dependencies());
        for port in ports {
            graph = graph.with_implementors(port, query.find_implementors(port));
        }
        graph
    }

    /// Record which declared types are interfaces or abstract classes
    #[must_use]
    pub fn with_abstractness(mut self, types: &dyn TypeGraphQuery) -> Self {
        self.abstract_types = types
            .all_types()
            .iter()
            .filter(|node| node.is_interface() || node.is_abstract())
            .map(|node| node.qualified_name.clone())
            .collect();
        self
    }

    /// Interface or abstract class in the type graph this was built against
    pub fn is_abstract(&self, name: &str) -> bool {
        self.abstract_types.contains(name)
    }

    #[must_use]
    pub fn with_implementors(mut self, port: &str, implementors: Vec<String>) -> Self {
        self.implementors.insert(port.to_string(), implementors);
        self
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn name(&self, node: usize) -> &str {
        &self.graph[NodeIndex::new(node)]
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.graph.node_weights().map(String::as_str)
    }

    pub fn node_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).map(|n| n.index())
    }

    /// Successor lists indexed by node, in declaration order
    pub fn adjacency(&self) -> &[Vec<usize>] {
        &self.adjacency
    }

    pub fn dependencies_of(&self, name: &str) -> impl Iterator<Item = &str> {
        self.node_of(name)
            .into_iter()
            .flat_map(move |n| self.adjacency[n].iter().map(move |&t| self.name(t)))
    }

    /// Undeclared types `name` depends on, sorted
    pub fn external_dependencies_of(&self, name: &str) -> impl Iterator<Item = &str> {
        self.external
            .get(name)
            .into_iter()
            .flat_map(|targets| targets.iter().map(String::as_str))
    }

    /// Every (from, to) edge by name
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(move |(from, targets)| {
                targets
                    .iter()
                    .map(move |&to| (self.name(from), self.name(to)))
            })
    }

    pub fn petgraph(&self) -> &DiGraph<String, ()> {
        &self.graph
    }

    /// Known implementors per port, as recorded at construction
    pub fn implementors(&self) -> &BTreeMap<String, Vec<String>> {
        &self.implementors
    }
}
