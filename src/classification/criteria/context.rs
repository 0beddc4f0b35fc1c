use std::collections::{HashMap, HashSet};

use crate::graph::{FieldNode, TypeGraphQuery, TypeNode};
use crate::roles::field::is_identity;

const REPOSITORY_MARKERS: &[&str] = &[
    "org.jmolecules.ddd.annotation.Repository",
    "org.jmolecules.ddd.types.Repository",
];

/// Shared read-only facts precomputed once per classification pass.
///
/// Criteria evaluate one node at a time but several need reverse lookups
/// ("who embeds this type?"). Those are built here in graph order so every
/// criterion sees the same deterministic view.
pub struct ClassificationContext<'a> {
    pub graph: &'a dyn TypeGraphQuery,
    embedders: HashMap<String, Vec<String>>,
    repository_mentions: HashMap<String, Vec<String>>,
    injected: HashSet<String>,
}

impl<'a> ClassificationContext<'a> {
    pub fn new(graph: &'a dyn TypeGraphQuery) -> Self {
        let mut embedders: HashMap<String, Vec<String>> = HashMap::new();
        let mut repository_mentions: HashMap<String, Vec<String>> = HashMap::new();
        let mut injected = HashSet::new();

        for node in graph.all_types() {
            if node.is_interface() {
                if is_repository_like(node) {
                    for name in mentioned_types(graph, node) {
                        let repos = repository_mentions.entry(name).or_default();
                        if !repos.contains(&node.qualified_name) {
                            repos.push(node.qualified_name.clone());
                        }
                    }
                }
                continue;
            }

            for field in instance_fields(graph, node) {
                let target = field
                    .type_ref
                    .element_type()
                    .map_or_else(|| field.type_ref.qualified_name.clone(), |e| e.qualified_name);
                let holders = embedders.entry(target).or_default();
                if !holders.contains(&node.qualified_name) {
                    holders.push(node.qualified_name.clone());
                }
                injected.insert(field.type_ref.qualified_name.clone());
            }
            for ctor in graph.constructors_of(node) {
                for param in &ctor.parameters {
                    injected.insert(param.type_ref.qualified_name.clone());
                }
            }
        }

        Self {
            graph,
            embedders,
            repository_mentions,
            injected,
        }
    }

    /// Types holding `qualified_name` in an instance field or collection
    pub fn embedders_of(&self, qualified_name: &str) -> &[String] {
        self.embedders
            .get(qualified_name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Repository interfaces whose signatures mention `qualified_name`
    pub fn repositories_mentioning(&self, qualified_name: &str) -> &[String] {
        self.repository_mentions
            .get(qualified_name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Whether some class takes `qualified_name` as a field or constructor parameter
    pub fn is_injected(&self, qualified_name: &str) -> bool {
        self.injected.contains(qualified_name)
    }

    /// Whether the node declares an identity field
    pub fn has_identity(&self, node: &TypeNode) -> bool {
        instance_fields(self.graph, node).any(|f| is_identity(f, Some(node.simple_name())))
    }

    /// Records, and classes whose instance fields are all final
    pub fn is_immutable(&self, node: &TypeNode) -> bool {
        node.is_record() || instance_fields(self.graph, node).all(FieldNode::is_final)
    }

    /// A type that could itself be a value object: concrete, no identity
    pub fn is_value_object_candidate(&self, qualified_name: &str) -> bool {
        self.graph
            .type_by_qualified_name(qualified_name)
            .is_some_and(|n| !n.is_interface() && !n.is_enum() && !self.has_identity(n))
    }
}

pub(crate) fn instance_fields<'g>(
    graph: &'g dyn TypeGraphQuery,
    node: &TypeNode,
) -> impl Iterator<Item = &'g FieldNode> {
    graph.fields_of(node).iter().filter(|f| !f.is_static())
}

fn is_repository_like(node: &TypeNode) -> bool {
    node.simple_name().ends_with("Repository")
        || node.has_any_annotation(REPOSITORY_MARKERS)
        || REPOSITORY_MARKERS.iter().any(|m| node.implements(m))
}

/// All names in an interface's supertype arguments and method signatures
fn mentioned_types(graph: &dyn TypeGraphQuery, node: &TypeNode) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let mut push = |name: &str| {
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    };
    for iface in &node.interfaces {
        iface.arguments.iter().flat_map(|a| a.all_names()).for_each(&mut push);
    }
    for method in graph.methods_of(node) {
        method.return_type.all_names().into_iter().for_each(&mut push);
        for param in &method.parameters {
            param.type_ref.all_names().into_iter().for_each(&mut push);
        }
    }
    names
}
