use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::model::TypeId;

/// Edge label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationType {
    Contains,
    Owns,
    References,
    Emits,
    Persists,
    DependsOn,
    Implements,
    Extends,
    Exposes,
    Adapts,
    Handles,
}

impl RelationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Contains => "CONTAINS",
            Self::Owns => "OWNS",
            Self::References => "REFERENCES",
            Self::Emits => "EMITS",
            Self::Persists => "PERSISTS",
            Self::DependsOn => "DEPENDS_ON",
            Self::Implements => "IMPLEMENTS",
            Self::Extends => "EXTENDS",
            Self::Exposes => "EXPOSES",
            Self::Adapts => "ADAPTS",
            Self::Handles => "HANDLES",
        }
    }

    /// Whether the target's lifecycle is bound to the source
    pub fn is_compositional(&self) -> bool {
        matches!(self, Self::Contains | Self::Owns)
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Relationship {
    pub source: TypeId,
    pub target: TypeId,
    pub relation_type: RelationType,
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -{}-> {}", self.source, self.relation_type, self.target)
    }
}

/// Directed labeled edge set over type ids.
///
/// Edges live in an arena in insertion order; the source and target maps
/// hold arena slots. A (source, target, type) triple is stored once.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RelationshipGraph {
    edges: Vec<Relationship>,
    #[serde(skip)]
    seen: HashSet<Relationship>,
    #[serde(skip)]
    by_source: HashMap<TypeId, Vec<usize>>,
    #[serde(skip)]
    by_target: HashMap<TypeId, Vec<usize>>,
}

impl RelationshipGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an edge; returns false when the triple was already present
    pub fn add(&mut self, source: TypeId, target: TypeId, relation_type: RelationType) -> bool {
        let edge = Relationship {
            source,
            target,
            relation_type,
        };
        if self.seen.contains(&edge) {
            return false;
        }
        let slot = self.edges.len();
        self.by_source.entry(edge.source.clone()).or_default().push(slot);
        self.by_target.entry(edge.target.clone()).or_default().push(slot);
        self.seen.insert(edge.clone());
        self.edges.push(edge);
        true
    }

    fn resolve<'g>(
        &'g self,
        slots: Option<&'g Vec<usize>>,
    ) -> impl Iterator<Item = &'g Relationship> {
        slots
            .into_iter()
            .flat_map(move |slots| slots.iter().map(move |&i| &self.edges[i]))
    }

    /// Outgoing edges of `id`
    pub fn from(&self, id: &TypeId) -> impl Iterator<Item = &Relationship> {
        self.resolve(self.by_source.get(id))
    }

    /// Incoming edges of `id`
    pub fn to(&self, id: &TypeId) -> impl Iterator<Item = &Relationship> {
        self.resolve(self.by_target.get(id))
    }

    pub fn all(&self) -> impl Iterator<Item = &Relationship> {
        self.edges.iter()
    }

    pub fn of_type(&self, relation_type: RelationType) -> impl Iterator<Item = &Relationship> {
        self.edges
            .iter()
            .filter(move |e| e.relation_type == relation_type)
    }

    pub fn has_relation(
        &self,
        source: &TypeId,
        target: &TypeId,
        relation_type: RelationType,
    ) -> bool {
        self.seen.contains(&Relationship {
            source: source.clone(),
            target: target.clone(),
            relation_type,
        })
    }

    /// Targets reached from `id` through `relation_type`
    pub fn related_to(&self, id: &TypeId, relation_type: RelationType) -> Vec<&TypeId> {
        self.from(id)
            .filter(|e| e.relation_type == relation_type)
            .map(|e| &e.target)
            .collect()
    }

    /// Sources reaching `id` through `relation_type`
    pub fn related_from(&self, id: &TypeId, relation_type: RelationType) -> Vec<&TypeId> {
        self.to(id)
            .filter(|e| e.relation_type == relation_type)
            .map(|e| &e.source)
            .collect()
    }

    /// Edge set view, independent of insertion order
    pub fn edge_set(&self) -> &HashSet<Relationship> {
        &self.seen
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(name: &str) -> TypeId {
        TypeId::from(name)
    }

    #[test]
    fn test_duplicate_triples_collapse() {
        let mut graph = RelationshipGraph::new();
        assert!(graph.add(id("a.Order"), id("a.OrderLine"), RelationType::Contains));
        assert!(!graph.add(id("a.Order"), id("a.OrderLine"), RelationType::Contains));
        assert!(graph.add(id("a.Order"), id("a.OrderLine"), RelationType::DependsOn));
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn test_source_and_target_queries() {
        let mut graph = RelationshipGraph::new();
        graph.add(id("a.Order"), id("a.OrderId"), RelationType::Owns);
        graph.add(id("a.Order"), id("a.OrderLine"), RelationType::Contains);
        graph.add(id("a.OrderRepository"), id("a.Order"), RelationType::Persists);

        assert_eq!(graph.from(&id("a.Order")).count(), 2);
        assert_eq!(graph.to(&id("a.Order")).count(), 1);
        assert_eq!(graph.from(&id("a.Missing")).count(), 0);
        assert_eq!(graph.related_to(&id("a.Order"), RelationType::Owns), vec![&id("a.OrderId")]);
        assert_eq!(
            graph.related_from(&id("a.Order"), RelationType::Persists),
            vec![&id("a.OrderRepository")]
        );
        assert!(graph.has_relation(&id("a.Order"), &id("a.OrderLine"), RelationType::Contains));
        assert!(RelationType::Owns.is_compositional());
        assert!(!RelationType::References.is_compositional());
    }
}
