//! Labeled relationships between architectural types.

mod builder;
mod graph;

pub use builder::RelationshipGraphBuilder;
pub use graph::{RelationType, Relationship, RelationshipGraph};
