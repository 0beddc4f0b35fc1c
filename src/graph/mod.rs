//! Read-only views of the static type graph.
//!
//! A source-language front end implements [`TypeGraphQuery`] and
//! [`DependencyGraphQuery`]; everything downstream only talks to these two
//! traits. [`InMemoryTypeGraph`] is a complete implementation backed by
//! plain vectors, used for tests and for embedding callers that already
//! hold the nodes in memory.

mod memory;
mod nodes;

pub use memory::{InMemoryTypeGraph, InMemoryTypeGraphBuilder, TypeDecl};
pub use nodes::{
    package_of, simple_name_of, AnnotationRef, ConstructorNode, FieldNode, MethodNode, Modifier,
    ParameterNode, TypeForm, TypeNode, TypeRef,
};

use std::collections::{BTreeMap, BTreeSet};

/// Structural queries over declared types.
///
/// Implementations must be deterministic: `all_types` returns nodes in the
/// same order on every call.
pub trait TypeGraphQuery: Sync {
    fn all_types(&self) -> &[TypeNode];
    fn fields_of(&self, node: &TypeNode) -> &[FieldNode];
    fn methods_of(&self, node: &TypeNode) -> &[MethodNode];
    fn constructors_of(&self, node: &TypeNode) -> &[ConstructorNode];
    fn type_by_qualified_name(&self, name: &str) -> Option<&TypeNode>;
}

/// Type-level dependency edges.
pub trait DependencyGraphQuery: Sync {
    /// Every type's outgoing dependencies, keyed by qualified name
    fn all_type_dependencies(&self) -> BTreeMap<String, BTreeSet<String>>;

    /// Types that implement or extend `qualified_name`
    fn find_implementors(&self, qualified_name: &str) -> Vec<String>;
}
