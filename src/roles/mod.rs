//! Semantic roles of fields and methods.
//!
//! Both detectors are stateless unions of independent predicates. Every
//! heuristic is a public function so it can be tested and tuned on its own
//! without touching the dispatch in `detect`.

pub mod field;
pub mod method;

pub use field::{FieldRole, FieldRoleDetector};
pub use method::{MethodRole, MethodRoleDetector};

use crate::classification::ElementKind;

/// Classification lookup used by role detection and model building
pub trait KindLookup: Sync {
    /// Kind assigned to `qualified_name`, if the type was classified at all
    fn kind_of(&self, qualified_name: &str) -> Option<ElementKind>;

    fn is_classified_as(&self, qualified_name: &str, kind: ElementKind) -> bool {
        self.kind_of(qualified_name) == Some(kind)
    }
}

/// Fixed map, handy for tests and for callers with precomputed kinds
impl KindLookup for std::collections::HashMap<String, ElementKind> {
    fn kind_of(&self, qualified_name: &str) -> Option<ElementKind> {
        self.get(qualified_name).copied()
    }
}
