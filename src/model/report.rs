use serde::Serialize;
use std::collections::BTreeMap;

use super::arch::{ArchType, UnclassifiedCategory};
use super::registry::TypeRegistry;
use super::types::TypeId;
use crate::classification::{Conflict, ElementKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictEntry {
    pub type_id: TypeId,
    /// Kind the classifier chose before the conflict was surfaced
    pub proposed_kind: ElementKind,
    pub conflicts: Vec<Conflict>,
}

/// Summary of how the registry's types were classified
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassificationReport {
    pub total_types: usize,
    pub counts_by_kind: BTreeMap<String, usize>,
    pub unclassified_by_category: BTreeMap<UnclassifiedCategory, usize>,
    pub conflicted: Vec<ConflictEntry>,
}

impl ClassificationReport {
    pub fn from_registry(registry: &TypeRegistry) -> Self {
        let mut report = Self {
            total_types: registry.len(),
            ..Self::default()
        };
        for arch in registry.all() {
            *report
                .counts_by_kind
                .entry(arch.kind().as_str().to_string())
                .or_default() += 1;
            if let ArchType::Unclassified(t) = arch {
                *report.unclassified_by_category.entry(t.category).or_default() += 1;
            }
            let trace = arch.trace();
            if !trace.conflicts.is_empty() {
                report.conflicted.push(ConflictEntry {
                    type_id: arch.id().clone(),
                    proposed_kind: trace.kind,
                    conflicts: trace.conflicts.clone(),
                });
            }
        }
        report
    }

    pub fn count(&self, kind: ElementKind) -> usize {
        self.counts_by_kind.get(kind.as_str()).copied().unwrap_or(0)
    }

    pub fn unclassified_count(&self, category: UnclassifiedCategory) -> usize {
        self.unclassified_by_category
            .get(&category)
            .copied()
            .unwrap_or(0)
    }

    /// Any conflict, or any type that could not be settled
    pub fn has_issues(&self) -> bool {
        !self.conflicted.is_empty()
            || self.unclassified_count(UnclassifiedCategory::Conflicting) > 0
            || self.unclassified_count(UnclassifiedCategory::Ambiguous) > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{InMemoryTypeGraph, TypeDecl};
    use crate::model::builders::test_support::results;
    use crate::model::ModelBuilder;

    #[test]
    fn test_counts_and_issues() {
        let graph = InMemoryTypeGraph::builder()
            .with_type(TypeDecl::class("com.acme.Cart").field("items", "int"))
            .with_type(TypeDecl::record("com.acme.CartId").field("value", "long"))
            .with_type(TypeDecl::class("com.acme.StringUtils"))
            .build();
        let classes = results(&[
            ("com.acme.Cart", ElementKind::AggregateRoot),
            ("com.acme.CartId", ElementKind::Identifier),
            ("com.acme.StringUtils", ElementKind::Unclassified),
        ]);
        let registry = ModelBuilder::default().build(&graph, &classes).unwrap();
        let report = ClassificationReport::from_registry(&registry);

        assert_eq!(report.total_types, 3);
        assert_eq!(report.count(ElementKind::Identifier), 1);
        assert_eq!(report.count(ElementKind::Unclassified), 2);
        assert_eq!(report.unclassified_count(UnclassifiedCategory::Ambiguous), 1);
        assert_eq!(report.unclassified_count(UnclassifiedCategory::Utility), 1);
        assert!(report.has_issues());
    }
}
