use super::ArchTypeBuilder;
use crate::classification::ClassificationResult;
use crate::errors::Result;
use crate::graph::TypeNode;
use crate::model::arch::{ArchType, UnclassifiedCategory, UnclassifiedType};
use crate::model::context::BuilderContext;
use crate::model::types::{ClassificationTrace, TypeId, TypeStructure};

const TECHNICAL_SUFFIXES: &[&str] = &[
    "Config",
    "Configuration",
    "Exception",
    "Error",
    "Mapper",
    "Dto",
    "DTO",
];

const UTILITY_SUFFIXES: &[&str] = &["Utils", "Util", "Helper", "Helpers", "Constants"];

/// Explains why a type carries no architectural role
#[derive(Debug, Clone, Copy, Default)]
pub struct UnclassifiedCategoryDetector;

impl UnclassifiedCategoryDetector {
    pub fn detect(
        &self,
        node: &TypeNode,
        classification: &ClassificationResult,
        structure: &TypeStructure,
    ) -> (UnclassifiedCategory, String) {
        let simple = node.simple_name();
        if classification.has_conflicts() {
            let competing: Vec<&str> = classification
                .conflicts
                .iter()
                .map(|c| c.competing_kind.as_str())
                .collect();
            return (
                UnclassifiedCategory::Conflicting,
                format!(
                    "Conflicting classifications: {} vs {}",
                    classification.kind,
                    competing.join(", ")
                ),
            );
        }
        if let Some(suffix) = TECHNICAL_SUFFIXES.iter().find(|s| simple.ends_with(**s)) {
            return (
                UnclassifiedCategory::Technical,
                format!("Technical type (suffix '{suffix}')"),
            );
        }
        if let Some(suffix) = UTILITY_SUFFIXES.iter().find(|s| simple.ends_with(**s)) {
            return (
                UnclassifiedCategory::Utility,
                format!("Utility type (suffix '{suffix}')"),
            );
        }
        if !structure.methods.is_empty() && structure.methods.iter().all(|m| m.is_static()) {
            return (
                UnclassifiedCategory::Utility,
                "Utility type (only static methods)".to_string(),
            );
        }
        (
            UnclassifiedCategory::Unknown,
            "No classification criterion matched".to_string(),
        )
    }
}

pub struct UnclassifiedTypeBuilder;

impl UnclassifiedTypeBuilder {
    /// Unclassified type with a category decided by the caller
    pub fn with_category(
        node: &TypeNode,
        trace: ClassificationTrace,
        category: UnclassifiedCategory,
        reason: impl Into<String>,
        ctx: &BuilderContext<'_>,
    ) -> ArchType {
        ArchType::Unclassified(UnclassifiedType {
            id: TypeId::new(node.qualified_name.clone()),
            structure: ctx.build_structure(node),
            trace,
            category,
            reason: reason.into(),
        })
    }
}

impl ArchTypeBuilder for UnclassifiedTypeBuilder {
    fn build(
        &self,
        node: &TypeNode,
        classification: &ClassificationResult,
        ctx: &BuilderContext<'_>,
    ) -> Result<ArchType> {
        let structure = ctx.build_structure(node);
        let (category, reason) =
            UnclassifiedCategoryDetector.detect(node, classification, &structure);
        Ok(ArchType::Unclassified(UnclassifiedType {
            id: TypeId::new(node.qualified_name.clone()),
            trace: ClassificationTrace::from(classification),
            structure,
            category,
            reason,
        }))
    }
}
