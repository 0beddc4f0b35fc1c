use super::{push_distinct, ArchTypeBuilder};
use crate::classification::{ClassificationResult, ElementKind};
use crate::errors::Result;
use crate::graph::TypeNode;
use crate::model::arch::{ApplicationType, ArchType, DomainService};
use crate::model::context::BuilderContext;
use crate::model::types::{ClassificationTrace, TypeId, TypeStructure};
use crate::roles::MethodRole;

pub struct DomainServiceBuilder;

impl DomainServiceBuilder {
    /// Port-classified types arriving through fields or constructor parameters
    fn injected_ports(structure: &TypeStructure, ctx: &BuilderContext<'_>) -> Vec<TypeId> {
        let mut ports = Vec::new();
        let candidates = structure.fields.iter().map(|f| &f.type_ref).chain(
            structure
                .constructors
                .iter()
                .flat_map(|c| c.parameters.iter().map(|p| &p.type_ref)),
        );
        for type_ref in candidates {
            let is_port = ctx
                .classification(type_ref.raw_name())
                .is_some_and(|r| r.kind.is_port());
            if is_port {
                push_distinct(&mut ports, TypeId::from(type_ref));
            }
        }
        ports
    }

    fn operations(structure: &TypeStructure) -> Vec<String> {
        structure
            .methods
            .iter()
            .filter(|m| {
                m.has_role(MethodRole::Command)
                    || m.has_role(MethodRole::Query)
                    || m.has_role(MethodRole::Business)
            })
            .map(|m| m.name.clone())
            .collect()
    }
}

impl ArchTypeBuilder for DomainServiceBuilder {
    fn build(
        &self,
        node: &TypeNode,
        classification: &ClassificationResult,
        ctx: &BuilderContext<'_>,
    ) -> Result<ArchType> {
        let structure = ctx.build_structure(node);
        Ok(ArchType::DomainService(DomainService {
            id: TypeId::new(node.qualified_name.clone()),
            injected_ports: Self::injected_ports(&structure, ctx),
            operations: Self::operations(&structure),
            trace: ClassificationTrace::from(classification),
            structure,
        }))
    }
}

/// Shared builder for application services and command/query handlers
pub struct ApplicationTypeBuilder;

impl ArchTypeBuilder for ApplicationTypeBuilder {
    fn build(
        &self,
        node: &TypeNode,
        classification: &ClassificationResult,
        ctx: &BuilderContext<'_>,
    ) -> Result<ArchType> {
        let app = ApplicationType {
            id: TypeId::new(node.qualified_name.clone()),
            structure: ctx.build_structure(node),
            trace: ClassificationTrace::from(classification),
        };
        Ok(match classification.kind {
            ElementKind::CommandHandler => ArchType::CommandHandler(app),
            ElementKind::QueryHandler => ArchType::QueryHandler(app),
            _ => ArchType::ApplicationService(app),
        })
    }
}
