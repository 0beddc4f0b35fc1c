use super::ArchTypeBuilder;
use crate::classification::{ClassificationResult, ElementKind};
use crate::errors::Result;
use crate::graph::TypeNode;
use crate::model::arch::{ArchType, Entity, Identifier, ValueObject};
use crate::model::context::{single_instance_field, BuilderContext};
use crate::model::types::{ClassificationTrace, TypeId};

pub struct EntityBuilder;

impl EntityBuilder {
    /// First aggregate root holding a field of (or a collection of) `entity`
    fn owning_aggregate(entity: &str, ctx: &BuilderContext<'_>) -> Option<TypeId> {
        ctx.classified_as(ElementKind::AggregateRoot)
            .find(|aggregate| {
                ctx.type_node(aggregate).is_some_and(|node| {
                    ctx.instance_fields(node).any(|f| {
                        let target = f
                            .type_ref
                            .element_type()
                            .unwrap_or_else(|| f.type_ref.clone());
                        target.raw_name() == entity
                    })
                })
            })
            .map(TypeId::new)
    }
}

impl ArchTypeBuilder for EntityBuilder {
    fn build(
        &self,
        node: &TypeNode,
        classification: &ClassificationResult,
        ctx: &BuilderContext<'_>,
    ) -> Result<ArchType> {
        let structure = ctx.build_structure(node);
        Ok(ArchType::Entity(Entity {
            id: TypeId::new(node.qualified_name.clone()),
            identity_field: structure.identity_field().cloned(),
            owning_aggregate: Self::owning_aggregate(&node.qualified_name, ctx),
            trace: ClassificationTrace::from(classification),
            structure,
        }))
    }
}

pub struct ValueObjectBuilder;

impl ArchTypeBuilder for ValueObjectBuilder {
    fn build(
        &self,
        node: &TypeNode,
        classification: &ClassificationResult,
        ctx: &BuilderContext<'_>,
    ) -> Result<ArchType> {
        Ok(ArchType::ValueObject(ValueObject {
            id: TypeId::new(node.qualified_name.clone()),
            structure: ctx.build_structure(node),
            trace: ClassificationTrace::from(classification),
        }))
    }
}

pub struct IdentifierBuilder;

impl ArchTypeBuilder for IdentifierBuilder {
    fn build(
        &self,
        node: &TypeNode,
        classification: &ClassificationResult,
        ctx: &BuilderContext<'_>,
    ) -> Result<ArchType> {
        // Multi-field identifiers have no single wrapped scalar
        let wrapped_type =
            single_instance_field(ctx.instance_fields(node)).map(|f| f.type_ref.clone());
        Ok(ArchType::Identifier(Identifier {
            id: TypeId::new(node.qualified_name.clone()),
            structure: ctx.build_structure(node),
            trace: ClassificationTrace::from(classification),
            wrapped_type,
        }))
    }
}
