use once_cell::sync::Lazy;
use regex::Regex;

use super::{push_distinct, ArchTypeBuilder};
use crate::classification::{ClassificationResult, ElementKind};
use crate::errors::{Error, Result};
use crate::graph::{simple_name_of, TypeNode};
use crate::model::arch::{AggregateRoot, ArchType, Invariant};
use crate::model::context::BuilderContext;
use crate::model::types::{ClassificationTrace, Field, TypeId, TypeStructure};
use crate::roles::FieldRole;

static INVARIANT_METHOD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(validate|check|ensure|verify).+").expect("invariant pattern is valid")
});

pub struct AggregateRootBuilder;

impl AggregateRootBuilder {
    /// Identity from the built structure, else a direct re-scan of the node
    fn resolve_identity(
        node: &TypeNode,
        structure: &TypeStructure,
        ctx: &BuilderContext<'_>,
    ) -> Result<Field> {
        if let Some(field) = structure.identity_field() {
            return Ok(field.clone());
        }
        let detector = ctx.field_detector();
        ctx.instance_fields(node)
            .find(|f| detector.detect(f).contains(&FieldRole::Identity))
            .map(|f| ctx.build_field(f))
            .ok_or_else(|| Error::missing_identity(&node.qualified_name))
    }

    fn entities(id: &TypeId, structure: &TypeStructure, ctx: &BuilderContext<'_>) -> Vec<TypeId> {
        let mut entities = Vec::new();
        for field in &structure.fields {
            let target = field.target_type().raw_name();
            if target != id.qualified_name() && ctx.is_classified_as(target, ElementKind::Entity) {
                push_distinct(&mut entities, TypeId::new(target));
            }
        }
        entities
    }

    fn value_objects(structure: &TypeStructure, ctx: &BuilderContext<'_>) -> Vec<TypeId> {
        let mut value_objects = Vec::new();
        for field in &structure.fields {
            let target = field.target_type();
            if ctx.is_classified_as(target.raw_name(), ElementKind::ValueObject) {
                push_distinct(&mut value_objects, TypeId::from(target));
            }
        }
        value_objects
    }

    fn domain_events(structure: &TypeStructure, ctx: &BuilderContext<'_>) -> Vec<TypeId> {
        let mut events = Vec::new();
        for method in &structure.methods {
            let returned = method
                .return_type
                .element_type()
                .unwrap_or_else(|| method.return_type.clone());
            if ctx.is_classified_as(returned.raw_name(), ElementKind::DomainEvent) {
                push_distinct(&mut events, TypeId::from(&returned));
            }
        }
        events
    }

    /// First repository whose simple name contains the aggregate's simple name.
    ///
    /// Substring matching is a known weak spot: with aggregates `Order` and
    /// `OrderLine`, `OrderLineRepository` also matches `Order` when it comes
    /// first in classification order. Kept as is because repository
    /// association downstream depends on it.
    fn driven_port(id: &TypeId, ctx: &BuilderContext<'_>) -> Option<TypeId> {
        let simple = id.simple_name();
        ctx.classified_as(ElementKind::REPOSITORY)
            .find(|repo| simple_name_of(repo).contains(simple))
            .map(TypeId::new)
    }

    fn invariants(structure: &TypeStructure) -> Vec<Invariant> {
        structure
            .methods
            .iter()
            .filter(|m| INVARIANT_METHOD.is_match(&m.name))
            .map(|m| Invariant {
                name: m.name.clone(),
                description: format!("Invariant from method: {}", m.name),
            })
            .collect()
    }
}

impl ArchTypeBuilder for AggregateRootBuilder {
    fn build(
        &self,
        node: &TypeNode,
        classification: &ClassificationResult,
        ctx: &BuilderContext<'_>,
    ) -> Result<ArchType> {
        let id = TypeId::new(node.qualified_name.clone());
        let structure = ctx.build_structure(node);
        let identity_field = Self::resolve_identity(node, &structure, ctx)?;
        let effective_identity_type = identity_field
            .wrapped_type
            .clone()
            .unwrap_or_else(|| identity_field.type_ref.clone());

        Ok(ArchType::AggregateRoot(AggregateRoot {
            entities: Self::entities(&id, &structure, ctx),
            value_objects: Self::value_objects(&structure, ctx),
            domain_events: Self::domain_events(&structure, ctx),
            driven_port: Self::driven_port(&id, ctx),
            invariants: Self::invariants(&structure),
            trace: ClassificationTrace::from(classification),
            identity_field,
            effective_identity_type,
            structure,
            id,
        }))
    }
}
