use super::ArchTypeBuilder;
use crate::classification::{ClassificationResult, ElementKind};
use crate::errors::Result;
use crate::graph::TypeNode;
use crate::model::arch::{ArchType, DomainEvent};
use crate::model::context::BuilderContext;
use crate::model::types::{ClassificationTrace, Field, TypeId, TypeStructure};

const TIMESTAMP_NAMES: &[&str] = &[
    "timestamp",
    "occurredat",
    "createdat",
    "eventtime",
    "happenedat",
    "recordedat",
    "emittedat",
];

/// `aggregateId`, then any `*aggregateid*`, then the first other `*Id` field
fn aggregate_id_field(structure: &TypeStructure) -> Option<&Field> {
    let fields = &structure.fields;
    fields
        .iter()
        .find(|f| f.name == "aggregateId")
        .or_else(|| {
            fields
                .iter()
                .find(|f| f.name.to_lowercase().contains("aggregateid"))
        })
        .or_else(|| {
            fields.iter().find(|f| {
                f.name.ends_with("Id") && f.name != "id" && f.name != "eventId"
            })
        })
}

fn timestamp_field(structure: &TypeStructure) -> Option<&Field> {
    structure
        .fields
        .iter()
        .find(|f| TIMESTAMP_NAMES.contains(&f.name.to_lowercase().as_str()))
}

/// `OrderId` -> `Order`, when that name is a classified aggregate root
fn source_aggregate(id_field: &Field, ctx: &BuilderContext<'_>) -> Option<TypeId> {
    let candidate = id_field.type_ref.raw_name().strip_suffix("Id")?;
    ctx.is_classified_as(candidate, ElementKind::AggregateRoot)
        .then(|| TypeId::new(candidate))
}

pub struct DomainEventBuilder;

impl ArchTypeBuilder for DomainEventBuilder {
    fn build(
        &self,
        node: &TypeNode,
        classification: &ClassificationResult,
        ctx: &BuilderContext<'_>,
    ) -> Result<ArchType> {
        let structure = ctx.build_structure(node);
        let aggregate_id_field = aggregate_id_field(&structure).cloned();
        let source_aggregate = aggregate_id_field
            .as_ref()
            .and_then(|f| source_aggregate(f, ctx));
        Ok(ArchType::DomainEvent(DomainEvent {
            id: TypeId::new(node.qualified_name.clone()),
            timestamp_field: timestamp_field(&structure).cloned(),
            trace: ClassificationTrace::from(classification),
            aggregate_id_field,
            source_aggregate,
            structure,
        }))
    }
}
