//! The closed set of architectural types.
//!
//! Every consumer matches on [`ArchType`] exhaustively, so adding a variant
//! is a compile error everywhere it has not yet been handled.

use serde::Serialize;

use super::types::{ClassificationTrace, Field, TypeId, TypeStructure};
use crate::classification::{DrivenPortKind, ElementKind};
use crate::graph::TypeRef;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invariant {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateRoot {
    pub id: TypeId,
    pub structure: TypeStructure,
    pub trace: ClassificationTrace,
    pub identity_field: Field,
    /// Identity field type, or the scalar it wraps
    pub effective_identity_type: TypeRef,
    pub entities: Vec<TypeId>,
    pub value_objects: Vec<TypeId>,
    pub domain_events: Vec<TypeId>,
    pub driven_port: Option<TypeId>,
    pub invariants: Vec<Invariant>,
}

impl AggregateRoot {
    /// Declared type of the identity field
    pub fn identity_type(&self) -> TypeId {
        TypeId::from(&self.identity_field.type_ref)
    }

    /// Whether `id` is this aggregate's identity or effective identity type
    pub fn is_identified_by(&self, id: &TypeId) -> bool {
        self.identity_type() == *id
            || self.effective_identity_type.raw_name() == id.qualified_name()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entity {
    pub id: TypeId,
    pub structure: TypeStructure,
    pub trace: ClassificationTrace,
    pub identity_field: Option<Field>,
    pub owning_aggregate: Option<TypeId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueObject {
    pub id: TypeId,
    pub structure: TypeStructure,
    pub trace: ClassificationTrace,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identifier {
    pub id: TypeId,
    pub structure: TypeStructure,
    pub trace: ClassificationTrace,
    pub wrapped_type: Option<TypeRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainEvent {
    pub id: TypeId,
    pub structure: TypeStructure,
    pub trace: ClassificationTrace,
    pub aggregate_id_field: Option<Field>,
    pub timestamp_field: Option<Field>,
    pub source_aggregate: Option<TypeId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainService {
    pub id: TypeId,
    pub structure: TypeStructure,
    pub trace: ClassificationTrace,
    pub injected_ports: Vec<TypeId>,
    /// Names of command, query and business methods
    pub operations: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UseCaseType {
    Command,
    Query,
    CommandQuery,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UseCase {
    pub name: String,
    pub use_case_type: UseCaseType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrivingPort {
    pub id: TypeId,
    pub structure: TypeStructure,
    pub trace: ClassificationTrace,
    pub use_cases: Vec<UseCase>,
    pub input_types: Vec<TypeRef>,
    pub output_types: Vec<TypeRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrivenPort {
    pub id: TypeId,
    pub structure: TypeStructure,
    pub trace: ClassificationTrace,
    pub port_kind: DrivenPortKind,
    /// Only set for repositories
    pub managed_aggregate: Option<TypeId>,
}

impl DrivenPort {
    pub fn is_repository(&self) -> bool {
        self.port_kind == DrivenPortKind::Repository
    }
}

/// Application service, command handler or query handler
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationType {
    pub id: TypeId,
    pub structure: TypeStructure,
    pub trace: ClassificationTrace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnclassifiedCategory {
    Conflicting,
    OutOfScope,
    Utility,
    Technical,
    Ambiguous,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnclassifiedType {
    pub id: TypeId,
    pub structure: TypeStructure,
    pub trace: ClassificationTrace,
    pub category: UnclassifiedCategory,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "variant", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArchType {
    AggregateRoot(AggregateRoot),
    Entity(Entity),
    ValueObject(ValueObject),
    Identifier(Identifier),
    DomainEvent(DomainEvent),
    DomainService(DomainService),
    DrivingPort(DrivingPort),
    DrivenPort(DrivenPort),
    ApplicationService(ApplicationType),
    CommandHandler(ApplicationType),
    QueryHandler(ApplicationType),
    Unclassified(UnclassifiedType),
}

impl ArchType {
    pub fn id(&self) -> &TypeId {
        match self {
            Self::AggregateRoot(t) => &t.id,
            Self::Entity(t) => &t.id,
            Self::ValueObject(t) => &t.id,
            Self::Identifier(t) => &t.id,
            Self::DomainEvent(t) => &t.id,
            Self::DomainService(t) => &t.id,
            Self::DrivingPort(t) => &t.id,
            Self::DrivenPort(t) => &t.id,
            Self::ApplicationService(t) | Self::CommandHandler(t) | Self::QueryHandler(t) => &t.id,
            Self::Unclassified(t) => &t.id,
        }
    }

    pub fn structure(&self) -> &TypeStructure {
        match self {
            Self::AggregateRoot(t) => &t.structure,
            Self::Entity(t) => &t.structure,
            Self::ValueObject(t) => &t.structure,
            Self::Identifier(t) => &t.structure,
            Self::DomainEvent(t) => &t.structure,
            Self::DomainService(t) => &t.structure,
            Self::DrivingPort(t) => &t.structure,
            Self::DrivenPort(t) => &t.structure,
            Self::ApplicationService(t) | Self::CommandHandler(t) | Self::QueryHandler(t) => {
                &t.structure
            }
            Self::Unclassified(t) => &t.structure,
        }
    }

    pub fn trace(&self) -> &ClassificationTrace {
        match self {
            Self::AggregateRoot(t) => &t.trace,
            Self::Entity(t) => &t.trace,
            Self::ValueObject(t) => &t.trace,
            Self::Identifier(t) => &t.trace,
            Self::DomainEvent(t) => &t.trace,
            Self::DomainService(t) => &t.trace,
            Self::DrivingPort(t) => &t.trace,
            Self::DrivenPort(t) => &t.trace,
            Self::ApplicationService(t) | Self::CommandHandler(t) | Self::QueryHandler(t) => {
                &t.trace
            }
            Self::Unclassified(t) => &t.trace,
        }
    }

    /// Architectural kind of the built type (not of the raw classification)
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::AggregateRoot(_) => ElementKind::AggregateRoot,
            Self::Entity(_) => ElementKind::Entity,
            Self::ValueObject(_) => ElementKind::ValueObject,
            Self::Identifier(_) => ElementKind::Identifier,
            Self::DomainEvent(_) => ElementKind::DomainEvent,
            Self::DomainService(_) => ElementKind::DomainService,
            Self::DrivingPort(_) => ElementKind::DrivingPort,
            Self::DrivenPort(p) => ElementKind::DrivenPort(p.port_kind),
            Self::ApplicationService(_) => ElementKind::ApplicationService,
            Self::CommandHandler(_) => ElementKind::CommandHandler,
            Self::QueryHandler(_) => ElementKind::QueryHandler,
            Self::Unclassified(_) => ElementKind::Unclassified,
        }
    }

    pub fn is_domain(&self) -> bool {
        self.kind().is_domain()
    }

    pub fn is_port(&self) -> bool {
        self.kind().is_port()
    }

    pub fn is_application(&self) -> bool {
        self.kind().is_application()
    }
}

/// Typed view into [`ArchType`], used for lookups by variant
pub trait ArchVariant {
    fn from_arch(arch: &ArchType) -> Option<&Self>;
}

impl ArchVariant for AggregateRoot {
    fn from_arch(arch: &ArchType) -> Option<&Self> {
        match arch {
            ArchType::AggregateRoot(t) => Some(t),
            _ => None,
        }
    }
}

impl ArchVariant for Entity {
    fn from_arch(arch: &ArchType) -> Option<&Self> {
        match arch {
            ArchType::Entity(t) => Some(t),
            _ => None,
        }
    }
}

impl ArchVariant for ValueObject {
    fn from_arch(arch: &ArchType) -> Option<&Self> {
        match arch {
            ArchType::ValueObject(t) => Some(t),
            _ => None,
        }
    }
}

impl ArchVariant for Identifier {
    fn from_arch(arch: &ArchType) -> Option<&Self> {
        match arch {
            ArchType::Identifier(t) => Some(t),
            _ => None,
        }
    }
}

impl ArchVariant for DomainEvent {
    fn from_arch(arch: &ArchType) -> Option<&Self> {
        match arch {
            ArchType::DomainEvent(t) => Some(t),
            _ => None,
        }
    }
}

impl ArchVariant for DomainService {
    fn from_arch(arch: &ArchType) -> Option<&Self> {
        match arch {
            ArchType::DomainService(t) => Some(t),
            _ => None,
        }
    }
}

impl ArchVariant for DrivingPort {
    fn from_arch(arch: &ArchType) -> Option<&Self> {
        match arch {
            ArchType::DrivingPort(t) => Some(t),
            _ => None,
        }
    }
}

impl ArchVariant for DrivenPort {
    fn from_arch(arch: &ArchType) -> Option<&Self> {
        match arch {
            ArchType::DrivenPort(t) => Some(t),
            _ => None,
        }
    }
}

impl ArchVariant for ApplicationType {
    fn from_arch(arch: &ArchType) -> Option<&Self> {
        match arch {
            ArchType::ApplicationService(t)
            | ArchType::CommandHandler(t)
            | ArchType::QueryHandler(t) => Some(t),
            _ => None,
        }
    }
}

impl ArchVariant for UnclassifiedType {
    fn from_arch(arch: &ArchType) -> Option<&Self> {
        match arch {
            ArchType::Unclassified(t) => Some(t),
            _ => None,
        }
    }
}
