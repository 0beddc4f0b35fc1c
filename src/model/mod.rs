//! Strongly typed architectural model.
//!
//! [`ModelBuilder`] turns classified graph nodes into [`ArchType`] values
//! and freezes them in a [`TypeRegistry`]. Everything downstream reads
//! the registry only.

pub mod arch;
pub mod builders;
mod context;
mod pipeline;
mod registry;
mod report;
mod types;

pub use arch::{
    AggregateRoot, ApplicationType, ArchType, ArchVariant, DomainEvent, DomainService, DrivenPort,
    DrivingPort, Entity, Identifier, Invariant, UnclassifiedCategory, UnclassifiedType, UseCase,
    UseCaseType, ValueObject,
};
pub use context::BuilderContext;
pub use pipeline::ModelBuilder;
pub use registry::{TypeRegistry, TypeRegistryBuilder};
pub use report::{ClassificationReport, ConflictEntry};
pub use types::{
    ClassificationTrace, Constructor, Field, Method, Parameter, TypeId, TypeStructure,
};
