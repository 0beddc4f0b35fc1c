//! One builder per architectural variant.
//!
//! Builders are pure functions of (node, classification, context). Only
//! [`AggregateRootBuilder`] can fail, with [`Error::MissingIdentity`];
//! the pipeline turns that failure into an ambiguous unclassified type.
//!
//! [`Error::MissingIdentity`]: crate::errors::Error::MissingIdentity

mod aggregate;
mod domain;
mod event;
mod port;
mod service;
mod unclassified;

pub use aggregate::AggregateRootBuilder;
pub use domain::{EntityBuilder, IdentifierBuilder, ValueObjectBuilder};
pub use event::DomainEventBuilder;
pub use port::{DrivenPortBuilder, DrivingPortBuilder};
pub use service::{ApplicationTypeBuilder, DomainServiceBuilder};
pub use unclassified::{UnclassifiedCategoryDetector, UnclassifiedTypeBuilder};

use super::arch::ArchType;
use super::context::BuilderContext;
use crate::classification::ClassificationResult;
use crate::errors::Result;
use crate::graph::TypeNode;

pub trait ArchTypeBuilder: Send + Sync {
    fn build(
        &self,
        node: &TypeNode,
        classification: &ClassificationResult,
        ctx: &BuilderContext<'_>,
    ) -> Result<ArchType>;
}

/// Appends `item` unless already present, keeping first-seen order
pub(crate) fn push_distinct<T: PartialEq>(items: &mut Vec<T>, item: T) {
    if !items.contains(&item) {
        items.push(item);
    }
}
