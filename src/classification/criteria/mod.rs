//! Classification criteria.
//!
//! A criterion is a predicate over one type node plus a fixed priority.
//! When it matches it proposes a kind with its own confidence; the
//! [`Classifier`](super::Classifier) arbitrates between proposals.

mod application;
mod context;
mod domain;
mod port;

pub use application::{ApplicationServiceCriterion, HandlerNamingCriterion};
pub use context::ClassificationContext;
pub use domain::{
    EmbeddedValueObjectCriterion, ExplicitAnnotationCriterion, HasIdentityCriterion,
    InheritedClassificationCriterion, MarkerInterfaceCriterion, NamingDomainEventCriterion,
    NamingDomainServiceCriterion, RecordSingleIdCriterion, RepositoryDominantCriterion,
};
pub use port::{InjectedAsDependencyCriterion, PackageDirectionCriterion, PortNamingCriterion};

use super::kind::{ConfidenceLevel, DrivenPortKind, ElementKind};
use super::result::Evidence;
use crate::graph::TypeNode;

/// Priority of explicit markers (annotations, marker interfaces)
pub const PRIORITY_EXPLICIT: u32 = 100;
/// Priority of strong structural or naming heuristics
pub const PRIORITY_STRONG: u32 = 80;
pub const PRIORITY_INHERITED: u32 = 75;
pub const PRIORITY_MEDIUM: u32 = 70;
pub const PRIORITY_NAMING: u32 = 65;
pub const PRIORITY_WEAK: u32 = 60;
pub const PRIORITY_FALLBACK: u32 = 50;

/// A criterion's proposal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CriterionMatch {
    pub kind: ElementKind,
    pub confidence: ConfidenceLevel,
    pub justification: String,
    pub evidence: Vec<Evidence>,
}

impl CriterionMatch {
    pub fn new(
        kind: ElementKind,
        confidence: ConfidenceLevel,
        justification: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            confidence,
            justification: justification.into(),
            evidence: Vec::new(),
        }
    }

    pub fn with_evidence(mut self, evidence: Evidence) -> Self {
        self.evidence.push(evidence);
        self
    }
}

pub trait ClassificationCriterion: Send + Sync {
    /// Stable identifier, reported in results and conflicts
    fn name(&self) -> &str;

    fn priority(&self) -> u32;

    fn evaluate(&self, node: &TypeNode, ctx: &ClassificationContext<'_>) -> Option<CriterionMatch>;
}

/// Default criteria, in tie-break order
pub fn default_criteria() -> Vec<Box<dyn ClassificationCriterion>> {
    use ElementKind as K;

    vec![
        // explicit domain markers
        Box::new(ExplicitAnnotationCriterion::new(
            "explicit-aggregate-root",
            &["org.jmolecules.ddd.annotation.AggregateRoot"],
            K::AggregateRoot,
        )),
        Box::new(ExplicitAnnotationCriterion::new(
            "explicit-entity",
            &["org.jmolecules.ddd.annotation.Entity"],
            K::Entity,
        )),
        Box::new(ExplicitAnnotationCriterion::new(
            "explicit-value-object",
            &["org.jmolecules.ddd.annotation.ValueObject"],
            K::ValueObject,
        )),
        Box::new(ExplicitAnnotationCriterion::new(
            "explicit-domain-event",
            &[
                "org.jmolecules.event.annotation.DomainEvent",
                "org.jmolecules.event.annotation.Externalized",
            ],
            K::DomainEvent,
        )),
        Box::new(ExplicitAnnotationCriterion::new(
            "explicit-domain-service",
            &["org.jmolecules.ddd.annotation.Service"],
            K::DomainService,
        )),
        Box::new(MarkerInterfaceCriterion::new(
            "jmolecules-aggregate-root",
            "org.jmolecules.ddd.types.AggregateRoot",
            K::AggregateRoot,
        )),
        Box::new(MarkerInterfaceCriterion::new(
            "jmolecules-entity",
            "org.jmolecules.ddd.types.Entity",
            K::Entity,
        )),
        Box::new(MarkerInterfaceCriterion::new(
            "jmolecules-value-object",
            "org.jmolecules.ddd.types.ValueObject",
            K::ValueObject,
        )),
        Box::new(MarkerInterfaceCriterion::new(
            "jmolecules-identifier",
            "org.jmolecules.ddd.types.Identifier",
            K::Identifier,
        )),
        Box::new(MarkerInterfaceCriterion::new(
            "jmolecules-domain-event",
            "org.jmolecules.event.types.DomainEvent",
            K::DomainEvent,
        )),
        // explicit port markers
        Box::new(ExplicitAnnotationCriterion::new(
            "explicit-repository",
            &["org.jmolecules.ddd.annotation.Repository"],
            K::REPOSITORY,
        )),
        Box::new(MarkerInterfaceCriterion::new(
            "jmolecules-repository",
            "org.jmolecules.ddd.types.Repository",
            K::REPOSITORY,
        )),
        Box::new(ExplicitAnnotationCriterion::new(
            "explicit-primary-port",
            &["org.jmolecules.architecture.hexagonal.PrimaryPort"],
            K::DrivingPort,
        )),
        Box::new(ExplicitAnnotationCriterion::new(
            "explicit-secondary-port",
            &["org.jmolecules.architecture.hexagonal.SecondaryPort"],
            K::DrivenPort(DrivenPortKind::Other),
        )),
        // strong heuristics
        Box::new(RepositoryDominantCriterion),
        Box::new(RecordSingleIdCriterion),
        Box::new(PortNamingCriterion::new("naming-repository", &["Repository"], K::REPOSITORY)),
        Box::new(PortNamingCriterion::new("naming-use-case", &["UseCase"], K::DrivingPort)),
        Box::new(PortNamingCriterion::new(
            "naming-gateway",
            &["Gateway"],
            K::DrivenPort(DrivenPortKind::Gateway),
        )),
        Box::new(PortNamingCriterion::new(
            "naming-event-publisher",
            &["EventPublisher", "Publisher"],
            K::DrivenPort(DrivenPortKind::EventPublisher),
        )),
        Box::new(PortNamingCriterion::new(
            "naming-notification",
            &["Notifier", "NotificationSender"],
            K::DrivenPort(DrivenPortKind::Notification),
        )),
        Box::new(InheritedClassificationCriterion),
        // medium heuristics
        Box::new(EmbeddedValueObjectCriterion),
        Box::new(ApplicationServiceCriterion),
        Box::new(HandlerNamingCriterion::new(
            "naming-command-handler",
            "CommandHandler",
            K::CommandHandler,
        )),
        Box::new(HandlerNamingCriterion::new(
            "naming-query-handler",
            "QueryHandler",
            K::QueryHandler,
        )),
        Box::new(NamingDomainEventCriterion),
        // weak heuristics
        Box::new(HasIdentityCriterion),
        Box::new(NamingDomainServiceCriterion),
        Box::new(PackageDirectionCriterion::inbound()),
        Box::new(PackageDirectionCriterion::outbound()),
        Box::new(InjectedAsDependencyCriterion),
    ]
}
