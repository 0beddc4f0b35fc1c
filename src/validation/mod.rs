//! Architectural constraint validation.
//!
//! Each validator checks one rule against the frozen registry and the type
//! dependency graph and reports every breach it finds as a [`Violation`].
//! Violations are output values, never errors, and a validator never stops
//! at the first one.

mod cycles;
mod ddd;
mod frameworks;
mod hexagonal;
mod layers;

pub use cycles::find_cycles;
pub use ddd::{
    AggregateBoundaryValidator, AggregateConsistencyValidator, AggregateCycleValidator,
    AggregateRepositoryValidator, DomainPurityValidator, EntityIdentityValidator,
    EventNamingValidator, ValueObjectImmutabilityValidator,
};
pub use frameworks::framework_of;
pub use hexagonal::{
    ApplicationPurityValidator, DependencyDirectionValidator, DependencyInversionValidator,
    LayerIsolationValidator, PortCoverageValidator, PortDirectionValidator,
    PortInterfaceValidator,
};
pub use layers::{Layer, LayerClassifier};

use rayon::prelude::*;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::config::{ConstraintConfig, ParallelConfig};
use crate::metrics::DependencyGraph;
use crate::model::{TypeId, TypeRegistry};
use crate::relationships::RelationshipGraph;

/// Violation severity, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Info,
    Minor,
    Major,
    Critical,
    Blocker,
}

impl Severity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Minor => "MINOR",
            Self::Major => "MAJOR",
            Self::Critical => "CRITICAL",
            Self::Blocker => "BLOCKER",
        }
    }

    pub fn is_at_least(self, other: Severity) -> bool {
        self >= other
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of a built-in architectural rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConstraintId {
    EntityIdentity,
    AggregateRepository,
    ValueObjectImmutable,
    AggregateCycle,
    AggregateConsistency,
    DomainPurity,
    EventNaming,
    AggregateBoundary,
    PortInterface,
    DependencyDirection,
    LayerIsolation,
    PortDirection,
    DependencyInversion,
    PortCoverage,
    ApplicationPurity,
}

impl ConstraintId {
    pub const ALL: [ConstraintId; 15] = [
        Self::EntityIdentity,
        Self::AggregateRepository,
        Self::ValueObjectImmutable,
        Self::AggregateCycle,
        Self::AggregateConsistency,
        Self::DomainPurity,
        Self::EventNaming,
        Self::AggregateBoundary,
        Self::PortInterface,
        Self::DependencyDirection,
        Self::LayerIsolation,
        Self::PortDirection,
        Self::DependencyInversion,
        Self::PortCoverage,
        Self::ApplicationPurity,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EntityIdentity => "ddd:entity-identity",
            Self::AggregateRepository => "ddd:aggregate-repository",
            Self::ValueObjectImmutable => "ddd:value-object-immutable",
            Self::AggregateCycle => "ddd:aggregate-cycle",
            Self::AggregateConsistency => "ddd:aggregate-consistency",
            Self::DomainPurity => "ddd:domain-purity",
            Self::EventNaming => "ddd:event-naming",
            Self::AggregateBoundary => "ddd:aggregate-boundary",
            Self::PortInterface => "hexagonal:port-interface",
            Self::DependencyDirection => "hexagonal:dependency-direction",
            Self::LayerIsolation => "hexagonal:layer-isolation",
            Self::PortDirection => "hexagonal:port-direction",
            Self::DependencyInversion => "hexagonal:dependency-inversion",
            Self::PortCoverage => "hexagonal:port-coverage",
            Self::ApplicationPurity => "hexagonal:application-purity",
        }
    }
}

impl fmt::Display for ConstraintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConstraintId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| format!("unknown constraint id '{s}'"))
    }
}

impl Serialize for ConstraintId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Where a violation is reported; types carry no line information, so the
/// declaration start is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceLocation {
    pub type_name: String,
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn of_type(id: &TypeId) -> Self {
        Self {
            type_name: id.qualified_name().to_string(),
            line: 1,
            column: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationEvidence {
    /// A shape problem in the listed types
    Structural {
        description: String,
        types: Vec<TypeId>,
    },
    /// An offending dependency edge
    Dependency {
        description: String,
        source: TypeId,
        target: TypeId,
    },
    /// Cycle members in traversal order, first member not repeated
    Cycle { path: Vec<TypeId> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub constraint_id: ConstraintId,
    pub severity: Severity,
    pub message: String,
    pub affected_types: Vec<TypeId>,
    pub location: Option<SourceLocation>,
    pub evidence: Vec<ViolationEvidence>,
}

impl Violation {
    pub fn new(
        constraint_id: ConstraintId,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            constraint_id,
            severity,
            message: message.into(),
            affected_types: Vec::new(),
            location: None,
            evidence: Vec::new(),
        }
    }

    /// Add an affected type; the first one also becomes the location
    #[must_use]
    pub fn affecting(mut self, id: &TypeId) -> Self {
        if self.location.is_none() {
            self.location = Some(SourceLocation::of_type(id));
        }
        self.affected_types.push(id.clone());
        self
    }

    #[must_use]
    pub fn with_evidence(mut self, evidence: ViolationEvidence) -> Self {
        self.evidence.push(evidence);
        self
    }

    fn sort_key(&self) -> (std::cmp::Reverse<Severity>, &'static str, Option<&str>) {
        (
            std::cmp::Reverse(self.severity),
            self.constraint_id.as_str(),
            self.affected_types.first().map(TypeId::qualified_name),
        )
    }
}

/// Read-only inputs shared by every validator beyond registry and graph
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    pub relationships: &'a RelationshipGraph,
    pub max_aggregate_entities: usize,
}

impl<'a> ValidationContext<'a> {
    pub fn new(relationships: &'a RelationshipGraph) -> Self {
        Self {
            relationships,
            max_aggregate_entities: ConstraintConfig::default().max_aggregate_entities,
        }
    }

    #[must_use]
    pub fn with_max_aggregate_entities(mut self, max: usize) -> Self {
        self.max_aggregate_entities = max;
        self
    }
}

pub trait ConstraintValidator: Send + Sync {
    fn id(&self) -> ConstraintId;

    fn default_severity(&self) -> Severity;

    fn validate(
        &self,
        registry: &TypeRegistry,
        deps: &DependencyGraph,
        ctx: &ValidationContext<'_>,
    ) -> Vec<Violation>;

    /// A violation of this constraint at its default severity
    fn violation(&self, message: impl Into<String>) -> Violation
    where
        Self: Sized,
    {
        Violation::new(self.id(), self.default_severity(), message)
    }
}

/// Runs validators and orders their combined output
pub struct ValidationEngine {
    validators: Vec<Box<dyn ConstraintValidator>>,
    config: ConstraintConfig,
    parallel: bool,
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::from_config(&ConstraintConfig::default(), &ParallelConfig::default())
    }
}

impl ValidationEngine {
    pub fn new(
        validators: Vec<Box<dyn ConstraintValidator>>,
        config: ConstraintConfig,
        parallel: bool,
    ) -> Self {
        Self {
            validators,
            config,
            parallel,
        }
    }

    /// All built-in validators
    pub fn from_config(config: &ConstraintConfig, parallel: &ParallelConfig) -> Self {
        Self::new(
            vec![
                Box::new(EntityIdentityValidator),
                Box::new(AggregateRepositoryValidator),
                Box::new(ValueObjectImmutabilityValidator),
                Box::new(AggregateCycleValidator),
                Box::new(AggregateConsistencyValidator),
                Box::new(DomainPurityValidator),
                Box::new(EventNamingValidator),
                Box::new(AggregateBoundaryValidator),
                Box::new(PortInterfaceValidator),
                Box::new(DependencyDirectionValidator),
                Box::new(LayerIsolationValidator),
                Box::new(PortDirectionValidator),
                Box::new(DependencyInversionValidator),
                Box::new(PortCoverageValidator),
                Box::new(ApplicationPurityValidator),
            ],
            config.clone(),
            parallel.enabled,
        )
    }

    /// Ids of the validators that will run under the current configuration
    pub fn enabled(&self) -> Vec<ConstraintId> {
        self.validators
            .iter()
            .map(|v| v.id())
            .filter(|id| self.config.is_enabled(*id))
            .collect()
    }

    fn run_one(
        &self,
        validator: &dyn ConstraintValidator,
        registry: &TypeRegistry,
        deps: &DependencyGraph,
        ctx: &ValidationContext<'_>,
    ) -> Vec<Violation> {
        let mut violations = validator.validate(registry, deps, ctx);
        if let Some(severity) = self.config.severity_for(validator.id()) {
            for violation in &mut violations {
                violation.severity = severity;
            }
        }
        debug!(
            constraint = %validator.id(),
            violations = violations.len(),
            "Constraint validated"
        );
        violations
    }

    /// Violations of every enabled constraint, most severe first
    pub fn validate_all(
        &self,
        registry: &TypeRegistry,
        deps: &DependencyGraph,
        relationships: &RelationshipGraph,
    ) -> Vec<Violation> {
        let ctx = ValidationContext::new(relationships)
            .with_max_aggregate_entities(self.config.max_aggregate_entities);
        let enabled: Vec<&dyn ConstraintValidator> = self
            .validators
            .iter()
            .map(|v| v.as_ref())
            .filter(|v| self.config.is_enabled(v.id()))
            .collect();

        let mut violations: Vec<Violation> = if self.parallel {
            enabled
                .par_iter()
                .flat_map_iter(|v| self.run_one(*v, registry, deps, &ctx))
                .collect()
        } else {
            enabled
                .iter()
                .flat_map(|v| self.run_one(*v, registry, deps, &ctx))
                .collect()
        };

        violations.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        debug!(total = violations.len(), "Validation complete");
        violations
    }
}
