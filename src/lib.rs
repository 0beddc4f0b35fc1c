// Export modules for library usage
pub mod analyzer;
pub mod classification;
pub mod config;
pub mod errors;
pub mod graph;
pub mod index;
pub mod metrics;
pub mod model;
pub mod observability;
pub mod relationships;
pub mod roles;
pub mod validation;

// Re-export commonly used types
pub use crate::analyzer::{ArchitectureAnalyzer, ArchitectureReport};

pub use crate::classification::{
    ClassificationResult, ClassificationResults, Classifier, ConfidenceLevel, Conflict,
    DrivenPortKind, ElementKind,
};

pub use crate::config::{AnalysisConfig, ConstraintConfig, MetricThresholds, ParallelConfig};

pub use crate::errors::{Error, Result};

pub use crate::graph::{
    DependencyGraphQuery, FieldNode, InMemoryTypeGraph, MethodNode, TypeGraphQuery, TypeNode,
    TypeRef,
};

pub use crate::index::{CompositionIndex, DomainIndex, PortIndex};

pub use crate::metrics::{DependencyGraph, Metric, MetricsEngine, PackageMetrics, PackageZone};

pub use crate::model::{ArchType, ModelBuilder, TypeId, TypeRegistry};

pub use crate::relationships::{RelationType, Relationship, RelationshipGraph};

pub use crate::validation::{ConstraintId, Severity, ValidationEngine, Violation};
