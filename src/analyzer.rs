//! End-to-end analysis of one type graph.
//!
//! Phases run strictly in order. Classification and model building may fan
//! out across types; once the registry is frozen, indexes, relationships,
//! metrics and validators only read it.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, info_span};

use crate::classification::{ClassificationResults, Classifier};
use crate::config::AnalysisConfig;
use crate::graph::{DependencyGraphQuery, TypeGraphQuery};
use crate::index::{CompositionIndex, DomainIndex, PortIndex};
use crate::metrics::{package_metrics, DependencyGraph, Metric, MetricsEngine, PackageMetrics};
use crate::model::{ClassificationReport, ModelBuilder, TypeRegistry};
use crate::observability::{set_phase, AnalysisPhase};
use crate::relationships::{RelationshipGraph, RelationshipGraphBuilder};
use crate::validation::{Severity, ValidationEngine, Violation};

/// Run `f` inside the span and thread-local marker of `phase`
fn in_phase<R>(phase: AnalysisPhase, f: impl FnOnce() -> R) -> R {
    let span = info_span!("phase", phase = %phase);
    let _entered = span.enter();
    let _guard = set_phase(phase);
    f()
}

/// Everything one analysis run produces
#[derive(Debug, Clone, Serialize)]
pub struct ArchitectureReport {
    pub classifications: ClassificationResults,
    pub registry: TypeRegistry,
    pub classification_report: ClassificationReport,
    pub domain_index: DomainIndex,
    pub port_index: PortIndex,
    #[serde(skip)]
    pub composition_index: CompositionIndex,
    pub relationships: RelationshipGraph,
    pub metrics: Vec<Metric>,
    pub packages: Vec<PackageMetrics>,
    pub violations: Vec<Violation>,
}

impl ArchitectureReport {
    pub fn metric(&self, name: &str) -> Option<&Metric> {
        self.metrics.iter().find(|m| m.name == name)
    }

    pub fn violations_at_least(&self, severity: Severity) -> impl Iterator<Item = &Violation> {
        self.violations
            .iter()
            .filter(move |v| v.severity.is_at_least(severity))
    }

    /// Any BLOCKER violation
    pub fn is_blocking(&self) -> bool {
        self.violations_at_least(Severity::Blocker).next().is_some()
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Default)]
pub struct ArchitectureAnalyzer {
    config: AnalysisConfig,
    classifier: Classifier,
}

impl ArchitectureAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            classifier: Classifier::default(),
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn analyze(
        &self,
        types: &dyn TypeGraphQuery,
        dependencies: &dyn DependencyGraphQuery,
    ) -> Result<ArchitectureReport> {
        let config = &self.config;

        let classifications = in_phase(AnalysisPhase::Classification, || {
            self.classifier
                .classify_all(types, &config.classification, &config.parallel)
        });

        let registry = in_phase(AnalysisPhase::ModelBuilding, || {
            ModelBuilder::new(config.classification.clone(), config.parallel.clone())
                .build(types, &classifications)
        })
        .context("Failed to build architectural model")?;

        let (classification_report, domain_index, port_index, composition_index) =
            in_phase(AnalysisPhase::Indexing, || {
                (
                    ClassificationReport::from_registry(&registry),
                    DomainIndex::from_registry(&registry),
                    PortIndex::from_registry(&registry),
                    CompositionIndex::from_registry(&registry),
                )
            });

        let relationships = in_phase(AnalysisPhase::RelationshipBuilding, || {
            RelationshipGraphBuilder.build(&registry)
        });

        let ports = registry
            .all()
            .filter(|arch| arch.is_port())
            .map(|arch| arch.id().qualified_name());
        let deps = DependencyGraph::from_query(dependencies, ports).with_abstractness(types);

        let (metrics, packages) = in_phase(AnalysisPhase::Metrics, || {
            let engine = MetricsEngine::from_config(&config.metrics, &config.parallel);
            (
                engine.calculate_all(&registry, &deps),
                package_metrics(&registry, &deps),
            )
        });

        let violations = in_phase(AnalysisPhase::Validation, || {
            ValidationEngine::from_config(&config.constraints, &config.parallel)
                .validate_all(&registry, &deps, &relationships)
        });

        info!(
            types = registry.len(),
            relationships = relationships.len(),
            violations = violations.len(),
            "Architecture analysis complete"
        );

        Ok(ArchitectureReport {
            classifications,
            registry,
            classification_report,
            domain_index,
            port_index,
            composition_index,
            relationships,
            metrics,
            packages,
            violations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{InMemoryTypeGraph, TypeDecl};
    use crate::observability::current_phase;

    #[test]
    fn test_in_phase_restores_previous_phase() {
        assert_eq!(current_phase(), None);
        let inner = in_phase(AnalysisPhase::Metrics, current_phase);
        assert_eq!(inner, Some(AnalysisPhase::Metrics));
        assert_eq!(current_phase(), None);
    }

    #[test]
    fn test_empty_graph_yields_empty_report() {
        let graph = InMemoryTypeGraph::default();
        let report = ArchitectureAnalyzer::default().analyze(&graph, &graph).unwrap();
        assert!(report.registry.is_empty());
        assert!(report.violations.is_empty());
        assert!(!report.is_blocking());
        assert_eq!(report.metric("propagation.cost").map(|m| m.value), Some(0.0));
    }

    #[test]
    fn test_report_serializes() {
        let graph = InMemoryTypeGraph::builder()
            .with_type(TypeDecl::class("s.Order").field("id", "long"))
            .build();
        let report = ArchitectureAnalyzer::default().analyze(&graph, &graph).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&report.to_json_pretty().unwrap()).unwrap();
        assert!(json.get("registry").is_some());
        assert!(json.get("composition_index").is_none());
    }
}
