//! Ports-and-adapters rules.

use std::collections::BTreeSet;

use super::{
    framework_of, ConstraintId, ConstraintValidator, Layer, LayerClassifier, Severity,
    ValidationContext, Violation, ViolationEvidence,
};
use crate::metrics::DependencyGraph;
use crate::model::{DrivenPort, DrivingPort, TypeId, TypeRegistry};
use crate::relationships::RelationType;

fn dependency_evidence(description: &str, source: &str, target: &str) -> ViolationEvidence {
    ViolationEvidence::Dependency {
        description: description.to_string(),
        source: TypeId::new(source),
        target: TypeId::new(target),
    }
}

/// Ports are contracts and must be declared as interfaces
pub struct PortInterfaceValidator;

impl ConstraintValidator for PortInterfaceValidator {
    fn id(&self) -> ConstraintId {
        ConstraintId::PortInterface
    }

    fn default_severity(&self) -> Severity {
        Severity::Critical
    }

    fn validate(
        &self,
        registry: &TypeRegistry,
        _deps: &DependencyGraph,
        _ctx: &ValidationContext<'_>,
    ) -> Vec<Violation> {
        registry
            .all()
            .filter(|arch| arch.is_port() && !arch.structure().is_interface())
            .map(|arch| {
                self.violation(format!(
                    "Port '{}' is a {:?}, not an interface",
                    arch.id().simple_name(),
                    arch.structure().form
                ))
                .affecting(arch.id())
            })
            .collect()
    }
}

/// Each layer may only depend on the layers its allow-list names
pub struct LayerIsolationValidator;

impl ConstraintValidator for LayerIsolationValidator {
    fn id(&self) -> ConstraintId {
        ConstraintId::LayerIsolation
    }

    fn default_severity(&self) -> Severity {
        Severity::Major
    }

    fn validate(
        &self,
        registry: &TypeRegistry,
        deps: &DependencyGraph,
        _ctx: &ValidationContext<'_>,
    ) -> Vec<Violation> {
        let layers = LayerClassifier::new(registry, deps);
        deps.edges()
            .filter_map(|(from, to)| {
                let source = layers.layer_of(from);
                let target = layers.layer_of(to);
                // Unknown types have no allow-list and constrain nobody
                if source == Layer::Unclassified
                    || target == Layer::Unclassified
                    || source.may_depend_on(target)
                {
                    return None;
                }
                Some(
                    self.violation(format!(
                        "{source} type '{}' must not depend on {target} type '{}'",
                        TypeId::new(from).simple_name(),
                        TypeId::new(to).simple_name()
                    ))
                    .affecting(&TypeId::new(from))
                    .with_evidence(dependency_evidence(
                        &format!("{source} may depend on {:?}", source.allowed_targets()),
                        from,
                        to,
                    )),
                )
            })
            .collect()
    }
}

/// Dependencies point inward: the domain never reaches infrastructure
pub struct DependencyDirectionValidator;

impl ConstraintValidator for DependencyDirectionValidator {
    fn id(&self) -> ConstraintId {
        ConstraintId::DependencyDirection
    }

    fn default_severity(&self) -> Severity {
        Severity::Blocker
    }

    fn validate(
        &self,
        registry: &TypeRegistry,
        deps: &DependencyGraph,
        _ctx: &ValidationContext<'_>,
    ) -> Vec<Violation> {
        let layers = LayerClassifier::new(registry, deps);
        deps.edges()
            .filter(|(from, to)| {
                layers.layer_of(from) == Layer::Domain
                    && layers.layer_of(to) == Layer::Infrastructure
            })
            .map(|(from, to)| {
                let source = TypeId::new(from);
                self.violation(format!(
                    "Domain type '{}' depends on infrastructure type '{}'",
                    source.simple_name(),
                    TypeId::new(to).simple_name()
                ))
                .affecting(&source)
                .with_evidence(dependency_evidence(
                    "Infrastructure depends on the domain, never the reverse",
                    from,
                    to,
                ))
            })
            .collect()
    }
}

/// Application code talks to ports, not to the adapters behind them
pub struct DependencyInversionValidator;

impl ConstraintValidator for DependencyInversionValidator {
    fn id(&self) -> ConstraintId {
        ConstraintId::DependencyInversion
    }

    fn default_severity(&self) -> Severity {
        Severity::Critical
    }

    fn validate(
        &self,
        registry: &TypeRegistry,
        deps: &DependencyGraph,
        _ctx: &ValidationContext<'_>,
    ) -> Vec<Violation> {
        let layers = LayerClassifier::new(registry, deps);
        deps.edges()
            .filter(|(from, to)| {
                layers.layer_of(from) == Layer::Application && layers.is_adapter(to)
            })
            .map(|(from, to)| {
                let ports: Vec<&str> = deps
                    .implementors()
                    .iter()
                    .filter(|(_, implementors)| implementors.iter().any(|i| i == to))
                    .filter_map(|(port, _)| registry.get_by_name(port))
                    .filter(|arch| arch.is_port())
                    .map(|arch| arch.id().simple_name())
                    .collect();
                let source = TypeId::new(from);
                self.violation(format!(
                    "Application type '{}' depends on adapter '{}' instead of {}",
                    source.simple_name(),
                    TypeId::new(to).simple_name(),
                    ports.join(", ")
                ))
                .affecting(&source)
                .with_evidence(dependency_evidence(
                    "Depend on the port the adapter implements",
                    from,
                    to,
                ))
            })
            .collect()
    }
}

/// Registered types and implementors that realize `port`
fn implementors_of<'a>(
    port: &TypeId,
    registry: &'a TypeRegistry,
    deps: &'a DependencyGraph,
    ctx: &ValidationContext<'a>,
) -> BTreeSet<&'a str> {
    let declared = deps
        .implementors()
        .get(port.qualified_name())
        .into_iter()
        .flatten()
        .map(String::as_str);
    let structural = registry
        .all()
        .filter(|arch| {
            arch.structure()
                .interfaces
                .iter()
                .any(|i| i.raw_name() == port.qualified_name())
        })
        .map(|arch| arch.id().qualified_name());
    let related = ctx
        .relationships
        .to(port)
        .filter(|r| r.relation_type == RelationType::Implements)
        .map(|r| r.source.qualified_name());
    declared.chain(structural).chain(related).collect()
}

/// Every port needs at least one implementation
pub struct PortCoverageValidator;

impl ConstraintValidator for PortCoverageValidator {
    fn id(&self) -> ConstraintId {
        ConstraintId::PortCoverage
    }

    fn default_severity(&self) -> Severity {
        Severity::Major
    }

    fn validate(
        &self,
        registry: &TypeRegistry,
        deps: &DependencyGraph,
        ctx: &ValidationContext<'_>,
    ) -> Vec<Violation> {
        registry
            .all()
            .filter(|arch| arch.is_port())
            .filter(|arch| implementors_of(arch.id(), registry, deps, ctx).is_empty())
            .map(|arch| {
                self.violation(format!(
                    "Port '{}' has no implementation",
                    arch.id().simple_name()
                ))
                .affecting(arch.id())
            })
            .collect()
    }
}

/// Driven ports are called by application services; driving ports are
/// implemented by them
pub struct PortDirectionValidator;

impl PortDirectionValidator {
    fn is_used_by(
        port: &TypeId,
        application: &BTreeSet<&str>,
        registry: &TypeRegistry,
        deps: &DependencyGraph,
        ctx: &ValidationContext<'_>,
    ) -> bool {
        let by_dependency = application.iter().any(|app| {
            deps.dependencies_of(app)
                .any(|target| target == port.qualified_name())
                || registry
                    .get_by_name(app)
                    .is_some_and(|arch| {
                        arch.structure()
                            .referenced_types()
                            .contains(port.qualified_name())
                    })
        });
        by_dependency
            || ctx
                .relationships
                .to(port)
                .any(|r| application.contains(r.source.qualified_name()))
    }
}

impl ConstraintValidator for PortDirectionValidator {
    fn id(&self) -> ConstraintId {
        ConstraintId::PortDirection
    }

    fn default_severity(&self) -> Severity {
        Severity::Major
    }

    fn validate(
        &self,
        registry: &TypeRegistry,
        deps: &DependencyGraph,
        ctx: &ValidationContext<'_>,
    ) -> Vec<Violation> {
        let application: BTreeSet<&str> = registry
            .all()
            .filter(|arch| arch.is_application())
            .map(|arch| arch.id().qualified_name())
            .collect();
        if application.is_empty() {
            return Vec::new();
        }

        let driven = registry
            .all_of::<DrivenPort>()
            .filter(|port| !Self::is_used_by(&port.id, &application, registry, deps, ctx))
            .map(|port| {
                self.violation(format!(
                    "DRIVEN port '{}' is not used by any application service",
                    port.id.simple_name()
                ))
                .affecting(&port.id)
            });
        let driving = registry
            .all_of::<DrivingPort>()
            .filter(|port| {
                implementors_of(&port.id, registry, deps, ctx)
                    .is_disjoint(&application)
            })
            .map(|port| {
                self.violation(format!(
                    "DRIVING port '{}' is not implemented by any application service",
                    port.id.simple_name()
                ))
                .affecting(&port.id)
            });
        driven.chain(driving).collect()
    }
}

/// Application services orchestrate ports and stay free of frameworks.
///
/// Registered application types are checked, and so is every other
/// declared type living in an `.application.` package.
pub struct ApplicationPurityValidator;

impl ApplicationPurityValidator {
    fn check(&self, name: &str, deps: &DependencyGraph) -> Option<Violation> {
        let mut forbidden: Vec<(&str, &'static str)> = deps
            .dependencies_of(name)
            .chain(deps.external_dependencies_of(name))
            .filter_map(|dep| framework_of(dep).map(|category| (dep, category)))
            .collect();
        if forbidden.is_empty() {
            return None;
        }
        forbidden.sort_unstable();
        forbidden.dedup();

        let source = TypeId::new(name);
        let violation = self
            .violation(format!(
                "Application type '{}' has {} forbidden infrastructure import(s)",
                source.simple_name(),
                forbidden.len()
            ))
            .affecting(&source);
        Some(forbidden.into_iter().fold(violation, |v, (dep, category)| {
            v.with_evidence(dependency_evidence(
                &format!("Forbidden {category} dependency: {dep}"),
                name,
                dep,
            ))
        }))
    }
}

impl ConstraintValidator for ApplicationPurityValidator {
    fn id(&self) -> ConstraintId {
        ConstraintId::ApplicationPurity
    }

    fn default_severity(&self) -> Severity {
        Severity::Major
    }

    fn validate(
        &self,
        registry: &TypeRegistry,
        deps: &DependencyGraph,
        _ctx: &ValidationContext<'_>,
    ) -> Vec<Violation> {
        let registered: BTreeSet<&str> = registry
            .all()
            .filter(|arch| arch.is_application())
            .map(|arch| arch.id().qualified_name())
            .collect();
        let by_package = deps
            .names()
            .filter(|name| name.contains(".application.") && !registered.contains(name));

        registered
            .iter()
            .copied()
            .chain(by_package)
            .filter_map(|name| self.check(name, deps))
            .collect()
    }
}
