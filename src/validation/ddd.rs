//! Tactical domain-driven design rules.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::{
    find_cycles, framework_of, ConstraintId, ConstraintValidator, Severity, ValidationContext,
    Violation, ViolationEvidence,
};
use crate::classification::ElementKind;
use crate::graph::package_of;
use crate::index::PortIndex;
use crate::metrics::{aggregate_members, DependencyGraph};
use crate::model::{
    AggregateRoot, ArchType, DomainEvent, Entity, TypeId, TypeRegistry, TypeStructure,
    UnclassifiedCategory, UnclassifiedType,
};
use crate::roles::MethodRole;

/// Entities, and aggregate roots downgraded for lack of one, need an identity
pub struct EntityIdentityValidator;

impl ConstraintValidator for EntityIdentityValidator {
    fn id(&self) -> ConstraintId {
        ConstraintId::EntityIdentity
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
        let entities = registry
            .all_of::<Entity>()
            .filter(|e| e.identity_field.is_none())
            .map(|e| (&e.id, "Entity"));
        let downgraded_roots = registry
            .all_of::<UnclassifiedType>()
            .filter(|u| {
                u.category == UnclassifiedCategory::Ambiguous
                    && u.trace.kind == ElementKind::AggregateRoot
            })
            .map(|u| (&u.id, "AggregateRoot"));

        entities
            .chain(downgraded_roots)
            .map(|(id, kind)| {
                self.violation(format!("{kind} '{}' has no identity field", id.simple_name()))
                    .affecting(id)
                    .with_evidence(ViolationEvidence::Structural {
                        description: "Entities are distinguished by identity, not by attributes"
                            .into(),
                        types: vec![id.clone()],
                    })
            })
            .collect()
    }
}

/// Every aggregate root needs a repository that persists it
pub struct AggregateRepositoryValidator;

impl ConstraintValidator for AggregateRepositoryValidator {
    fn id(&self) -> ConstraintId {
        ConstraintId::AggregateRepository
    }

    fn default_severity(&self) -> Severity {
        Severity::Major
    }

    fn validate(
        &self,
        registry: &TypeRegistry,
        _deps: &DependencyGraph,
        _ctx: &ValidationContext<'_>,
    ) -> Vec<Violation> {
        let ports = PortIndex::from_registry(registry);
        registry
            .all_of::<AggregateRoot>()
            .filter(|root| ports.repository_for(&root.id).is_none())
            .map(|root| {
                self.violation(format!(
                    "Aggregate root '{}' has no repository",
                    root.id.simple_name()
                ))
                .affecting(&root.id)
            })
            .collect()
    }
}

/// Mutable state of a value object or identifier, as field names and setters
fn mutable_members(structure: &TypeStructure) -> Vec<String> {
    let fields = structure
        .fields
        .iter()
        .filter(|f| !structure.is_record() && !f.is_final())
        .map(|f| format!("field '{}'", f.name));
    let setters = structure
        .methods_with_role(MethodRole::Setter)
        .map(|m| format!("setter '{}'", m.name));
    fields.chain(setters).collect()
}

/// Value objects and identifiers must be immutable
pub struct ValueObjectImmutabilityValidator;

impl ConstraintValidator for ValueObjectImmutabilityValidator {
    fn id(&self) -> ConstraintId {
        ConstraintId::ValueObjectImmutable
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
            .filter(|arch| matches!(arch, ArchType::ValueObject(_) | ArchType::Identifier(_)))
            .filter_map(|arch| {
                let mutable = mutable_members(arch.structure());
                if mutable.is_empty() {
                    return None;
                }
                Some(
                    self.violation(format!(
                        "{} '{}' is mutable: {}",
                        arch.kind(),
                        arch.id().simple_name(),
                        mutable.join(", ")
                    ))
                    .affecting(arch.id())
                    .with_evidence(ViolationEvidence::Structural {
                        description: "Value objects are replaced, never modified".into(),
                        types: vec![arch.id().clone()],
                    }),
                )
            })
            .collect()
    }
}

/// Aggregates must not depend on each other in a cycle
pub struct AggregateCycleValidator;

impl ConstraintValidator for AggregateCycleValidator {
    fn id(&self) -> ConstraintId {
        ConstraintId::AggregateCycle
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
        let roots: Vec<&TypeId> = registry.all_of::<AggregateRoot>().map(|r| &r.id).collect();
        let slot: HashMap<&str, usize> = roots
            .iter()
            .enumerate()
            .map(|(i, id)| (id.qualified_name(), i))
            .collect();
        let adjacency: Vec<Vec<usize>> = roots
            .iter()
            .map(|id| {
                deps.dependencies_of(id.qualified_name())
                    .filter_map(|target| slot.get(target).copied())
                    .collect()
            })
            .collect();

        find_cycles(&adjacency)
            .into_iter()
            .map(|cycle| {
                let path: Vec<TypeId> = cycle.iter().map(|&i| roots[i].clone()).collect();
                let rendered = path
                    .iter()
                    .chain(path.first())
                    .map(TypeId::simple_name)
                    .collect::<Vec<_>>()
                    .join(" -> ");
                path.iter()
                    .fold(
                        self.violation(format!("Cycle between aggregates: {rendered}")),
                        |v, id| v.affecting(id),
                    )
                    .with_evidence(ViolationEvidence::Cycle { path })
            })
            .collect()
    }
}

/// An entity belongs to one aggregate, and aggregates stay small
pub struct AggregateConsistencyValidator;

impl ConstraintValidator for AggregateConsistencyValidator {
    fn id(&self) -> ConstraintId {
        ConstraintId::AggregateConsistency
    }

    fn default_severity(&self) -> Severity {
        Severity::Major
    }

    fn validate(
        &self,
        registry: &TypeRegistry,
        _deps: &DependencyGraph,
        ctx: &ValidationContext<'_>,
    ) -> Vec<Violation> {
        let mut owners: BTreeMap<&TypeId, Vec<&TypeId>> = BTreeMap::new();
        let mut violations = Vec::new();

        for root in registry.all_of::<AggregateRoot>() {
            for entity in &root.entities {
                owners.entry(entity).or_default().push(&root.id);
            }
            if root.entities.len() > ctx.max_aggregate_entities {
                violations.push(
                    self.violation(format!(
                        "Aggregate '{}' contains {} entities (max {})",
                        root.id.simple_name(),
                        root.entities.len(),
                        ctx.max_aggregate_entities
                    ))
                    .affecting(&root.id)
                    .with_evidence(ViolationEvidence::Structural {
                        description: "Large aggregates widen the transactional boundary".into(),
                        types: root.entities.clone(),
                    }),
                );
            }
        }

        for (entity, roots) in owners.into_iter().filter(|(_, roots)| roots.len() > 1) {
            let names: Vec<&str> = roots.iter().map(|r| r.simple_name()).collect();
            let violation = self
                .violation(format!(
                    "Entity '{}' is owned by {} aggregates: {}",
                    entity.simple_name(),
                    roots.len(),
                    names.join(", ")
                ))
                .affecting(entity)
                .with_evidence(ViolationEvidence::Structural {
                    description: "An entity belongs to exactly one aggregate".into(),
                    types: roots.iter().map(|r| (*r).clone()).collect(),
                });
            violations.push(roots.into_iter().fold(violation, |v, r| v.affecting(r)));
        }
        violations
    }
}

/// True when `package` is `root_package` or one of its sub-packages
fn within_package(package: &str, root_package: &str) -> bool {
    package
        .strip_prefix(root_package)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
}

/// Entities inside an aggregate are reached only through its root
pub struct AggregateBoundaryValidator;

impl ConstraintValidator for AggregateBoundaryValidator {
    fn id(&self) -> ConstraintId {
        ConstraintId::AggregateBoundary
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
        let mut violations = Vec::new();
        for root in registry.all_of::<AggregateRoot>() {
            let inside = aggregate_members(root);
            let root_package = root.id.package_name();
            for entity in &root.entities {
                let outsiders: BTreeSet<&str> = deps
                    .edges()
                    .filter(|(from, to)| *to == entity.qualified_name() && !inside.contains(from))
                    .map(|(from, _)| from)
                    .filter(|from| !within_package(package_of(from), root_package))
                    .collect();
                if outsiders.is_empty() {
                    continue;
                }
                violations.push(
                    self.violation(format!(
                        "Entity '{}' of aggregate '{}' is accessible outside the aggregate: {}",
                        entity.simple_name(),
                        root.id.simple_name(),
                        outsiders.into_iter().collect::<Vec<_>>().join(", ")
                    ))
                    .affecting(entity)
                    .with_evidence(ViolationEvidence::Structural {
                        description: format!(
                            "Reach '{}' through its aggregate root '{}'",
                            entity.simple_name(),
                            root.id.simple_name()
                        ),
                        types: vec![entity.clone()],
                    }),
                );
            }
        }
        violations
    }
}

/// Domain types must not reach into infrastructure frameworks
pub struct DomainPurityValidator;

impl ConstraintValidator for DomainPurityValidator {
    fn id(&self) -> ConstraintId {
        ConstraintId::DomainPurity
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
        registry
            .all()
            .filter(|arch| arch.is_domain())
            .filter_map(|arch| {
                let structure = arch.structure();
                let mut forbidden: Vec<&str> = structure
                    .referenced_types()
                    .into_iter()
                    .chain(structure.annotations.iter().map(|a| a.qualified_name.as_str()))
                    .chain(deps.dependencies_of(arch.id().qualified_name()))
                    .filter(|name| framework_of(name).is_some())
                    .collect();
                forbidden.sort_unstable();
                forbidden.dedup();
                if forbidden.is_empty() {
                    return None;
                }
                let evidence = forbidden.iter().map(|name| ViolationEvidence::Dependency {
                    description: "Framework dependency in the domain layer".into(),
                    source: arch.id().clone(),
                    target: TypeId::new(*name),
                });
                Some(evidence.fold(
                    self.violation(format!(
                        "Domain type '{}' depends on infrastructure: {}",
                        arch.id().simple_name(),
                        forbidden.join(", ")
                    ))
                    .affecting(arch.id()),
                    Violation::with_evidence,
                ))
            })
            .collect()
    }
}

const IRREGULAR_PARTICIPLES: &[&str] = &[
    "Begun", "Bought", "Broken", "Brought", "Built", "Chosen", "Done", "Drawn", "Found",
    "Frozen", "Given", "Held", "Kept", "Known", "Left", "Lost", "Made", "Paid", "Put", "Read",
    "Run", "Seen", "Sent", "Set", "Shown", "Sold", "Spent", "Split", "Taken", "Thrown", "Undone",
    "Withdrawn", "Won", "Written",
];

/// Last camel-case word of `name`
fn last_word(name: &str) -> &str {
    let start = name
        .char_indices()
        .filter(|(_, c)| c.is_uppercase())
        .map(|(i, _)| i)
        .last()
        .unwrap_or(0);
    &name[start..]
}

/// `OrderPlaced`, `OrderPlacedEvent` and `PaymentSent` are past tense
pub fn is_past_tense_event_name(simple_name: &str) -> bool {
    let stem = simple_name
        .strip_suffix("Event")
        .filter(|s| !s.is_empty())
        .unwrap_or(simple_name);
    let word = last_word(stem);
    word.ends_with("ed") || IRREGULAR_PARTICIPLES.contains(&word)
}

/// Domain events describe facts, so they are named in the past tense
pub struct EventNamingValidator;

impl ConstraintValidator for EventNamingValidator {
    fn id(&self) -> ConstraintId {
        ConstraintId::EventNaming
    }

    fn default_severity(&self) -> Severity {
        Severity::Minor
    }

    fn validate(
        &self,
        registry: &TypeRegistry,
        _deps: &DependencyGraph,
        _ctx: &ValidationContext<'_>,
    ) -> Vec<Violation> {
        registry
            .all_of::<DomainEvent>()
            .filter(|event| !is_past_tense_event_name(event.id.simple_name()))
            .map(|event| {
                self.violation(format!(
                    "Domain event '{}' is not named in the past tense",
                    event.id.simple_name()
                ))
                .affecting(&event.id)
            })
            .collect()
    }
}
