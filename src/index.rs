//! Read-only views derived from a frozen [`TypeRegistry`].
//!
//! Indexes hold ids only; callers resolve them back through the registry.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::model::{
    AggregateRoot, ArchVariant, DomainEvent, DomainService, DrivenPort, DrivingPort, Entity,
    Identifier, TypeId, TypeRegistry, ValueObject,
};
use crate::roles::FieldRole;

fn ids_of<T: ArchVariant>(
    registry: &TypeRegistry,
    id: impl Fn(&T) -> &TypeId,
) -> Vec<TypeId> {
    registry.all_of::<T>().map(|t| id(t).clone()).collect()
}

/// Domain-layer types grouped by variant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DomainIndex {
    pub aggregate_roots: Vec<TypeId>,
    pub entities: Vec<TypeId>,
    pub value_objects: Vec<TypeId>,
    pub identifiers: Vec<TypeId>,
    pub domain_events: Vec<TypeId>,
    pub domain_services: Vec<TypeId>,
    entity_owner: BTreeMap<TypeId, TypeId>,
}

impl DomainIndex {
    pub fn from_registry(registry: &TypeRegistry) -> Self {
        let mut entity_owner = BTreeMap::new();
        for root in registry.all_of::<AggregateRoot>() {
            for entity in &root.entities {
                entity_owner
                    .entry(entity.clone())
                    .or_insert_with(|| root.id.clone());
            }
        }
        for entity in registry.all_of::<Entity>() {
            if let Some(owner) = &entity.owning_aggregate {
                if registry.contains(owner) {
                    entity_owner
                        .entry(entity.id.clone())
                        .or_insert_with(|| owner.clone());
                }
            }
        }

        Self {
            aggregate_roots: ids_of::<AggregateRoot>(registry, |t| &t.id),
            entities: ids_of::<Entity>(registry, |t| &t.id),
            value_objects: ids_of::<ValueObject>(registry, |t| &t.id),
            identifiers: ids_of::<Identifier>(registry, |t| &t.id),
            domain_events: ids_of::<DomainEvent>(registry, |t| &t.id),
            domain_services: ids_of::<DomainService>(registry, |t| &t.id),
            entity_owner,
        }
    }

    /// Aggregate that contains `entity`, preferring the root's own entity list
    pub fn aggregate_for_entity(&self, entity: &TypeId) -> Option<&TypeId> {
        self.entity_owner.get(entity)
    }

    pub fn len(&self) -> usize {
        self.aggregate_roots.len()
            + self.entities.len()
            + self.value_objects.len()
            + self.identifiers.len()
            + self.domain_events.len()
            + self.domain_services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PortIndex {
    pub driving_ports: Vec<TypeId>,
    pub driven_ports: Vec<TypeId>,
    pub repositories: Vec<TypeId>,
    repository_by_aggregate: BTreeMap<TypeId, TypeId>,
}

impl PortIndex {
    pub fn from_registry(registry: &TypeRegistry) -> Self {
        let mut repository_by_aggregate = BTreeMap::new();
        let mut repositories = Vec::new();
        for port in registry.all_of::<DrivenPort>().filter(|p| p.is_repository()) {
            repositories.push(port.id.clone());
            if let Some(aggregate) = &port.managed_aggregate {
                repository_by_aggregate
                    .entry(aggregate.clone())
                    .or_insert_with(|| port.id.clone());
            }
        }
        // Name-based association from the aggregate side fills the gaps
        for root in registry.all_of::<AggregateRoot>() {
            if let Some(port) = &root.driven_port {
                if repositories.contains(port) {
                    repository_by_aggregate
                        .entry(root.id.clone())
                        .or_insert_with(|| port.clone());
                }
            }
        }

        Self {
            driving_ports: ids_of::<DrivingPort>(registry, |t| &t.id),
            driven_ports: ids_of::<DrivenPort>(registry, |t| &t.id),
            repositories,
            repository_by_aggregate,
        }
    }

    pub fn repository_for(&self, aggregate: &TypeId) -> Option<&TypeId> {
        self.repository_by_aggregate.get(aggregate)
    }

    pub fn len(&self) -> usize {
        self.driving_ports.len() + self.driven_ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Embedding, cross-aggregate reference and identity ownership facts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompositionIndex {
    embeds: BTreeMap<TypeId, Vec<TypeId>>,
    embedded_in: BTreeMap<TypeId, Vec<TypeId>>,
    references: BTreeMap<TypeId, Vec<TypeId>>,
    referenced_by: BTreeMap<TypeId, Vec<TypeId>>,
    identifier_of: BTreeMap<TypeId, TypeId>,
    aggregate_of: BTreeMap<TypeId, TypeId>,
}

fn push_unique(map: &mut BTreeMap<TypeId, Vec<TypeId>>, key: &TypeId, value: &TypeId) {
    let values = map.entry(key.clone()).or_default();
    if !values.contains(value) {
        values.push(value.clone());
    }
}

impl CompositionIndex {
    pub fn from_registry(registry: &TypeRegistry) -> Self {
        let mut index = Self::default();

        for root in registry.all_of::<AggregateRoot>() {
            let identity = root.identity_type();
            index.identifier_of.insert(root.id.clone(), identity.clone());
            index
                .aggregate_of
                .entry(identity)
                .or_insert_with(|| root.id.clone());
        }

        for arch in registry.all() {
            let source = arch.id();
            for field in &arch.structure().fields {
                let target = TypeId::from(field.target_type());
                if &target == source || !registry.contains(&target) {
                    continue;
                }
                if field.has_role(FieldRole::Embedded) {
                    push_unique(&mut index.embeds, source, &target);
                    push_unique(&mut index.embedded_in, &target, source);
                }
                let referenced = if field.has_role(FieldRole::AggregateReference) {
                    Some(target.clone())
                } else if field.has_role(FieldRole::Identity) {
                    None
                } else {
                    index.aggregate_of.get(&target).cloned()
                };
                if let Some(aggregate) = referenced.filter(|a| a != source) {
                    push_unique(&mut index.references, source, &aggregate);
                    push_unique(&mut index.referenced_by, &aggregate, source);
                }
            }
        }
        index
    }

    /// Types embedded as fields of `container`
    pub fn embedded_by(&self, container: &TypeId) -> &[TypeId] {
        self.embeds.get(container).map(Vec::as_slice).unwrap_or_default()
    }

    /// Containers embedding `embedded`
    pub fn embedded_in(&self, embedded: &TypeId) -> &[TypeId] {
        self.embedded_in.get(embedded).map(Vec::as_slice).unwrap_or_default()
    }

    /// Aggregates referenced from `source` by aggregate type or foreign identifier
    pub fn references_from(&self, source: &TypeId) -> &[TypeId] {
        self.references.get(source).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn referenced_by(&self, aggregate: &TypeId) -> &[TypeId] {
        self.referenced_by.get(aggregate).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn identifier_of(&self, aggregate: &TypeId) -> Option<&TypeId> {
        self.identifier_of.get(aggregate)
    }

    /// Aggregate whose identity type is `identifier`
    pub fn aggregate_of(&self, identifier: &TypeId) -> Option<&TypeId> {
        self.aggregate_of.get(identifier)
    }

    /// (container, embedded) pairs that cross a package boundary
    pub fn cross_package(&self) -> Vec<(&TypeId, &TypeId)> {
        self.embeds
            .iter()
            .flat_map(|(container, targets)| targets.iter().map(move |t| (container, t)))
            .filter(|(container, target)| container.package_name() != target.package_name())
            .collect()
    }
}
