use super::context::{instance_fields, ClassificationContext};
use super::{
    ClassificationCriterion, CriterionMatch, PRIORITY_EXPLICIT, PRIORITY_INHERITED,
    PRIORITY_MEDIUM, PRIORITY_NAMING, PRIORITY_STRONG, PRIORITY_WEAK,
};
use crate::classification::kind::{ConfidenceLevel, ElementKind};
use crate::classification::result::{Evidence, EvidenceType};
use crate::graph::TypeNode;

/// Domain markers recognised on supertypes, by annotation or interface
const INHERITABLE_MARKERS: &[(&str, ElementKind)] = &[
    ("org.jmolecules.ddd.annotation.AggregateRoot", ElementKind::AggregateRoot),
    ("org.jmolecules.ddd.annotation.Entity", ElementKind::Entity),
    ("org.jmolecules.ddd.annotation.ValueObject", ElementKind::ValueObject),
    ("org.jmolecules.ddd.types.AggregateRoot", ElementKind::AggregateRoot),
    ("org.jmolecules.ddd.types.Entity", ElementKind::Entity),
    ("org.jmolecules.ddd.types.ValueObject", ElementKind::ValueObject),
    ("org.jmolecules.ddd.types.Identifier", ElementKind::Identifier),
];

/// Type carries one of a fixed set of annotations
pub struct ExplicitAnnotationCriterion {
    name: &'static str,
    annotations: &'static [&'static str],
    kind: ElementKind,
}

impl ExplicitAnnotationCriterion {
    pub const fn new(
        name: &'static str,
        annotations: &'static [&'static str],
        kind: ElementKind,
    ) -> Self {
        Self {
            name,
            annotations,
            kind,
        }
    }
}

impl ClassificationCriterion for ExplicitAnnotationCriterion {
    fn name(&self) -> &str {
        self.name
    }

    fn priority(&self) -> u32 {
        PRIORITY_EXPLICIT
    }

    fn evaluate(
        &self,
        node: &TypeNode,
        _ctx: &ClassificationContext<'_>,
    ) -> Option<CriterionMatch> {
        // Port markers only make sense on interfaces
        if self.kind.is_port() && !node.is_interface() {
            return None;
        }
        let annotation = node
            .annotations
            .iter()
            .find(|a| self.annotations.contains(&a.qualified_name.as_str()))?;
        Some(
            CriterionMatch::new(
                self.kind,
                ConfidenceLevel::Explicit,
                format!("Annotated with @{}", annotation.simple_name()),
            )
            .with_evidence(Evidence::new(
                EvidenceType::Annotation,
                annotation.qualified_name.clone(),
            )),
        )
    }
}

/// Type implements a marker interface directly
pub struct MarkerInterfaceCriterion {
    name: &'static str,
    interface: &'static str,
    kind: ElementKind,
}

impl MarkerInterfaceCriterion {
    pub const fn new(name: &'static str, interface: &'static str, kind: ElementKind) -> Self {
        Self {
            name,
            interface,
            kind,
        }
    }
}

impl ClassificationCriterion for MarkerInterfaceCriterion {
    fn name(&self) -> &str {
        self.name
    }

    fn priority(&self) -> u32 {
        PRIORITY_EXPLICIT
    }

    fn evaluate(
        &self,
        node: &TypeNode,
        _ctx: &ClassificationContext<'_>,
    ) -> Option<CriterionMatch> {
        if !node.implements(self.interface) {
            return None;
        }
        Some(
            CriterionMatch::new(
                self.kind,
                ConfidenceLevel::Explicit,
                format!("Implements {}", self.interface),
            )
            .with_evidence(Evidence::new(EvidenceType::Relationship, self.interface)),
        )
    }
}

/// A class with identity that a repository interface manages
pub struct RepositoryDominantCriterion;

impl ClassificationCriterion for RepositoryDominantCriterion {
    fn name(&self) -> &str {
        "repository-dominant"
    }

    fn priority(&self) -> u32 {
        PRIORITY_STRONG
    }

    fn evaluate(&self, node: &TypeNode, ctx: &ClassificationContext<'_>) -> Option<CriterionMatch> {
        if node.is_interface() || node.is_enum() || !ctx.has_identity(node) {
            return None;
        }
        let repositories = ctx.repositories_mentioning(&node.qualified_name);
        if repositories.is_empty() {
            return None;
        }
        Some(
            CriterionMatch::new(
                ElementKind::AggregateRoot,
                ConfidenceLevel::High,
                format!("Has identity and is managed by {}", repositories.join(", ")),
            )
            .with_evidence(
                Evidence::new(EvidenceType::Relationship, "Managed by repository")
                    .with_related(repositories.iter().cloned()),
            ),
        )
    }
}

/// `record FooId(UUID value)`
pub struct RecordSingleIdCriterion;

impl ClassificationCriterion for RecordSingleIdCriterion {
    fn name(&self) -> &str {
        "record-single-id"
    }

    fn priority(&self) -> u32 {
        PRIORITY_STRONG
    }

    fn evaluate(&self, node: &TypeNode, ctx: &ClassificationContext<'_>) -> Option<CriterionMatch> {
        let simple = node.simple_name();
        if !node.is_record() || simple.len() <= 2 || !simple.ends_with("Id") {
            return None;
        }
        let mut fields = instance_fields(ctx.graph, node);
        let only = fields.next()?;
        if fields.next().is_some() {
            return None;
        }
        Some(
            CriterionMatch::new(
                ElementKind::Identifier,
                ConfidenceLevel::High,
                format!(
                    "Single-component record '{simple}' wrapping {}",
                    only.type_ref.simple_name()
                ),
            )
            .with_evidence(Evidence::new(
                EvidenceType::Structure,
                "Record with exactly one component",
            )),
        )
    }
}

/// Supertype or interface carries a domain marker
pub struct InheritedClassificationCriterion;

impl InheritedClassificationCriterion {
    fn marker_of(node: &TypeNode) -> Option<(&'static str, ElementKind)> {
        INHERITABLE_MARKERS
            .iter()
            .find(|(marker, _)| node.has_annotation(marker) || node.implements(marker))
            .copied()
    }
}

impl ClassificationCriterion for InheritedClassificationCriterion {
    fn name(&self) -> &str {
        "inherited-classification"
    }

    fn priority(&self) -> u32 {
        PRIORITY_INHERITED
    }

    fn evaluate(&self, node: &TypeNode, ctx: &ClassificationContext<'_>) -> Option<CriterionMatch> {
        if node.is_interface() {
            return None;
        }
        let mut visited = vec![node.qualified_name.as_str()];
        let mut pending: Vec<&str> = node
            .super_type
            .iter()
            .chain(node.interfaces.iter())
            .map(|t| t.raw_name())
            .collect();

        while let Some(name) = pending.pop() {
            if visited.contains(&name) {
                continue;
            }
            visited.push(name);
            let Some(parent) = ctx.graph.type_by_qualified_name(name) else {
                continue;
            };
            if let Some((marker, kind)) = Self::marker_of(parent) {
                return Some(
                    CriterionMatch::new(
                        kind,
                        ConfidenceLevel::High,
                        format!("Inherits {} from {}", kind, parent.simple_name()),
                    )
                    .with_evidence(
                        Evidence::new(EvidenceType::Relationship, marker)
                            .with_related([parent.qualified_name.clone()]),
                    ),
                );
            }
            pending.extend(
                parent
                    .super_type
                    .iter()
                    .chain(parent.interfaces.iter())
                    .map(|t| t.raw_name()),
            );
        }
        None
    }
}

/// Identity-less type embedded by identity-bearing types
pub struct EmbeddedValueObjectCriterion;

impl ClassificationCriterion for EmbeddedValueObjectCriterion {
    fn name(&self) -> &str {
        "embedded-value-object"
    }

    fn priority(&self) -> u32 {
        PRIORITY_MEDIUM
    }

    fn evaluate(&self, node: &TypeNode, ctx: &ClassificationContext<'_>) -> Option<CriterionMatch> {
        if node.is_interface() || node.is_enum() || ctx.has_identity(node) {
            return None;
        }
        let holders: Vec<&TypeNode> = ctx
            .embedders_of(&node.qualified_name)
            .iter()
            .filter(|h| **h != node.qualified_name)
            .filter_map(|h| ctx.graph.type_by_qualified_name(h))
            .filter(|h| ctx.has_identity(h) || ctx.is_value_object_candidate(&h.qualified_name))
            .collect();
        if holders.is_empty() {
            return None;
        }

        let held_by_identity = holders.iter().any(|h| ctx.has_identity(h));
        let confidence = if ctx.is_immutable(node) && held_by_identity {
            ConfidenceLevel::High
        } else {
            ConfidenceLevel::Medium
        };
        Some(
            CriterionMatch::new(
                ElementKind::ValueObject,
                confidence,
                format!("Embedded without identity in {} type(s)", holders.len()),
            )
            .with_evidence(
                Evidence::new(EvidenceType::Relationship, "Embedded by")
                    .with_related(holders.iter().map(|h| h.qualified_name.clone())),
            ),
        )
    }
}

/// `*Event` classes
pub struct NamingDomainEventCriterion;

impl ClassificationCriterion for NamingDomainEventCriterion {
    fn name(&self) -> &str {
        "naming-domain-event"
    }

    fn priority(&self) -> u32 {
        PRIORITY_NAMING
    }

    fn evaluate(
        &self,
        node: &TypeNode,
        _ctx: &ClassificationContext<'_>,
    ) -> Option<CriterionMatch> {
        let simple = node.simple_name();
        if node.is_interface()
            || node.is_enum()
            || simple == "Event"
            || !simple.ends_with("Event")
        {
            return None;
        }
        Some(
            CriterionMatch::new(
                ElementKind::DomainEvent,
                ConfidenceLevel::Medium,
                format!("Name '{simple}' ends with Event"),
            )
            .with_evidence(Evidence::new(EvidenceType::Naming, "Event suffix")),
        )
    }
}

/// Any concrete type with an identity field
pub struct HasIdentityCriterion;

impl ClassificationCriterion for HasIdentityCriterion {
    fn name(&self) -> &str {
        "has-identity"
    }

    fn priority(&self) -> u32 {
        PRIORITY_WEAK
    }

    fn evaluate(&self, node: &TypeNode, ctx: &ClassificationContext<'_>) -> Option<CriterionMatch> {
        if node.is_interface() || node.is_enum() || !ctx.has_identity(node) {
            return None;
        }
        Some(
            CriterionMatch::new(
                ElementKind::Entity,
                ConfidenceLevel::Medium,
                "Declares an identity field",
            )
            .with_evidence(Evidence::new(EvidenceType::Structure, "Identity field")),
        )
    }
}

/// `*DomainService`, or a stateless `*Service` in a domain package
pub struct NamingDomainServiceCriterion;

impl ClassificationCriterion for NamingDomainServiceCriterion {
    fn name(&self) -> &str {
        "naming-domain-service"
    }

    fn priority(&self) -> u32 {
        PRIORITY_WEAK
    }

    fn evaluate(&self, node: &TypeNode, ctx: &ClassificationContext<'_>) -> Option<CriterionMatch> {
        if node.is_interface() || node.is_enum() {
            return None;
        }
        let simple = node.simple_name();
        let explicit_name = simple.ends_with("DomainService");
        let in_domain = node.package_name().split('.').any(|s| s == "domain");
        let stateless = instance_fields(ctx.graph, node).all(|f| {
            ctx.graph
                .type_by_qualified_name(f.type_ref.raw_name())
                .is_some_and(TypeNode::is_interface)
        });
        if !(explicit_name || (simple.ends_with("Service") && in_domain && stateless)) {
            return None;
        }
        Some(
            CriterionMatch::new(
                ElementKind::DomainService,
                ConfidenceLevel::Medium,
                format!("Service '{simple}' holds no domain state"),
            )
            .with_evidence(Evidence::new(EvidenceType::Naming, "Service suffix")),
        )
    }
}
