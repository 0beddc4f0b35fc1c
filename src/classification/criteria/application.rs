use super::context::ClassificationContext;
use super::port::package_indicates;
use super::{ClassificationCriterion, CriterionMatch, PRIORITY_MEDIUM};
use crate::classification::kind::{ConfidenceLevel, ElementKind};
use crate::classification::result::{Evidence, EvidenceType};
use crate::graph::{package_of, simple_name_of, TypeNode};

/// `*ApplicationService`, or a class implementing a driving-port interface
pub struct ApplicationServiceCriterion;

impl ClassificationCriterion for ApplicationServiceCriterion {
    fn name(&self) -> &str {
        "application-service"
    }

    fn priority(&self) -> u32 {
        PRIORITY_MEDIUM
    }

    fn evaluate(
        &self,
        node: &TypeNode,
        _ctx: &ClassificationContext<'_>,
    ) -> Option<CriterionMatch> {
        if node.is_interface() {
            return None;
        }
        let simple = node.simple_name();
        if simple.ends_with("ApplicationService") {
            return Some(
                CriterionMatch::new(
                    ElementKind::ApplicationService,
                    ConfidenceLevel::Medium,
                    format!("Name '{simple}' ends with ApplicationService"),
                )
                .with_evidence(Evidence::new(EvidenceType::Naming, "ApplicationService suffix")),
            );
        }
        let port = node.interfaces.iter().find(|i| {
            simple_name_of(i.raw_name()).ends_with("UseCase")
                || package_indicates(package_of(i.raw_name()), true)
        })?;
        Some(
            CriterionMatch::new(
                ElementKind::ApplicationService,
                ConfidenceLevel::Medium,
                format!("Implements driving port {}", port.simple_name()),
            )
            .with_evidence(
                Evidence::new(EvidenceType::Relationship, "Implements driving port")
                    .with_related([port.qualified_name.clone()]),
            ),
        )
    }
}

/// Class name ending with a handler suffix
pub struct HandlerNamingCriterion {
    name: &'static str,
    suffix: &'static str,
    kind: ElementKind,
}

impl HandlerNamingCriterion {
    pub const fn new(name: &'static str, suffix: &'static str, kind: ElementKind) -> Self {
        Self { name, suffix, kind }
    }
}

impl ClassificationCriterion for HandlerNamingCriterion {
    fn name(&self) -> &str {
        self.name
    }

    fn priority(&self) -> u32 {
        PRIORITY_MEDIUM
    }

    fn evaluate(
        &self,
        node: &TypeNode,
        _ctx: &ClassificationContext<'_>,
    ) -> Option<CriterionMatch> {
        let simple = node.simple_name();
        if node.is_interface() || !simple.ends_with(self.suffix) {
            return None;
        }
        Some(
            CriterionMatch::new(
                self.kind,
                ConfidenceLevel::Medium,
                format!("Name '{simple}' ends with {}", self.suffix),
            )
            .with_evidence(Evidence::new(EvidenceType::Naming, format!("{} suffix", self.suffix))),
        )
    }
}
