use super::context::ClassificationContext;
use super::{
    ClassificationCriterion, CriterionMatch, PRIORITY_FALLBACK, PRIORITY_STRONG, PRIORITY_WEAK,
};
use crate::classification::kind::{ConfidenceLevel, DrivenPortKind, ElementKind};
use crate::classification::result::{Evidence, EvidenceType};
use crate::graph::TypeNode;

/// Interface whose simple name ends with one of `suffixes`
pub struct PortNamingCriterion {
    name: &'static str,
    suffixes: &'static [&'static str],
    kind: ElementKind,
}

impl PortNamingCriterion {
    pub const fn new(
        name: &'static str,
        suffixes: &'static [&'static str],
        kind: ElementKind,
    ) -> Self {
        Self {
            name,
            suffixes,
            kind,
        }
    }
}

impl ClassificationCriterion for PortNamingCriterion {
    fn name(&self) -> &str {
        self.name
    }

    fn priority(&self) -> u32 {
        PRIORITY_STRONG
    }

    fn evaluate(
        &self,
        node: &TypeNode,
        _ctx: &ClassificationContext<'_>,
    ) -> Option<CriterionMatch> {
        if !node.is_interface() {
            return None;
        }
        let simple = node.simple_name();
        let suffix = self
            .suffixes
            .iter()
            .find(|s| simple.len() > s.len() && simple.ends_with(*s))?;
        Some(
            CriterionMatch::new(
                self.kind,
                ConfidenceLevel::High,
                format!("Interface name '{simple}' ends with {suffix}"),
            )
            .with_evidence(Evidence::new(EvidenceType::Naming, format!("{suffix} suffix"))),
        )
    }
}

/// `true` when `package` has `port.in`-style segments for the given direction
pub fn package_indicates(package: &str, inbound: bool) -> bool {
    let (pair, words): (&str, &[&str]) = if inbound {
        ("in", &["inbound", "driving"])
    } else {
        ("out", &["outbound", "driven"])
    };
    let segments: Vec<&str> = package.split('.').collect();
    segments
        .windows(2)
        .any(|w| matches!(w[0], "port" | "ports") && w[1] == pair)
        || segments.iter().any(|s| words.contains(s))
}

/// Interface placed under an inbound or outbound port package
pub struct PackageDirectionCriterion {
    inbound: bool,
}

impl PackageDirectionCriterion {
    pub const fn inbound() -> Self {
        Self { inbound: true }
    }

    pub const fn outbound() -> Self {
        Self { inbound: false }
    }
}

impl ClassificationCriterion for PackageDirectionCriterion {
    fn name(&self) -> &str {
        if self.inbound {
            "package-in"
        } else {
            "package-out"
        }
    }

    fn priority(&self) -> u32 {
        PRIORITY_WEAK
    }

    fn evaluate(
        &self,
        node: &TypeNode,
        _ctx: &ClassificationContext<'_>,
    ) -> Option<CriterionMatch> {
        if !node.is_interface() || !package_indicates(node.package_name(), self.inbound) {
            return None;
        }
        let kind = if self.inbound {
            ElementKind::DrivingPort
        } else {
            ElementKind::DrivenPort(DrivenPortKind::Other)
        };
        Some(
            CriterionMatch::new(
                kind,
                ConfidenceLevel::Medium,
                format!("Declared in package '{}'", node.package_name()),
            )
            .with_evidence(Evidence::new(EvidenceType::Package, node.package_name())),
        )
    }
}

/// Interface taken as a dependency by some class
pub struct InjectedAsDependencyCriterion;

impl ClassificationCriterion for InjectedAsDependencyCriterion {
    fn name(&self) -> &str {
        "injected-as-dependency"
    }

    fn priority(&self) -> u32 {
        PRIORITY_FALLBACK
    }

    fn evaluate(&self, node: &TypeNode, ctx: &ClassificationContext<'_>) -> Option<CriterionMatch> {
        if !node.is_interface() || !ctx.is_injected(&node.qualified_name) {
            return None;
        }
        Some(
            CriterionMatch::new(
                ElementKind::DrivenPort(DrivenPortKind::Other),
                ConfidenceLevel::Low,
                "Interface injected into a class",
            )
            .with_evidence(Evidence::new(EvidenceType::Relationship, "Injected dependency")),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_direction_segments() {
        assert!(package_indicates("com.acme.order.port.in", true));
        assert!(package_indicates("com.acme.ports.in.orders", true));
        assert!(package_indicates("com.acme.driving", true));
        assert!(!package_indicates("com.acme.inventory", true));
        assert!(package_indicates("com.acme.order.port.out", false));
        assert!(!package_indicates("com.acme.order.port.in", false));
    }
}
