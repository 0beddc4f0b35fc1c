use serde::{Deserialize, Serialize};

use super::kind::{ConfidenceLevel, ElementKind};

/// What kind of fact supports a classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvidenceType {
    Annotation,
    Naming,
    Structure,
    Relationship,
    Package,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    pub evidence_type: EvidenceType,
    pub description: String,
    /// Other types the evidence points at
    #[serde(default)]
    pub related_types: Vec<String>,
}

impl Evidence {
    pub fn new(evidence_type: EvidenceType, description: impl Into<String>) -> Self {
        Self {
            evidence_type,
            description: description.into(),
            related_types: Vec::new(),
        }
    }

    pub fn with_related(mut self, related: impl IntoIterator<Item = String>) -> Self {
        self.related_types.extend(related);
        self
    }
}

/// A losing proposal at the winning priority
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    pub competing_kind: ElementKind,
    pub competing_criterion: String,
    pub competing_priority: u32,
    pub competing_confidence: ConfidenceLevel,
    pub rationale: String,
}

/// Classifier output for one type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Qualified name of the classified type
    pub subject: String,
    pub kind: ElementKind,
    pub confidence: ConfidenceLevel,
    /// Winning criterion; `None` when nothing matched
    pub criterion: Option<String>,
    pub priority: u32,
    pub justification: String,
    pub evidence: Vec<Evidence>,
    pub conflicts: Vec<Conflict>,
}

impl ClassificationResult {
    pub fn unclassified(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            kind: ElementKind::Unclassified,
            confidence: ConfidenceLevel::Low,
            criterion: None,
            priority: 0,
            justification: "No classification criterion matched".to_string(),
            evidence: Vec::new(),
            conflicts: Vec::new(),
        }
    }

    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }

    pub fn is_classified(&self) -> bool {
        self.kind != ElementKind::Unclassified
    }
}
