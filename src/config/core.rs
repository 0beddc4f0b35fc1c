use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::classification::ClassificationConfig;
use super::parallel::ParallelConfig;
use super::thresholds::MetricThresholds;
use crate::validation::{ConstraintId, Severity};

/// Per-constraint switches and severity overrides
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConstraintConfig {
    /// Constraint ids that are not evaluated at all
    #[serde(default)]
    pub disabled: Vec<String>,

    /// Replacement severities keyed by constraint id
    #[serde(default)]
    pub severity_overrides: BTreeMap<String, Severity>,

    /// Largest number of entities an aggregate may contain
    #[serde(default = "default_max_aggregate_entities")]
    pub max_aggregate_entities: usize,
}

impl Default for ConstraintConfig {
    fn default() -> Self {
        Self {
            disabled: Vec::new(),
            severity_overrides: BTreeMap::new(),
            max_aggregate_entities: default_max_aggregate_entities(),
        }
    }
}

impl ConstraintConfig {
    pub fn is_enabled(&self, id: ConstraintId) -> bool {
        !self.disabled.iter().any(|d| d == id.as_str())
    }

    pub fn severity_for(&self, id: ConstraintId) -> Option<Severity> {
        self.severity_overrides.get(id.as_str()).copied()
    }

    /// Every referenced constraint id must name a known constraint
    pub fn validate(&self) -> Result<(), String> {
        let unknown = self
            .disabled
            .iter()
            .chain(self.severity_overrides.keys())
            .find(|id| id.parse::<ConstraintId>().is_err());
        match unknown {
            Some(id) => Err(format!("unknown constraint id '{id}'")),
            None => Ok(()),
        }
    }
}

fn default_max_aggregate_entities() -> usize {
    7
}

/// Root configuration for one analysis run
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub classification: ClassificationConfig,

    #[serde(default)]
    pub parallel: ParallelConfig,

    #[serde(default)]
    pub metrics: MetricThresholds,

    #[serde(default)]
    pub constraints: ConstraintConfig,
}
