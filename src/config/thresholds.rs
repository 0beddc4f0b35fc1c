use serde::{Deserialize, Serialize};

/// Warning thresholds for the structural metrics
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricThresholds {
    /// Longest acyclic dependency chain, in levels
    #[serde(default = "default_max_dependency_depth")]
    pub max_dependency_depth: usize,

    /// Percentage of the system reachable on average from one type
    #[serde(default = "default_max_propagation_cost")]
    pub max_propagation_cost: f64,

    /// Percentage of adapter edges that stay out of other adapters
    #[serde(default = "default_min_adapter_independence")]
    pub min_adapter_independence: f64,

    /// Mean distance from the main sequence over coupled packages
    #[serde(default = "default_max_main_sequence_distance")]
    pub max_main_sequence_distance: f64,

    /// Percentage of owned entities referenced only from inside their aggregate
    #[serde(default = "default_min_aggregate_boundary")]
    pub min_aggregate_boundary: f64,

    /// Percentage of domain methods that are accessors or object methods
    #[serde(default = "default_max_boilerplate_ratio")]
    pub max_boilerplate_ratio: f64,

    /// Mean LCOM4 over aggregate roots
    #[serde(default = "default_max_aggregate_lcom4")]
    pub max_aggregate_lcom4: f64,
}

impl Default for MetricThresholds {
    fn default() -> Self {
        Self {
            max_dependency_depth: default_max_dependency_depth(),
            max_propagation_cost: default_max_propagation_cost(),
            min_adapter_independence: default_min_adapter_independence(),
            max_main_sequence_distance: default_max_main_sequence_distance(),
            min_aggregate_boundary: default_min_aggregate_boundary(),
            max_boilerplate_ratio: default_max_boilerplate_ratio(),
            max_aggregate_lcom4: default_max_aggregate_lcom4(),
        }
    }
}

impl MetricThresholds {
    /// Checks that percentages and distances are in range
    pub fn validate(&self) -> Result<(), String> {
        let percentages = [
            ("max_propagation_cost", self.max_propagation_cost),
            ("min_adapter_independence", self.min_adapter_independence),
            ("min_aggregate_boundary", self.min_aggregate_boundary),
            ("max_boilerplate_ratio", self.max_boilerplate_ratio),
        ];
        for (name, value) in percentages {
            if !(0.0..=100.0).contains(&value) {
                return Err(format!("{name} must be within 0..=100, got {value}"));
            }
        }
        if !(0.0..=1.0).contains(&self.max_main_sequence_distance) {
            return Err(format!(
                "max_main_sequence_distance must be within 0..=1, got {}",
                self.max_main_sequence_distance
            ));
        }
        if self.max_aggregate_lcom4 < 0.0 {
            return Err(format!(
                "max_aggregate_lcom4 must not be negative, got {}",
                self.max_aggregate_lcom4
            ));
        }
        Ok(())
    }
}

fn default_max_dependency_depth() -> usize {
    7
}

fn default_max_propagation_cost() -> f64 {
    35.0
}

fn default_min_adapter_independence() -> f64 {
    80.0
}

fn default_max_main_sequence_distance() -> f64 {
    0.3
}

fn default_min_aggregate_boundary() -> f64 {
    80.0
}

fn default_max_boilerplate_ratio() -> f64 {
    50.0
}

fn default_max_aggregate_lcom4() -> f64 {
    2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(MetricThresholds::default().validate().is_ok());
    }

    #[test]
    fn test_out_of_range_percentage_rejected() {
        let thresholds = MetricThresholds {
            max_propagation_cost: 120.0,
            ..Default::default()
        };
        let err = thresholds.validate().unwrap_err();
        assert!(err.contains("max_propagation_cost"));
    }

    #[test]
    fn test_out_of_range_distance_rejected() {
        let thresholds = MetricThresholds {
            max_main_sequence_distance: 1.5,
            ..Default::default()
        };
        assert!(thresholds.validate().is_err());
    }

    #[test]
    fn test_negative_lcom4_rejected() {
        let thresholds = MetricThresholds {
            max_aggregate_lcom4: -1.0,
            ..Default::default()
        };
        let err = thresholds.validate().unwrap_err();
        assert!(err.contains("max_aggregate_lcom4"));
    }
}
