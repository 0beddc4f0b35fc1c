use super::core::AnalysisConfig;
use crate::errors::{Error, Result};

impl AnalysisConfig {
    /// Parse and validate a configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        parse_and_validate_config(contents)
    }

    /// Range and reference checks over an already-built configuration
    pub fn validate(&self) -> Result<()> {
        self.metrics.validate().map_err(Error::Configuration)?;
        self.constraints.validate().map_err(Error::Configuration)?;
        Ok(())
    }
}

/// Pure function to parse and validate config from TOML string
pub fn parse_and_validate_config(contents: &str) -> Result<AnalysisConfig> {
    let config = toml::from_str::<AnalysisConfig>(contents)?;
    config.validate()?;
    tracing::debug!(
        disabled = config.constraints.disabled.len(),
        overrides = config.constraints.severity_overrides.len(),
        "Loaded analysis configuration"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{ConstraintId, Severity};
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_config_is_default() {
        let config = AnalysisConfig::from_toml_str("").unwrap();
        assert_eq!(config, AnalysisConfig::default());
    }

    #[test]
    fn test_full_config_parses() {
        let config = AnalysisConfig::from_toml_str(indoc! {r#"
            [classification]
            excluded_packages = ["com.acme.infra.generated"]

            [parallel]
            enabled = false

            [metrics]
            max_dependency_depth = 5
            max_propagation_cost = 20.0

            [constraints]
            disabled = ["ddd:event-naming"]
            max_aggregate_entities = 4

            [constraints.severity_overrides]
            "hexagonal:layer-isolation" = "CRITICAL"
        "#})
        .unwrap();

        assert!(!config.parallel.enabled);
        assert_eq!(config.metrics.max_dependency_depth, 5);
        assert_eq!(config.metrics.min_adapter_independence, 80.0);
        assert!(!config.constraints.is_enabled(ConstraintId::EventNaming));
        assert_eq!(
            config.constraints.severity_for(ConstraintId::LayerIsolation),
            Some(Severity::Critical)
        );
        assert_eq!(config.constraints.max_aggregate_entities, 4);
        assert_eq!(
            config.classification.generated_annotations.len(),
            3,
            "generation markers keep their defaults"
        );
    }

    #[test]
    fn test_unknown_constraint_rejected() {
        let err = AnalysisConfig::from_toml_str(indoc! {r#"
            [constraints]
            disabled = ["ddd:made-up"]
        "#})
        .unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        assert!(err.to_string().contains("ddd:made-up"));
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let err = AnalysisConfig::from_toml_str("[metrics\nmax_dependency_depth = ").unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let err = AnalysisConfig::from_toml_str(indoc! {r#"
            [metrics]
            min_aggregate_boundary = 180.0
        "#})
        .unwrap_err();
        assert!(err.to_string().contains("min_aggregate_boundary"));
    }
}
