use serde::{Deserialize, Serialize};

/// Controls which types enter classification
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassificationConfig {
    /// Package prefixes whose types are never classified.
    ///
    /// Excluded types carrying a generation marker are still admitted to
    /// the registry as out-of-scope types.
    #[serde(default)]
    pub excluded_packages: Vec<String>,

    /// Annotation names marking generated code
    #[serde(default = "default_generated_annotations")]
    pub generated_annotations: Vec<String>,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            excluded_packages: Vec::new(),
            generated_annotations: default_generated_annotations(),
        }
    }
}

impl ClassificationConfig {
    /// True when `qualified_name` lives under an excluded package prefix
    pub fn is_excluded(&self, qualified_name: &str) -> bool {
        self.excluded_packages.iter().any(|prefix| {
            qualified_name
                .strip_prefix(prefix.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
        })
    }

    pub fn is_generated_marker(&self, annotation: &str) -> bool {
        self.generated_annotations.iter().any(|a| a == annotation)
    }
}

fn default_generated_annotations() -> Vec<String> {
    vec![
        "javax.annotation.Generated".to_string(),
        "javax.annotation.processing.Generated".to_string(),
        "jakarta.annotation.Generated".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excluded_prefix_matches_package_boundary() {
        let config = ClassificationConfig {
            excluded_packages: vec!["com.acme.generated".into()],
            ..Default::default()
        };
        assert!(config.is_excluded("com.acme.generated.OrderMapperImpl"));
        assert!(!config.is_excluded("com.acme.generatedstuff.Order"));
        assert!(!config.is_excluded("com.acme.order.Order"));
    }

    #[test]
    fn test_default_markers() {
        let config = ClassificationConfig::default();
        assert!(config.is_generated_marker("jakarta.annotation.Generated"));
        assert!(!config.is_generated_marker("lombok.Generated"));
    }
}
