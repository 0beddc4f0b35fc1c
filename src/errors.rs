//! Shared error types for architectural analysis.
//!
//! Only structural failures are errors here. Classification conflicts,
//! unresolved cross references and constraint violations are ordinary
//! output values and never travel through this type.

use thiserror::Error;

/// Main error type for hexarch operations
#[derive(Debug, Error)]
pub enum Error {
    /// An aggregate root whose identity field could not be resolved.
    ///
    /// The model pipeline recovers from this variant by downgrading the type
    /// to an unclassified type; it never aborts the run.
    #[error("AggregateRoot '{type_name}' must have an identity field")]
    MissingIdentity { type_name: String },

    /// Two types with the same id were added to one registry
    #[error("Duplicate type id in registry: {0}")]
    DuplicateTypeId(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// TOML parse errors
    #[error(transparent)]
    ConfigParse(#[from] toml::de::Error),
}

impl Error {
    pub fn missing_identity(type_name: impl Into<String>) -> Self {
        Self::MissingIdentity {
            type_name: type_name.into(),
        }
    }

    /// Whether the pipeline may substitute a fallback type for this failure
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::MissingIdentity { .. })
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_identity_message() {
        let err = Error::missing_identity("com.acme.order.Order");
        assert_eq!(
            err.to_string(),
            "AggregateRoot 'com.acme.order.Order' must have an identity field"
        );
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_structural_errors_are_not_recoverable() {
        let err = Error::Configuration("bad threshold".into());
        assert_eq!(err.to_string(), "Configuration error: bad threshold");
        assert!(!err.is_recoverable());
        assert!(!Error::DuplicateTypeId("com.acme.Order".into()).is_recoverable());
    }
}
