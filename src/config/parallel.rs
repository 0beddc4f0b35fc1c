//! Parallelism configuration for per-type analysis stages.
//!
//! Classification and model building are pure per-type functions, so they
//! can fan out across rayon's thread pool. Results are always merged back in
//! input order, which keeps sequential and parallel runs byte-for-byte equal.

use serde::{Deserialize, Serialize};

/// Default value for parallel processing enabled
fn default_enabled() -> bool {
    true
}

/// Configuration for parallel processing operations.
///
/// # Example
///
/// ```rust
/// use hexarch::config::ParallelConfig;
///
/// let config = ParallelConfig::sequential();
/// assert!(!config.enabled);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParallelConfig {
    /// Enable parallel processing (default: true)
    ///
    /// When disabled, types are processed sequentially.
    /// Useful for debugging or when running in constrained environments.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
        }
    }
}

impl ParallelConfig {
    /// Create a new parallel config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config with parallel processing disabled.
    pub fn sequential() -> Self {
        Self { enabled: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_parallel() {
        assert!(ParallelConfig::new().enabled);
    }

    #[test]
    fn test_deserialize_empty_uses_defaults() {
        let config: ParallelConfig = toml::from_str("").unwrap();
        assert_eq!(config, ParallelConfig::default());
    }
}
