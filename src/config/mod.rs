//! Analysis configuration.
//!
//! Every section is optional in TOML; missing keys fall back to the
//! defaults documented on each field.

mod classification;
mod core;
mod loader;
mod parallel;
mod thresholds;

pub use self::core::{AnalysisConfig, ConstraintConfig};
pub use classification::ClassificationConfig;
pub use loader::parse_and_validate_config;
pub use parallel::ParallelConfig;
pub use thresholds::MetricThresholds;
