//! Multi-criterion classification of types into architectural kinds.
//!
//! Each type is classified independently against a shared, precomputed
//! [`ClassificationContext`]; the pass is a pure map over the graph and
//! runs on rayon when parallelism is enabled.

mod classifier;
pub mod criteria;
mod kind;
mod result;

pub use classifier::{ClassificationResults, Classifier};
pub use criteria::{ClassificationContext, ClassificationCriterion, CriterionMatch};
pub use kind::{ConfidenceLevel, DrivenPortKind, ElementKind};
pub use result::{ClassificationResult, Conflict, Evidence, EvidenceType};
