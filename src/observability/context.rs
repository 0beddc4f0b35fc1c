//! Thread-local phase tracking.
//!
//! Each thread records the analysis phase it is working in, which rayon
//! workers inherit through [`with_phase`]. Guards restore the previous phase
//! on drop, so nested phases unwind correctly.

use std::cell::RefCell;

thread_local! {
    static CURRENT_PHASE: RefCell<Option<AnalysisPhase>> = const { RefCell::new(None) };
}

/// Analysis phases, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AnalysisPhase {
    /// Evaluating classification criteria per type
    Classification,
    /// Building architectural types and the registry
    ModelBuilding,
    /// Deriving domain, port and composition indexes
    Indexing,
    /// Building the labeled relationship graph
    RelationshipBuilding,
    /// Running metric calculators
    Metrics,
    /// Running constraint validators
    Validation,
}

impl std::fmt::Display for AnalysisPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Classification => write!(f, "classification"),
            Self::ModelBuilding => write!(f, "model_building"),
            Self::Indexing => write!(f, "indexing"),
            Self::RelationshipBuilding => write!(f, "relationship_building"),
            Self::Metrics => write!(f, "metrics"),
            Self::Validation => write!(f, "validation"),
        }
    }
}

/// RAII guard restoring the previous phase on drop.
pub struct PhaseGuard {
    previous: Option<AnalysisPhase>,
}

impl Drop for PhaseGuard {
    fn drop(&mut self) {
        CURRENT_PHASE.with(|p| *p.borrow_mut() = self.previous);
    }
}

/// Set the current analysis phase.
///
/// Returns a guard that restores the previous phase on drop.
#[must_use]
pub fn set_phase(phase: AnalysisPhase) -> PhaseGuard {
    CURRENT_PHASE.with(|p| {
        let previous = p.borrow_mut().replace(phase);
        PhaseGuard { previous }
    })
}

/// Phase of the calling thread, if any
pub fn current_phase() -> Option<AnalysisPhase> {
    CURRENT_PHASE.with(|p| *p.borrow())
}

/// Run `f` with `phase` set; used to carry the phase onto worker threads
pub fn with_phase<R>(phase: Option<AnalysisPhase>, f: impl FnOnce() -> R) -> R {
    match phase {
        Some(phase) => {
            let _guard = set_phase(phase);
            f()
        }
        None => f(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_restores_previous_phase() {
        assert_eq!(current_phase(), None);
        {
            let _outer = set_phase(AnalysisPhase::Classification);
            {
                let _inner = set_phase(AnalysisPhase::ModelBuilding);
                assert_eq!(current_phase(), Some(AnalysisPhase::ModelBuilding));
            }
            assert_eq!(current_phase(), Some(AnalysisPhase::Classification));
        }
        assert_eq!(current_phase(), None);
    }

    #[test]
    fn test_with_phase_propagates() {
        let seen = with_phase(Some(AnalysisPhase::Metrics), current_phase);
        assert_eq!(seen, Some(AnalysisPhase::Metrics));
        assert_eq!(current_phase(), None);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(
            AnalysisPhase::RelationshipBuilding.to_string(),
            "relationship_building"
        );
    }
}
