use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

use super::criteria::{
    default_criteria, ClassificationContext, ClassificationCriterion, CriterionMatch,
};
use super::kind::ElementKind;
use super::result::{ClassificationResult, Conflict};
use crate::config::{ClassificationConfig, ParallelConfig};
use crate::graph::{TypeGraphQuery, TypeNode};
use crate::roles::KindLookup;

/// Priority-based arbitration over a fixed list of criteria.
///
/// The highest priority proposal wins. Proposals of a *different* kind at
/// that same priority become [`Conflict`]s; ties go to the criterion
/// declared first. Lower-priority disagreement is not a conflict.
pub struct Classifier {
    criteria: Vec<Box<dyn ClassificationCriterion>>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(default_criteria())
    }
}

impl Classifier {
    pub fn new(criteria: Vec<Box<dyn ClassificationCriterion>>) -> Self {
        Self { criteria }
    }

    pub fn criteria_count(&self) -> usize {
        self.criteria.len()
    }

    pub fn classify(
        &self,
        node: &TypeNode,
        ctx: &ClassificationContext<'_>,
    ) -> ClassificationResult {
        let proposals: Vec<(&dyn ClassificationCriterion, CriterionMatch)> = self
            .criteria
            .iter()
            .filter_map(|c| c.evaluate(node, ctx).map(|m| (c.as_ref(), m)))
            .collect();

        let Some(top) = proposals.iter().map(|(c, _)| c.priority()).max() else {
            return ClassificationResult::unclassified(node.qualified_name.clone());
        };
        select_winner(&node.qualified_name, top, proposals)
    }

    /// Classify every type the configuration admits, in graph order
    pub fn classify_all(
        &self,
        graph: &dyn TypeGraphQuery,
        config: &ClassificationConfig,
        parallel: &ParallelConfig,
    ) -> ClassificationResults {
        let ctx = ClassificationContext::new(graph);
        let candidates: Vec<&TypeNode> = graph
            .all_types()
            .iter()
            .filter(|n| !config.is_excluded(&n.qualified_name))
            .collect();

        let results: Vec<ClassificationResult> = if parallel.enabled {
            candidates.par_iter().map(|n| self.classify(n, &ctx)).collect()
        } else {
            candidates.iter().map(|n| self.classify(n, &ctx)).collect()
        };

        for result in results.iter().filter(|r| r.has_conflicts()) {
            debug!(
                subject = %result.subject,
                winner = %result.kind,
                competing = ?result.conflicts.iter().map(|c| c.competing_kind).collect::<Vec<_>>(),
                "Classification conflict"
            );
        }

        ClassificationResults::from_results(results)
    }
}

fn select_winner(
    subject: &str,
    top: u32,
    proposals: Vec<(&dyn ClassificationCriterion, CriterionMatch)>,
) -> ClassificationResult {
    let mut at_top = proposals.into_iter().filter(|(c, _)| c.priority() == top);
    let Some((winner, chosen)) = at_top.next() else {
        return ClassificationResult::unclassified(subject);
    };

    let conflicts = at_top
        .filter(|(_, m)| m.kind != chosen.kind)
        .map(|(c, m)| Conflict {
            competing_kind: m.kind,
            competing_criterion: c.name().to_string(),
            competing_priority: c.priority(),
            competing_confidence: m.confidence,
            rationale: format!("Also matched {}: {}", c.name(), m.justification),
        })
        .collect();

    ClassificationResult {
        subject: subject.to_string(),
        kind: chosen.kind,
        confidence: chosen.confidence,
        criterion: Some(winner.name().to_string()),
        priority: top,
        justification: chosen.justification,
        evidence: chosen.evidence,
        conflicts,
    }
}

/// Classification results in graph order, indexed by qualified name
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClassificationResults {
    results: Vec<ClassificationResult>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl ClassificationResults {
    pub fn from_results(results: Vec<ClassificationResult>) -> Self {
        let index = results
            .iter()
            .enumerate()
            .map(|(i, r)| (r.subject.clone(), i))
            .collect();
        Self { results, index }
    }

    pub fn get(&self, qualified_name: &str) -> Option<&ClassificationResult> {
        self.index.get(qualified_name).map(|&i| &self.results[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassificationResult> {
        self.results.iter()
    }

    pub fn of_kind(&self, kind: ElementKind) -> impl Iterator<Item = &ClassificationResult> {
        self.results.iter().filter(move |r| r.kind == kind)
    }

    pub fn conflicted(&self) -> impl Iterator<Item = &ClassificationResult> {
        self.results.iter().filter(|r| r.has_conflicts())
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

impl KindLookup for ClassificationResults {
    fn kind_of(&self, qualified_name: &str) -> Option<ElementKind> {
        self.get(qualified_name).map(|r| r.kind)
    }
}
