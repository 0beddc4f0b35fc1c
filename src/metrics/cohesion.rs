//! LCOM4 cohesion of aggregate roots.
//!
//! Methods are linked when they plausibly touch the same field, either as a
//! bean accessor of it or by sharing its type in a signature. LCOM4 is the
//! number of connected components among the methods; 1 is fully cohesive.

use petgraph::unionfind::UnionFind;
use std::collections::BTreeSet;

use super::{DependencyGraph, Metric, MetricCalculator, MetricThreshold, MetricUnit};
use crate::graph::TypeRef;
use crate::model::{AggregateRoot, Field, Method, TypeRegistry, TypeStructure};

/// Types too common to say anything about which field a method uses
const COMMON_TYPES: &[&str] = &[
    "void",
    "boolean",
    "byte",
    "char",
    "short",
    "int",
    "long",
    "float",
    "double",
    "java.lang.Boolean",
    "java.lang.Byte",
    "java.lang.Character",
    "java.lang.Short",
    "java.lang.Integer",
    "java.lang.Long",
    "java.lang.Float",
    "java.lang.Double",
    "java.lang.String",
    "java.lang.Object",
];

fn is_common_type(name: &str) -> bool {
    name.is_empty() || COMMON_TYPES.contains(&name)
}

/// `getTotal`, `setTotal` and `isPaid` name `Total`, `Total` and `Paid`
fn accessor_target(method_name: &str) -> Option<&str> {
    ["get", "set", "is"]
        .iter()
        .find_map(|prefix| method_name.strip_prefix(prefix))
        .filter(|rest| !rest.is_empty())
}

/// Indexes of the fields `method` plausibly reads or writes
fn accessed_fields(method: &Method, fields: &[Field]) -> BTreeSet<usize> {
    let mut accessed = BTreeSet::new();
    if let Some(target) = accessor_target(&method.name) {
        if let Some(i) = fields.iter().position(|f| f.name.eq_ignore_ascii_case(target)) {
            accessed.insert(i);
        }
    }

    let signature_types = std::iter::once(&method.return_type)
        .chain(method.parameters.iter().map(|p| &p.type_ref))
        .map(TypeRef::raw_name)
        .filter(|name| !is_common_type(name));
    for type_name in signature_types {
        accessed.extend(
            fields
                .iter()
                .enumerate()
                .filter(|(_, f)| f.type_ref.raw_name() == type_name)
                .map(|(i, _)| i),
        );
    }
    accessed
}

/// Connected components among the methods of `structure`
pub fn lcom4(structure: &TypeStructure) -> usize {
    let methods = &structure.methods;
    if methods.is_empty() || structure.fields.is_empty() {
        return 1;
    }

    let access: Vec<BTreeSet<usize>> = methods
        .iter()
        .map(|m| accessed_fields(m, &structure.fields))
        .collect();
    let mut components = UnionFind::<usize>::new(methods.len());
    let mut merged = 0;
    for i in 0..methods.len() {
        for j in (i + 1)..methods.len() {
            if !access[i].is_disjoint(&access[j]) && components.union(i, j) {
                merged += 1;
            }
        }
    }
    methods.len() - merged
}

/// Mean LCOM4 over aggregate roots that declare both fields and methods
pub struct AggregateCohesionCalculator {
    max_lcom4: f64,
}

impl AggregateCohesionCalculator {
    pub fn new(max_lcom4: f64) -> Self {
        Self { max_lcom4 }
    }

    /// 0 without aggregates; 1 when no aggregate has both fields and methods
    pub fn mean_lcom4(registry: &TypeRegistry) -> f64 {
        let mut roots = registry.all_of::<AggregateRoot>().peekable();
        if roots.peek().is_none() {
            return 0.0;
        }
        let scores: Vec<usize> = roots
            .filter(|root| !root.structure.methods.is_empty() && !root.structure.fields.is_empty())
            .map(|root| lcom4(&root.structure))
            .collect();
        if scores.is_empty() {
            return 1.0;
        }
        scores.iter().sum::<usize>() as f64 / scores.len() as f64
    }
}

impl MetricCalculator for AggregateCohesionCalculator {
    fn name(&self) -> &'static str {
        "aggregate.cohesion.lcom4"
    }

    fn calculate(&self, registry: &TypeRegistry, _deps: &DependencyGraph) -> Metric {
        Metric::new(self.name(), Self::mean_lcom4(registry), MetricUnit::Components)
            .with_threshold(MetricThreshold::max(self.max_lcom4))
    }
}
