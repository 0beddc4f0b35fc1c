use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use super::{DependencyGraph, Metric, MetricCalculator, MetricThreshold, MetricUnit};
use crate::graph::package_of;
use crate::model::TypeRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PackageZone {
    MainSequence,
    NearMainSequence,
    OffMainSequence,
    ZoneOfPain,
    ZoneOfUselessness,
    /// No coupling in either direction; instability is undefined
    Isolated,
}

impl PackageZone {
    /// Pain and uselessness bands take precedence over distance bands
    pub fn classify(instability: f64, abstractness: f64, distance: f64) -> Self {
        if instability < 0.3 && abstractness < 0.3 {
            Self::ZoneOfPain
        } else if instability > 0.7 && abstractness > 0.7 {
            Self::ZoneOfUselessness
        } else if distance < 0.1 {
            Self::MainSequence
        } else if distance < 0.3 {
            Self::NearMainSequence
        } else {
            Self::OffMainSequence
        }
    }
}

/// Martin coupling metrics for one package
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackageMetrics {
    pub package: String,
    pub type_count: usize,
    /// Outside types depending on this package
    pub afferent: usize,
    /// Outside types this package depends on
    pub efferent: usize,
    pub instability: Option<f64>,
    pub abstractness: f64,
    pub distance: Option<f64>,
    pub zone: PackageZone,
}

/// Per-package metrics over the dependency graph's declared types, sorted by package.
///
/// A type is abstract when the type graph declares it an interface or
/// abstract class, whether or not it was classified.
pub fn package_metrics(registry: &TypeRegistry, deps: &DependencyGraph) -> Vec<PackageMetrics> {
    let mut packages: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for name in deps.names() {
        packages.entry(package_of(name)).or_default().push(name);
    }

    let mut dependents: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    let mut dependencies: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for (from, to) in deps.edges() {
        let (from_pkg, to_pkg) = (package_of(from), package_of(to));
        if from_pkg != to_pkg {
            dependents.entry(to_pkg).or_default().insert(from);
            dependencies.entry(from_pkg).or_default().insert(to);
        }
    }

    packages
        .into_iter()
        .map(|(package, types)| {
            let afferent = dependents.get(package).map_or(0, BTreeSet::len);
            let efferent = dependencies.get(package).map_or(0, BTreeSet::len);
            let abstract_count = types
                .iter()
                .filter(|t| {
                    deps.is_abstract(t)
                        || registry
                            .get_by_name(t)
                            .is_some_and(|arch| arch.structure().is_abstract())
                })
                .count();
            let abstractness = abstract_count as f64 / types.len() as f64;

            let (instability, distance, zone) = if afferent + efferent == 0 {
                (None, None, PackageZone::Isolated)
            } else {
                let i = efferent as f64 / (afferent + efferent) as f64;
                let d = (abstractness + i - 1.0).abs();
                (Some(i), Some(d), PackageZone::classify(i, abstractness, d))
            };

            PackageMetrics {
                package: package.to_string(),
                type_count: types.len(),
                afferent,
                efferent,
                instability,
                abstractness,
                distance,
                zone,
            }
        })
        .collect()
}

/// Mean distance from the main sequence over coupled packages
pub struct PackageCouplingCalculator {
    max_distance: f64,
}

impl PackageCouplingCalculator {
    pub fn new(max_distance: f64) -> Self {
        Self { max_distance }
    }
}

impl MetricCalculator for PackageCouplingCalculator {
    fn name(&self) -> &'static str {
        "package.coupling"
    }

    fn calculate(&self, registry: &TypeRegistry, deps: &DependencyGraph) -> Metric {
        let distances: Vec<f64> = package_metrics(registry, deps)
            .iter()
            .filter_map(|p| p.distance)
            .collect();
        let mean = if distances.is_empty() {
            0.0
        } else {
            distances.iter().sum::<f64>() / distances.len() as f64
        };
        Metric::new(self.name(), mean, MetricUnit::Ratio)
            .with_threshold(MetricThreshold::max(self.max_distance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::ElementKind;
    use crate::graph::{InMemoryTypeGraph, TypeDecl};
    use crate::metrics::test_support::deps;
    use crate::model::builders::test_support::results;
    use crate::model::ModelBuilder;

    #[test]
    fn test_zone_bands() {
        assert_eq!(PackageZone::classify(0.1, 0.1, 0.8), PackageZone::ZoneOfPain);
        assert_eq!(PackageZone::classify(0.9, 0.9, 0.8), PackageZone::ZoneOfUselessness);
        assert_eq!(PackageZone::classify(0.5, 0.45, 0.05), PackageZone::MainSequence);
        assert_eq!(PackageZone::classify(0.5, 0.3, 0.2), PackageZone::NearMainSequence);
        assert_eq!(PackageZone::classify(0.5, 0.9, 0.4), PackageZone::OffMainSequence);
    }

    #[test]
    fn test_package_metrics_and_isolated_sentinel() {
        let graph = InMemoryTypeGraph::builder()
            .with_type(TypeDecl::interface("app.port.Orders"))
            .build();
        let classes = results(&[("app.port.Orders", ElementKind::REPOSITORY)]);
        let registry = ModelBuilder::default().build(&graph, &classes).unwrap();
        let g = DependencyGraph::from_dependencies(&deps(&[
            ("app.service.PlaceOrder", vec!["app.port.Orders"]),
            ("app.port.Orders", vec![]),
            ("lonely.Thing", vec![]),
        ]));

        let metrics = package_metrics(&registry, &g);
        let by_name = |p: &str| metrics.iter().find(|m| m.package == p).unwrap();

        let port = by_name("app.port");
        assert_eq!((port.afferent, port.efferent), (1, 0));
        assert_eq!(port.instability, Some(0.0));
        assert_eq!(port.abstractness, 1.0);
        assert_eq!(port.zone, PackageZone::MainSequence);

        let service = by_name("app.service");
        assert_eq!(service.instability, Some(1.0));
        assert_eq!(service.zone, PackageZone::MainSequence);

        let lonely = by_name("lonely");
        assert_eq!(lonely.zone, PackageZone::Isolated);
        assert_eq!(lonely.distance, None);

        let metric = PackageCouplingCalculator::new(0.3).calculate(&registry, &g);
        assert_eq!(metric.value, 0.0);
    }

    #[test]
    fn test_unregistered_interfaces_count_as_abstract() {
        let types = InMemoryTypeGraph::builder()
            .with_type(TypeDecl::interface("shared.spi.Clock"))
            .with_type(TypeDecl::interface("shared.spi.IdSource"))
            .with_type(TypeDecl::class("shared.spi.SystemClock"))
            .build();
        let g = DependencyGraph::from_dependencies(&deps(&[
            ("shared.spi.Clock", vec![]),
            ("shared.spi.IdSource", vec![]),
            ("shared.spi.SystemClock", vec!["shared.spi.Clock"]),
            ("billing.Invoicer", vec!["shared.spi.Clock", "shared.spi.IdSource"]),
        ]))
        .with_abstractness(&types);

        let metrics = package_metrics(&TypeRegistry::default(), &g);
        let spi = metrics.iter().find(|m| m.package == "shared.spi").unwrap();
        assert!((spi.abstractness - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(spi.instability, Some(0.0));
        assert_ne!(spi.zone, PackageZone::ZoneOfPain);
    }
}
