use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

use crate::graph::{package_of, simple_name_of};
use crate::metrics::DependencyGraph;
use crate::model::{ArchType, TypeRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Layer {
    Domain,
    Application,
    Port,
    Infrastructure,
    Unclassified,
}

impl Layer {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Domain => "DOMAIN",
            Self::Application => "APPLICATION",
            Self::Port => "PORT",
            Self::Infrastructure => "INFRASTRUCTURE",
            Self::Unclassified => "UNCLASSIFIED",
        }
    }

    /// Layers a type in this layer may depend on
    pub fn allowed_targets(self) -> &'static [Layer] {
        match self {
            Self::Domain => &[Self::Domain],
            Self::Application => &[Self::Application, Self::Domain, Self::Port],
            Self::Port => &[Self::Port, Self::Domain],
            Self::Infrastructure => &[
                Self::Domain,
                Self::Application,
                Self::Port,
                Self::Infrastructure,
                Self::Unclassified,
            ],
            Self::Unclassified => &[],
        }
    }

    pub fn may_depend_on(self, target: Layer) -> bool {
        self.allowed_targets().contains(&target)
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const INFRASTRUCTURE_PACKAGE_SEGMENTS: &[&str] = &[
    "infrastructure",
    "infra",
    "adapter",
    "adapters",
    "persistence",
    "messaging",
    "external",
    "web",
    "rest",
    "controller",
];

const INFRASTRUCTURE_SUFFIXES: &[&str] = &[
    "RepositoryImpl",
    "Adapter",
    "Client",
    "Consumer",
    "Controller",
    "Resource",
    "Endpoint",
    "JpaEntity",
];

const INFRASTRUCTURE_ANNOTATIONS: &[&str] = &[
    "org.springframework.stereotype.Repository",
    "org.springframework.stereotype.Controller",
    "org.springframework.web.bind.annotation.RestController",
    "org.springframework.data.repository.Repository",
    "jakarta.persistence.Entity",
    "javax.persistence.Entity",
    "jakarta.ws.rs.Path",
    "javax.ws.rs.Path",
];

fn in_infrastructure_package(qualified_name: &str) -> bool {
    package_of(qualified_name)
        .split('.')
        .any(|segment| {
            INFRASTRUCTURE_PACKAGE_SEGMENTS.contains(&segment.to_ascii_lowercase().as_str())
        })
}

fn has_infrastructure_suffix(qualified_name: &str) -> bool {
    let simple = simple_name_of(qualified_name);
    INFRASTRUCTURE_SUFFIXES.iter().any(|s| simple.ends_with(s))
}

/// Assigns every type name to a hexagonal layer.
///
/// Registered kinds decide first. Anything else is infrastructure when it
/// implements a registered port, carries a framework stereotype, or sits in
/// an adapter package or has an adapter suffix.
pub struct LayerClassifier<'a> {
    registry: &'a TypeRegistry,
    adapters: BTreeSet<&'a str>,
}

impl<'a> LayerClassifier<'a> {
    pub fn new(registry: &'a TypeRegistry, deps: &'a DependencyGraph) -> Self {
        let adapters = deps
            .implementors()
            .iter()
            .filter(|(port, _)| registry.get_by_name(port).is_some_and(ArchType::is_port))
            .flat_map(|(_, implementors)| implementors.iter().map(String::as_str))
            .collect();
        Self { registry, adapters }
    }

    /// Implementor of at least one registered port
    pub fn is_adapter(&self, qualified_name: &str) -> bool {
        self.adapters.contains(qualified_name)
    }

    pub fn layer_of(&self, qualified_name: &str) -> Layer {
        let registered = self.registry.get_by_name(qualified_name);
        match registered {
            Some(arch) if arch.is_domain() => return Layer::Domain,
            Some(arch) if arch.is_application() => return Layer::Application,
            Some(arch) if arch.is_port() => return Layer::Port,
            _ => {}
        }

        let annotated = registered.is_some_and(|arch| {
            arch.structure()
                .annotations
                .iter()
                .any(|a| INFRASTRUCTURE_ANNOTATIONS.contains(&a.qualified_name.as_str()))
        });
        if annotated
            || self.is_adapter(qualified_name)
            || in_infrastructure_package(qualified_name)
            || has_infrastructure_suffix(qualified_name)
        {
            Layer::Infrastructure
        } else {
            Layer::Unclassified
        }
    }
}
