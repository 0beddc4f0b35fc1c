use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::graph::MethodNode;

const LIFECYCLE_ANNOTATIONS: &[&str] = &[
    "javax.annotation.PostConstruct",
    "jakarta.annotation.PostConstruct",
    "javax.annotation.PreDestroy",
    "jakarta.annotation.PreDestroy",
    "org.springframework.beans.factory.InitializingBean",
    "org.springframework.beans.factory.DisposableBean",
];

const LIFECYCLE_NAMES: &[&str] = &["init", "destroy", "close", "dispose", "shutdown", "cleanup"];

const FACTORY_NAMES: &[&str] = &[
    "of",
    "from",
    "create",
    "build",
    "newInstance",
    "getInstance",
    "valueOf",
];

const VALIDATION_PREFIXES: &[&str] = &["validate", "check", "ensure", "verify"];

const VALIDATION_SUFFIXES: &[&str] = &["valid", "complete", "empty", "present", "null", "blank"];

const QUERY_PREFIXES: &[&str] = &[
    "get", "find", "list", "search", "fetch", "load", "query", "read", "count", "exists",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MethodRole {
    Getter,
    Setter,
    Factory,
    ObjectMethod,
    Lifecycle,
    Validation,
    Command,
    Query,
    Business,
}

impl MethodRole {
    /// Roles that suppress the command/query/business fallback
    pub fn is_special(&self) -> bool {
        !matches!(self, Self::Command | Self::Query | Self::Business)
    }

    /// Accessors, object methods, factories and lifecycle hooks
    pub fn is_boilerplate(&self) -> bool {
        matches!(
            self,
            Self::Getter | Self::Setter | Self::ObjectMethod | Self::Factory | Self::Lifecycle
        )
    }
}

/// True when `name` is `prefix` followed by an uppercase character
fn has_bean_prefix(name: &str, prefix: &str) -> bool {
    name.strip_prefix(prefix)
        .and_then(|rest| rest.chars().next())
        .is_some_and(char::is_uppercase)
}

pub fn is_getter(method: &MethodNode) -> bool {
    if !method.parameters.is_empty() || method.return_type.is_void() {
        return false;
    }
    has_bean_prefix(&method.name, "get")
        || (method.return_type.is_boolean() && has_bean_prefix(&method.name, "is"))
}

pub fn is_setter(method: &MethodNode) -> bool {
    method.parameters.len() == 1
        && method.return_type.is_void()
        && has_bean_prefix(&method.name, "set")
}

/// Static method with a factory name, or returning its own declaring type
pub fn is_factory(method: &MethodNode) -> bool {
    method.is_static()
        && (FACTORY_NAMES.contains(&method.name.as_str())
            || (!method.declaring_type.is_empty()
                && method.return_type.raw_name() == method.declaring_type))
}

pub fn is_object_method(method: &MethodNode) -> bool {
    let params = &method.parameters;
    match method.name.as_str() {
        "equals" => params.len() == 1 && params[0].type_ref.raw_name() == "java.lang.Object",
        "hashCode" => params.is_empty() && method.return_type.raw_name() == "int",
        "toString" => params.is_empty() && method.return_type.raw_name() == "java.lang.String",
        _ => false,
    }
}

pub fn is_lifecycle(method: &MethodNode) -> bool {
    method
        .annotations
        .iter()
        .any(|a| LIFECYCLE_ANNOTATIONS.contains(&a.qualified_name.as_str()))
        || LIFECYCLE_NAMES.contains(&method.name.to_lowercase().as_str())
}

pub fn is_validation(method: &MethodNode) -> bool {
    let lower = method.name.to_lowercase();
    if VALIDATION_PREFIXES.iter().any(|p| lower.starts_with(p)) {
        return true;
    }
    match lower.strip_prefix("is") {
        Some(suffix) if !suffix.is_empty() && method.return_type.is_boolean() => {
            VALIDATION_SUFFIXES.contains(&suffix)
                || suffix.contains("valid")
                || suffix.contains("check")
        }
        _ => false,
    }
}

pub fn has_query_prefix(name: &str) -> bool {
    let lower = name.to_lowercase();
    QUERY_PREFIXES.iter().any(|p| lower.starts_with(p))
}

/// Fallback bucket for methods with no special role
pub fn fallback_role(method: &MethodNode) -> MethodRole {
    let is_void = method.return_type.is_void();
    if is_void && !method.parameters.is_empty() {
        MethodRole::Command
    } else if !is_void && has_query_prefix(&method.name) {
        MethodRole::Query
    } else {
        MethodRole::Business
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MethodRoleDetector;

impl MethodRoleDetector {
    pub fn detect(&self, method: &MethodNode) -> BTreeSet<MethodRole> {
        let checks: [(fn(&MethodNode) -> bool, MethodRole); 6] = [
            (is_getter, MethodRole::Getter),
            (is_setter, MethodRole::Setter),
            (is_factory, MethodRole::Factory),
            (is_object_method, MethodRole::ObjectMethod),
            (is_lifecycle, MethodRole::Lifecycle),
            (is_validation, MethodRole::Validation),
        ];
        let mut roles: BTreeSet<MethodRole> = checks
            .iter()
            .filter(|(check, _)| check(method))
            .map(|(_, role)| *role)
            .collect();
        if roles.is_empty() {
            roles.insert(fallback_role(method));
        }
        roles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Modifier;

    fn method(name: &str, ret: &str) -> MethodNode {
        let mut m = MethodNode::new(name, ret);
        m.declaring_type = "com.acme.Order".to_string();
        m
    }

    #[test]
    fn test_getter_shapes() {
        assert!(is_getter(&method("getTotal", "com.acme.Money")));
        assert!(is_getter(&method("isPaid", "boolean")));
        assert!(!is_getter(&method("isPaid", "java.lang.String")));
        assert!(!is_getter(&method("getaway", "java.lang.String")));
        assert!(!is_getter(&method("get", "java.lang.String")));
        assert!(!is_getter(&method("getTotal", "void")));
    }

    #[test]
    fn test_setter_shape() {
        assert!(is_setter(&method("setTotal", "void").param("total", "int")));
        assert!(!is_setter(&method("setTotal", "void")));
        assert!(!is_setter(&method("settle", "void").param("x", "int")));
    }

    #[test]
    fn test_factory_by_name_or_return_type() {
        assert!(is_factory(&method("of", "java.lang.Object").with_modifier(Modifier::Static)));
        assert!(is_factory(
            &method("place", "com.acme.Order").with_modifier(Modifier::Static)
        ));
        assert!(!is_factory(&method("of", "com.acme.Order")));
    }

    #[test]
    fn test_object_methods() {
        assert!(is_object_method(
            &method("equals", "boolean").param("o", "java.lang.Object")
        ));
        assert!(is_object_method(&method("hashCode", "int")));
        assert!(is_object_method(&method("toString", "java.lang.String")));
        assert!(!is_object_method(&method("toString", "int")));
    }

    #[test]
    fn test_validation_names() {
        assert!(is_validation(&method("validateLines", "void")));
        assert!(is_validation(&method("ensureOpen", "void")));
        assert!(is_validation(&method("isValid", "boolean")));
        assert!(is_validation(&method("isEmpty", "boolean")));
        assert!(!is_validation(&method("isPaid", "boolean")));
    }

    #[test]
    fn test_lifecycle_by_annotation_or_name() {
        assert!(is_lifecycle(&method("close", "void")));
        assert!(is_lifecycle(
            &method("warmUp", "void").annotated("jakarta.annotation.PostConstruct")
        ));
        assert!(!is_lifecycle(&method("closeOrder", "void")));
    }

    #[test]
    fn test_fallback_buckets() {
        let detector = MethodRoleDetector;
        assert_eq!(
            detector.detect(&method("addLine", "void").param("line", "com.acme.OrderLine")),
            BTreeSet::from([MethodRole::Command])
        );
        assert_eq!(
            detector.detect(
                &method("findLine", "com.acme.OrderLine").param("sku", "java.lang.String")
            ),
            BTreeSet::from([MethodRole::Query])
        );
        assert_eq!(
            detector.detect(&method("total", "com.acme.Money")),
            BTreeSet::from([MethodRole::Business])
        );
        assert_eq!(
            detector.detect(&method("cancel", "void")),
            BTreeSet::from([MethodRole::Business])
        );
    }

    #[test]
    fn test_special_roles_suppress_fallback() {
        let detector = MethodRoleDetector;
        let roles = detector.detect(&method("isValid", "boolean"));
        assert_eq!(
            roles,
            BTreeSet::from([MethodRole::Getter, MethodRole::Validation])
        );
        assert!(roles.iter().all(MethodRole::is_special));
    }

    #[test]
    fn test_boilerplate_roles() {
        assert!(MethodRole::Getter.is_boilerplate());
        assert!(MethodRole::Lifecycle.is_boilerplate());
        assert!(!MethodRole::Validation.is_boilerplate());
        assert!(!MethodRole::Business.is_boilerplate());
    }
}
