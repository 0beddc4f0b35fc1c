use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::KindLookup;
use crate::classification::ElementKind;
use crate::graph::{simple_name_of, FieldNode, TypeGraphQuery};

pub const ID_ANNOTATIONS: &[&str] = &[
    "javax.persistence.Id",
    "jakarta.persistence.Id",
    "org.jmolecules.ddd.annotation.Identity",
    "org.springframework.data.annotation.Id",
];

pub const VERSION_ANNOTATIONS: &[&str] = &[
    "javax.persistence.Version",
    "jakarta.persistence.Version",
    "org.springframework.data.annotation.Version",
];

const AUDIT_NAMES: &[&str] = &[
    "createdat",
    "updatedat",
    "createdby",
    "updatedby",
    "createdon",
    "updatedon",
    "modifiedat",
    "modifiedon",
    "modifiedby",
];

const TECHNICAL_NAMES: &[&str] = &["version", "tenant", "tenantid", "serialversionuid"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldRole {
    Identity,
    Collection,
    AggregateReference,
    Embedded,
    Audit,
    Technical,
}

/// `OrderLine` -> `orderLineId`
pub fn expected_identity_name(declaring_simple_name: &str) -> String {
    let mut chars = declaring_simple_name.chars();
    match chars.next() {
        Some(first) => format!("{}{}Id", first.to_lowercase(), chars.as_str()),
        None => "id".to_string(),
    }
}

pub fn has_identity_annotation(field: &FieldNode) -> bool {
    field.has_any_annotation(ID_ANNOTATIONS)
}

/// Identity test with an optionally known declaring type.
///
/// An annotation or the exact name `id` always wins. Otherwise the name
/// must equal `lowerCamel(declaring) + "Id"`, which keeps foreign keys such
/// as `productId` inside `OrderLine` from being read as identity.
pub fn is_identity(field: &FieldNode, declaring_simple_name: Option<&str>) -> bool {
    if field.is_collection_type() || field.type_ref.is_map_like() {
        return false;
    }
    if has_identity_annotation(field) || field.name == "id" {
        return true;
    }
    declaring_simple_name.is_some_and(|simple| field.name == expected_identity_name(simple))
}

pub fn is_audit_name(name: &str) -> bool {
    AUDIT_NAMES.contains(&name.to_lowercase().as_str())
}

pub fn is_technical(field: &FieldNode) -> bool {
    TECHNICAL_NAMES.contains(&field.name.to_lowercase().as_str())
        || field.has_any_annotation(VERSION_ANNOTATIONS)
}

/// Simple name of the declaring type, preferring the graph's own node
pub fn declaring_simple_name<'a>(
    field: &'a FieldNode,
    graph: &'a dyn TypeGraphQuery,
) -> Option<&'a str> {
    if let Some(node) = graph.type_by_qualified_name(&field.declaring_type) {
        return Some(node.simple_name());
    }
    (!field.declaring_type.is_empty()).then(|| simple_name_of(&field.declaring_type))
}

pub struct FieldRoleDetector<'a> {
    graph: &'a dyn TypeGraphQuery,
    kinds: &'a dyn KindLookup,
}

impl<'a> FieldRoleDetector<'a> {
    pub fn new(graph: &'a dyn TypeGraphQuery, kinds: &'a dyn KindLookup) -> Self {
        Self { graph, kinds }
    }

    pub fn detect(&self, field: &FieldNode) -> BTreeSet<FieldRole> {
        let mut roles = BTreeSet::new();
        let raw = field.type_ref.raw_name();

        if is_identity(field, declaring_simple_name(field, self.graph)) {
            roles.insert(FieldRole::Identity);
        }
        if field.is_collection_type() {
            roles.insert(FieldRole::Collection);
        }
        if self.kinds.is_classified_as(raw, ElementKind::AggregateRoot) {
            roles.insert(FieldRole::AggregateReference);
        }
        if self.kinds.is_classified_as(raw, ElementKind::ValueObject)
            || self.kinds.is_classified_as(raw, ElementKind::Identifier)
        {
            roles.insert(FieldRole::Embedded);
        }
        if is_audit_name(&field.name) {
            roles.insert(FieldRole::Audit);
        }
        if is_technical(field) {
            roles.insert(FieldRole::Technical);
        }
        roles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{InMemoryTypeGraph, TypeDecl, TypeRef};
    use proptest::prelude::*;
    use std::collections::HashMap;

    fn field_on(declaring: &str, name: &str, ty: impl Into<TypeRef>) -> FieldNode {
        let mut field = FieldNode::new(name, ty);
        field.declaring_type = declaring.to_string();
        field
    }

    // Pure function unit tests

    #[test]
    fn test_expected_identity_name() {
        assert_eq!(expected_identity_name("Order"), "orderId");
        assert_eq!(expected_identity_name("OrderLine"), "orderLineId");
    }

    #[test]
    fn test_foreign_key_is_not_identity() {
        let field = field_on("com.acme.OrderLine", "orderId", "com.acme.OrderId");
        assert!(!is_identity(&field, Some("OrderLine")));
        let own = field_on("com.acme.Order", "orderId", "com.acme.OrderId");
        assert!(is_identity(&own, Some("Order")));
    }

    #[test]
    fn test_annotation_marks_identity() {
        let field = field_on("com.acme.Order", "reference", "java.lang.String")
            .annotated("jakarta.persistence.Id");
        assert!(is_identity(&field, Some("Order")));
    }

    #[test]
    fn test_collections_never_identity() {
        let field = field_on(
            "com.acme.Order",
            "id",
            TypeRef::generic("java.util.List", vec!["java.lang.Long".into()]),
        )
        .annotated("javax.persistence.Id");
        assert!(!is_identity(&field, Some("Order")));
    }

    #[test]
    fn test_audit_and_technical_names() {
        assert!(is_audit_name("createdAt"));
        assert!(is_audit_name("modifiedBy"));
        assert!(!is_audit_name("created"));
        assert!(is_technical(&FieldNode::new("tenantId", "java.lang.String")));
        assert!(is_technical(
            &FieldNode::new("rev", "long").annotated("jakarta.persistence.Version")
        ));
    }

    #[test]
    fn test_detect_unions_roles() {
        let graph = InMemoryTypeGraph::builder()
            .with_type(TypeDecl::class("com.acme.OrderLine"))
            .build();
        let kinds: HashMap<String, ElementKind> = [
            ("com.acme.ProductId".to_string(), ElementKind::Identifier),
            ("com.acme.Product".to_string(), ElementKind::AggregateRoot),
        ]
        .into_iter()
        .collect();
        let detector = FieldRoleDetector::new(&graph, &kinds);

        let product_id = field_on("com.acme.OrderLine", "productId", "com.acme.ProductId");
        assert_eq!(
            detector.detect(&product_id),
            BTreeSet::from([FieldRole::Embedded])
        );

        let product = field_on("com.acme.OrderLine", "product", "com.acme.Product");
        assert_eq!(
            detector.detect(&product),
            BTreeSet::from([FieldRole::AggregateReference])
        );

        let created = field_on("com.acme.OrderLine", "createdAt", "java.time.Instant");
        assert_eq!(detector.detect(&created), BTreeSet::from([FieldRole::Audit]));
    }

    #[test]
    fn test_unresolved_declaring_type_falls_back_to_name() {
        let graph = InMemoryTypeGraph::default();
        let kinds: HashMap<String, ElementKind> = HashMap::new();
        let detector = FieldRoleDetector::new(&graph, &kinds);
        let field = field_on("com.acme.Invoice", "invoiceId", "java.util.UUID");
        assert!(detector.detect(&field).contains(&FieldRole::Identity));
    }

    proptest! {
        #[test]
        fn prop_field_named_id_is_always_identity(declaring in "[A-Z][a-zA-Z]{0,12}") {
            let field = field_on(&format!("com.acme.{declaring}"), "id", "java.lang.Long");
            prop_assert!(is_identity(&field, Some(&declaring)));
        }
    }
}
