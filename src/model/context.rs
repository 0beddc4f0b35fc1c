use super::types::{Constructor, Field, Method, Parameter, TypeStructure};
use crate::classification::{ClassificationResult, ClassificationResults, ElementKind};
use crate::graph::{FieldNode, MethodNode, ParameterNode, TypeGraphQuery, TypeNode, TypeRef};
use crate::roles::{FieldRoleDetector, KindLookup, MethodRoleDetector};

/// Read-only inputs handed to every per-type builder
#[derive(Clone, Copy)]
pub struct BuilderContext<'a> {
    pub graph: &'a dyn TypeGraphQuery,
    pub classifications: &'a ClassificationResults,
}

impl<'a> BuilderContext<'a> {
    pub fn new(graph: &'a dyn TypeGraphQuery, classifications: &'a ClassificationResults) -> Self {
        Self {
            graph,
            classifications,
        }
    }

    pub fn classification(&self, qualified_name: &str) -> Option<&'a ClassificationResult> {
        self.classifications.get(qualified_name)
    }

    pub fn is_classified_as(&self, qualified_name: &str, kind: ElementKind) -> bool {
        self.classifications.is_classified_as(qualified_name, kind)
    }

    /// Classified types of `kind`, in classification order
    pub fn classified_as(&self, kind: ElementKind) -> impl Iterator<Item = &'a str> {
        self.classifications.of_kind(kind).map(|r| r.subject.as_str())
    }

    pub fn type_node(&self, qualified_name: &str) -> Option<&'a TypeNode> {
        self.graph.type_by_qualified_name(qualified_name)
    }

    /// Instance fields of a node as declared in the graph
    pub fn instance_fields(&self, node: &TypeNode) -> impl Iterator<Item = &'a FieldNode> {
        self.graph.fields_of(node).iter().filter(|f| !f.is_static())
    }

    pub fn field_detector(&self) -> FieldRoleDetector<'a> {
        FieldRoleDetector::new(self.graph, self.classifications)
    }

    pub fn build_field(&self, node: &FieldNode) -> Field {
        let element_type = node.type_ref.element_type();
        Field {
            name: node.name.clone(),
            wrapped_type: self.wrapped_type(&node.type_ref),
            roles: self.field_detector().detect(node),
            type_ref: node.type_ref.clone(),
            element_type,
            modifiers: node.modifiers.clone(),
            annotations: node.annotations.clone(),
        }
    }

    /// Scalar inside a single-field identifier or value object
    pub fn wrapped_type(&self, type_ref: &TypeRef) -> Option<TypeRef> {
        let raw = type_ref.raw_name();
        if !(self.is_classified_as(raw, ElementKind::Identifier)
            || self.is_classified_as(raw, ElementKind::ValueObject))
        {
            return None;
        }
        let wrapper = self.type_node(raw)?;
        single_instance_field(self.instance_fields(wrapper)).map(|f| f.type_ref.clone())
    }

    /// Structure of `node`: instance fields, methods and constructors with roles
    pub fn build_structure(&self, node: &TypeNode) -> TypeStructure {
        let methods = MethodRoleDetector;
        TypeStructure {
            form: node.form,
            modifiers: node.modifiers.clone(),
            annotations: node.annotations.clone(),
            super_type: node.super_type.clone(),
            interfaces: node.interfaces.clone(),
            fields: self.instance_fields(node).map(|f| self.build_field(f)).collect(),
            methods: self
                .graph
                .methods_of(node)
                .iter()
                .map(|m| build_method(m, &methods))
                .collect(),
            constructors: self
                .graph
                .constructors_of(node)
                .iter()
                .map(|c| Constructor {
                    parameters: c.parameters.iter().map(build_parameter).collect(),
                })
                .collect(),
        }
    }
}

fn build_parameter(node: &ParameterNode) -> Parameter {
    Parameter {
        name: node.name.clone(),
        type_ref: node.type_ref.clone(),
    }
}

fn build_method(node: &MethodNode, detector: &MethodRoleDetector) -> Method {
    Method {
        name: node.name.clone(),
        return_type: node.return_type.clone(),
        parameters: node.parameters.iter().map(build_parameter).collect(),
        roles: detector.detect(node),
        modifiers: node.modifiers.clone(),
        annotations: node.annotations.clone(),
    }
}

/// The only element of `fields`, if there is exactly one
pub(crate) fn single_instance_field<'f>(
    mut fields: impl Iterator<Item = &'f FieldNode>,
) -> Option<&'f FieldNode> {
    let only = fields.next()?;
    fields.next().is_none().then_some(only)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::Classifier;
    use crate::config::{ClassificationConfig, ParallelConfig};
    use crate::graph::{InMemoryTypeGraph, Modifier, TypeDecl};
    use crate::roles::FieldRole;

    fn graph() -> InMemoryTypeGraph {
        InMemoryTypeGraph::builder()
            .with_type(
                TypeDecl::class("com.acme.Order")
                    .field("id", "com.acme.OrderId")
                    .field_node(
                        FieldNode::new("serialVersionUID", "long").with_modifier(Modifier::Static),
                    )
                    .field(
                        "tags",
                        crate::graph::TypeRef::generic(
                            "java.util.Set",
                            vec!["com.acme.Tag".into()],
                        ),
                    ),
            )
            .with_type(TypeDecl::record("com.acme.OrderId").field("value", "java.util.UUID"))
            .build()
    }

    #[test]
    fn test_structure_skips_static_fields_and_fills_types() {
        let graph = graph();
        let results = Classifier::default().classify_all(
            &graph,
            &ClassificationConfig::default(),
            &ParallelConfig::sequential(),
        );
        let ctx = BuilderContext::new(&graph, &results);
        let order = graph.type_by_qualified_name("com.acme.Order").unwrap();
        let structure = ctx.build_structure(order);

        assert_eq!(structure.fields.len(), 2);
        let id = structure.identity_field().unwrap();
        assert_eq!(id.name, "id");
        assert!(id.has_role(FieldRole::Embedded));
        assert_eq!(id.wrapped_type, Some(TypeRef::of("java.util.UUID")));

        let tags = structure.field("tags").unwrap();
        assert_eq!(tags.element_type, Some(TypeRef::of("com.acme.Tag")));
        assert!(tags.has_role(FieldRole::Collection));
    }
}
