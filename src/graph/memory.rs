use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::nodes::{
    AnnotationRef, ConstructorNode, FieldNode, MethodNode, Modifier, ParameterNode, TypeForm,
    TypeNode, TypeRef,
};
use super::{DependencyGraphQuery, TypeGraphQuery};

/// A type declaration with its members, assembled fluently
#[derive(Debug, Clone)]
pub struct TypeDecl {
    node: TypeNode,
    fields: Vec<FieldNode>,
    methods: Vec<MethodNode>,
    constructors: Vec<ConstructorNode>,
}

impl TypeDecl {
    pub fn new(qualified_name: &str, form: TypeForm) -> Self {
        Self {
            node: TypeNode::new(qualified_name, form),
            fields: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
        }
    }

    pub fn class(qualified_name: &str) -> Self {
        Self::new(qualified_name, TypeForm::Class)
    }

    pub fn interface(qualified_name: &str) -> Self {
        Self::new(qualified_name, TypeForm::Interface)
    }

    pub fn record(qualified_name: &str) -> Self {
        Self::new(qualified_name, TypeForm::Record)
    }

    pub fn enumeration(qualified_name: &str) -> Self {
        Self::new(qualified_name, TypeForm::Enum)
    }

    pub fn annotated(mut self, annotation: &str) -> Self {
        self.node.annotations.push(AnnotationRef::new(annotation));
        self
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.node.modifiers.insert(modifier);
        self
    }

    pub fn extends(mut self, super_type: impl Into<TypeRef>) -> Self {
        self.node.super_type = Some(super_type.into());
        self
    }

    pub fn implements(mut self, interface: impl Into<TypeRef>) -> Self {
        self.node.interfaces.push(interface.into());
        self
    }

    /// Adds an instance field
    pub fn field(self, name: &str, type_ref: impl Into<TypeRef>) -> Self {
        self.field_node(FieldNode::new(name, type_ref))
    }

    /// Adds a `final` instance field
    pub fn final_field(self, name: &str, type_ref: impl Into<TypeRef>) -> Self {
        self.field_node(FieldNode::new(name, type_ref).with_modifier(Modifier::Final))
    }

    pub fn field_node(mut self, mut field: FieldNode) -> Self {
        field.declaring_type = self.node.qualified_name.clone();
        self.fields.push(field);
        self
    }

    pub fn method(mut self, mut method: MethodNode) -> Self {
        method.declaring_type = self.node.qualified_name.clone();
        self.methods.push(method);
        self
    }

    pub fn constructor(mut self, parameters: Vec<ParameterNode>) -> Self {
        let mut ctor = ConstructorNode::new(parameters);
        ctor.declaring_type = self.node.qualified_name.clone();
        self.constructors.push(ctor);
        self
    }

    pub fn qualified_name(&self) -> &str {
        &self.node.qualified_name
    }
}

/// Type graph held entirely in memory.
///
/// Dependencies are derived from member signatures and supertypes, plus any
/// explicit edges registered with [`InMemoryTypeGraphBuilder::depends_on`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryTypeGraph {
    types: Vec<TypeNode>,
    fields: Vec<Vec<FieldNode>>,
    methods: Vec<Vec<MethodNode>>,
    constructors: Vec<Vec<ConstructorNode>>,
    index: HashMap<String, usize>,
    dependencies: BTreeMap<String, BTreeSet<String>>,
}

impl InMemoryTypeGraph {
    pub fn builder() -> InMemoryTypeGraphBuilder {
        InMemoryTypeGraphBuilder::default()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    fn slot(&self, node: &TypeNode) -> Option<usize> {
        self.index.get(&node.qualified_name).copied()
    }
}

impl TypeGraphQuery for InMemoryTypeGraph {
    fn all_types(&self) -> &[TypeNode] {
        &self.types
    }

    fn fields_of(&self, node: &TypeNode) -> &[FieldNode] {
        self.slot(node)
            .map(|i| self.fields[i].as_slice())
            .unwrap_or_default()
    }

    fn methods_of(&self, node: &TypeNode) -> &[MethodNode] {
        self.slot(node)
            .map(|i| self.methods[i].as_slice())
            .unwrap_or_default()
    }

    fn constructors_of(&self, node: &TypeNode) -> &[ConstructorNode] {
        self.slot(node)
            .map(|i| self.constructors[i].as_slice())
            .unwrap_or_default()
    }

    fn type_by_qualified_name(&self, name: &str) -> Option<&TypeNode> {
        self.index.get(name).map(|&i| &self.types[i])
    }
}

impl DependencyGraphQuery for InMemoryTypeGraph {
    fn all_type_dependencies(&self) -> BTreeMap<String, BTreeSet<String>> {
        self.dependencies.clone()
    }

    fn find_implementors(&self, qualified_name: &str) -> Vec<String> {
        self.types
            .iter()
            .filter(|t| {
                t.implements(qualified_name)
                    || t.super_type
                        .as_ref()
                        .is_some_and(|s| s.qualified_name == qualified_name)
            })
            .map(|t| t.qualified_name.clone())
            .collect()
    }
}

#[derive(Debug, Default)]
pub struct InMemoryTypeGraphBuilder {
    decls: Vec<TypeDecl>,
    explicit: Vec<(String, String)>,
    derive_dependencies: Option<bool>,
}

impl InMemoryTypeGraphBuilder {
    pub fn with_type(mut self, decl: TypeDecl) -> Self {
        self.decls.push(decl);
        self
    }

    /// Adds a dependency edge not visible in member signatures
    pub fn depends_on(mut self, from: &str, to: &str) -> Self {
        self.explicit.push((from.to_string(), to.to_string()));
        self
    }

    /// Use only explicit edges; skip signature-derived dependencies
    pub fn explicit_dependencies_only(mut self) -> Self {
        self.derive_dependencies = Some(false);
        self
    }

    /// Later declarations with a repeated qualified name replace earlier ones
    pub fn build(self) -> InMemoryTypeGraph {
        let mut graph = InMemoryTypeGraph::default();
        let derive = self.derive_dependencies.unwrap_or(true);

        for decl in self.decls {
            let name = decl.node.qualified_name.clone();
            let deps = if derive {
                signature_dependencies(&decl)
            } else {
                BTreeSet::new()
            };
            graph.dependencies.insert(name.clone(), deps);

            if let Some(&slot) = graph.index.get(&name) {
                graph.types[slot] = decl.node;
                graph.fields[slot] = decl.fields;
                graph.methods[slot] = decl.methods;
                graph.constructors[slot] = decl.constructors;
            } else {
                graph.index.insert(name, graph.types.len());
                graph.types.push(decl.node);
                graph.fields.push(decl.fields);
                graph.methods.push(decl.methods);
                graph.constructors.push(decl.constructors);
            }
        }

        for (from, to) in self.explicit {
            graph.dependencies.entry(from).or_default().insert(to);
        }

        graph
    }
}

/// Every type named by a declaration's supertypes and member signatures
fn signature_dependencies(decl: &TypeDecl) -> BTreeSet<String> {
    let own = decl.node.qualified_name.as_str();
    let refs = decl
        .node
        .super_type
        .iter()
        .chain(decl.node.interfaces.iter())
        .chain(decl.fields.iter().map(|f| &f.type_ref))
        .chain(decl.methods.iter().map(|m| &m.return_type))
        .chain(
            decl.methods
                .iter()
                .flat_map(|m| m.parameters.iter().map(|p| &p.type_ref)),
        )
        .chain(
            decl.constructors
                .iter()
                .flat_map(|c| c.parameters.iter().map(|p| &p.type_ref)),
        );

    refs.flat_map(|r| r.all_names())
        .filter(|name| *name != own && name.contains('.'))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_graph() -> InMemoryTypeGraph {
        InMemoryTypeGraph::builder()
            .with_type(
                TypeDecl::class("com.acme.order.Order")
                    .field("id", "com.acme.order.OrderId")
                    .field(
                        "lines",
                        TypeRef::generic("java.util.List", vec!["com.acme.order.OrderLine".into()]),
                    )
                    .method(MethodNode::new("total", "com.acme.order.Money")),
            )
            .with_type(TypeDecl::record("com.acme.order.OrderId").field("value", "java.util.UUID"))
            .with_type(
                TypeDecl::class("com.acme.infra.JpaOrderRepository")
                    .implements("com.acme.order.OrderRepository"),
            )
            .with_type(TypeDecl::interface("com.acme.order.OrderRepository"))
            .build()
    }

    #[test]
    fn test_lookup_and_members() {
        let graph = sample_graph();
        let order = graph.type_by_qualified_name("com.acme.order.Order").unwrap();
        assert_eq!(graph.fields_of(order).len(), 2);
        assert_eq!(graph.fields_of(order)[0].declaring_type, "com.acme.order.Order");
        assert_eq!(graph.methods_of(order).len(), 1);
        assert!(graph.type_by_qualified_name("com.acme.Missing").is_none());
    }

    #[test]
    fn test_signature_dependencies_include_generic_arguments() {
        let graph = sample_graph();
        let deps = graph.all_type_dependencies();
        let order_deps: Vec<_> = deps["com.acme.order.Order"].iter().cloned().collect();
        assert_eq!(
            order_deps,
            vec![
                "com.acme.order.Money".to_string(),
                "com.acme.order.OrderId".to_string(),
                "com.acme.order.OrderLine".to_string(),
                "java.util.List".to_string(),
            ]
        );
    }

    #[test]
    fn test_find_implementors() {
        let graph = sample_graph();
        assert_eq!(
            graph.find_implementors("com.acme.order.OrderRepository"),
            vec!["com.acme.infra.JpaOrderRepository".to_string()]
        );
    }

    #[test]
    fn test_explicit_only_dependencies() {
        let graph = InMemoryTypeGraph::builder()
            .with_type(TypeDecl::class("a.A").field("b", "a.B"))
            .with_type(TypeDecl::class("a.B"))
            .explicit_dependencies_only()
            .depends_on("a.B", "a.A")
            .build();
        let deps = graph.all_type_dependencies();
        assert!(deps["a.A"].is_empty());
        assert!(deps["a.B"].contains("a.A"));
    }
}
