use super::{push_distinct, ArchTypeBuilder};
use crate::classification::{ClassificationResult, DrivenPortKind, ElementKind};
use crate::errors::Result;
use crate::graph::{simple_name_of, TypeNode, TypeRef};
use crate::model::arch::{ArchType, DrivenPort, DrivingPort, UseCase, UseCaseType};
use crate::model::context::BuilderContext;
use crate::model::types::{ClassificationTrace, Method, TypeId, TypeStructure};
use crate::roles::MethodRole;

fn use_case_type(method: &Method) -> UseCaseType {
    if method.return_type.is_void() {
        UseCaseType::Command
    } else if method.has_role(MethodRole::Query) || method.parameters.is_empty() {
        UseCaseType::Query
    } else {
        UseCaseType::CommandQuery
    }
}

pub struct DrivingPortBuilder;

impl DrivingPortBuilder {
    fn io_types(structure: &TypeStructure) -> (Vec<TypeRef>, Vec<TypeRef>) {
        let mut inputs = Vec::new();
        let mut outputs = Vec::new();
        for method in &structure.methods {
            for param in &method.parameters {
                push_distinct(&mut inputs, param.type_ref.clone());
            }
            if !method.return_type.is_void() {
                push_distinct(&mut outputs, method.return_type.clone());
            }
        }
        (inputs, outputs)
    }
}

impl ArchTypeBuilder for DrivingPortBuilder {
    fn build(
        &self,
        node: &TypeNode,
        classification: &ClassificationResult,
        ctx: &BuilderContext<'_>,
    ) -> Result<ArchType> {
        let structure = ctx.build_structure(node);
        let use_cases = structure
            .methods
            .iter()
            .filter(|m| !m.is_static() && !m.has_role(MethodRole::ObjectMethod))
            .map(|m| UseCase {
                name: m.name.clone(),
                use_case_type: use_case_type(m),
            })
            .collect();
        let (input_types, output_types) = Self::io_types(&structure);
        Ok(ArchType::DrivingPort(DrivingPort {
            id: TypeId::new(node.qualified_name.clone()),
            trace: ClassificationTrace::from(classification),
            use_cases,
            input_types,
            output_types,
            structure,
        }))
    }
}

pub struct DrivenPortBuilder;

impl DrivenPortBuilder {
    /// Aggregate root named in the port's generic supertypes or signatures,
    /// else `FooRepository` -> `Foo` in the same package
    fn managed_aggregate(
        node: &TypeNode,
        structure: &TypeStructure,
        ctx: &BuilderContext<'_>,
    ) -> Option<TypeId> {
        let is_aggregate = |name: &str| ctx.is_classified_as(name, ElementKind::AggregateRoot);

        let from_generics = structure
            .interfaces
            .iter()
            .chain(structure.super_type.iter())
            .flat_map(|i| i.arguments.iter())
            .flat_map(|arg| arg.all_names())
            .find(|name| is_aggregate(*name));
        if let Some(name) = from_generics {
            return Some(TypeId::new(name));
        }

        let from_signatures = structure
            .methods
            .iter()
            .flat_map(|m| {
                std::iter::once(&m.return_type).chain(m.parameters.iter().map(|p| &p.type_ref))
            })
            .flat_map(|t| t.all_names())
            .find(|name| is_aggregate(*name));
        if let Some(name) = from_signatures {
            return Some(TypeId::new(name));
        }

        let stem = simple_name_of(&node.qualified_name).strip_suffix("Repository")?;
        let package = node.package_name();
        let candidate = if package.is_empty() {
            stem.to_string()
        } else {
            format!("{package}.{stem}")
        };
        is_aggregate(&candidate).then(|| TypeId::new(candidate))
    }
}

impl ArchTypeBuilder for DrivenPortBuilder {
    fn build(
        &self,
        node: &TypeNode,
        classification: &ClassificationResult,
        ctx: &BuilderContext<'_>,
    ) -> Result<ArchType> {
        let structure = ctx.build_structure(node);
        let port_kind = match classification.kind {
            ElementKind::DrivenPort(kind) => kind,
            _ => DrivenPortKind::Other,
        };
        let managed_aggregate = if port_kind == DrivenPortKind::Repository {
            Self::managed_aggregate(node, &structure, ctx)
        } else {
            None
        };
        Ok(ArchType::DrivenPort(DrivenPort {
            id: TypeId::new(node.qualified_name.clone()),
            trace: ClassificationTrace::from(classification),
            port_kind,
            managed_aggregate,
            structure,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{InMemoryTypeGraph, MethodNode, TypeDecl, TypeGraphQuery};
    use crate::model::builders::test_support::results;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_driving_port_use_cases() {
        let graph = InMemoryTypeGraph::builder()
            .with_type(
                TypeDecl::interface("com.acme.app.OrderingUseCase")
                    .method(MethodNode::new("cancel", "void").param("id", "com.acme.OrderId"))
                    .method(MethodNode::new("findOpen", "java.util.List").param("limit", "int"))
                    .method(MethodNode::new("count", "long"))
                    .method(
                        MethodNode::new("place", "com.acme.OrderId")
                            .param("command", "com.acme.PlaceOrder"),
                    ),
            )
            .build();
        let classes = results(&[("com.acme.app.OrderingUseCase", ElementKind::DrivingPort)]);
        let ctx = BuilderContext::new(&graph, &classes);
        let node = graph.type_by_qualified_name("com.acme.app.OrderingUseCase").unwrap();
        let ArchType::DrivingPort(port) = DrivingPortBuilder
            .build(node, classes.get("com.acme.app.OrderingUseCase").unwrap(), &ctx)
            .unwrap()
        else {
            panic!("expected driving port");
        };
        let kinds: Vec<_> = port.use_cases.iter().map(|u| u.use_case_type).collect();
        assert_eq!(
            kinds,
            vec![
                UseCaseType::Command,
                UseCaseType::Query,
                UseCaseType::Query,
                UseCaseType::CommandQuery
            ]
        );
        assert_eq!(
            port.input_types,
            vec![
                TypeRef::of("com.acme.OrderId"),
                TypeRef::of("int"),
                TypeRef::of("com.acme.PlaceOrder")
            ]
        );
        assert_eq!(port.output_types.len(), 3);
    }

    #[test]
    fn test_repository_managed_aggregate_from_signature_and_name() {
        let graph = InMemoryTypeGraph::builder()
            .with_type(
                TypeDecl::interface("com.acme.OrderRepository")
                    .method(MethodNode::new("save", "void").param("order", "com.acme.Order")),
            )
            .with_type(TypeDecl::interface("com.acme.CustomerRepository"))
            .build();
        let classes = results(&[
            ("com.acme.Order", ElementKind::AggregateRoot),
            ("com.acme.Customer", ElementKind::AggregateRoot),
            ("com.acme.OrderRepository", ElementKind::REPOSITORY),
            ("com.acme.CustomerRepository", ElementKind::REPOSITORY),
        ]);
        let ctx = BuilderContext::new(&graph, &classes);
        let managed = |name: &str| {
            let node = graph.type_by_qualified_name(name).unwrap();
            match DrivenPortBuilder.build(node, classes.get(name).unwrap(), &ctx).unwrap() {
                ArchType::DrivenPort(port) => port.managed_aggregate,
                other => panic!("unexpected {:?}", other.kind()),
            }
        };
        assert_eq!(managed("com.acme.OrderRepository"), Some(TypeId::from("com.acme.Order")));
        assert_eq!(
            managed("com.acme.CustomerRepository"),
            Some(TypeId::from("com.acme.Customer"))
        );
    }
}
