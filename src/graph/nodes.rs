//! Node types produced by a source-language front end.
//!
//! These are plain immutable values. Names are fully qualified dotted
//! names (`com.acme.order.Order`); generic arguments hang off [`TypeRef`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

const COLLECTION_TYPES: &[&str] = &[
    "java.util.Collection",
    "java.util.List",
    "java.util.Set",
    "java.util.SortedSet",
    "java.util.NavigableSet",
    "java.util.Queue",
    "java.util.Deque",
    "java.util.ArrayList",
    "java.util.LinkedList",
    "java.util.HashSet",
    "java.util.LinkedHashSet",
    "java.util.TreeSet",
    "java.lang.Iterable",
];

const MAP_TYPES: &[&str] = &[
    "java.util.Map",
    "java.util.SortedMap",
    "java.util.NavigableMap",
    "java.util.HashMap",
    "java.util.LinkedHashMap",
    "java.util.TreeMap",
    "java.util.concurrent.ConcurrentMap",
    "java.util.concurrent.ConcurrentHashMap",
];

/// Last dotted segment of a qualified name
pub fn simple_name_of(qualified_name: &str) -> &str {
    qualified_name
        .rsplit_once('.')
        .map_or(qualified_name, |(_, simple)| simple)
}

/// Everything before the last dotted segment; empty for the default package
pub fn package_of(qualified_name: &str) -> &str {
    qualified_name
        .rsplit_once('.')
        .map_or("", |(package, _)| package)
}

/// Declaration form of a type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeForm {
    Class,
    Interface,
    Record,
    Enum,
    Annotation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Static,
    Final,
    Abstract,
    Sealed,
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnnotationRef {
    pub qualified_name: String,
}

impl AnnotationRef {
    pub fn new(qualified_name: impl Into<String>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
        }
    }

    pub fn simple_name(&self) -> &str {
        simple_name_of(&self.qualified_name)
    }
}

/// A reference to a type as written at a use site
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeRef {
    /// Raw (erased) qualified name
    pub qualified_name: String,
    /// Generic arguments, in declaration order
    #[serde(default)]
    pub arguments: Vec<TypeRef>,
    #[serde(default)]
    pub is_array: bool,
}

impl TypeRef {
    pub fn of(qualified_name: impl Into<String>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            arguments: Vec::new(),
            is_array: false,
        }
    }

    pub fn generic(qualified_name: impl Into<String>, arguments: Vec<TypeRef>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            arguments,
            is_array: false,
        }
    }

    pub fn array_of(element: impl Into<String>) -> Self {
        Self {
            qualified_name: element.into(),
            arguments: Vec::new(),
            is_array: true,
        }
    }

    pub fn void() -> Self {
        Self::of("void")
    }

    pub fn raw_name(&self) -> &str {
        &self.qualified_name
    }

    pub fn simple_name(&self) -> &str {
        simple_name_of(&self.qualified_name)
    }

    pub fn is_void(&self) -> bool {
        self.qualified_name == "void" && !self.is_array
    }

    pub fn is_boolean(&self) -> bool {
        !self.is_array && matches!(self.qualified_name.as_str(), "boolean" | "java.lang.Boolean")
    }

    pub fn is_collection(&self) -> bool {
        self.is_array || COLLECTION_TYPES.contains(&self.qualified_name.as_str())
    }

    pub fn is_map_like(&self) -> bool {
        !self.is_array && MAP_TYPES.contains(&self.qualified_name.as_str())
    }

    /// Element type of an array or collection
    pub fn element_type(&self) -> Option<TypeRef> {
        if self.is_array {
            return Some(TypeRef::of(self.qualified_name.clone()));
        }
        if self.is_collection() {
            return self.arguments.first().cloned();
        }
        None
    }

    /// This reference and all nested generic arguments, depth first
    pub fn all_names(&self) -> Vec<&str> {
        let mut names = vec![self.qualified_name.as_str()];
        for arg in &self.arguments {
            names.extend(arg.all_names());
        }
        names
    }
}

impl From<&str> for TypeRef {
    fn from(name: &str) -> Self {
        TypeRef::of(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeNode {
    pub qualified_name: String,
    pub form: TypeForm,
    #[serde(default)]
    pub modifiers: BTreeSet<Modifier>,
    #[serde(default)]
    pub annotations: Vec<AnnotationRef>,
    #[serde(default)]
    pub super_type: Option<TypeRef>,
    #[serde(default)]
    pub interfaces: Vec<TypeRef>,
}

impl TypeNode {
    pub fn new(qualified_name: impl Into<String>, form: TypeForm) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            form,
            modifiers: BTreeSet::new(),
            annotations: Vec::new(),
            super_type: None,
            interfaces: Vec::new(),
        }
    }

    pub fn simple_name(&self) -> &str {
        simple_name_of(&self.qualified_name)
    }

    pub fn package_name(&self) -> &str {
        package_of(&self.qualified_name)
    }

    pub fn is_interface(&self) -> bool {
        self.form == TypeForm::Interface
    }

    pub fn is_record(&self) -> bool {
        self.form == TypeForm::Record
    }

    pub fn is_enum(&self) -> bool {
        self.form == TypeForm::Enum
    }

    pub fn is_abstract(&self) -> bool {
        self.modifiers.contains(&Modifier::Abstract)
    }

    pub fn has_annotation(&self, qualified_name: &str) -> bool {
        self.annotations
            .iter()
            .any(|a| a.qualified_name == qualified_name)
    }

    /// True when any annotation name is in `names`
    pub fn has_any_annotation(&self, names: &[&str]) -> bool {
        self.annotations
            .iter()
            .any(|a| names.contains(&a.qualified_name.as_str()))
    }

    pub fn implements(&self, qualified_name: &str) -> bool {
        self.interfaces
            .iter()
            .any(|i| i.qualified_name == qualified_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldNode {
    pub name: String,
    /// Qualified name of the declaring type
    pub declaring_type: String,
    pub type_ref: TypeRef,
    #[serde(default)]
    pub modifiers: BTreeSet<Modifier>,
    #[serde(default)]
    pub annotations: Vec<AnnotationRef>,
}

impl FieldNode {
    pub fn new(name: impl Into<String>, type_ref: impl Into<TypeRef>) -> Self {
        Self {
            name: name.into(),
            declaring_type: String::new(),
            type_ref: type_ref.into(),
            modifiers: BTreeSet::new(),
            annotations: Vec::new(),
        }
    }

    pub fn annotated(mut self, annotation: &str) -> Self {
        self.annotations.push(AnnotationRef::new(annotation));
        self
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.insert(modifier);
        self
    }

    pub fn is_static(&self) -> bool {
        self.modifiers.contains(&Modifier::Static)
    }

    pub fn is_final(&self) -> bool {
        self.modifiers.contains(&Modifier::Final)
    }

    pub fn is_collection_type(&self) -> bool {
        self.type_ref.is_collection()
    }

    pub fn has_any_annotation(&self, names: &[&str]) -> bool {
        self.annotations
            .iter()
            .any(|a| names.contains(&a.qualified_name.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterNode {
    pub name: String,
    pub type_ref: TypeRef,
    #[serde(default)]
    pub annotations: Vec<AnnotationRef>,
}

impl ParameterNode {
    pub fn new(name: impl Into<String>, type_ref: impl Into<TypeRef>) -> Self {
        Self {
            name: name.into(),
            type_ref: type_ref.into(),
            annotations: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodNode {
    pub name: String,
    pub declaring_type: String,
    pub return_type: TypeRef,
    #[serde(default)]
    pub parameters: Vec<ParameterNode>,
    #[serde(default)]
    pub modifiers: BTreeSet<Modifier>,
    #[serde(default)]
    pub annotations: Vec<AnnotationRef>,
}

impl MethodNode {
    pub fn new(name: impl Into<String>, return_type: impl Into<TypeRef>) -> Self {
        Self {
            name: name.into(),
            declaring_type: String::new(),
            return_type: return_type.into(),
            parameters: Vec::new(),
            modifiers: BTreeSet::new(),
            annotations: Vec::new(),
        }
    }

    pub fn param(mut self, name: &str, type_ref: impl Into<TypeRef>) -> Self {
        self.parameters.push(ParameterNode::new(name, type_ref));
        self
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.insert(modifier);
        self
    }

    pub fn annotated(mut self, annotation: &str) -> Self {
        self.annotations.push(AnnotationRef::new(annotation));
        self
    }

    pub fn is_static(&self) -> bool {
        self.modifiers.contains(&Modifier::Static)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructorNode {
    pub declaring_type: String,
    #[serde(default)]
    pub parameters: Vec<ParameterNode>,
    #[serde(default)]
    pub modifiers: BTreeSet<Modifier>,
    #[serde(default)]
    pub annotations: Vec<AnnotationRef>,
}

impl ConstructorNode {
    pub fn new(parameters: Vec<ParameterNode>) -> Self {
        Self {
            declaring_type: String::new(),
            parameters,
            modifiers: BTreeSet::new(),
            annotations: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_helpers() {
        assert_eq!(simple_name_of("com.acme.order.Order"), "Order");
        assert_eq!(simple_name_of("Order"), "Order");
        assert_eq!(package_of("com.acme.order.Order"), "com.acme.order");
        assert_eq!(package_of("Order"), "");
    }

    #[test]
    fn test_collection_element_type() {
        let list = TypeRef::generic("java.util.List", vec![TypeRef::of("com.acme.OrderLine")]);
        assert!(list.is_collection());
        assert_eq!(list.element_type(), Some(TypeRef::of("com.acme.OrderLine")));

        let array = TypeRef::array_of("com.acme.Tag");
        assert!(array.is_collection());
        assert_eq!(array.element_type(), Some(TypeRef::of("com.acme.Tag")));

        let map = TypeRef::generic(
            "java.util.Map",
            vec![TypeRef::of("java.lang.String"), TypeRef::of("com.acme.Tag")],
        );
        assert!(!map.is_collection());
        assert!(map.is_map_like());
        assert_eq!(map.element_type(), None);
    }

    #[test]
    fn test_all_names_walks_arguments() {
        let nested = TypeRef::generic(
            "java.util.Map",
            vec![
                TypeRef::of("java.lang.String"),
                TypeRef::generic("java.util.List", vec![TypeRef::of("com.acme.Item")]),
            ],
        );
        assert_eq!(
            nested.all_names(),
            vec![
                "java.util.Map",
                "java.lang.String",
                "java.util.List",
                "com.acme.Item"
            ]
        );
    }

    #[test]
    fn test_boolean_and_void() {
        assert!(TypeRef::of("boolean").is_boolean());
        assert!(TypeRef::of("java.lang.Boolean").is_boolean());
        assert!(TypeRef::void().is_void());
        assert!(!TypeRef::of("int").is_void());
    }
}
