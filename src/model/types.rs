//! Structural building blocks shared by every architectural type.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::classification::{
    ClassificationResult, ConfidenceLevel, Conflict, ElementKind, Evidence,
};
use crate::graph::{package_of, simple_name_of, AnnotationRef, Modifier, TypeForm, TypeRef};
use crate::roles::{FieldRole, MethodRole};

/// Identity of an architectural type, derived from its qualified name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeId(String);

impl TypeId {
    pub fn new(qualified_name: impl Into<String>) -> Self {
        Self(qualified_name.into())
    }

    pub fn qualified_name(&self) -> &str {
        &self.0
    }

    pub fn simple_name(&self) -> &str {
        simple_name_of(&self.0)
    }

    pub fn package_name(&self) -> &str {
        package_of(&self.0)
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<&TypeRef> for TypeId {
    fn from(type_ref: &TypeRef) -> Self {
        Self::new(type_ref.raw_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub name: String,
    pub type_ref: TypeRef,
    /// First generic argument of a collection-typed field
    pub element_type: Option<TypeRef>,
    /// Scalar wrapped by an identifier or single-field value object
    pub wrapped_type: Option<TypeRef>,
    pub roles: BTreeSet<FieldRole>,
    pub modifiers: BTreeSet<Modifier>,
    pub annotations: Vec<AnnotationRef>,
}

impl Field {
    pub fn has_role(&self, role: FieldRole) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_final(&self) -> bool {
        self.modifiers.contains(&Modifier::Final)
    }

    /// Element type for collections, otherwise the declared type
    pub fn target_type(&self) -> &TypeRef {
        self.element_type.as_ref().unwrap_or(&self.type_ref)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    pub name: String,
    pub type_ref: TypeRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Method {
    pub name: String,
    pub return_type: TypeRef,
    pub parameters: Vec<Parameter>,
    pub roles: BTreeSet<MethodRole>,
    pub modifiers: BTreeSet<Modifier>,
    pub annotations: Vec<AnnotationRef>,
}

impl Method {
    pub fn has_role(&self, role: MethodRole) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_static(&self) -> bool {
        self.modifiers.contains(&Modifier::Static)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Constructor {
    pub parameters: Vec<Parameter>,
}

/// Members and declaration facts of one type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeStructure {
    pub form: TypeForm,
    pub modifiers: BTreeSet<Modifier>,
    pub annotations: Vec<AnnotationRef>,
    pub super_type: Option<TypeRef>,
    pub interfaces: Vec<TypeRef>,
    /// Instance fields only; static fields are not part of the structure
    pub fields: Vec<Field>,
    pub methods: Vec<Method>,
    pub constructors: Vec<Constructor>,
}

impl TypeStructure {
    pub fn empty(form: TypeForm) -> Self {
        Self {
            form,
            modifiers: BTreeSet::new(),
            annotations: Vec::new(),
            super_type: None,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
        }
    }

    pub fn is_interface(&self) -> bool {
        self.form == TypeForm::Interface
    }

    pub fn is_record(&self) -> bool {
        self.form == TypeForm::Record
    }

    pub fn is_abstract(&self) -> bool {
        self.is_interface() || self.modifiers.contains(&Modifier::Abstract)
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn identity_field(&self) -> Option<&Field> {
        self.fields.iter().find(|f| f.has_role(FieldRole::Identity))
    }

    pub fn fields_with_role(&self, role: FieldRole) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(move |f| f.has_role(role))
    }

    pub fn methods_with_role(&self, role: MethodRole) -> impl Iterator<Item = &Method> {
        self.methods.iter().filter(move |m| m.has_role(role))
    }

    /// Every type named in supertypes and member signatures
    pub fn referenced_types(&self) -> BTreeSet<&str> {
        let mut names = BTreeSet::new();
        let refs = self
            .super_type
            .iter()
            .chain(self.interfaces.iter())
            .chain(self.fields.iter().map(|f| &f.type_ref))
            .chain(self.methods.iter().map(|m| &m.return_type))
            .chain(self.methods.iter().flat_map(|m| m.parameters.iter().map(|p| &p.type_ref)))
            .chain(
                self.constructors
                    .iter()
                    .flat_map(|c| c.parameters.iter().map(|p| &p.type_ref)),
            );
        for type_ref in refs {
            names.extend(type_ref.all_names());
        }
        names
    }
}

/// Why a type ended up with its architectural kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationTrace {
    pub kind: ElementKind,
    pub confidence: ConfidenceLevel,
    pub criterion: Option<String>,
    pub priority: u32,
    pub justification: String,
    pub evidence: Vec<Evidence>,
    pub conflicts: Vec<Conflict>,
}

impl ClassificationTrace {
    /// Trace for types admitted without any classification
    pub fn unclassified(justification: impl Into<String>) -> Self {
        Self {
            kind: ElementKind::Unclassified,
            confidence: ConfidenceLevel::Low,
            criterion: None,
            priority: 0,
            justification: justification.into(),
            evidence: Vec::new(),
            conflicts: Vec::new(),
        }
    }
}

impl From<&ClassificationResult> for ClassificationTrace {
    fn from(result: &ClassificationResult) -> Self {
        Self {
            kind: result.kind,
            confidence: result.confidence,
            criterion: result.criterion.clone(),
            priority: result.priority,
            justification: result.justification.clone(),
            evidence: result.evidence.clone(),
            conflicts: result.conflicts.clone(),
        }
    }
}
