use serde::Serialize;
use std::collections::HashMap;

use super::arch::{ArchType, ArchVariant};
use super::types::TypeId;
use crate::errors::{Error, Result};

/// All architectural types of one run.
///
/// Types live in a flat arena in insertion order; ids index into it. The
/// registry can only be produced by [`TypeRegistryBuilder::build`], after
/// which it is immutable.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TypeRegistry {
    types: Vec<ArchType>,
    #[serde(skip)]
    index: HashMap<TypeId, usize>,
}

impl TypeRegistry {
    pub fn builder() -> TypeRegistryBuilder {
        TypeRegistryBuilder::default()
    }

    pub fn get(&self, id: &TypeId) -> Option<&ArchType> {
        self.index.get(id).map(|&i| &self.types[i])
    }

    pub fn get_by_name(&self, qualified_name: &str) -> Option<&ArchType> {
        self.get(&TypeId::new(qualified_name))
    }

    pub fn contains(&self, id: &TypeId) -> bool {
        self.index.contains_key(id)
    }

    /// Arena slot of `id`, stable for the registry's lifetime
    pub fn index_of(&self, id: &TypeId) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn get_as<T: ArchVariant>(&self, id: &TypeId) -> Option<&T> {
        self.get(id).and_then(T::from_arch)
    }

    pub fn all(&self) -> impl Iterator<Item = &ArchType> {
        self.types.iter()
    }

    /// Every type of one variant, in registry order
    pub fn all_of<'a, T: ArchVariant + 'a>(&'a self) -> impl Iterator<Item = &'a T> + 'a {
        self.types.iter().filter_map(T::from_arch)
    }

    pub fn ids(&self) -> impl Iterator<Item = &TypeId> {
        self.types.iter().map(ArchType::id)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Append-only construction of a [`TypeRegistry`]
#[derive(Debug, Default)]
pub struct TypeRegistryBuilder {
    types: Vec<ArchType>,
    index: HashMap<TypeId, usize>,
}

impl TypeRegistryBuilder {
    pub fn add(&mut self, arch: ArchType) -> Result<()> {
        let id = arch.id().clone();
        if self.index.contains_key(&id) {
            return Err(Error::DuplicateTypeId(id.to_string()));
        }
        self.index.insert(id, self.types.len());
        self.types.push(arch);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn build(self) -> TypeRegistry {
        TypeRegistry {
            types: self.types,
            index: self.index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::TypeForm;
    use crate::model::arch::{UnclassifiedCategory, UnclassifiedType, ValueObject};
    use crate::model::types::{ClassificationTrace, TypeStructure};

    fn value_object(name: &str) -> ArchType {
        ArchType::ValueObject(ValueObject {
            id: TypeId::from(name),
            structure: TypeStructure::empty(TypeForm::Record),
            trace: ClassificationTrace::unclassified("test"),
        })
    }

    fn unclassified(name: &str) -> ArchType {
        ArchType::Unclassified(UnclassifiedType {
            id: TypeId::from(name),
            structure: TypeStructure::empty(TypeForm::Class),
            trace: ClassificationTrace::unclassified("test"),
            category: UnclassifiedCategory::Unknown,
            reason: "test".into(),
        })
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut builder = TypeRegistry::builder();
        builder.add(value_object("com.acme.Money")).unwrap();
        let err = builder.add(value_object("com.acme.Money")).unwrap_err();
        assert!(matches!(err, Error::DuplicateTypeId(ref id) if id == "com.acme.Money"));
        assert_eq!(builder.build().len(), 1);
    }

    #[test]
    fn test_typed_lookup() {
        let mut builder = TypeRegistry::builder();
        builder.add(value_object("com.acme.Money")).unwrap();
        builder.add(unclassified("com.acme.Util")).unwrap();
        let registry = builder.build();

        let money = TypeId::from("com.acme.Money");
        assert!(registry.get_as::<ValueObject>(&money).is_some());
        assert!(registry.get_as::<UnclassifiedType>(&money).is_none());
        assert_eq!(registry.all_of::<UnclassifiedType>().count(), 1);
        assert_eq!(
            registry.ids().map(TypeId::qualified_name).collect::<Vec<_>>(),
            vec!["com.acme.Money", "com.acme.Util"]
        );
    }
}
