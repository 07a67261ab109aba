//! Per-type field catalogs, built once and shared.
//!
//! A [`FieldCatalog`] caches one [`TypeCatalog`] per model type. The first
//! request builds it from the model's [`FieldTable`] and the metadata
//! provider; later requests, from any thread, get the cached `Arc`.
//!
//! [`FieldTable`]: crate::FieldTable

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use recordkit_value::Value;

use crate::codec::ObjectGraphCodec;
use crate::convert::TypeHint;
use crate::error::SerializeError;
use crate::metadata::FieldMetadataProvider;
use crate::model::{Constructors, FieldAccess, FieldEntry, FieldInfo, FieldTable, Model, TypeInfo};
use crate::transform::TransformFlags;

/// One retained field of a catalogued type.
pub struct FieldDescriptor<T> {
    info: FieldInfo,
    key: String,
    serializable: bool,
    deserializable: bool,
    access: Box<dyn FieldAccess<T>>,
}

impl<T> FieldDescriptor<T> {
    /// Source field name.
    pub fn source(&self) -> &'static str {
        self.info.name()
    }

    /// Record key.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_serializable(&self) -> bool {
        self.serializable
    }

    pub fn is_deserializable(&self) -> bool {
        self.deserializable
    }

    pub fn declared_type(&self) -> &TypeHint {
        self.info.declared_type()
    }

    pub fn element_type(&self) -> Option<&TypeHint> {
        self.info.declared_type().element_type()
    }

    pub fn value_type(&self) -> Option<&TypeHint> {
        self.info.declared_type().value_type()
    }

    pub fn transforms(&self) -> &TransformFlags {
        self.info.transforms()
    }

    pub fn info(&self) -> &FieldInfo {
        &self.info
    }

    pub(crate) fn read(&self, target: &T, codec: &ObjectGraphCodec) -> Result<Value, SerializeError> {
        self.access.read(target, codec)
    }

    pub(crate) fn write(
        &self,
        target: &mut T,
        value: Value,
        codec: &ObjectGraphCodec,
    ) -> Result<(), SerializeError> {
        self.access.write(target, value, codec)
    }
}

impl<T> fmt::Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("source", &self.source())
            .field("key", &self.key)
            .field("serializable", &self.serializable)
            .field("deserializable", &self.deserializable)
            .field("declared_type", self.declared_type())
            .finish()
    }
}

/// Retained fields of one model type, in registration order.
pub struct TypeCatalog<T> {
    type_info: TypeInfo,
    fields: Vec<FieldDescriptor<T>>,
    by_key: HashMap<String, usize>,
    constructors: Constructors<T>,
}

impl<T: Model> TypeCatalog<T> {
    fn build(provider: &dyn FieldMetadataProvider) -> Self {
        let mut table = FieldTable::<T>::new();
        T::describe(&mut table);
        let FieldTable {
            serializable,
            markers,
            fields,
            constructors,
        } = table;
        let type_info = TypeInfo::new::<T>(serializable, markers);

        let mut descriptors = Vec::with_capacity(fields.len());
        let mut by_key = HashMap::with_capacity(fields.len());
        for FieldEntry { info, access } in fields {
            let serializable = provider.is_serializable(&type_info, &info);
            let deserializable = provider.is_deserializable(&type_info, &info);
            if !serializable && !deserializable {
                continue;
            }
            let Some(key) = provider.field_key(&type_info, &info) else {
                continue;
            };
            // Last deserializable field with a given key wins.
            if deserializable {
                by_key.insert(key.clone(), descriptors.len());
            }
            descriptors.push(FieldDescriptor {
                info,
                key,
                serializable,
                deserializable,
                access,
            });
        }
        log::debug!(
            "catalogued `{}`: {} field(s)",
            type_info.name(),
            descriptors.len()
        );

        Self {
            type_info,
            fields: descriptors,
            by_key,
            constructors,
        }
    }

    /// Fresh instance through the registered constructors.
    pub fn instantiate(&self) -> Result<T, SerializeError> {
        self.constructors.instantiate()
    }
}

impl<T> TypeCatalog<T> {
    pub fn type_info(&self) -> &TypeInfo {
        &self.type_info
    }

    pub fn fields(&self) -> &[FieldDescriptor<T>] {
        &self.fields
    }

    /// Deserializable descriptor that record key `key` assigns to.
    pub fn field(&self, key: &str) -> Option<&FieldDescriptor<T>> {
        self.by_key.get(key).map(|&index| &self.fields[index])
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<T> fmt::Debug for TypeCatalog<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeCatalog")
            .field("type_info", &self.type_info)
            .field("fields", &self.fields)
            .finish()
    }
}

/// Thread-safe cache of [`TypeCatalog`]s keyed by type.
#[derive(Default)]
pub struct FieldCatalog {
    entries: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
}

impl FieldCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog for `T`, building it on first use. The provider is consulted
    /// at most once per type, even under concurrent first use.
    pub fn catalog_for<T: Model>(&self, provider: &dyn FieldMetadataProvider) -> Arc<TypeCatalog<T>> {
        let id = TypeId::of::<T>();
        {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(catalog) = downcast::<T>(entries.get(&id)) {
                return catalog;
            }
        }

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(catalog) = downcast::<T>(entries.get(&id)) {
            return catalog;
        }
        log::trace!("building catalog for `{}`", type_name::<T>());
        let catalog = Arc::new(TypeCatalog::<T>::build(provider));
        entries.insert(id, catalog.clone());
        catalog
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for FieldCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldCatalog").field("len", &self.len()).finish()
    }
}

fn downcast<T: 'static>(entry: Option<&Arc<dyn Any + Send + Sync>>) -> Option<Arc<TypeCatalog<T>>> {
    entry.and_then(|entry| Arc::clone(entry).downcast::<TypeCatalog<T>>().ok())
}
