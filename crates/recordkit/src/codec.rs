//! Object-graph walker: converts models to records and back through their
//! catalogs, with custom codecs taking precedence at every level.

use std::any::type_name;
use std::fmt;
use std::sync::Arc;

use recordkit_value::{Record, Value};

use crate::catalog::{FieldCatalog, TypeCatalog};
use crate::convert::Convertible;
use crate::error::SerializeError;
use crate::metadata::FieldMetadataProvider;
use crate::model::{Model, TypeInfo};
use crate::registry::CodecRegistry;

/// Decides which model types may be converted at all.
pub type TypePredicate = dyn Fn(&TypeInfo) -> bool + Send + Sync;

pub struct ObjectGraphCodec {
    catalog: FieldCatalog,
    registry: CodecRegistry,
    provider: Arc<dyn FieldMetadataProvider>,
    type_predicate: Arc<TypePredicate>,
}

impl ObjectGraphCodec {
    /// Codec accepting every model type.
    pub fn new(provider: Arc<dyn FieldMetadataProvider>) -> Self {
        Self {
            catalog: FieldCatalog::new(),
            registry: CodecRegistry::new(),
            provider,
            type_predicate: Arc::new(|_: &TypeInfo| true),
        }
    }

    pub(crate) fn set_type_predicate(&mut self, predicate: Arc<TypePredicate>) {
        self.type_predicate = predicate;
    }

    pub fn registry(&self) -> &CodecRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut CodecRegistry {
        &mut self.registry
    }

    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    pub fn catalog_for<T: Model>(&self) -> Arc<TypeCatalog<T>> {
        self.catalog.catalog_for::<T>(self.provider.as_ref())
    }

    /// Catalog for `T`, provided the type predicate accepts it.
    fn accepted_catalog<T: Model>(&self) -> Result<Arc<TypeCatalog<T>>, SerializeError> {
        let catalog = self.catalog_for::<T>();
        if !(self.type_predicate)(catalog.type_info()) {
            return Err(SerializeError::UnsupportedType {
                type_name: type_name::<T>(),
            });
        }
        Ok(catalog)
    }

    // -----------------------------------------------------------------------
    // Values
    // -----------------------------------------------------------------------

    pub fn encode_value<F: Convertible>(&self, value: &F) -> Result<Value, SerializeError> {
        match self.registry.lookup::<F>() {
            Some(custom) => {
                log::trace!("custom codec serializes `{}`", custom.type_name());
                custom.serialize_any(value)
            }
            None => value.encode(self),
        }
    }

    pub fn decode_value<F: Convertible>(&self, value: Value) -> Result<F, SerializeError> {
        let Some(custom) = self.registry.lookup::<F>() else {
            return F::decode(value, self);
        };
        log::trace!("custom codec deserializes `{}`", custom.type_name());
        custom
            .deserialize_any(value)?
            .downcast::<F>()
            .map(|decoded| *decoded)
            .map_err(|_| SerializeError::CustomCodecFailure {
                type_name: type_name::<F>(),
                source: "codec produced a value of another type".into(),
            })
    }

    /// Decode into `target`, updating models in place.
    pub fn decode_value_into<F: Convertible>(
        &self,
        target: &mut F,
        value: Value,
    ) -> Result<(), SerializeError> {
        if self.registry.contains::<F>() {
            *target = self.decode_value(value)?;
            return Ok(());
        }
        target.decode_into(value, self)
    }

    // -----------------------------------------------------------------------
    // Models
    // -----------------------------------------------------------------------

    /// Walk the serializable fields of `object` in catalog order. Null field
    /// values and values that transform to null are left out.
    pub fn encode_object<T: Model>(&self, object: &T) -> Result<Record, SerializeError> {
        let catalog = self.accepted_catalog::<T>()?;
        let ty = catalog.type_info();
        let mut record = Record::with_capacity(catalog.len());
        for field in catalog.fields().iter().filter(|f| f.is_serializable()) {
            let value = field.read(object, self)?;
            if value.is_null() {
                continue;
            }
            if !self.provider.should_serialize_value(ty, field.info(), &value) {
                log::trace!("provider skipped `{}.{}`", ty.name(), field.source());
                continue;
            }
            let value = if field.transforms().is_empty() {
                value
            } else {
                field.transforms().apply(field.key(), value)?
            };
            if value.is_null() {
                continue;
            }
            record.insert(field.key().to_string(), value);
        }
        Ok(record)
    }

    /// Fresh instance of `T` filled from `value`.
    pub fn decode_object<T: Model>(&self, value: Value) -> Result<T, SerializeError> {
        let catalog = self.accepted_catalog::<T>()?;
        let mut object = catalog.instantiate()?;
        match value {
            Value::Null => {}
            value => self.fill_with(&catalog, &mut object, value)?,
        }
        Ok(object)
    }

    /// Overwrite the fields of `target` present in `value`; absent fields
    /// keep their values. Null resets `target` to a fresh instance.
    pub fn fill_object<T: Model>(&self, target: &mut T, value: Value) -> Result<(), SerializeError> {
        let catalog = self.accepted_catalog::<T>()?;
        match value {
            Value::Null => {
                *target = catalog.instantiate()?;
                Ok(())
            }
            value => self.fill_with(&catalog, target, value),
        }
    }

    /// Fresh instance of `T` through its registered constructors.
    pub fn instantiate<T: Model>(&self) -> Result<T, SerializeError> {
        self.accepted_catalog::<T>()?.instantiate()
    }

    fn fill_with<T: Model>(
        &self,
        catalog: &TypeCatalog<T>,
        target: &mut T,
        value: Value,
    ) -> Result<(), SerializeError> {
        let record = match value {
            Value::Record(record) => record,
            other => {
                return Err(SerializeError::coercion(
                    other.kind(),
                    type_name::<T>(),
                    "expected a record",
                ))
            }
        };
        let ty = catalog.type_info();
        for (key, value) in record {
            let Some(field) = catalog.field(&key) else {
                log::trace!("ignoring unknown key `{key}` for `{}`", ty.name());
                continue;
            };
            if !self.provider.should_deserialize_value(ty, field.info(), &value) {
                log::trace!("provider skipped `{}.{}`", ty.name(), field.source());
                continue;
            }
            field.write(target, value, self)?;
        }
        Ok(())
    }
}

impl fmt::Debug for ObjectGraphCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectGraphCodec")
            .field("catalog", &self.catalog)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
