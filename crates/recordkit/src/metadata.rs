//! Field metadata providers: which fields take part in conversion and under
//! which key.

use recordkit_value::Value;

use crate::model::{FieldInfo, TypeInfo};

/// Decides field inclusion and record keys for catalog construction.
///
/// Consulted once per type when its catalog is built. The value hooks run on
/// every conversion and default to accepting everything.
pub trait FieldMetadataProvider: Send + Sync {
    fn is_serializable(&self, ty: &TypeInfo, field: &FieldInfo) -> bool;

    fn is_deserializable(&self, ty: &TypeInfo, field: &FieldInfo) -> bool;

    /// Record key for `field`, or `None` to exclude it.
    fn field_key(&self, ty: &TypeInfo, field: &FieldInfo) -> Option<String>;

    fn should_serialize_value(&self, _ty: &TypeInfo, _field: &FieldInfo, _value: &Value) -> bool {
        true
    }

    fn should_deserialize_value(&self, _ty: &TypeInfo, _field: &FieldInfo, _value: &Value) -> bool {
        true
    }
}

/// Includes every field of a type marked serializable, plus any field marked
/// `prop`. Keys come from the `prop` marker when given, else the field name.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultMetadataProvider;

impl DefaultMetadataProvider {
    fn includes(ty: &TypeInfo, field: &FieldInfo) -> bool {
        ty.is_serializable() || field.is_prop()
    }
}

impl FieldMetadataProvider for DefaultMetadataProvider {
    fn is_serializable(&self, ty: &TypeInfo, field: &FieldInfo) -> bool {
        Self::includes(ty, field)
    }

    fn is_deserializable(&self, ty: &TypeInfo, field: &FieldInfo) -> bool {
        Self::includes(ty, field)
    }

    fn field_key(&self, _ty: &TypeInfo, field: &FieldInfo) -> Option<String> {
        Some(field.prop_key().unwrap_or(field.name()).to_string())
    }
}

/// Includes every registered field under its own name, ignoring markers.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldNameProvider;

impl FieldMetadataProvider for FieldNameProvider {
    fn is_serializable(&self, _ty: &TypeInfo, _field: &FieldInfo) -> bool {
        true
    }

    fn is_deserializable(&self, _ty: &TypeInfo, _field: &FieldInfo) -> bool {
        true
    }

    fn field_key(&self, _ty: &TypeInfo, field: &FieldInfo) -> Option<String> {
        Some(field.name().to_string())
    }
}

/// Provider driven by a single key function; `None` excludes the field in
/// both directions.
pub struct FnMetadataProvider<F> {
    key: F,
}

impl<F> FnMetadataProvider<F>
where
    F: Fn(&TypeInfo, &FieldInfo) -> Option<String> + Send + Sync,
{
    pub fn new(key: F) -> Self {
        Self { key }
    }
}

impl<F> FieldMetadataProvider for FnMetadataProvider<F>
where
    F: Fn(&TypeInfo, &FieldInfo) -> Option<String> + Send + Sync,
{
    fn is_serializable(&self, _ty: &TypeInfo, _field: &FieldInfo) -> bool {
        true
    }

    fn is_deserializable(&self, _ty: &TypeInfo, _field: &FieldInfo) -> bool {
        true
    }

    fn field_key(&self, ty: &TypeInfo, field: &FieldInfo) -> Option<String> {
        (self.key)(ty, field)
    }
}
