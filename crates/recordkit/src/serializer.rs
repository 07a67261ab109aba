//! The serializer facade: top-level entry points, result wrapping and
//! optional path flattening.

use std::sync::Arc;

use recordkit_value::{path, Record, Value, DEFAULT_SEPARATOR};

use crate::catalog::TypeCatalog;
use crate::codec::ObjectGraphCodec;
use crate::config::SerializerConfig;
use crate::convert::{Convertible, TypeHint};
use crate::error::{BoxError, ConfigError, SerializeError};
use crate::metadata::{DefaultMetadataProvider, FieldMetadataProvider, FnMetadataProvider};
use crate::model::{FieldInfo, Model, TypeInfo};
use crate::registry::CustomCodec;

/// Converts object graphs to records and back.
///
/// ```
/// use recordkit::{FieldTable, Model, Serializer};
///
/// #[derive(Default)]
/// struct Greeting {
///     text: String,
/// }
///
/// impl Model for Greeting {
///     fn describe(t: &mut FieldTable<Self>) {
///         t.serializable().default_constructor();
///         t.field("text", |g| &g.text, |g| &mut g.text);
///     }
/// }
///
/// let serializer = Serializer::new();
/// let record = serializer
///     .serialize(&Greeting { text: "hi".into() })
///     .unwrap()
///     .unwrap();
/// let back: Greeting = serializer.deserialize(record).unwrap();
/// assert_eq!(back.text, "hi");
/// ```
#[derive(Debug)]
pub struct Serializer {
    codec: ObjectGraphCodec,
    config: SerializerConfig,
}

impl Default for Serializer {
    fn default() -> Self {
        Self::new()
    }
}

impl Serializer {
    /// Serializer using [`DefaultMetadataProvider`].
    pub fn new() -> Self {
        Self::with_provider(DefaultMetadataProvider)
    }

    pub fn with_provider(provider: impl FieldMetadataProvider + 'static) -> Self {
        Self {
            codec: ObjectGraphCodec::new(Arc::new(provider)),
            config: SerializerConfig::default(),
        }
    }

    /// Serializer whose fields are selected and keyed by `key`.
    pub fn with_field_keys<F>(key: F) -> Self
    where
        F: Fn(&TypeInfo, &FieldInfo) -> Option<String> + Send + Sync + 'static,
    {
        Self::with_provider(FnMetadataProvider::new(key))
    }

    pub fn with_config(mut self, config: SerializerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn config(&self) -> &SerializerConfig {
        &self.config
    }

    /// Flatten output and expand input with `separator`. An empty separator
    /// falls back to `"."`.
    pub fn with_deflate(mut self, separator: impl Into<String>) -> Self {
        let mut separator = separator.into();
        if separator.is_empty() {
            log::warn!("empty deflate separator, using {DEFAULT_SEPARATOR:?}");
            separator = DEFAULT_SEPARATOR.to_string();
        }
        self.config.deflate_separator = Some(separator);
        self
    }

    pub fn without_deflate(mut self) -> Self {
        self.config.deflate_separator = None;
        self
    }

    /// Key wrapping top-level results that are not records. An empty key is
    /// ignored.
    pub fn with_scalar_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        if key.is_empty() {
            log::warn!("empty scalar key, keeping {:?}", self.config.scalar_key);
        } else {
            self.config.scalar_key = key;
        }
        self
    }

    /// Restrict conversion to model types accepted by `predicate`.
    pub fn with_type_predicate<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&TypeInfo) -> bool + Send + Sync + 'static,
    {
        self.codec.set_type_predicate(Arc::new(predicate));
        self
    }

    pub fn with_codec<T, C>(mut self, codec: C) -> Self
    where
        T: 'static,
        C: CustomCodec<T> + 'static,
    {
        self.register_codec::<T, C>(codec);
        self
    }

    /// Register a custom codec for `T`, replacing any previous one.
    pub fn register_codec<T, C>(&mut self, codec: C) -> &mut Self
    where
        T: 'static,
        C: CustomCodec<T> + 'static,
    {
        self.codec.registry_mut().register::<T, C>(codec);
        self
    }

    pub fn register_codec_fn<T, S, D>(&mut self, serialize: S, deserialize: D) -> &mut Self
    where
        T: 'static,
        S: Fn(&T) -> Result<Value, BoxError> + Send + Sync + 'static,
        D: Fn(Value) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        self.codec.registry_mut().register_fn::<T, S, D>(serialize, deserialize);
        self
    }

    // -----------------------------------------------------------------------
    // Conversion
    // -----------------------------------------------------------------------

    /// Convert `object` to a record. `None` when it converts to null; non-record
    /// results are wrapped under the scalar key. A custom codec's null result
    /// is wrapped too.
    pub fn serialize<T: Convertible>(&self, object: &T) -> Result<Option<Record>, SerializeError> {
        let custom = self.codec.registry().contains::<T>();
        let record = match self.codec.encode_value(object)? {
            Value::Null if !custom => return Ok(None),
            Value::Record(record) => record,
            other => {
                let mut wrapped = Record::with_capacity(1);
                wrapped.insert(self.config.scalar_key.clone(), other);
                wrapped
            }
        };
        Ok(Some(match &self.config.deflate_separator {
            Some(separator) => path::deflate(&record, separator),
            None => record,
        }))
    }

    pub fn deserialize<T: Convertible>(&self, record: Record) -> Result<T, SerializeError> {
        let value = self.unwrap_input::<T>(record);
        self.codec.decode_value(value)
    }

    /// Overwrite the fields of `target` present in `record`.
    pub fn deserialize_into<T: Convertible>(
        &self,
        target: &mut T,
        record: Record,
    ) -> Result<(), SerializeError> {
        let value = self.unwrap_input::<T>(record);
        self.codec.decode_value_into(target, value)
    }

    /// Inflate `record` if configured, then pick what `T` decodes from.
    ///
    /// Records and models take the whole record, scalars and lists the
    /// scalar key entry. Custom-coded and dynamic targets unwrap a record
    /// holding only the scalar key, else take the whole record.
    fn unwrap_input<T: Convertible>(&self, record: Record) -> Value {
        let mut record = match &self.config.deflate_separator {
            Some(separator) => path::inflate(&record, separator),
            None => record,
        };
        let key = self.config.scalar_key.as_str();
        let hint = T::type_hint();
        let custom = self.codec.registry().contains::<T>();
        if custom || matches!(hint.unwrap_optional(), TypeHint::Dynamic | TypeHint::Opaque(_)) {
            if record.len() == 1 && record.contains_key(key) {
                return record.swap_remove(key).unwrap_or_default();
            }
            return Value::Record(record);
        }
        if hint.is_record_shaped() {
            return Value::Record(record);
        }
        record.swap_remove(key).unwrap_or_default()
    }

    // -----------------------------------------------------------------------
    // Introspection
    // -----------------------------------------------------------------------

    pub fn codec(&self) -> &ObjectGraphCodec {
        &self.codec
    }

    pub fn catalog_for<T: Model>(&self) -> Arc<TypeCatalog<T>> {
        self.codec.catalog_for::<T>()
    }

    /// Whether a catalog for `T` has been built.
    pub fn is_cataloged<T: 'static>(&self) -> bool {
        self.codec.catalog().contains::<T>()
    }

    pub fn has_codec<T: 'static>(&self) -> bool {
        self.codec.registry().contains::<T>()
    }
}
