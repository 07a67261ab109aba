//! Bidirectional conversion between typed object graphs and string-keyed
//! records.
//!
//! Models declare their fields once through [`Model::describe`]; a
//! [`Serializer`] walks those declarations to produce a [`Record`] (optionally
//! flattened into dotted paths) and to rebuild or partially update objects
//! from one. Custom codecs registered per type take precedence everywhere.

mod catalog;
mod codec;
pub mod coerce;
mod config;
mod convert;
mod error;
mod metadata;
mod model;
mod registry;
mod serializer;
mod transform;

pub use recordkit_value::{
    deflate, deflate_default, inflate, inflate_default, path, record_from_json, Record, Value,
    ValueKind, DEFAULT_SEPARATOR,
};

pub use catalog::{FieldCatalog, FieldDescriptor, TypeCatalog};
pub use codec::{ObjectGraphCodec, TypePredicate};
pub use coerce::{from_scalar, to_scalar, Scalar, ScalarKind};
pub use config::{SerializerConfig, DEFAULT_SCALAR_KEY};
pub use convert::{Convertible, TypeHint};
pub use error::{BoxError, ConfigError, SerializeError};
pub use metadata::{
    DefaultMetadataProvider, FieldMetadataProvider, FieldNameProvider, FnMetadataProvider,
};
pub use model::{DefaultArgs, FieldBuilder, FieldInfo, FieldTable, Model, TypeInfo};
pub use registry::{CodecRegistry, CustomCodec, FnCodec};
pub use serializer::Serializer;
pub use transform::{Clamp, TransformFlags};
