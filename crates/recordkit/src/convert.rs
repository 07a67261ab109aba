//! The [`Convertible`] trait: how a field type maps onto record values.
//!
//! Scalars delegate to the coercer, `Option`, sequences and string-keyed maps
//! recurse through the codec, and every [`Model`] goes through its catalog.
//! Types known only through a custom codec opt in with [`opaque_type!`].
//!
//! [`opaque_type!`]: crate::opaque_type

use std::collections::{BTreeMap, HashMap, VecDeque};

use indexmap::IndexMap;
use recordkit_value::{Record, Value};

use crate::codec::ObjectGraphCodec;
use crate::coerce::{Scalar, ScalarKind};
use crate::error::SerializeError;
use crate::model::Model;

/// Declared shape of a field type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeHint {
    Scalar(ScalarKind),
    Optional(Box<TypeHint>),
    List(Box<TypeHint>),
    /// String-keyed map with the given value type.
    Map(Box<TypeHint>),
    /// A catalog-convertible model.
    Object(&'static str),
    /// A type that only a custom codec can convert.
    Opaque(&'static str),
    /// Any record value.
    Dynamic,
}

impl TypeHint {
    /// The hint with any `Optional` layers removed.
    pub fn unwrap_optional(&self) -> &TypeHint {
        match self {
            Self::Optional(inner) => inner.unwrap_optional(),
            other => other,
        }
    }

    pub fn element_type(&self) -> Option<&TypeHint> {
        match self.unwrap_optional() {
            Self::List(element) => Some(element),
            _ => None,
        }
    }

    pub fn value_type(&self) -> Option<&TypeHint> {
        match self.unwrap_optional() {
            Self::Map(value) => Some(value),
            _ => None,
        }
    }

    /// Whether values of this type serialize to a record.
    pub fn is_record_shaped(&self) -> bool {
        matches!(self.unwrap_optional(), Self::Object(_) | Self::Map(_))
    }
}

/// A type that converts to and from a record [`Value`].
pub trait Convertible: Sized + 'static {
    fn type_hint() -> TypeHint;

    fn encode(&self, codec: &ObjectGraphCodec) -> Result<Value, SerializeError>;

    fn decode(value: Value, codec: &ObjectGraphCodec) -> Result<Self, SerializeError>;

    /// Decode into an existing value. Models update in place; everything
    /// else is replaced.
    fn decode_into(&mut self, value: Value, codec: &ObjectGraphCodec) -> Result<(), SerializeError> {
        *self = Self::decode(value, codec)?;
        Ok(())
    }

    /// Argument supplied for this type by a defaulted constructor.
    fn default_value() -> Option<Self> {
        None
    }
}

macro_rules! scalar_convertible {
    ($($ty:ty),* $(,)?) => {$(
        impl Convertible for $ty {
            fn type_hint() -> TypeHint {
                TypeHint::Scalar(<$ty as Scalar>::KIND)
            }

            fn encode(&self, _codec: &ObjectGraphCodec) -> Result<Value, SerializeError> {
                Ok(self.to_value())
            }

            fn decode(value: Value, _codec: &ObjectGraphCodec) -> Result<Self, SerializeError> {
                <$ty as Scalar>::from_value(value)
            }

            fn default_value() -> Option<Self> {
                Some(<$ty as Scalar>::zero())
            }
        }
    )*};
}

scalar_convertible!(
    bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, char, String,
);

impl<T: Convertible> Convertible for Option<T> {
    fn type_hint() -> TypeHint {
        TypeHint::Optional(Box::new(T::type_hint()))
    }

    fn encode(&self, codec: &ObjectGraphCodec) -> Result<Value, SerializeError> {
        match self {
            Some(inner) => codec.encode_value(inner),
            None => Ok(Value::Null),
        }
    }

    fn decode(value: Value, codec: &ObjectGraphCodec) -> Result<Self, SerializeError> {
        if value.is_null() {
            return Ok(None);
        }
        codec.decode_value(value).map(Some)
    }

    fn decode_into(&mut self, value: Value, codec: &ObjectGraphCodec) -> Result<(), SerializeError> {
        if value.is_null() {
            *self = None;
            return Ok(());
        }
        match self {
            Some(inner) => codec.decode_value_into(inner, value),
            None => {
                *self = Some(codec.decode_value(value)?);
                Ok(())
            }
        }
    }

    fn default_value() -> Option<Self> {
        Some(None)
    }
}

impl Convertible for Value {
    fn type_hint() -> TypeHint {
        TypeHint::Dynamic
    }

    fn encode(&self, _codec: &ObjectGraphCodec) -> Result<Value, SerializeError> {
        Ok(self.clone())
    }

    fn decode(value: Value, _codec: &ObjectGraphCodec) -> Result<Self, SerializeError> {
        Ok(value)
    }

    fn default_value() -> Option<Self> {
        Some(Value::Null)
    }
}

// ---------------------------------------------------------------------------
// Sequences
// ---------------------------------------------------------------------------

fn encode_list<'a, T, I>(items: I, codec: &ObjectGraphCodec) -> Result<Value, SerializeError>
where
    T: Convertible,
    I: IntoIterator<Item = &'a T>,
{
    items
        .into_iter()
        .map(|item| codec.encode_value(item))
        .collect::<Result<Vec<_>, _>>()
        .map(Value::List)
}

fn decode_list<T, C>(value: Value, codec: &ObjectGraphCodec) -> Result<C, SerializeError>
where
    T: Convertible,
    C: FromIterator<T> + Default,
{
    match value {
        Value::List(items) => items
            .into_iter()
            .map(|item| codec.decode_value(item))
            .collect(),
        Value::Null => Ok(C::default()),
        other => Err(SerializeError::coercion(
            other.kind(),
            format!("list of {}", std::any::type_name::<T>()),
            "expected a list",
        )),
    }
}

impl<T: Convertible> Convertible for Vec<T> {
    fn type_hint() -> TypeHint {
        TypeHint::List(Box::new(T::type_hint()))
    }

    fn encode(&self, codec: &ObjectGraphCodec) -> Result<Value, SerializeError> {
        encode_list(self, codec)
    }

    fn decode(value: Value, codec: &ObjectGraphCodec) -> Result<Self, SerializeError> {
        decode_list(value, codec)
    }

    fn default_value() -> Option<Self> {
        Some(Vec::new())
    }
}

impl<T: Convertible> Convertible for VecDeque<T> {
    fn type_hint() -> TypeHint {
        TypeHint::List(Box::new(T::type_hint()))
    }

    fn encode(&self, codec: &ObjectGraphCodec) -> Result<Value, SerializeError> {
        encode_list(self, codec)
    }

    fn decode(value: Value, codec: &ObjectGraphCodec) -> Result<Self, SerializeError> {
        decode_list(value, codec)
    }

    fn default_value() -> Option<Self> {
        Some(VecDeque::new())
    }
}

// ---------------------------------------------------------------------------
// String-keyed maps
// ---------------------------------------------------------------------------

fn encode_map<'a, V, I>(entries: I, codec: &ObjectGraphCodec) -> Result<Value, SerializeError>
where
    V: Convertible,
    I: IntoIterator<Item = (&'a String, &'a V)>,
{
    entries
        .into_iter()
        .map(|(key, value)| Ok((key.clone(), codec.encode_value(value)?)))
        .collect::<Result<Record, SerializeError>>()
        .map(Value::Record)
}

fn decode_map<V, C>(value: Value, codec: &ObjectGraphCodec) -> Result<C, SerializeError>
where
    V: Convertible,
    C: FromIterator<(String, V)> + Default,
{
    match value {
        Value::Record(record) => record
            .into_iter()
            .map(|(key, value)| Ok((key, codec.decode_value(value)?)))
            .collect(),
        Value::Null => Ok(C::default()),
        other => Err(SerializeError::coercion(
            other.kind(),
            format!("map of {}", std::any::type_name::<V>()),
            "expected a record",
        )),
    }
}

macro_rules! map_convertible {
    ($($map:ident),* $(,)?) => {$(
        impl<V: Convertible> Convertible for $map<String, V> {
            fn type_hint() -> TypeHint {
                TypeHint::Map(Box::new(V::type_hint()))
            }

            fn encode(&self, codec: &ObjectGraphCodec) -> Result<Value, SerializeError> {
                encode_map(self, codec)
            }

            fn decode(value: Value, codec: &ObjectGraphCodec) -> Result<Self, SerializeError> {
                decode_map(value, codec)
            }

            fn default_value() -> Option<Self> {
                Some($map::new())
            }
        }
    )*};
}

map_convertible!(HashMap, BTreeMap, IndexMap);

// ---------------------------------------------------------------------------
// Models
// ---------------------------------------------------------------------------

impl<T: Model> Convertible for T {
    fn type_hint() -> TypeHint {
        TypeHint::Object(std::any::type_name::<T>())
    }

    fn encode(&self, codec: &ObjectGraphCodec) -> Result<Value, SerializeError> {
        codec.encode_object(self).map(Value::Record)
    }

    fn decode(value: Value, codec: &ObjectGraphCodec) -> Result<Self, SerializeError> {
        codec.decode_object(value)
    }

    fn decode_into(&mut self, value: Value, codec: &ObjectGraphCodec) -> Result<(), SerializeError> {
        codec.fill_object(self, value)
    }
}

/// Implement [`Convertible`] for types that only a registered custom codec
/// can convert. Without a codec they fail with `UnsupportedType`.
///
/// ```
/// struct Token(u128);
/// recordkit::opaque_type!(Token);
/// ```
#[macro_export]
macro_rules! opaque_type {
    ($($ty:ty),+ $(,)?) => {$(
        impl $crate::Convertible for $ty {
            fn type_hint() -> $crate::TypeHint {
                $crate::TypeHint::Opaque(::std::any::type_name::<$ty>())
            }

            fn encode(
                &self,
                _codec: &$crate::ObjectGraphCodec,
            ) -> ::std::result::Result<$crate::Value, $crate::SerializeError> {
                Err($crate::SerializeError::UnsupportedType {
                    type_name: ::std::any::type_name::<$ty>(),
                })
            }

            fn decode(
                _value: $crate::Value,
                _codec: &$crate::ObjectGraphCodec,
            ) -> ::std::result::Result<Self, $crate::SerializeError> {
                Err($crate::SerializeError::UnsupportedType {
                    type_name: ::std::any::type_name::<$ty>(),
                })
            }
        }
    )+};
}
