//! User-registered codecs that take precedence over catalog conversion.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

use recordkit_value::Value;

use crate::error::{BoxError, SerializeError};

/// Converts one concrete type to and from a record value.
pub trait CustomCodec<T>: Send + Sync {
    fn serialize(&self, value: &T) -> Result<Value, BoxError>;

    fn deserialize(&self, value: Value) -> Result<T, BoxError>;
}

/// A codec made of two closures.
pub struct FnCodec<S, D> {
    serialize: S,
    deserialize: D,
}

impl<S, D> FnCodec<S, D> {
    pub fn new(serialize: S, deserialize: D) -> Self {
        Self {
            serialize,
            deserialize,
        }
    }
}

impl<T, S, D> CustomCodec<T> for FnCodec<S, D>
where
    S: Fn(&T) -> Result<Value, BoxError> + Send + Sync,
    D: Fn(Value) -> Result<T, BoxError> + Send + Sync,
{
    fn serialize(&self, value: &T) -> Result<Value, BoxError> {
        (self.serialize)(value)
    }

    fn deserialize(&self, value: Value) -> Result<T, BoxError> {
        (self.deserialize)(value)
    }
}

pub(crate) trait ErasedCodec: Send + Sync {
    fn type_name(&self) -> &'static str;

    fn serialize_any(&self, value: &dyn Any) -> Result<Value, SerializeError>;

    fn deserialize_any(&self, value: Value) -> Result<Box<dyn Any>, SerializeError>;
}

struct Typed<T, C> {
    codec: C,
    _marker: PhantomData<fn() -> T>,
}

impl<T, C> Typed<T, C> {
    fn failure(&self, source: BoxError) -> SerializeError
    where
        T: 'static,
    {
        SerializeError::CustomCodecFailure {
            type_name: type_name::<T>(),
            source,
        }
    }
}

impl<T: 'static, C: CustomCodec<T>> ErasedCodec for Typed<T, C> {
    fn type_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn serialize_any(&self, value: &dyn Any) -> Result<Value, SerializeError> {
        let value = value
            .downcast_ref::<T>()
            .ok_or_else(|| self.failure("value does not match the codec type".into()))?;
        self.codec.serialize(value).map_err(|e| self.failure(e))
    }

    fn deserialize_any(&self, value: Value) -> Result<Box<dyn Any>, SerializeError> {
        self.codec
            .deserialize(value)
            .map(|decoded| Box::new(decoded) as Box<dyn Any>)
            .map_err(|e| self.failure(e))
    }
}

/// Codecs keyed by the exact type they convert. Registering a second codec
/// for a type replaces the first.
#[derive(Default)]
pub struct CodecRegistry {
    codecs: HashMap<TypeId, Box<dyn ErasedCodec>>,
}

impl CodecRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `codec` for `T`. Returns `true` when a previous codec was
    /// replaced.
    pub fn register<T, C>(&mut self, codec: C) -> bool
    where
        T: 'static,
        C: CustomCodec<T> + 'static,
    {
        let erased = Typed {
            codec,
            _marker: PhantomData,
        };
        let replaced = self
            .codecs
            .insert(TypeId::of::<T>(), Box::new(erased))
            .is_some();
        if replaced {
            log::debug!("replaced custom codec for `{}`", type_name::<T>());
        }
        replaced
    }

    pub fn register_fn<T, S, D>(&mut self, serialize: S, deserialize: D) -> bool
    where
        T: 'static,
        S: Fn(&T) -> Result<Value, BoxError> + Send + Sync + 'static,
        D: Fn(Value) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        self.register::<T, _>(FnCodec::new(serialize, deserialize))
    }

    pub fn remove<T: 'static>(&mut self) -> bool {
        self.codecs.remove(&TypeId::of::<T>()).is_some()
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.codecs.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }

    pub(crate) fn lookup<T: 'static>(&self) -> Option<&dyn ErasedCodec> {
        self.codecs.get(&TypeId::of::<T>()).map(|codec| codec.as_ref())
    }
}

impl fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.codecs.values().map(|codec| codec.type_name()))
            .finish()
    }
}
