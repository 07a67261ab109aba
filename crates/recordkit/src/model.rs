//! Registration-time field tables for catalog-convertible types.
//!
//! A [`Model`] describes its fields once through a [`FieldTable`]: a name,
//! a getter/setter pair, inclusion markers and transform flags. The table
//! also carries the constructors used when deserializing into a fresh
//! instance.
//!
//! ```
//! use recordkit::{FieldTable, Model};
//!
//! #[derive(Default)]
//! struct User {
//!     name: String,
//!     age: i32,
//! }
//!
//! impl Model for User {
//!     fn describe(t: &mut FieldTable<Self>) {
//!         t.serializable().default_constructor();
//!         t.field("name", |u| &u.name, |u| &mut u.name).trim();
//!         t.field("age", |u| &u.age, |u| &mut u.age).clamp(0, 150);
//!     }
//! }
//! ```

use std::any::{type_name, TypeId};

use recordkit_value::Value;

use crate::codec::ObjectGraphCodec;
use crate::convert::{Convertible, TypeHint};
use crate::error::SerializeError;
use crate::transform::{Clamp, TransformFlags};

/// A type whose fields are walked by the object-graph codec.
pub trait Model: Sized + 'static {
    /// Declare fields, markers and constructors. Called once per type and
    /// serializer; the result is cached.
    fn describe(table: &mut FieldTable<Self>);
}

// ---------------------------------------------------------------------------
// Type and field information handed to metadata providers
// ---------------------------------------------------------------------------

/// Identity and type-level markers of a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeInfo {
    id: TypeId,
    name: &'static str,
    serializable: bool,
    markers: Vec<&'static str>,
}

impl TypeInfo {
    pub(crate) fn new<T: 'static>(serializable: bool, markers: Vec<&'static str>) -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
            serializable,
            markers,
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether the type as a whole is marked serializable.
    pub fn is_serializable(&self) -> bool {
        self.serializable
    }

    pub fn has_marker(&self, marker: &str) -> bool {
        self.markers.iter().any(|m| *m == marker)
    }
}

/// Declared information about one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInfo {
    name: &'static str,
    declared_type: TypeHint,
    prop: bool,
    prop_key: Option<&'static str>,
    markers: Vec<&'static str>,
    transforms: TransformFlags,
}

impl FieldInfo {
    fn new(name: &'static str, declared_type: TypeHint) -> Self {
        Self {
            name,
            declared_type,
            prop: false,
            prop_key: None,
            markers: Vec::new(),
            transforms: TransformFlags::default(),
        }
    }

    /// Source field name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn declared_type(&self) -> &TypeHint {
        &self.declared_type
    }

    /// Whether the field carries the `prop` marker.
    pub fn is_prop(&self) -> bool {
        self.prop
    }

    /// Explicit key given with the `prop` marker.
    pub fn prop_key(&self) -> Option<&'static str> {
        self.prop_key
    }

    pub fn has_marker(&self, marker: &str) -> bool {
        self.markers.iter().any(|m| *m == marker)
    }

    pub fn markers(&self) -> &[&'static str] {
        &self.markers
    }

    pub fn transforms(&self) -> &TransformFlags {
        &self.transforms
    }
}

// ---------------------------------------------------------------------------
// Accessors
// ---------------------------------------------------------------------------

pub(crate) trait FieldAccess<T>: Send + Sync {
    fn read(&self, target: &T, codec: &ObjectGraphCodec) -> Result<Value, SerializeError>;

    fn write(
        &self,
        target: &mut T,
        value: Value,
        codec: &ObjectGraphCodec,
    ) -> Result<(), SerializeError>;
}

struct Direct<T, F> {
    get: fn(&T) -> &F,
    get_mut: fn(&mut T) -> &mut F,
}

impl<T: 'static, F: Convertible> FieldAccess<T> for Direct<T, F> {
    fn read(&self, target: &T, codec: &ObjectGraphCodec) -> Result<Value, SerializeError> {
        codec.encode_value((self.get)(target))
    }

    fn write(
        &self,
        target: &mut T,
        value: Value,
        codec: &ObjectGraphCodec,
    ) -> Result<(), SerializeError> {
        codec.decode_value_into((self.get_mut)(target), value)
    }
}

/// Field of an embedded parent model, reached through a projection.
struct Inherited<T, P> {
    project: fn(&T) -> &P,
    project_mut: fn(&mut T) -> &mut P,
    inner: Box<dyn FieldAccess<P>>,
}

impl<T: 'static, P: 'static> FieldAccess<T> for Inherited<T, P> {
    fn read(&self, target: &T, codec: &ObjectGraphCodec) -> Result<Value, SerializeError> {
        self.inner.read((self.project)(target), codec)
    }

    fn write(
        &self,
        target: &mut T,
        value: Value,
        codec: &ObjectGraphCodec,
    ) -> Result<(), SerializeError> {
        self.inner.write((self.project_mut)(target), value, codec)
    }
}

pub(crate) struct FieldEntry<T> {
    pub(crate) info: FieldInfo,
    pub(crate) access: Box<dyn FieldAccess<T>>,
}

// ---------------------------------------------------------------------------
// Constructors
// ---------------------------------------------------------------------------

/// Supplies type-default arguments to a defaulted constructor.
pub struct DefaultArgs {
    type_name: &'static str,
    position: usize,
}

impl DefaultArgs {
    pub(crate) fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            position: 0,
        }
    }

    /// Default value of the next parameter. Types without a default (models
    /// and opaque types) fail with `InstantiationFailure`.
    pub fn next<P: Convertible>(&mut self) -> Result<P, SerializeError> {
        self.position += 1;
        P::default_value().ok_or_else(|| {
            SerializeError::instantiation(
                self.type_name,
                format!(
                    "parameter {} of type `{}` has no default value",
                    self.position,
                    type_name::<P>()
                ),
            )
        })
    }
}

pub(crate) type DefaultedConstructor<T> = fn(&mut DefaultArgs) -> Result<T, SerializeError>;

pub(crate) struct Constructors<T> {
    pub(crate) nullary: Option<fn() -> T>,
    pub(crate) defaulted: Option<DefaultedConstructor<T>>,
}

impl<T: 'static> Constructors<T> {
    /// Prefer the no-argument constructor, then the defaulted one.
    pub(crate) fn instantiate(&self) -> Result<T, SerializeError> {
        if let Some(nullary) = self.nullary {
            return Ok(nullary());
        }
        match self.defaulted {
            Some(defaulted) => defaulted(&mut DefaultArgs::new(type_name::<T>())),
            None => Err(SerializeError::instantiation(
                type_name::<T>(),
                "no constructor registered",
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// FieldTable
// ---------------------------------------------------------------------------

/// Field registrations of one model type.
pub struct FieldTable<T> {
    pub(crate) serializable: bool,
    pub(crate) markers: Vec<&'static str>,
    pub(crate) fields: Vec<FieldEntry<T>>,
    pub(crate) constructors: Constructors<T>,
}

impl<T: 'static> FieldTable<T> {
    pub(crate) fn new() -> Self {
        Self {
            serializable: false,
            markers: Vec::new(),
            fields: Vec::new(),
            constructors: Constructors {
                nullary: None,
                defaulted: None,
            },
        }
    }

    /// Mark the whole type serializable (every field is eligible under the
    /// default metadata provider).
    pub fn serializable(&mut self) -> &mut Self {
        self.serializable = true;
        self
    }

    pub fn type_marker(&mut self, marker: &'static str) -> &mut Self {
        self.markers.push(marker);
        self
    }

    /// Register a field with its accessors.
    pub fn field<F: Convertible>(
        &mut self,
        name: &'static str,
        get: fn(&T) -> &F,
        get_mut: fn(&mut T) -> &mut F,
    ) -> FieldBuilder<'_> {
        let index = self.fields.len();
        self.fields.push(FieldEntry {
            info: FieldInfo::new(name, F::type_hint()),
            access: Box::new(Direct { get, get_mut }),
        });
        FieldBuilder {
            info: &mut self.fields[index].info,
        }
    }

    /// Pull in every field of an embedded parent model, ahead of nothing and
    /// after whatever was registered so far.
    pub fn inherit<P: Model>(
        &mut self,
        project: fn(&T) -> &P,
        project_mut: fn(&mut T) -> &mut P,
    ) -> &mut Self {
        let mut parent = FieldTable::<P>::new();
        P::describe(&mut parent);
        for entry in parent.fields {
            self.fields.push(FieldEntry {
                info: entry.info,
                access: Box::new(Inherited {
                    project,
                    project_mut,
                    inner: entry.access,
                }),
            });
        }
        self
    }

    /// No-argument constructor used for fresh instances.
    pub fn constructor(&mut self, constructor: fn() -> T) -> &mut Self {
        self.constructors.nullary = Some(constructor);
        self
    }

    /// Fallback constructor fed with type-default arguments.
    pub fn constructor_with(
        &mut self,
        constructor: fn(&mut DefaultArgs) -> Result<T, SerializeError>,
    ) -> &mut Self {
        self.constructors.defaulted = Some(constructor);
        self
    }

    pub fn default_constructor(&mut self) -> &mut Self
    where
        T: Default,
    {
        self.constructor(T::default)
    }
}

/// Markers and transforms of a field being registered.
pub struct FieldBuilder<'a> {
    info: &'a mut FieldInfo,
}

impl FieldBuilder<'_> {
    /// Mark the field as an explicit property, keyed by its name.
    pub fn prop(self) -> Self {
        self.info.prop = true;
        self
    }

    /// Mark the field as an explicit property with a custom key.
    pub fn prop_key(self, key: &'static str) -> Self {
        self.info.prop = true;
        self.info.prop_key = Some(key);
        self
    }

    pub fn marker(self, marker: &'static str) -> Self {
        self.info.markers.push(marker);
        self
    }

    pub fn clamp(self, min: i64, max: i64) -> Self {
        self.info.transforms.clamp = Some(Clamp { min, max });
        self
    }

    pub fn empty_is_null(self) -> Self {
        self.info.transforms.empty_is_null = true;
        self
    }

    pub fn trim(self) -> Self {
        self.info.transforms.trim = true;
        self
    }

    pub fn lower_case(self) -> Self {
        self.info.transforms.lower_case = true;
        self
    }

    pub fn upper_case(self) -> Self {
        self.info.transforms.upper_case = true;
        self
    }
}
