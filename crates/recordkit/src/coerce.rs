//! Scalar coercion between record values and strongly-typed fields.
//!
//! Rules, applied after the identity case (value already of the target
//! runtime type):
//! - string target: booleans and numbers are rendered in their canonical text;
//!   integral floats keep a `.0` suffix (`20.0`, not `20`)
//! - bool target: case-insensitive `"true"` / `"false"`; numbers are `!= 0`
//! - numeric target: strings use the target's `FromStr` grammar, other
//!   numbers use native `as` narrowing (floats truncate toward zero)
//! - char target: first character of a non-empty string
//! - null: the target's zero value
//!
//! Records and lists never coerce to a scalar.

use std::fmt;
use std::str::FromStr;

use recordkit_value::{Value, ValueKind};

use crate::error::SerializeError;

/// Scalar targets supported by the coercer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    Char,
    String,
}

impl ScalarKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::Isize => "isize",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::Usize => "usize",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Char => "char",
            Self::String => "string",
        }
    }

    pub fn is_numeric(self) -> bool {
        !matches!(self, Self::Bool | Self::Char | Self::String)
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A strongly-typed scalar field type.
pub trait Scalar: Sized {
    const KIND: ScalarKind;

    /// Value a null coerces to.
    fn zero() -> Self;

    fn to_value(&self) -> Value;

    fn from_value(value: Value) -> Result<Self, SerializeError>;
}

/// Coerce `value` into the scalar type `T`.
pub fn to_scalar<T: Scalar>(value: Value) -> Result<T, SerializeError> {
    T::from_value(value)
}

/// Render a scalar as a record value.
pub fn from_scalar<T: Scalar>(scalar: &T) -> Value {
    scalar.to_value()
}

fn no_rule(found: &Value, kind: ScalarKind) -> SerializeError {
    SerializeError::coercion(found.kind(), kind.as_str(), "no conversion rule")
}

fn parse_str<T>(text: &str, kind: ScalarKind) -> Result<T, SerializeError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    text.parse::<T>().map_err(|e| {
        SerializeError::coercion(ValueKind::String, kind.as_str(), format!("{e}: {text:?}"))
    })
}

macro_rules! integer_scalar {
    ($($ty:ty => $kind:ident),* $(,)?) => {$(
        impl Scalar for $ty {
            const KIND: ScalarKind = ScalarKind::$kind;

            fn zero() -> Self {
                0
            }

            fn to_value(&self) -> Value {
                Value::Integer(*self as i64)
            }

            fn from_value(value: Value) -> Result<Self, SerializeError> {
                match value {
                    Value::Null => Ok(0),
                    Value::Integer(i) => Ok(i as $ty),
                    Value::Float(f) => Ok(f as $ty),
                    Value::String(s) => parse_str(&s, Self::KIND),
                    other => Err(no_rule(&other, Self::KIND)),
                }
            }
        }
    )*};
}

macro_rules! float_scalar {
    ($($ty:ty => $kind:ident),* $(,)?) => {$(
        impl Scalar for $ty {
            const KIND: ScalarKind = ScalarKind::$kind;

            fn zero() -> Self {
                0.0
            }

            fn to_value(&self) -> Value {
                Value::Float(*self as f64)
            }

            fn from_value(value: Value) -> Result<Self, SerializeError> {
                match value {
                    Value::Null => Ok(0.0),
                    Value::Float(f) => Ok(f as $ty),
                    Value::Integer(i) => Ok(i as $ty),
                    Value::String(s) => parse_str(&s, Self::KIND),
                    other => Err(no_rule(&other, Self::KIND)),
                }
            }
        }
    )*};
}

integer_scalar!(
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
);

float_scalar!(f32 => F32, f64 => F64);

impl Scalar for bool {
    const KIND: ScalarKind = ScalarKind::Bool;

    fn zero() -> Self {
        false
    }

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: Value) -> Result<Self, SerializeError> {
        match value {
            Value::Null => Ok(false),
            Value::Bool(b) => Ok(b),
            Value::Integer(i) => Ok(i != 0),
            Value::Float(f) => Ok(f != 0.0),
            Value::String(s) if s.eq_ignore_ascii_case("true") => Ok(true),
            Value::String(s) if s.eq_ignore_ascii_case("false") => Ok(false),
            Value::String(s) => Err(SerializeError::coercion(
                ValueKind::String,
                Self::KIND.as_str(),
                format!("not a boolean literal: {s:?}"),
            )),
            other => Err(no_rule(&other, Self::KIND)),
        }
    }
}

impl Scalar for char {
    const KIND: ScalarKind = ScalarKind::Char;

    fn zero() -> Self {
        '\0'
    }

    fn to_value(&self) -> Value {
        Value::String(self.to_string())
    }

    fn from_value(value: Value) -> Result<Self, SerializeError> {
        match value {
            Value::Null => Ok('\0'),
            Value::String(s) => s.chars().next().ok_or_else(|| {
                SerializeError::coercion(ValueKind::String, Self::KIND.as_str(), "empty string")
            }),
            other => Err(no_rule(&other, Self::KIND)),
        }
    }
}

impl Scalar for String {
    const KIND: ScalarKind = ScalarKind::String;

    fn zero() -> Self {
        String::new()
    }

    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }

    fn from_value(value: Value) -> Result<Self, SerializeError> {
        match value {
            Value::Null => Ok(String::new()),
            Value::String(s) => Ok(s),
            Value::Bool(b) => Ok(b.to_string()),
            Value::Integer(i) => Ok(i.to_string()),
            Value::Float(f) => Ok(float_text(f)),
            other => Err(no_rule(&other, Self::KIND)),
        }
    }
}

fn float_text(f: f64) -> String {
    let text = f.to_string();
    if f.is_finite() && !text.contains('.') {
        format!("{text}.0")
    } else {
        text
    }
}
