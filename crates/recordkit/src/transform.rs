//! Per-field transforms applied to scalar values on serialization.
//!
//! The order is fixed: clamp, empty-is-null, trim, lower case, upper case.

use recordkit_value::Value;

use crate::error::SerializeError;

/// Inclusive integer bounds for numeric fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clamp {
    pub min: i64,
    pub max: i64,
}

/// Transform flags declared on a field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformFlags {
    pub clamp: Option<Clamp>,
    pub empty_is_null: bool,
    pub trim: bool,
    pub lower_case: bool,
    pub upper_case: bool,
}

impl TransformFlags {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Run the pipeline over `value`, the serialized form of field `key`.
    ///
    /// Lists and records pass through unmodified. String transforms ignore
    /// non-string scalars; clamp rejects them.
    pub fn apply(&self, key: &str, value: Value) -> Result<Value, SerializeError> {
        if !value.is_scalar() || value.is_null() {
            return Ok(value);
        }
        let mut value = value;

        if let Some(bounds) = self.clamp {
            value = clamp(bounds, key, value)?;
        }

        let mut text = match value {
            Value::String(text) => text,
            other => return Ok(other),
        };
        if self.empty_is_null && text.is_empty() {
            return Ok(Value::Null);
        }
        if self.trim {
            text = text.trim().to_string();
        }
        if self.lower_case {
            text = text.to_lowercase();
        }
        if self.upper_case {
            text = text.to_uppercase();
        }
        Ok(Value::String(text))
    }
}

fn clamp(bounds: Clamp, key: &str, value: Value) -> Result<Value, SerializeError> {
    match value {
        Value::Integer(i) => Ok(Value::Integer(i.min(bounds.max).max(bounds.min))),
        Value::Float(f) => Ok(Value::Float(
            f.min(bounds.max as f64).max(bounds.min as f64),
        )),
        other => Err(SerializeError::UnsupportedTransform {
            transform: "clamp",
            key: key.to_string(),
            found: other.kind(),
        }),
    }
}
