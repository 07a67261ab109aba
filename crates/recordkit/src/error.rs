//! Error types for conversion and configuration.

use recordkit_value::ValueKind;
use thiserror::Error;

/// Boxed error raised by user-supplied codecs.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure of a `serialize` / `deserialize` call.
#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("cannot convert {found} to {target}: {reason}")]
    TypeCoercion {
        found: ValueKind,
        target: String,
        reason: String,
    },
    #[error("transform `{transform}` cannot be applied to {found} value of field `{key}`")]
    UnsupportedTransform {
        transform: &'static str,
        key: String,
        found: ValueKind,
    },
    #[error("type `{type_name}` is not convertible")]
    UnsupportedType { type_name: &'static str },
    #[error("cannot create instance of `{type_name}`: {reason}")]
    InstantiationFailure {
        type_name: &'static str,
        reason: String,
    },
    #[error("custom codec for `{type_name}` failed: {source}")]
    CustomCodecFailure {
        type_name: &'static str,
        #[source]
        source: BoxError,
    },
}

impl SerializeError {
    pub(crate) fn coercion(
        found: ValueKind,
        target: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::TypeCoercion {
            found,
            target: target.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn instantiation(type_name: &'static str, reason: impl Into<String>) -> Self {
        Self::InstantiationFailure {
            type_name,
            reason: reason.into(),
        }
    }
}

/// Invalid serializer configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("deflate separator must not be empty")]
    EmptySeparator,
    #[error("scalar key must not be empty")]
    EmptyScalarKey,
}
