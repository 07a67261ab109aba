//! Serializer settings, loadable from JSON.

use recordkit_value::DEFAULT_SEPARATOR;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Key used to wrap top-level values that do not serialize to a record.
pub const DEFAULT_SCALAR_KEY: &str = "value";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializerConfig {
    /// Flatten nested records with this separator when set.
    pub deflate_separator: Option<String>,
    pub scalar_key: String,
}

impl Default for SerializerConfig {
    fn default() -> Self {
        Self {
            deflate_separator: None,
            scalar_key: DEFAULT_SCALAR_KEY.to_string(),
        }
    }
}

impl SerializerConfig {
    /// Config with deflation on, using the default `.` separator.
    pub fn deflating() -> Self {
        Self {
            deflate_separator: Some(DEFAULT_SEPARATOR.to_string()),
            ..Self::default()
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.deflate_separator.as_deref() == Some("") {
            return Err(ConfigError::EmptySeparator);
        }
        if self.scalar_key.is_empty() {
            return Err(ConfigError::EmptyScalarKey);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SerializerConfig::default();
        assert_eq!(config.deflate_separator, None);
        assert_eq!(config.scalar_key, "value");
        assert!(config.validate().is_ok());
        assert_eq!(SerializerConfig::deflating().deflate_separator.as_deref(), Some("."));
    }

    #[test]
    fn empty_settings_are_rejected() {
        let config = SerializerConfig {
            deflate_separator: Some(String::new()),
            ..SerializerConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::EmptySeparator)));
        let config = SerializerConfig {
            scalar_key: String::new(),
            ..SerializerConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::EmptyScalarKey)));
    }
}
