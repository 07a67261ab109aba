//! recordkit-value — the dynamic record model exchanged by `recordkit`.
//!
//! Provides [`Value`] (null, bool, integer, float, string, record, list),
//! the [`Record`] map type, conversions to and from [`serde_json::Value`],
//! and the [`path`] module that flattens nested records into separator-joined
//! keys and back.

pub mod path;
mod value;

pub use path::{deflate, deflate_default, inflate, inflate_default, DEFAULT_SEPARATOR};
pub use value::{record_from_json, Record, Value, ValueKind};
