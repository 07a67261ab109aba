//! Record path flattening.
//!
//! `deflate` turns nested records into a single-level record whose keys are
//! separator-joined paths; `inflate` expands such keys back into nested
//! records.
//!
//! Examples with the default separator:
//! - `{"a": {"b": 1}} -> {"a.b": 1}`
//! - `{"a.b": 1, "a.c": 2} -> {"a": {"b": 1, "c": 2}}`

use crate::{Record, Value};

/// Separator used when none is configured.
pub const DEFAULT_SEPARATOR: &str = ".";

/// Flatten `record` into a single-level record with `separator`-joined keys.
///
/// Nested records are descended into depth-first; every other value
/// (lists included) becomes a leaf under its full path. A nested record with
/// no entries has no leaves and therefore leaves no trace in the output.
pub fn deflate(record: &Record, separator: &str) -> Record {
    let mut out = Record::with_capacity(record.len());
    deflate_into(record, None, separator, &mut out);
    out
}

/// [`deflate`] with [`DEFAULT_SEPARATOR`].
pub fn deflate_default(record: &Record) -> Record {
    deflate(record, DEFAULT_SEPARATOR)
}

fn deflate_into(record: &Record, prefix: Option<&str>, separator: &str, out: &mut Record) {
    for (key, value) in record {
        let path = join_path(prefix, key, separator);
        match value {
            Value::Record(nested) => deflate_into(nested, Some(&path), separator, out),
            leaf => {
                out.insert(path, leaf.clone());
            }
        }
    }
}

fn join_path(prefix: Option<&str>, key: &str, separator: &str) -> String {
    match prefix {
        None => key.to_string(),
        Some(prefix) => {
            let mut path = String::with_capacity(prefix.len() + separator.len() + key.len());
            path.push_str(prefix);
            path.push_str(separator);
            path.push_str(key);
            path
        }
    }
}

/// Expand a flat record whose keys are `separator`-joined paths.
///
/// Intermediate segments become nested records. A non-record value already
/// sitting at an intermediate segment is replaced by a fresh record (last
/// write wins, nothing is merged across conflicting shapes).
///
/// Empty segments are kept rather than dropped: `{"a.": v}` inflates to
/// `{"a": {"": v}}`, not `{"a": v}`, so a deflated record with empty keys
/// inflates back to the same shape.
pub fn inflate(flat: &Record, separator: &str) -> Record {
    let mut out = Record::new();
    for (key, value) in flat {
        let segments = split_path(key, separator);
        let Some((last, parents)) = segments.split_last() else {
            continue;
        };
        let mut current = &mut out;
        for segment in parents {
            current = descend(current, segment);
        }
        current.insert((*last).to_string(), value.clone());
    }
    out
}

/// [`inflate`] with [`DEFAULT_SEPARATOR`].
pub fn inflate_default(flat: &Record) -> Record {
    inflate(flat, DEFAULT_SEPARATOR)
}

/// Split a path into its segments. Empty segments are kept, so `"a."`
/// yields `["a", ""]`; an empty separator never splits.
pub fn split_path<'a>(path: &'a str, separator: &str) -> Vec<&'a str> {
    if separator.is_empty() {
        return vec![path];
    }
    path.split(separator).collect()
}

fn descend<'r>(record: &'r mut Record, segment: &str) -> &'r mut Record {
    let slot = record
        .entry(segment.to_string())
        .or_insert_with(|| Value::Record(Record::new()));
    if !matches!(slot, Value::Record(_)) {
        *slot = Value::Record(Record::new());
    }
    match slot {
        Value::Record(nested) => nested,
        _ => unreachable!("slot was just replaced by a record"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record_from_json;
    use serde_json::json;

    fn rec(value: serde_json::Value) -> Record {
        record_from_json(value).unwrap()
    }

    #[test]
    fn deflate_nested_settings() {
        let nested = rec(json!({
            "settings": {"darkMode": false, "preferences": {"theme": "light"}}
        }));
        assert_eq!(
            deflate(&nested, "."),
            rec(json!({"settings.darkMode": false, "settings.preferences.theme": "light"}))
        );
    }

    #[test]
    fn inflate_reverses_deflate() {
        let nested = rec(json!({"a": {"b": 1, "c": {"d": [1, 2]}}, "e": null}));
        assert_eq!(inflate(&deflate(&nested, "/"), "/"), nested);
    }

    #[test]
    fn inflate_overwrites_scalar_at_intermediate_segment() {
        let mut flat = Record::new();
        flat.insert("a".into(), Value::Integer(1));
        flat.insert("a.b".into(), Value::Integer(2));
        assert_eq!(inflate_default(&flat), rec(json!({"a": {"b": 2}})));
    }

    #[test]
    fn split_keeps_empty_segments() {
        assert_eq!(split_path("a..b", "."), vec!["a", "", "b"]);
        assert_eq!(split_path("a.", "."), vec!["a", ""]);
        assert_eq!(split_path("a.b", ""), vec!["a.b"]);
    }

    #[test]
    fn inflate_keeps_trailing_empty_segment() {
        let flat = rec(json!({"a.": 1}));
        assert_eq!(inflate_default(&flat), rec(json!({"a": {"": 1}})));
        assert_eq!(deflate_default(&inflate_default(&flat)), flat);
    }

    #[test]
    fn empty_nested_record_has_no_leaves() {
        assert_eq!(deflate_default(&rec(json!({"a": {}, "b": 1}))), rec(json!({"b": 1})));
    }
}
