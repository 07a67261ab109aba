//! Deflate/inflate matrix: concrete flattening cases, separator handling and
//! the inverse property over generated records.

use proptest::prelude::*;
use recordkit_value::{
    deflate, deflate_default, inflate, inflate_default, record_from_json, Record, Value,
};
use serde_json::json;

fn rec(value: serde_json::Value) -> Record {
    record_from_json(value).expect("json object")
}

// ---------------------------------------------------------------------------
// deflate
// ---------------------------------------------------------------------------

#[test]
fn deflate_flat_record_is_identity() {
    let flat = rec(json!({"a": 1, "b": "x", "c": null}));
    assert_eq!(deflate_default(&flat), flat);
}

#[test]
fn deflate_settings_scenario() {
    let nested = rec(json!({
        "settings": {
            "darkMode": false,
            "preferences": {"theme": "light"}
        }
    }));
    assert_eq!(
        deflate(&nested, "."),
        rec(json!({
            "settings.darkMode": false,
            "settings.preferences.theme": "light"
        }))
    );
}

#[test]
fn deflate_leaves_lists_untouched() {
    let nested = rec(json!({"a": {"items": [{"x": 1}, 2]}}));
    assert_eq!(
        deflate_default(&nested),
        rec(json!({"a.items": [{"x": 1}, 2]}))
    );
}

#[test]
fn deflate_multi_char_separator() {
    let nested = rec(json!({"a": {"b": {"c": 1}}}));
    assert_eq!(deflate(&nested, "::"), rec(json!({"a::b::c": 1})));
}

#[test]
fn deflate_empty_top_level_key_still_prefixes_children() {
    let nested = rec(json!({"": {"a": 1}}));
    assert_eq!(deflate_default(&nested), rec(json!({".a": 1})));
}

// ---------------------------------------------------------------------------
// inflate
// ---------------------------------------------------------------------------

#[test]
fn inflate_settings_scenario() {
    let flat = rec(json!({
        "settings.darkMode": false,
        "settings.preferences.theme": "light"
    }));
    assert_eq!(
        inflate_default(&flat),
        rec(json!({
            "settings": {
                "darkMode": false,
                "preferences": {"theme": "light"}
            }
        }))
    );
}

#[test]
fn inflate_merges_siblings() {
    let flat = rec(json!({"a.b": 1, "a.c": 2, "d": 3}));
    assert_eq!(
        inflate_default(&flat),
        rec(json!({"a": {"b": 1, "c": 2}, "d": 3}))
    );
}

#[test]
fn inflate_scalar_then_nested_key_replaces_scalar() {
    let mut flat = Record::new();
    flat.insert("a".into(), Value::from("scalar"));
    flat.insert("a.b".into(), Value::Integer(1));
    assert_eq!(inflate_default(&flat), rec(json!({"a": {"b": 1}})));
}

#[test]
fn inflate_nested_then_scalar_key_overwrites_record() {
    let mut flat = Record::new();
    flat.insert("a.b".into(), Value::Integer(1));
    flat.insert("a".into(), Value::from("scalar"));
    assert_eq!(inflate_default(&flat), rec(json!({"a": "scalar"})));
}

#[test]
fn inflate_custom_separator_ignores_dots() {
    let flat = rec(json!({"a.b/c": 1}));
    assert_eq!(inflate(&flat, "/"), rec(json!({"a.b": {"c": 1}})));
}

// ---------------------------------------------------------------------------
// inverse property
// ---------------------------------------------------------------------------

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Integer),
        (-1.0e6f64..1.0e6).prop_map(Value::Float),
        "[a-z ]{0,8}".prop_map(Value::String),
    ]
}

fn nested_record() -> impl Strategy<Value = Record> {
    let value = leaf().prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..3).prop_map(Value::List),
            // Nested records are never empty: an empty record has no leaf to
            // carry it through deflate.
            prop::collection::btree_map("[a-z]{1,4}", inner, 1..4)
                .prop_map(|m| Value::Record(m.into_iter().collect())),
        ]
    });
    prop::collection::btree_map("[a-z]{1,4}", value, 0..5).prop_map(|m| m.into_iter().collect())
}

proptest! {
    #[test]
    fn inflate_inverts_deflate(record in nested_record()) {
        prop_assert_eq!(inflate(&deflate(&record, "."), "."), record.clone());
        prop_assert_eq!(inflate(&deflate(&record, "__"), "__"), record);
    }

    #[test]
    fn deflate_output_is_single_level(record in nested_record()) {
        let flat = deflate_default(&record);
        prop_assert!(flat.values().all(|v| !matches!(v, Value::Record(_))));
    }
}
