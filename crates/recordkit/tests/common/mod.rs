//! Shared fixtures for the recordkit matrices.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};

use recordkit::{
    opaque_type, record_from_json, BoxError, CustomCodec, DefaultArgs, FieldTable, Model, Record,
    SerializeError, Value,
};

pub fn rec(value: serde_json::Value) -> Record {
    record_from_json(value).expect("json object")
}

// ---------------------------------------------------------------------------
// Plain models
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestUser {
    pub name: String,
    pub age: i32,
}

impl Model for TestUser {
    fn describe(t: &mut FieldTable<Self>) {
        t.serializable().default_constructor();
        t.field("name", |u| &u.name, |u| &mut u.name);
        t.field("age", |u| &u.age, |u| &mut u.age);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Preferences {
    pub theme: String,
}

impl Model for Preferences {
    fn describe(t: &mut FieldTable<Self>) {
        t.serializable().default_constructor();
        t.field("theme", |p| &p.theme, |p| &mut p.theme);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub dark_mode: bool,
    pub volume: u8,
    pub preferences: Preferences,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dark_mode: true,
            volume: 50,
            preferences: Preferences {
                theme: "dark".into(),
            },
        }
    }
}

impl Model for Settings {
    fn describe(t: &mut FieldTable<Self>) {
        t.default_constructor();
        t.field("dark_mode", |s| &s.dark_mode, |s| &mut s.dark_mode)
            .prop_key("darkMode");
        t.field("volume", |s| &s.volume, |s| &mut s.volume).prop();
        t.field("preferences", |s| &s.preferences, |s| &mut s.preferences)
            .prop();
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Profile {
    pub id: u64,
    pub settings: Settings,
}

impl Model for Profile {
    fn describe(t: &mut FieldTable<Self>) {
        t.serializable().default_constructor();
        t.field("id", |p| &p.id, |p| &mut p.id);
        t.field("settings", |p| &p.settings, |p| &mut p.settings);
    }
}

// ---------------------------------------------------------------------------
// Transforms
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub nickname: String,
    pub code: String,
    pub age: i64,
    pub score: f64,
    pub internal: String,
}

impl Model for SignupForm {
    fn describe(t: &mut FieldTable<Self>) {
        t.default_constructor();
        t.field("username", |f| &f.username, |f| &mut f.username)
            .prop()
            .trim()
            .lower_case();
        t.field("email", |f| &f.email, |f| &mut f.email)
            .prop_key("mail")
            .trim();
        t.field("nickname", |f| &f.nickname, |f| &mut f.nickname)
            .prop()
            .empty_is_null();
        t.field("code", |f| &f.code, |f| &mut f.code)
            .prop()
            .upper_case();
        t.field("age", |f| &f.age, |f| &mut f.age).prop().clamp(0, 120);
        t.field("score", |f| &f.score, |f| &mut f.score)
            .prop()
            .clamp(0, 100);
        // no marker on a non-serializable type: never converted
        t.field("internal", |f| &f.internal, |f| &mut f.internal);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BadClamp {
    pub label: String,
}

impl Model for BadClamp {
    fn describe(t: &mut FieldTable<Self>) {
        t.serializable().default_constructor();
        t.field("label", |b| &b.label, |b| &mut b.label).clamp(0, 10);
    }
}

// ---------------------------------------------------------------------------
// Collections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Team {
    pub name: String,
    pub members: Vec<TestUser>,
    pub tags: Vec<String>,
    pub scores: HashMap<String, i32>,
    pub roster: BTreeMap<String, TestUser>,
    pub extra: Option<Value>,
    pub lead: Option<TestUser>,
}

impl Model for Team {
    fn describe(t: &mut FieldTable<Self>) {
        t.serializable().default_constructor();
        t.field("name", |t| &t.name, |t| &mut t.name);
        t.field("members", |t| &t.members, |t| &mut t.members);
        t.field("tags", |t| &t.tags, |t| &mut t.tags);
        t.field("scores", |t| &t.scores, |t| &mut t.scores);
        t.field("roster", |t| &t.roster, |t| &mut t.roster);
        t.field("extra", |t| &t.extra, |t| &mut t.extra);
        t.field("lead", |t| &t.lead, |t| &mut t.lead);
    }
}

// ---------------------------------------------------------------------------
// Constructors and inheritance
// ---------------------------------------------------------------------------

/// Only a defaulted constructor whose parameters all have type defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Counter {
    pub label: String,
    pub count: u32,
}

impl Counter {
    pub fn new(label: String, count: u32) -> Self {
        Self { label, count }
    }
}

impl Model for Counter {
    fn describe(t: &mut FieldTable<Self>) {
        t.serializable()
            .constructor_with(|args| Ok(Counter::new(args.next()?, args.next()?)));
        t.field("label", |c| &c.label, |c| &mut c.label);
        t.field("count", |c| &c.count, |c| &mut c.count);
    }
}

/// Defaulted constructor needing a model argument, which has no default.
#[derive(Debug, Clone, PartialEq)]
pub struct Membership {
    pub user: TestUser,
    pub since: i64,
}

impl Model for Membership {
    fn describe(t: &mut FieldTable<Self>) {
        t.serializable().constructor_with(membership);
        t.field("user", |m| &m.user, |m| &mut m.user);
        t.field("since", |m| &m.since, |m| &mut m.since);
    }
}

fn membership(args: &mut DefaultArgs) -> Result<Membership, SerializeError> {
    Ok(Membership {
        user: args.next()?,
        since: args.next()?,
    })
}

/// No constructor registered at all.
#[derive(Debug, Clone, PartialEq)]
pub struct Sealed {
    pub token: String,
}

impl Model for Sealed {
    fn describe(t: &mut FieldTable<Self>) {
        t.serializable();
        t.field("token", |s| &s.token, |s| &mut s.token);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entity {
    pub id: u32,
    pub created: i64,
}

impl Model for Entity {
    fn describe(t: &mut FieldTable<Self>) {
        t.field("id", |e| &e.id, |e| &mut e.id).prop();
        t.field("created", |e| &e.created, |e| &mut e.created)
            .prop_key("createdAt");
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub base: Entity,
    pub title: String,
}

impl Model for Document {
    fn describe(t: &mut FieldTable<Self>) {
        t.default_constructor();
        t.inherit(|d| &d.base, |d| &mut d.base);
        t.field("title", |d| &d.title, |d| &mut d.title).prop();
    }
}

// ---------------------------------------------------------------------------
// Custom codecs
// ---------------------------------------------------------------------------

/// Model that also has a custom codec; the codec must win.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomData {
    pub first: String,
    pub second: i32,
}

impl Model for CustomData {
    fn describe(t: &mut FieldTable<Self>) {
        t.serializable().default_constructor();
        t.field("first", |d| &d.first, |d| &mut d.first);
        t.field("second", |d| &d.second, |d| &mut d.second);
    }
}

/// Encodes `CustomData` as `"first:second"`.
pub struct CustomDataCodec;

impl CustomCodec<CustomData> for CustomDataCodec {
    fn serialize(&self, value: &CustomData) -> Result<Value, BoxError> {
        Ok(Value::String(format!("{}:{}", value.first, value.second)))
    }

    fn deserialize(&self, value: Value) -> Result<CustomData, BoxError> {
        let text = value.as_str().ok_or("expected a string")?;
        let (first, second) = text.split_once(':').ok_or("missing separator")?;
        Ok(CustomData {
            first: first.to_string(),
            second: second.parse()?,
        })
    }
}

/// Type with no catalog at all, convertible only through a codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

opaque_type!(Rgb);

pub struct RgbCodec;

impl CustomCodec<Rgb> for RgbCodec {
    fn serialize(&self, value: &Rgb) -> Result<Value, BoxError> {
        let mut record = Record::new();
        record.insert("r".into(), Value::Integer(value.0.into()));
        record.insert("g".into(), Value::Integer(value.1.into()));
        record.insert("b".into(), Value::Integer(value.2.into()));
        Ok(Value::Record(record))
    }

    fn deserialize(&self, value: Value) -> Result<Rgb, BoxError> {
        let record = value.as_record().ok_or("expected a record")?;
        let channel = |key: &str| -> Result<u8, BoxError> {
            let raw = record
                .get(key)
                .and_then(Value::as_i64)
                .ok_or_else(|| format!("missing channel {key}"))?;
            Ok(u8::try_from(raw)?)
        };
        Ok(Rgb(channel("r")?, channel("g")?, channel("b")?))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: String,
    pub accent: Rgb,
    pub background: Option<Rgb>,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: String::new(),
            accent: Rgb(0, 0, 0),
            background: None,
        }
    }
}

impl Model for Theme {
    fn describe(t: &mut FieldTable<Self>) {
        t.serializable().default_constructor();
        t.field("name", |t| &t.name, |t| &mut t.name);
        t.field("accent", |t| &t.accent, |t| &mut t.accent);
        t.field("background", |t| &t.background, |t| &mut t.background);
    }
}
