//! Per-field settings
//!
//! A field instance's settings are an open, insertion-ordered bag of JSON
//! values. Values arrive from HTML forms as strings, from stored documents as
//! typed JSON, or not at all, so every getter is tolerant: `"1"`, `"on"` and
//! `true` are all a set checkbox, `"12.5"` and `12.5` are both a number.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Width of the field as a percentage of its column
pub const WIDTH: &str = "width";
/// Horizontal alignment (`left`, `center`, `right`, `justify`)
pub const ALIGNMENT: &str = "alignment";
/// Operator-supplied CSS class names
pub const CLASS: &str = "class";
/// Sub-elements the operator ticked in the settings panel
pub const SHOW_HIDE: &str = "show_hide";
/// Explicit per-sub-element visibility overrides
pub const OVERRIDES: &str = "overrides";
/// Round displayed percentages to whole numbers
pub const ROUND_PERCENTAGE: &str = "round_percentage";

/// Settings of one field instance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldSettings(IndexMap<String, Value>);

impl FieldSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON object. Anything else yields `None`.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map.into_iter().collect())),
            _ => None,
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.0.get_mut(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.shift_remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Copy every key of `overlay` over this map.
    pub fn merge(&mut self, overlay: &FieldSettings) {
        for (key, value) in overlay.iter() {
            self.0.insert(key.clone(), value.clone());
        }
    }

    pub fn string(&self, key: &str) -> Option<String> {
        self.get(key).and_then(value_to_string)
    }

    pub fn bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(value_to_bool)
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(value_to_number)
    }

    /// A list setting. A bare scalar is a one-element list.
    pub fn list(&self, key: &str) -> Option<Vec<String>> {
        self.get(key).map(value_to_list)
    }

    pub fn object(&self, key: &str) -> Option<&Map<String, Value>> {
        self.get(key).and_then(Value::as_object)
    }

    /// The explicit visibility override for a sub-element, if one is set.
    ///
    /// `"show"`/`true` forces it visible, `"hide"`/`false` forces it hidden,
    /// and `""`/`"inherit"`/`null` leave the decision to the normal rules.
    pub fn override_for(&self, sub_element: &str) -> Option<bool> {
        let value = self.object(OVERRIDES)?.get(sub_element)?;
        match value {
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "" | "inherit" | "default" => None,
                _ => value_to_bool(value),
            },
            Value::Null => None,
            other => value_to_bool(other),
        }
    }
}

impl FromIterator<(String, Value)> for FieldSettings {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<FieldSettings> for Value {
    fn from(settings: FieldSettings) -> Self {
        Value::Object(settings.0.into_iter().collect())
    }
}

/// A field's stored settings layered over its type's defaults.
///
/// `settings` is `None` for a newly added, never-configured instance.
#[derive(Debug, Clone, Copy)]
pub struct SettingsView<'a> {
    settings: Option<&'a FieldSettings>,
    defaults: &'a FieldSettings,
}

impl<'a> SettingsView<'a> {
    pub fn new(settings: Option<&'a FieldSettings>, defaults: &'a FieldSettings) -> Self {
        Self { settings, defaults }
    }

    /// Whether the instance has any stored settings at all
    pub fn is_configured(&self) -> bool {
        self.settings.is_some()
    }

    /// The instance's own settings, without defaults
    pub fn own(&self) -> Option<&'a FieldSettings> {
        self.settings
    }

    pub fn defaults(&self) -> &'a FieldSettings {
        self.defaults
    }

    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.settings
            .and_then(|s| s.get(key))
            .or_else(|| self.defaults.get(key))
    }

    /// String setting; an empty stored string falls back to the default.
    pub fn string(&self, key: &str) -> Option<String> {
        self.settings
            .and_then(|s| s.string(key))
            .filter(|s| !s.trim().is_empty())
            .or_else(|| self.defaults.string(key))
    }

    pub fn string_or(&self, key: &str, fallback: &str) -> String {
        self.string(key).unwrap_or_else(|| fallback.to_string())
    }

    pub fn bool(&self, key: &str) -> Option<bool> {
        self.settings
            .and_then(|s| s.bool(key))
            .or_else(|| self.defaults.bool(key))
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.settings
            .and_then(|s| s.number(key))
            .or_else(|| self.defaults.number(key))
    }

    pub fn list(&self, key: &str) -> Option<Vec<String>> {
        self.settings
            .and_then(|s| s.list(key))
            .or_else(|| self.defaults.list(key))
    }

    pub fn override_for(&self, sub_element: &str) -> Option<bool> {
        self.settings.and_then(|s| s.override_for(sub_element))
    }
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn value_to_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|n| n != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "on" | "yes" | "show" => Some(true),
            "" | "0" | "false" | "off" | "no" | "hide" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn value_to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

fn value_to_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(value_to_string)
            .filter(|s| !s.is_empty())
            .collect(),
        other => value_to_string(other)
            .filter(|s| !s.is_empty())
            .into_iter()
            .collect(),
    }
}
