//! The inheritable configuration mapping.
//!
//! A [`Cfg`] is an insertion-ordered map from string keys to [`CfgValue`]s.
//! Blocks capture their styling in one at construction time and merge it with
//! their ancestors' configuration on every edge of the render walk. Merges never
//! mutate their operands; each produces a new `Cfg`.

use crate::error::CfgError;
use crate::value::CfgValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// An ordered, inheritable key/value configuration.
///
/// The optional `kind` label plays the role of a configuration subtype: it
/// travels with a nested mapping through merges so that downstream code can
/// tell e.g. a chart-options map from a plain style map. It never takes part
/// in equality.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cfg {
    #[serde(skip)]
    kind: Option<Arc<str>>,
    entries: IndexMap<String, CfgValue>,
}

impl PartialEq for Cfg {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Cfg {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty config carrying a kind label.
    pub fn with_kind(kind: impl Into<Arc<str>>) -> Self {
        Self {
            kind: Some(kind.into()),
            entries: IndexMap::new(),
        }
    }

    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    /// Builder-style insert.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<CfgValue>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Inserts or replaces a value, keeping the key's original position on replace.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<CfgValue>) -> Option<CfgValue> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<CfgValue> {
        self.entries.shift_remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&CfgValue> {
        self.entries.get(key)
    }

    /// Attribute-style access: a missing key is an error naming the key.
    pub fn attr(&self, key: &str) -> Result<&CfgValue, CfgError> {
        self.entries
            .get(key)
            .ok_or_else(|| CfgError::NoSuchAttribute(key.to_string()))
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(CfgValue::as_str)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(CfgValue::as_bool)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(CfgValue::as_i64)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(CfgValue::as_f64)
    }

    pub fn get_cfg(&self, key: &str) -> Option<&Cfg> {
        self.get(key).and_then(CfgValue::as_cfg)
    }

    /// Typed variant of [`Cfg::attr`] for nested mappings.
    pub fn attr_cfg(&self, key: &str) -> Result<&Cfg, CfgError> {
        let value = self.attr(key)?;
        value.as_cfg().ok_or_else(|| CfgError::TypeMismatch {
            key: key.to_string(),
            expected: "map",
            found: value.type_name(),
        })
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CfgValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns a new config with every key of `self`, plus every key of `parent`
    /// that `self` does not define. Nested mappings present on both sides are
    /// merged recursively with the same precedence.
    pub fn inherit(&self, parent: &Cfg) -> Cfg {
        Cfg {
            kind: self.kind.clone(),
            entries: merge_entries(self, parent, false),
        }
    }

    /// Like [`Cfg::inherit`] but `overrides` wins every conflict.
    pub fn override_with(&self, overrides: &Cfg) -> Cfg {
        Cfg {
            kind: self.kind.clone(),
            entries: merge_entries(self, overrides, true),
        }
    }

    /// Collapses `layers` left to right (earlier layers take precedence) and
    /// inherits the result.
    pub fn inherit_many<'a>(&self, layers: impl IntoIterator<Item = &'a Cfg>) -> Cfg {
        self.inherit(&Cfg::collapse(layers))
    }

    /// Collapses `layers` left to right (earlier layers take precedence) and
    /// applies the result as an override.
    pub fn override_many<'a>(&self, layers: impl IntoIterator<Item = &'a Cfg>) -> Cfg {
        self.override_with(&Cfg::collapse(layers))
    }

    /// Folds a sequence of configs into one via repeated inheritance.
    pub fn collapse<'a>(layers: impl IntoIterator<Item = &'a Cfg>) -> Cfg {
        layers
            .into_iter()
            .fold(Cfg::new(), |acc, layer| acc.inherit(layer))
    }

    /// Joins `key:value` pairs with `separator` after transforming both sides.
    pub fn to_prop_string(
        &self,
        key_transform: impl Fn(&str) -> String,
        value_transform: impl Fn(&CfgValue) -> String,
        separator: &str,
    ) -> String {
        self.entries
            .iter()
            .map(|(k, v)| format!("{}:{}", key_transform(k), value_transform(v)))
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// CSS projection: underscores in keys become dashes, values are lower-cased.
    pub fn to_css_string(&self) -> String {
        self.to_prop_string(
            |k| k.replace('_', "-"),
            |v| v.to_string().to_lowercase(),
            ";",
        )
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.entries
                .iter()
                .map(|(k, v)| (k.clone(), value_to_json(v)))
                .collect(),
        )
    }

    pub fn from_json(value: serde_json::Value) -> Result<Cfg, CfgError> {
        serde_json::from_value(value).map_err(|e| CfgError::Json(e.to_string()))
    }
}

// Receiver keys keep their order; keys only in `second` follow in its order.
fn merge_entries(first: &Cfg, second: &Cfg, take_second: bool) -> IndexMap<String, CfgValue> {
    let mut merged = IndexMap::with_capacity(first.len() + second.len());

    for (key, v1) in &first.entries {
        let value = match second.entries.get(key) {
            Some(v2) => merge_values(v1, v2, take_second),
            None => v1.clone(),
        };
        merged.insert(key.clone(), value);
    }

    for (key, v2) in &second.entries {
        if !first.entries.contains_key(key) {
            merged.insert(key.clone(), v2.clone());
        }
    }

    merged
}

fn merge_values(v1: &CfgValue, v2: &CfgValue, take_second: bool) -> CfgValue {
    match (v1, v2) {
        (CfgValue::Map(a), CfgValue::Map(b)) => {
            // The merged map takes the kind of the side that wins scalar conflicts.
            let kind = if take_second { b.kind.clone() } else { a.kind.clone() };
            CfgValue::Map(Cfg {
                kind,
                entries: merge_entries(a, b, take_second),
            })
        }
        _ if take_second => v2.clone(),
        _ => v1.clone(),
    }
}

fn value_to_json(value: &CfgValue) -> serde_json::Value {
    use serde_json::Value;
    match value {
        CfgValue::Null => Value::Null,
        CfgValue::Bool(b) => Value::Bool(*b),
        CfgValue::Int(i) => Value::from(*i),
        CfgValue::Float(f) => serde_json::Number::from_f64(*f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        CfgValue::Str(s) => Value::String(s.clone()),
        CfgValue::List(items) => Value::Array(items.iter().map(value_to_json).collect()),
        CfgValue::Map(cfg) => cfg.to_json(),
    }
}

impl<K: Into<String>, V: Into<CfgValue>> FromIterator<(K, V)> for Cfg {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Cfg {
            kind: None,
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl<K: Into<String>, V: Into<CfgValue>, const N: usize> From<[(K, V); N]> for Cfg {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}
