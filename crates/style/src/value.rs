//! The value side of a [`Cfg`] entry.

use crate::cfg::Cfg;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single configuration value.
///
/// Nested mappings are themselves [`Cfg`] instances so that merges can recurse
/// into them; every other variant is treated as an opaque scalar by the merge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum CfgValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<CfgValue>),
    Map(Cfg),
}

impl CfgValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CfgValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CfgValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CfgValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Integers widen to floats.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CfgValue::Float(f) => Some(*f),
            CfgValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_cfg(&self) -> Option<&Cfg> {
        match self {
            CfgValue::Map(cfg) => Some(cfg),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[CfgValue]> {
        match self {
            CfgValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CfgValue::Null)
    }

    /// Short name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            CfgValue::Null => "null",
            CfgValue::Bool(_) => "bool",
            CfgValue::Int(_) => "int",
            CfgValue::Float(_) => "float",
            CfgValue::Str(_) => "string",
            CfgValue::List(_) => "list",
            CfgValue::Map(_) => "map",
        }
    }
}

impl fmt::Display for CfgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CfgValue::Null => f.write_str("null"),
            CfgValue::Bool(b) => write!(f, "{}", b),
            CfgValue::Int(i) => write!(f, "{}", i),
            CfgValue::Float(x) => write!(f, "{}", x),
            CfgValue::Str(s) => f.write_str(s),
            CfgValue::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
            CfgValue::Map(cfg) => f.write_str(&cfg.to_prop_string(|k| k.to_string(), |v| v.to_string(), ";")),
        }
    }
}

impl From<bool> for CfgValue {
    fn from(v: bool) -> Self {
        CfgValue::Bool(v)
    }
}

impl From<i32> for CfgValue {
    fn from(v: i32) -> Self {
        CfgValue::Int(v as i64)
    }
}

impl From<i64> for CfgValue {
    fn from(v: i64) -> Self {
        CfgValue::Int(v)
    }
}

impl From<u32> for CfgValue {
    fn from(v: u32) -> Self {
        CfgValue::Int(v as i64)
    }
}

impl From<f32> for CfgValue {
    fn from(v: f32) -> Self {
        CfgValue::Float(v as f64)
    }
}

impl From<f64> for CfgValue {
    fn from(v: f64) -> Self {
        CfgValue::Float(v)
    }
}

impl From<&str> for CfgValue {
    fn from(v: &str) -> Self {
        CfgValue::Str(v.to_string())
    }
}

impl From<String> for CfgValue {
    fn from(v: String) -> Self {
        CfgValue::Str(v)
    }
}

impl From<Cfg> for CfgValue {
    fn from(v: Cfg) -> Self {
        CfgValue::Map(v)
    }
}

impl<T: Into<CfgValue>> From<Vec<T>> for CfgValue {
    fn from(v: Vec<T>) -> Self {
        CfgValue::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<CfgValue>> From<Option<T>> for CfgValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(CfgValue::Null)
    }
}
