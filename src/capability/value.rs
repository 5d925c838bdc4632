//! Structured parameter and payload values.
//!
//! [`ParameterValue`] is a closed tagged union used for capability inputs and
//! handler outputs. It serialises to and from plain JSON so hosts can pass
//! payloads through unchanged, while keeping the set of shapes explicit and
//! checkable against [`ParameterSpec`](super::ParameterSpec) definitions.

use super::ParameterKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;

/// A structured value passed to or returned from a capability.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    /// Absent or explicitly null value.
    #[default]
    Null,
    /// Boolean flag.
    Bool(bool),
    /// Signed integer.
    Integer(i64),
    /// Floating-point number.
    Number(f64),
    /// UTF-8 string.
    String(String),
    /// Ordered list of values.
    Array(Vec<ParameterValue>),
    /// String-keyed map of values.
    Object(BTreeMap<String, ParameterValue>),
}

impl ParameterValue {
    /// Returns the kind of this value.
    #[must_use]
    pub const fn kind(&self) -> ParameterKind {
        match self {
            Self::Null => ParameterKind::Any,
            Self::Bool(_) => ParameterKind::Boolean,
            Self::Integer(_) => ParameterKind::Integer,
            Self::Number(_) => ParameterKind::Number,
            Self::String(_) => ParameterKind::String,
            Self::Array(_) => ParameterKind::Array,
            Self::Object(_) => ParameterKind::Object,
        }
    }

    /// Returns whether the value is [`ParameterValue::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the string content, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the boolean content, if this is a boolean.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the integer content, if this is an integer.
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the numeric content, widening integers to `f64`.
    #[expect(
        clippy::cast_precision_loss,
        reason = "numeric range checks tolerate precision loss above 2^53"
    )]
    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(value) => Some(*value as f64),
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the object entries, if this is an object.
    #[must_use]
    pub const fn as_object(&self) -> Option<&BTreeMap<String, Self>> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::Value::from(self.clone());
        write!(f, "{json}")
    }
}

impl From<bool> for ParameterValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ParameterValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for ParameterValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u32> for ParameterValue {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for ParameterValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for ParameterValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl<T: Into<Self>> From<Vec<T>> for ParameterValue {
    fn from(values: Vec<T>) -> Self {
        Self::Array(values.into_iter().map(Into::into).collect())
    }
}

impl From<BTreeMap<String, Self>> for ParameterValue {
    fn from(map: BTreeMap<String, Self>) -> Self {
        Self::Object(map)
    }
}

impl From<serde_json::Value> for ParameterValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(flag) => Self::Bool(flag),
            serde_json::Value::Number(number) => number.as_i64().map_or_else(
                || Self::Number(number.as_f64().unwrap_or_default()),
                Self::Integer,
            ),
            serde_json::Value::String(text) => Self::String(text),
            serde_json::Value::Array(items) => {
                Self::Array(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(map) => Self::Object(
                map.into_iter()
                    .map(|(key, item)| (key, Self::from(item)))
                    .collect(),
            ),
        }
    }
}

impl From<ParameterValue> for serde_json::Value {
    fn from(value: ParameterValue) -> Self {
        match value {
            ParameterValue::Null => Self::Null,
            ParameterValue::Bool(flag) => Self::Bool(flag),
            ParameterValue::Integer(number) => Self::from(number),
            ParameterValue::Number(number) => {
                serde_json::Number::from_f64(number).map_or(Self::Null, Self::Number)
            }
            ParameterValue::String(text) => Self::String(text),
            ParameterValue::Array(items) => {
                Self::Array(items.into_iter().map(Self::from).collect())
            }
            ParameterValue::Object(map) => Self::Object(
                map.into_iter()
                    .map(|(key, item)| (key, Self::from(item)))
                    .collect(),
            ),
        }
    }
}

/// Named parameters supplied to a capability invocation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Parameters(BTreeMap<String, ParameterValue>);

impl Parameters {
    /// Creates an empty parameter set.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Adds a parameter, returning the updated set.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParameterValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Inserts or replaces a parameter.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParameterValue>) {
        self.0.insert(name.into(), value.into());
    }

    /// Returns the value of a parameter.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParameterValue> {
        self.0.get(name)
    }

    /// Returns whether a parameter is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether no parameters are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates parameters in name order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, ParameterValue> {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<ParameterValue>> FromIterator<(K, V)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}

impl From<Parameters> for ParameterValue {
    fn from(parameters: Parameters) -> Self {
        Self::Object(parameters.0)
    }
}
