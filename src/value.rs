//! Loosely-typed input values and the raw mapping they live in.

use core::fmt;

use indexmap::IndexMap;

use crate::TypedObject;

#[derive(PartialEq, Debug, Clone)]
/// A scalar leaf of the raw input.
/// `u64` and `i64` are kept apart because decoders hand out unsigned values
/// that do not fit in `i64`, and the integer cast has to tell the two apart.
pub enum Scalar {
    /// String data.
    String(String),
    /// Unsigned 64-bit integer scalar.
    U64(u64),
    /// Signed 64-bit integer scalar.
    I64(i64),
    /// 64-bit floating-point scalar.
    F64(f64),
    /// Boolean scalar.
    Bool(bool),
    /// Explicit null.
    Null,
}

/// Display implementation for `Scalar`, used in error messages.
impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::String(s) => write!(f, "string {s:?}"),
            Scalar::U64(val) => write!(f, "u64 {val}"),
            Scalar::I64(val) => write!(f, "i64 {val}"),
            Scalar::F64(val) => write!(f, "f64 {val}"),
            Scalar::Bool(val) => write!(f, "bool {val}"),
            Scalar::Null => write!(f, "null"),
        }
    }
}

/// A value found under a key of [`RawData`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A scalar leaf.
    Scalar(Scalar),
    /// A nested mapping.
    Map(RawData),
    /// An ordered sequence of values.
    List(Vec<Value>),
    /// An object that was already built and is handed in instead of raw data.
    ///
    /// Hydration assigns a clone of it without looking inside.
    Object(Box<TypedObject>),
}

impl Value {
    /// The null value.
    pub const NULL: Value = Value::Scalar(Scalar::Null);

    /// Whether this value is a mapping, a list, or a prebuilt object.
    ///
    /// Union resolution only ever looks at this bit of the value.
    pub fn is_structured(&self) -> bool {
        !matches!(self, Value::Scalar(_))
    }

    /// Check for an explicit null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Scalar(Scalar::Null))
    }

    /// Returns the scalar, if this is one.
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the nested mapping, if this is one.
    pub fn as_map(&self) -> Option<&RawData> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the list elements, if this is a list.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the prebuilt object, if this is one.
    pub fn as_object(&self) -> Option<&TypedObject> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Returns the string slice, if this is a string scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as `i64` if it is an integer scalar that fits.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Scalar(Scalar::I64(v)) => Some(*v),
            Value::Scalar(Scalar::U64(v)) => (*v).try_into().ok(),
            _ => None,
        }
    }

    /// Returns the value as `f64` if it is a numeric scalar.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Scalar(Scalar::F64(v)) => Some(*v),
            Value::Scalar(Scalar::I64(v)) => Some(*v as f64),
            Value::Scalar(Scalar::U64(v)) => Some(*v as f64),
            _ => None,
        }
    }

    /// Returns the boolean, if this is a boolean scalar.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Scalar(Scalar::Bool(b)) => Some(*b),
            _ => None,
        }
    }
}

/// Short description of a value's shape, for error messages.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(scalar) => write!(f, "{scalar}"),
            Value::Map(map) => write!(f, "mapping with {} key(s)", map.len()),
            Value::List(items) => write!(f, "list of {} value(s)", items.len()),
            Value::Object(obj) => write!(f, "prebuilt {} object", obj.variant()),
        }
    }
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        Value::Scalar(scalar)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Scalar(Scalar::I64(v))
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Scalar(Scalar::I64(v.into()))
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Scalar(Scalar::U64(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Scalar(Scalar::F64(v))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Scalar(Scalar::Bool(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Scalar(Scalar::String(v.to_string()))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Scalar(Scalar::String(v))
    }
}

impl From<RawData> for Value {
    fn from(map: RawData) -> Self {
        Value::Map(map)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<TypedObject> for Value {
    fn from(obj: TypedObject) -> Self {
        Value::Object(Box::new(obj))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::NULL, Into::into)
    }
}

/// The untyped, insertion-ordered input mapping of one typed object.
///
/// Once handed to a [`TypedObject`] it is only ever exposed by shared
/// reference, so hydration cannot write back into it.
#[derive(Debug, Clone, Default)]
pub struct RawData {
    entries: IndexMap<String, Value>,
}

/// Equality is order-sensitive: two mappings with the same entries in a
/// different order are different inputs.
impl PartialEq for RawData {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len() && self.entries.iter().eq(other.entries.iter())
    }
}

impl RawData {
    /// An empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for assembling inputs by hand.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a key, replacing any previous value under it in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Whether `key` is present, whatever its value.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the mapping has no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for RawData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(feature = "json")]
mod json {
    use super::{RawData, Scalar, Value};
    use crate::{HydrateError, HydrateErrorKind};

    impl From<serde_json::Value> for Value {
        fn from(json: serde_json::Value) -> Self {
            match json {
                serde_json::Value::Null => Value::NULL,
                serde_json::Value::Bool(b) => Value::Scalar(Scalar::Bool(b)),
                serde_json::Value::Number(n) => {
                    if let Some(v) = n.as_i64() {
                        Value::Scalar(Scalar::I64(v))
                    } else if let Some(v) = n.as_u64() {
                        Value::Scalar(Scalar::U64(v))
                    } else if let Some(v) = n.as_f64() {
                        Value::Scalar(Scalar::F64(v))
                    } else {
                        Value::NULL
                    }
                }
                serde_json::Value::String(s) => Value::Scalar(Scalar::String(s)),
                serde_json::Value::Array(items) => {
                    Value::List(items.into_iter().map(Value::from).collect())
                }
                serde_json::Value::Object(map) => Value::Map(RawData::from(map)),
            }
        }
    }

    impl From<serde_json::Map<String, serde_json::Value>> for RawData {
        fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
            map.into_iter().collect()
        }
    }

    /// Only a JSON object can be the raw data of a typed object.
    impl TryFrom<serde_json::Value> for RawData {
        type Error = HydrateError;

        fn try_from(json: serde_json::Value) -> Result<Self, Self::Error> {
            match Value::from(json) {
                Value::Map(map) => Ok(map),
                other => Err(HydrateError::new(HydrateErrorKind::MalformedShape {
                    expected: "mapping",
                    found: other.to_string(),
                })),
            }
        }
    }
}
