//! Per-field coercion: scalar casts and transform functions.
//!
//! Casts are best-effort. Each kind has a conversion that reports failure
//! with `None`; what happens next is up to the [`CoercionPolicy`]. Under the
//! default lenient policy a failed cast assigns the kind's default value
//! (`0`, `0.0`, `""`, `false`) instead of aborting hydration.
//!
//! | kind    | converts from                                                              | default |
//! |---------|----------------------------------------------------------------------------|---------|
//! | integer | integers in `i64` range, finite in-range floats (truncated toward zero), bools, null, strings parsing as an integer or a float | `0` |
//! | float   | numbers, bools, null, strings parsing as a finite float                    | `0.0`   |
//! | string  | strings, numbers, bools (`"true"`/`"false"`), null (`""`)                 | `""`    |
//! | boolean | bools, numbers (non-zero is `true`), null, `true/false/1/0/yes/no/on/off/""` | `false` |
//! | array   | lists as-is, null to `[]`, anything else (mappings included) to a one-element list | never fails |
//! | mixed   | anything, unchanged                                                        | never fails |
//!
//! Strings are trimmed before parsing; keyword matching is ASCII
//! case-insensitive. Lists, mappings and prebuilt objects fail every scalar
//! cast.

use indexmap::IndexMap;
use log::trace;
use owo_colors::OwoColorize;

use crate::{
    Coercion, CoercionPolicy, HydrateError, HydrateErrorKind, RawData, Scalar, ScalarKind, Value,
};

/// Field name to coercion table.
///
/// A variant's table comes from its field descriptors; an instance may add
/// or replace entries on top of it (see [`CoercionMap::merged`]).
#[derive(Debug, Clone, Default)]
pub struct CoercionMap {
    entries: IndexMap<String, Coercion>,
}

impl CoercionMap {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the entry for `field`.
    pub fn insert(&mut self, field: impl Into<String>, coercion: impl Into<Coercion>) {
        self.entries.insert(field.into(), coercion.into());
    }

    /// Entry for `field`.
    pub fn get(&self, field: &str) -> Option<&Coercion> {
        self.entries.get(field)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Coercion)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// `base` with every entry of `overrides` laid over it.
    pub fn merged(base: &CoercionMap, overrides: &CoercionMap) -> CoercionMap {
        let mut entries = base.entries.clone();
        for (field, coercion) in &overrides.entries {
            entries.insert(field.clone(), coercion.clone());
        }
        CoercionMap { entries }
    }

    /// Apply the entry for `field`, or return `value` unchanged when there is none.
    pub fn coerce(
        &self,
        field: &str,
        value: &Value,
        raw: &RawData,
        policy: CoercionPolicy,
    ) -> Result<Value, HydrateError> {
        apply(self.get(field), value, raw, policy)
    }
}

impl<K: Into<String>, C: Into<Coercion>> FromIterator<(K, C)> for CoercionMap {
    fn from_iter<I: IntoIterator<Item = (K, C)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, c)| (k.into(), c.into()))
                .collect(),
        }
    }
}

/// Run one coercion against a raw value.
///
/// `raw` is the full mapping of the object being hydrated, passed through to
/// transform functions so they can derive a value from sibling keys.
pub fn apply(
    coercion: Option<&Coercion>,
    value: &Value,
    raw: &RawData,
    policy: CoercionPolicy,
) -> Result<Value, HydrateError> {
    match coercion {
        None => Ok(value.clone()),
        Some(Coercion::Transform(f)) => Ok(f(value, raw)),
        Some(Coercion::Cast(kind)) => match cast(*kind, value) {
            Some(cast) => Ok(cast),
            None => match policy {
                CoercionPolicy::Lenient => {
                    trace!(
                        "Cast of {} to {} failed, using default",
                        value.yellow(),
                        kind.blue()
                    );
                    Ok(default_for(*kind))
                }
                CoercionPolicy::Strict => Err(HydrateError::new(HydrateErrorKind::InvalidCoercion {
                    kind: *kind,
                    found: value.to_string(),
                })),
            },
        },
    }
}

/// Convert `value` to `kind`, or `None` if it has no sensible conversion.
pub fn cast(kind: ScalarKind, value: &Value) -> Option<Value> {
    match kind {
        ScalarKind::Integer => to_i64(value).map(Value::from),
        ScalarKind::Float => to_f64(value).map(Value::from),
        ScalarKind::String => to_text(value).map(Value::from),
        ScalarKind::Boolean => to_bool(value).map(Value::from),
        ScalarKind::Array => Some(to_array(value)),
        ScalarKind::Mixed => Some(value.clone()),
    }
}

/// Value assigned when a lenient cast to `kind` fails.
pub fn default_for(kind: ScalarKind) -> Value {
    match kind {
        ScalarKind::Integer => Value::from(0i64),
        ScalarKind::Float => Value::from(0.0f64),
        ScalarKind::String => Value::from(""),
        ScalarKind::Boolean => Value::from(false),
        ScalarKind::Array => Value::List(Vec::new()),
        ScalarKind::Mixed => Value::NULL,
    }
}

fn f64_to_i64(value: f64) -> Option<i64> {
    // i64::MAX is not representable as f64; the cast rounds it up to 2^63
    if value.is_finite() && value >= i64::MIN as f64 && value < i64::MAX as f64 {
        Some(value.trunc() as i64)
    } else {
        None
    }
}

fn to_i64(value: &Value) -> Option<i64> {
    match value.as_scalar()? {
        Scalar::I64(v) => Some(*v),
        Scalar::U64(v) => (*v).try_into().ok(),
        Scalar::F64(v) => f64_to_i64(*v),
        Scalar::Bool(b) => Some(i64::from(*b)),
        Scalar::Null => Some(0),
        Scalar::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(f64_to_i64))
        }
    }
}

fn to_f64(value: &Value) -> Option<f64> {
    match value.as_scalar()? {
        Scalar::I64(v) => Some(*v as f64),
        Scalar::U64(v) => Some(*v as f64),
        Scalar::F64(v) => Some(*v),
        Scalar::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Scalar::Null => Some(0.0),
        Scalar::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
    }
}

fn to_text(value: &Value) -> Option<String> {
    match value.as_scalar()? {
        Scalar::String(s) => Some(s.clone()),
        Scalar::I64(v) => Some(v.to_string()),
        Scalar::U64(v) => Some(v.to_string()),
        Scalar::F64(v) => Some(v.to_string()),
        Scalar::Bool(b) => Some(b.to_string()),
        Scalar::Null => Some(String::new()),
    }
}

fn to_bool(value: &Value) -> Option<bool> {
    match value.as_scalar()? {
        Scalar::Bool(b) => Some(*b),
        Scalar::I64(v) => Some(*v != 0),
        Scalar::U64(v) => Some(*v != 0),
        Scalar::F64(v) => Some(*v != 0.0),
        Scalar::Null => Some(false),
        Scalar::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Some(true),
            "false" | "0" | "no" | "off" | "" => Some(false),
            _ => None,
        },
    }
}

fn to_array(value: &Value) -> Value {
    match value {
        Value::List(_) => value.clone(),
        Value::Scalar(Scalar::Null) => Value::List(Vec::new()),
        other => Value::List(vec![other.clone()]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_cast() {
        assert_eq!(cast(ScalarKind::Integer, &"42".into()), Some(42i64.into()));
        assert_eq!(cast(ScalarKind::Integer, &" -7 ".into()), Some((-7i64).into()));
        assert_eq!(cast(ScalarKind::Integer, &"3.9".into()), Some(3i64.into()));
        assert_eq!(cast(ScalarKind::Integer, &(-2.5f64).into()), Some((-2i64).into()));
        assert_eq!(cast(ScalarKind::Integer, &true.into()), Some(1i64.into()));
        assert_eq!(cast(ScalarKind::Integer, &Value::NULL), Some(0i64.into()));
        assert_eq!(cast(ScalarKind::Integer, &"abc".into()), None);
        assert_eq!(cast(ScalarKind::Integer, &u64::MAX.into()), None);
        assert_eq!(cast(ScalarKind::Integer, &f64::NAN.into()), None);
        assert_eq!(cast(ScalarKind::Integer, &1e300f64.into()), None);
        assert_eq!(cast(ScalarKind::Integer, &vec![1i64].into()), None);
    }

    #[test]
    fn float_cast() {
        assert_eq!(cast(ScalarKind::Float, &"2.5".into()), Some(2.5f64.into()));
        assert_eq!(cast(ScalarKind::Float, &3i64.into()), Some(3.0f64.into()));
        assert_eq!(cast(ScalarKind::Float, &"inf".into()), None);
        assert_eq!(cast(ScalarKind::Float, &"x".into()), None);
    }

    #[test]
    fn string_cast() {
        assert_eq!(cast(ScalarKind::String, &12i64.into()), Some("12".into()));
        assert_eq!(cast(ScalarKind::String, &1.5f64.into()), Some("1.5".into()));
        assert_eq!(cast(ScalarKind::String, &false.into()), Some("false".into()));
        assert_eq!(cast(ScalarKind::String, &Value::NULL), Some("".into()));
        assert_eq!(cast(ScalarKind::String, &RawData::new().into()), None);
    }

    #[test]
    fn boolean_cast() {
        assert_eq!(cast(ScalarKind::Boolean, &"Yes".into()), Some(true.into()));
        assert_eq!(cast(ScalarKind::Boolean, &"off".into()), Some(false.into()));
        assert_eq!(cast(ScalarKind::Boolean, &0i64.into()), Some(false.into()));
        assert_eq!(cast(ScalarKind::Boolean, &0.1f64.into()), Some(true.into()));
        assert_eq!(cast(ScalarKind::Boolean, &"maybe".into()), None);
    }

    #[test]
    fn array_cast_wraps_scalars() {
        assert_eq!(cast(ScalarKind::Array, &Value::NULL), Some(Value::List(vec![])));
        assert_eq!(cast(ScalarKind::Array, &5i64.into()), Some(vec![5i64].into()));
        let list = Value::from(vec![1i64, 2]);
        assert_eq!(cast(ScalarKind::Array, &list), Some(list.clone()));
        let map = Value::from(RawData::new().with("a", 1));
        assert_eq!(cast(ScalarKind::Array, &map), Some(Value::List(vec![map.clone()])));
    }

    #[test]
    fn lenient_policy_uses_defaults() {
        let raw = RawData::new();
        let c = Coercion::Cast(ScalarKind::Integer);
        let out = apply(Some(&c), &"abc".into(), &raw, CoercionPolicy::Lenient).unwrap();
        assert_eq!(out, Value::from(0i64));
    }

    #[test]
    fn strict_policy_reports_failure() {
        let raw = RawData::new();
        let c = Coercion::Cast(ScalarKind::Float);
        let err = apply(Some(&c), &"abc".into(), &raw, CoercionPolicy::Strict).unwrap_err();
        assert!(matches!(
            err.kind,
            HydrateErrorKind::InvalidCoercion {
                kind: ScalarKind::Float,
                ..
            }
        ));
    }

    #[test]
    fn overrides_win_when_merging() {
        let base: CoercionMap = [("a", ScalarKind::Integer), ("b", ScalarKind::String)]
            .into_iter()
            .collect();
        let mut overrides = CoercionMap::new();
        overrides.insert("b", ScalarKind::Boolean);
        overrides.insert("c", Coercion::transform(|v, _| v.clone()));

        let merged = CoercionMap::merged(&base, &overrides);
        assert_eq!(merged.len(), 3);
        assert!(matches!(merged.get("a"), Some(Coercion::Cast(ScalarKind::Integer))));
        assert!(matches!(merged.get("b"), Some(Coercion::Cast(ScalarKind::Boolean))));
        assert!(matches!(merged.get("c"), Some(Coercion::Transform(_))));
    }
}
