//! The hydrated node type.

use core::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::{Coercion, CoercionMap, HydrateError, Hydrator, RawData, Scalar, Schema, Value};

/// A hydrated field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// A scalar, or any raw value held as-is, after coercion.
    Value(Value),
    /// A nested typed object.
    Object(Box<TypedObject>),
    /// A collection field's objects, in input order.
    Objects(Vec<TypedObject>),
}

impl FieldValue {
    /// The plain value, if this is one.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            FieldValue::Value(v) => Some(v),
            _ => None,
        }
    }

    /// The nested object, if this is one.
    pub fn as_object(&self) -> Option<&TypedObject> {
        match self {
            FieldValue::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// The collection elements, if this is a collection.
    pub fn as_objects(&self) -> Option<&[TypedObject]> {
        match self {
            FieldValue::Objects(objs) => Some(objs),
            _ => None,
        }
    }
}

/// An object of some schema variant, built from a raw mapping.
///
/// The raw mapping is kept untouched next to the hydrated fields for the
/// whole life of the object. Cloning deep-copies the hydrated tree, so two
/// objects never share a nested instance; only the read-only [`Schema`] is
/// shared.
#[derive(Debug, Clone)]
pub struct TypedObject {
    schema: Arc<Schema>,
    raw: RawData,
    coercions: CoercionMap,
    fields: IndexMap<String, FieldValue>,
    hydrated: bool,
}

impl TypedObject {
    /// Wrap `raw` as an object of `schema`. Nothing is hydrated yet.
    pub fn new(schema: Arc<Schema>, raw: RawData) -> Self {
        Self {
            schema,
            raw,
            coercions: CoercionMap::new(),
            fields: IndexMap::new(),
            hydrated: false,
        }
    }

    /// Construct, then hydrate with `hydrator`.
    pub fn create(
        schema: Arc<Schema>,
        raw: RawData,
        hydrator: &Hydrator<'_>,
    ) -> Result<Self, HydrateError> {
        let mut obj = Self::new(schema, raw);
        hydrator.hydrate(&mut obj)?;
        Ok(obj)
    }

    /// Add an instance-level coercion for `field`, overriding the schema's.
    ///
    /// Hydration reads coercions once, so entries added to an object that is
    /// already hydrated show up in [`TypedObject::coercion_map`] but leave its
    /// fields as they are.
    pub fn with_coercion(mut self, field: impl Into<String>, coercion: impl Into<Coercion>) -> Self {
        self.coercions.insert(field, coercion);
        self
    }

    /// The original input, exactly as given.
    pub fn raw(&self) -> &RawData {
        &self.raw
    }

    /// Name of the schema variant.
    pub fn variant(&self) -> &str {
        self.schema.name()
    }

    /// The schema this object was built against.
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Whether hydration already ran on this object.
    pub fn is_hydrated(&self) -> bool {
        self.hydrated
    }

    /// Hydrated value of `field`, `None` if it was left unset.
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Whether `field` received a value.
    pub fn is_set(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Plain value of `field`.
    pub fn value(&self, field: &str) -> Option<&Value> {
        self.get(field).and_then(FieldValue::as_value)
    }

    /// Nested object of `field`.
    pub fn object(&self, field: &str) -> Option<&TypedObject> {
        self.get(field).and_then(FieldValue::as_object)
    }

    /// Objects of collection `field`.
    pub fn objects(&self, field: &str) -> Option<&[TypedObject]> {
        self.get(field).and_then(FieldValue::as_objects)
    }

    /// Populated fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Raw key `field` is read from.
    pub fn source_key<'a>(&'a self, field: &'a str) -> &'a str {
        self.schema.field(field).map_or(field, |f| f.source_key())
    }

    /// Element variant of collection `field`.
    pub fn element_class(&self, field: &str) -> Option<&str> {
        self.schema.field(field).and_then(|f| f.element_variant())
    }

    /// Effective coercion of `field`: the instance entry if there is one,
    /// else the schema's.
    pub fn coercion(&self, field: &str) -> Option<&Coercion> {
        self.coercions
            .get(field)
            .or_else(|| self.schema.field(field).and_then(|f| f.coercion()))
    }

    /// Fields read from a raw key other than their own name.
    pub fn rename_map(&self) -> IndexMap<&str, &str> {
        self.schema.rename_map()
    }

    /// Collection fields and their element variants.
    pub fn element_class_map(&self) -> IndexMap<&str, &str> {
        self.schema.element_class_map()
    }

    /// Schema coercions with the instance's own entries laid over them.
    pub fn coercion_map(&self) -> CoercionMap {
        CoercionMap::merged(&self.schema.coercion_map(), &self.coercions)
    }

    pub(crate) fn finish(&mut self, fields: IndexMap<String, FieldValue>) {
        self.fields = fields;
        self.hydrated = true;
    }
}

/// Structural equality: same variant, same raw input, same hydrated fields in
/// the same order. Instance coercions are not compared.
impl PartialEq for TypedObject {
    fn eq(&self, other: &Self) -> bool {
        self.variant() == other.variant()
            && self.hydrated == other.hydrated
            && self.raw == other.raw
            && self.fields.len() == other.fields.len()
            && self.fields.iter().eq(other.fields.iter())
    }
}

fn write_value(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
    match value {
        Value::Scalar(Scalar::String(s)) => write!(f, "{s:?}"),
        Value::Scalar(Scalar::I64(v)) => write!(f, "{v}"),
        Value::Scalar(Scalar::U64(v)) => write!(f, "{v}"),
        Value::Scalar(Scalar::F64(v)) => write!(f, "{v:?}"),
        Value::Scalar(Scalar::Bool(v)) => write!(f, "{v}"),
        Value::Scalar(Scalar::Null) => write!(f, "null"),
        Value::Map(map) => {
            write!(f, "{{")?;
            for (i, (k, v)) in map.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{k:?}: ")?;
                write_value(f, v)?;
            }
            write!(f, "}}")
        }
        Value::List(items) => {
            write!(f, "[")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write_value(f, item)?;
            }
            write!(f, "]")
        }
        Value::Object(obj) => write!(f, "{obj}"),
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Value(v) => write_value(f, v),
            FieldValue::Object(obj) => write!(f, "{obj}"),
            FieldValue::Objects(objs) => {
                write!(f, "[")?;
                for (i, obj) in objs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{obj}")?;
                }
                write!(f, "]")
            }
        }
    }
}

/// Compact one-line rendering of the hydrated fields, e.g.
/// `Order { id: 7, lines: [Line { sku: "A" }] }`.
impl fmt::Display for TypedObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.variant())?;
        if self.fields.is_empty() {
            return write!(f, " {{}}");
        }
        write!(f, " {{ ")?;
        for (i, (name, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}: {value}")?;
        }
        write!(f, " }}")
    }
}
