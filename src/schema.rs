//! Static field descriptor tables for typed object variants.

use core::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::{CoercionMap, RawData, Value};

/// Built-in kinds a field can be declared as, or cast to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// Signed 64-bit integer.
    Integer,
    /// 64-bit float.
    Float,
    /// String.
    String,
    /// Boolean.
    Boolean,
    /// A list or mapping held as-is, without building typed objects from it.
    Array,
    /// Anything at all.
    Mixed,
}

impl ScalarKind {
    /// Look a kind up by one of its conventional names (`int`, `integer`,
    /// `float`, `double`, `string`, `bool`, `boolean`, `array`, `mixed`).
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name.to_ascii_lowercase().as_str() {
            "int" | "integer" => ScalarKind::Integer,
            "float" | "double" => ScalarKind::Float,
            "string" => ScalarKind::String,
            "bool" | "boolean" => ScalarKind::Boolean,
            "array" => ScalarKind::Array,
            "mixed" => ScalarKind::Mixed,
            _ => return None,
        })
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScalarKind::Integer => "integer",
            ScalarKind::Float => "float",
            ScalarKind::String => "string",
            ScalarKind::Boolean => "boolean",
            ScalarKind::Array => "array",
            ScalarKind::Mixed => "mixed",
        })
    }
}

/// One concrete type a field may hold.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// A built-in kind, assigned after coercion.
    Scalar(ScalarKind),
    /// A typed object variant, registered under this name.
    Object(String),
}

impl TypeTag {
    /// Shorthand for [`TypeTag::Object`].
    pub fn object(variant: impl Into<String>) -> Self {
        TypeTag::Object(variant.into())
    }

    /// Whether this tag names a typed object variant.
    pub fn is_object(&self) -> bool {
        matches!(self, TypeTag::Object(_))
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Scalar(kind) => write!(f, "{kind}"),
            TypeTag::Object(variant) => write!(f, "{variant}"),
        }
    }
}

impl From<ScalarKind> for TypeTag {
    fn from(kind: ScalarKind) -> Self {
        TypeTag::Scalar(kind)
    }
}

/// The declared type of a field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DeclaredType {
    /// No type was declared; such a field is never populated.
    #[default]
    Untyped,
    /// Exactly one type.
    Single(TypeTag),
    /// One of several types, in declaration order.
    Union(Vec<TypeTag>),
}

impl DeclaredType {
    /// A single built-in kind.
    pub fn scalar(kind: ScalarKind) -> Self {
        DeclaredType::Single(TypeTag::Scalar(kind))
    }

    /// A single typed object variant.
    pub fn object(variant: impl Into<String>) -> Self {
        DeclaredType::Single(TypeTag::object(variant))
    }

    /// A union of tags; member order decides which one wins.
    pub fn union<I, T>(members: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TypeTag>,
    {
        DeclaredType::Union(members.into_iter().map(Into::into).collect())
    }

    /// All tags this type can resolve to.
    pub fn tags(&self) -> &[TypeTag] {
        match self {
            DeclaredType::Untyped => &[],
            DeclaredType::Single(tag) => core::slice::from_ref(tag),
            DeclaredType::Union(tags) => tags,
        }
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclaredType::Untyped => write!(f, "<untyped>"),
            DeclaredType::Single(tag) => write!(f, "{tag}"),
            DeclaredType::Union(tags) => {
                for (i, tag) in tags.iter().enumerate() {
                    if i > 0 {
                        write!(f, "|")?;
                    }
                    write!(f, "{tag}")?;
                }
                Ok(())
            }
        }
    }
}

/// Signature of a transform coercion: the raw value of the field and the
/// whole raw mapping of the object it belongs to.
pub type TransformFn = dyn Fn(&Value, &RawData) -> Value + Send + Sync;

/// A per-field adjustment applied before a scalar value is assigned.
#[derive(Clone)]
pub enum Coercion {
    /// Best-effort cast to a built-in kind.
    Cast(ScalarKind),
    /// Arbitrary function; its result is assigned verbatim.
    Transform(Arc<TransformFn>),
}

impl Coercion {
    /// Wrap a closure as a transform coercion.
    pub fn transform<F>(f: F) -> Self
    where
        F: Fn(&Value, &RawData) -> Value + Send + Sync + 'static,
    {
        Coercion::Transform(Arc::new(f))
    }
}

impl fmt::Debug for Coercion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coercion::Cast(kind) => f.debug_tuple("Cast").field(kind).finish(),
            Coercion::Transform(_) => f.write_str("Transform(<fn>)"),
        }
    }
}

impl From<ScalarKind> for Coercion {
    fn from(kind: ScalarKind) -> Self {
        Coercion::Cast(kind)
    }
}

/// Descriptor of one declared field.
#[derive(Debug, Clone)]
pub struct FieldSchema {
    name: String,
    ty: DeclaredType,
    source_key: Option<String>,
    element_class: Option<String>,
    coercion: Option<Coercion>,
}

impl FieldSchema {
    /// A field read from the raw key of the same name.
    pub fn new(name: impl Into<String>, ty: DeclaredType) -> Self {
        Self {
            name: name.into(),
            ty,
            source_key: None,
            element_class: None,
            coercion: None,
        }
    }

    /// Read this field from a differently named raw key.
    pub fn rename(mut self, source_key: impl Into<String>) -> Self {
        self.source_key = Some(source_key.into());
        self
    }

    /// Declare the field as a sequence of `variant` objects.
    pub fn element_class(mut self, variant: impl Into<String>) -> Self {
        self.element_class = Some(variant.into());
        self
    }

    /// Attach a coercion at the variant level.
    pub fn coerce(mut self, coercion: impl Into<Coercion>) -> Self {
        self.coercion = Some(coercion.into());
        self
    }

    /// Declared field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type.
    pub fn declared_type(&self) -> &DeclaredType {
        &self.ty
    }

    /// Raw key the field is read from.
    pub fn source_key(&self) -> &str {
        self.source_key.as_deref().unwrap_or(&self.name)
    }

    /// Element variant, for collection fields.
    pub fn element_variant(&self) -> Option<&str> {
        self.element_class.as_deref()
    }

    /// Variant-level coercion, if any.
    pub fn coercion(&self) -> Option<&Coercion> {
        self.coercion.as_ref()
    }

    /// Every variant name this field can make the engine instantiate.
    pub fn referenced_variants(&self) -> impl Iterator<Item = &str> {
        self.ty
            .tags()
            .iter()
            .filter_map(|tag| match tag {
                TypeTag::Object(variant) => Some(variant.as_str()),
                TypeTag::Scalar(_) => None,
            })
            .chain(self.element_class.as_deref())
    }
}

/// Field table of one typed object variant.
#[derive(Debug, Clone)]
pub struct Schema {
    name: String,
    fields: IndexMap<String, FieldSchema>,
}

impl Schema {
    /// Start describing a variant.
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            fields: IndexMap::new(),
        }
    }

    /// Variant name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared fields, in declaration order.
    pub fn fields(&self) -> impl ExactSizeIterator<Item = &FieldSchema> {
        self.fields.values()
    }

    /// Descriptor of a declared field.
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.get(name)
    }

    /// Fields read from a raw key other than their own name.
    pub fn rename_map(&self) -> IndexMap<&str, &str> {
        self.fields
            .values()
            .filter_map(|f| f.source_key.as_deref().map(|key| (f.name(), key)))
            .collect()
    }

    /// Collection fields and their element variants.
    pub fn element_class_map(&self) -> IndexMap<&str, &str> {
        self.fields
            .values()
            .filter_map(|f| f.element_variant().map(|variant| (f.name(), variant)))
            .collect()
    }

    /// Variant-level coercion table.
    pub fn coercion_map(&self) -> CoercionMap {
        self.fields
            .values()
            .filter_map(|f| f.coercion().map(|c| (f.name().to_string(), c.clone())))
            .collect()
    }
}

/// Builder for [`Schema`].
#[derive(Debug)]
pub struct SchemaBuilder {
    name: String,
    fields: IndexMap<String, FieldSchema>,
}

impl SchemaBuilder {
    /// Declare a field. Redeclaring a name replaces the earlier descriptor
    /// but keeps its position.
    pub fn field(mut self, field: FieldSchema) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }

    /// Shorthand for a field of a single built-in kind.
    pub fn scalar(self, name: impl Into<String>, kind: ScalarKind) -> Self {
        self.field(FieldSchema::new(name, DeclaredType::scalar(kind)))
    }

    /// Shorthand for a field holding one nested object.
    pub fn object(self, name: impl Into<String>, variant: impl Into<String>) -> Self {
        self.field(FieldSchema::new(name, DeclaredType::object(variant)))
    }

    /// Shorthand for a field holding a sequence of nested objects.
    pub fn collection(self, name: impl Into<String>, variant: impl Into<String>) -> Self {
        self.field(
            FieldSchema::new(name, DeclaredType::scalar(ScalarKind::Array)).element_class(variant),
        )
    }

    /// Finish the table.
    pub fn build(self) -> Schema {
        Schema {
            name: self.name,
            fields: self.fields,
        }
    }
}
