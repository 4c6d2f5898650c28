use core::fmt::{self, Display};

use crate::{FieldPath, PathSegment, ScalarKind};

/// Error type for hydration.
///
/// Only schema misconfiguration and caller contract violations end up here.
/// Absent keys and unions that match nothing are not errors: the field is
/// simply left unset.
#[derive(Debug, Clone, PartialEq)]
pub struct HydrateError {
    /// The specific kind of error
    pub kind: HydrateErrorKind,
    /// Where in the tree it happened, relative to the object being hydrated
    pub path: FieldPath,
}

impl HydrateError {
    /// Create an error located at the root of the current object.
    pub fn new(kind: HydrateErrorKind) -> Self {
        HydrateError {
            kind,
            path: FieldPath::root(),
        }
    }

    /// Set the location of the error.
    pub fn at(mut self, path: FieldPath) -> Self {
        self.path = path;
        self
    }

    /// Record that the error happened one level further down, under `segment`.
    pub fn nest(mut self, segment: PathSegment) -> Self {
        self.path.prepend(segment);
        self
    }
}

impl Display for HydrateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{} (at `{}`)", self.kind, self.path)
        }
    }
}

impl std::error::Error for HydrateError {}

impl miette::Diagnostic for HydrateError {
    fn code<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
        Some(Box::new(self.kind.code()))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
        self.kind.help().map(|h| Box::new(h) as Box<dyn Display + 'a>)
    }
}

/// Specific error kinds for hydration
#[derive(Debug, Clone, PartialEq)]
pub enum HydrateErrorKind {
    /// A declared type or element class names a variant nobody registered
    UnknownVariant {
        /// The missing variant name
        name: String,
    },
    /// The raw value does not have the shape the schema requires
    MalformedShape {
        /// What the schema needed ("mapping", "list")
        expected: &'static str,
        /// Description of what was found instead
        found: String,
    },
    /// A prebuilt object is of a different variant than the field declares
    VariantMismatch {
        /// Variant the field or collection requires
        expected: String,
        /// Variant of the prebuilt object
        found: String,
    },
    /// A cast failed under the strict coercion policy
    InvalidCoercion {
        /// Target kind of the cast
        kind: ScalarKind,
        /// Description of the value that could not be cast
        found: String,
    },
    /// The variant graph loops back on itself
    CyclicSchema {
        /// Variant names along the cycle, first one repeated at the end
        cycle: Vec<String>,
    },
}

impl HydrateErrorKind {
    /// Stable diagnostic code.
    pub fn code(&self) -> &'static str {
        match self {
            HydrateErrorKind::UnknownVariant { .. } => "shape_hydrate::unknown_variant",
            HydrateErrorKind::MalformedShape { .. } => "shape_hydrate::malformed_shape",
            HydrateErrorKind::VariantMismatch { .. } => "shape_hydrate::variant_mismatch",
            HydrateErrorKind::InvalidCoercion { .. } => "shape_hydrate::invalid_coercion",
            HydrateErrorKind::CyclicSchema { .. } => "shape_hydrate::cyclic_schema",
        }
    }

    fn help(&self) -> Option<&'static str> {
        match self {
            HydrateErrorKind::UnknownVariant { .. } => {
                Some("register a schema under this name before hydrating")
            }
            HydrateErrorKind::MalformedShape { .. } => None,
            HydrateErrorKind::VariantMismatch { .. } => {
                Some("pass a raw mapping instead, or a prebuilt object of the declared variant")
            }
            HydrateErrorKind::InvalidCoercion { .. } => {
                Some("use the lenient coercion policy to fall back to the kind's default value")
            }
            HydrateErrorKind::CyclicSchema { .. } => {
                Some("hydration is a plain recursive descent; break the cycle in the schema")
            }
        }
    }
}

impl Display for HydrateErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HydrateErrorKind::UnknownVariant { name } => write!(f, "unknown variant `{name}`"),
            HydrateErrorKind::MalformedShape { expected, found } => {
                write!(f, "expected a {expected}, found {found}")
            }
            HydrateErrorKind::VariantMismatch { expected, found } => {
                write!(f, "expected a prebuilt `{expected}`, found a prebuilt `{found}`")
            }
            HydrateErrorKind::InvalidCoercion { kind, found } => {
                write!(f, "cannot cast {found} to {kind}")
            }
            HydrateErrorKind::CyclicSchema { cycle } => {
                write!(f, "variant graph has a cycle: {}", cycle.join(" -> "))
            }
        }
    }
}
