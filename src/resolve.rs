//! Picking the concrete type of a field from its declared type.

use crate::{DeclaredType, TypeTag, Value};

/// Pick the tag a field should be hydrated as, given the raw value found for it.
///
/// A single declared tag is returned as-is. For a union, only the shape of
/// `value` matters: a structured value (mapping, list, prebuilt object)
/// takes the first object tag, a scalar takes the first built-in tag, both
/// in declaration order. Returns `None` for untyped fields and for unions
/// with no member of the right shape.
pub fn resolve_type<'a>(declared: &'a DeclaredType, value: &Value) -> Option<&'a TypeTag> {
    match declared {
        DeclaredType::Untyped => None,
        DeclaredType::Single(tag) => Some(tag),
        DeclaredType::Union(tags) => {
            let want_object = value.is_structured();
            tags.iter().find(|tag| tag.is_object() == want_object)
        }
    }
}
