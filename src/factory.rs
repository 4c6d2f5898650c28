use crate::{HydrateError, HydrateErrorKind, PathSegment, RawData, TypedObject, Value};

/// Builds nested typed objects on behalf of the engine.
///
/// Implementations must return fully hydrated objects. [`Hydrator`](crate::Hydrator)
/// is the registry-backed implementation; a custom factory can wrap it to
/// intercept or count nested constructions.
pub trait InstanceFactory {
    /// Build one hydrated object of `variant` from `raw`.
    fn build_one(&self, variant: &str, raw: &RawData) -> Result<TypedObject, HydrateError>;

    /// Build one hydrated object of `variant` per element of `items`, in order.
    ///
    /// Mapping elements go through [`InstanceFactory::build_one`]. A prebuilt
    /// object element of `variant` is cloned as-is; one of another variant is a
    /// [`HydrateErrorKind::VariantMismatch`]. Any other element is a
    /// [`HydrateErrorKind::MalformedShape`]. Errors are located at the
    /// element's index.
    fn build_many(&self, variant: &str, items: &[Value]) -> Result<Vec<TypedObject>, HydrateError> {
        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                match item {
                    Value::Map(raw) => self.build_one(variant, raw),
                    Value::Object(prebuilt) => reuse_prebuilt(variant, prebuilt),
                    other => Err(HydrateError::new(HydrateErrorKind::MalformedShape {
                        expected: "mapping",
                        found: other.to_string(),
                    })),
                }
                .map_err(|e| e.nest(PathSegment::Index(index)))
            })
            .collect()
    }
}

/// Clone a prebuilt object, provided it is of `variant`.
pub(crate) fn reuse_prebuilt(
    variant: &str,
    prebuilt: &TypedObject,
) -> Result<TypedObject, HydrateError> {
    if prebuilt.variant() != variant {
        return Err(HydrateError::new(HydrateErrorKind::VariantMismatch {
            expected: variant.to_string(),
            found: prebuilt.variant().to_string(),
        }));
    }
    Ok(prebuilt.clone())
}
