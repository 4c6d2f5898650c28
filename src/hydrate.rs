//! The hydration engine.

use std::sync::Arc;

use indexmap::IndexMap;
use log::{debug, trace};
use owo_colors::OwoColorize;

use crate::{
    FieldSchema, FieldValue, HydrateConfig, HydrateError, HydrateErrorKind, InstanceFactory,
    NullPolicy, PathSegment, RawData, Registry, TypeTag, TypedObject, Value, coerce,
    resolve_type,
};
use crate::factory::reuse_prebuilt;

/// Populate every declared field of `target` from its raw mapping.
///
/// Fields whose source key is missing, or whose union has no member of the
/// right shape, are skipped silently. Nested objects and collections are
/// built through `factory`. On error `target` is left unhydrated: either
/// every field is assigned or none is.
///
/// Calling this on an object that is already hydrated does nothing.
pub fn hydrate(
    target: &mut TypedObject,
    factory: &dyn InstanceFactory,
    config: &HydrateConfig,
) -> Result<(), HydrateError> {
    if target.is_hydrated() {
        trace!("{} is already hydrated, skipping", target.variant().blue());
        return Ok(());
    }

    let schema = Arc::clone(target.schema());
    debug!(
        "Hydrating {} from {} raw key(s)",
        schema.name().blue(),
        target.raw().len().yellow()
    );

    let mut fields = IndexMap::with_capacity(schema.fields().len());
    for field in schema.fields() {
        let value = hydrate_field(target, field, factory, config)
            .map_err(|e| e.nest(PathSegment::Field(field.name().to_string())))?;
        if let Some(value) = value {
            fields.insert(field.name().to_string(), value);
        }
    }

    trace!(
        "{} done: {} of {} field(s) set",
        schema.name().blue(),
        fields.len().green(),
        schema.fields().len()
    );
    target.finish(fields);
    Ok(())
}

fn hydrate_field(
    target: &TypedObject,
    field: &FieldSchema,
    factory: &dyn InstanceFactory,
    config: &HydrateConfig,
) -> Result<Option<FieldValue>, HydrateError> {
    let name = field.name();
    let key = target.source_key(name);

    let Some(value) = target.raw().get(key) else {
        trace!("Field {}: key {} absent", name.green(), key.yellow());
        return Ok(None);
    };
    if value.is_null() && config.nulls == NullPolicy::Absent {
        trace!("Field {}: key {} is null", name.green(), key.yellow());
        return Ok(None);
    }

    let Some(tag) = resolve_type(field.declared_type(), value) else {
        trace!(
            "Field {}: {} matches nothing in {}",
            name.green(),
            value.yellow(),
            field.declared_type().blue()
        );
        return Ok(None);
    };
    trace!("Field {} resolved to {}", name.green(), tag.blue());

    match tag {
        TypeTag::Object(variant) => {
            if let Some(element) = target.element_class(name) {
                let items = expect_list(value)?;
                return Ok(Some(FieldValue::Objects(factory.build_many(element, items)?)));
            }
            if let Value::Object(prebuilt) = value {
                trace!("Field {}: using prebuilt {}", name.green(), prebuilt.variant().blue());
                let obj = reuse_prebuilt(variant, prebuilt)?;
                return Ok(Some(FieldValue::Object(Box::new(obj))));
            }
            let raw = expect_map(value)?;
            let obj = factory.build_one(variant, raw)?;
            Ok(Some(FieldValue::Object(Box::new(obj))))
        }
        TypeTag::Scalar(_) => {
            let coerced = coerce::apply(
                target.coercion(name),
                value,
                target.raw(),
                config.coercion,
            )?;
            match target.element_class(name) {
                Some(element) => {
                    // A coercion that yields no list leaves a list input as it was.
                    let items = match coerced.as_list() {
                        Some(items) => items,
                        None => {
                            trace!(
                                "Field {}: coerced to {}, building from the raw value",
                                name.green(),
                                coerced.yellow()
                            );
                            expect_list(value)?
                        }
                    };
                    Ok(Some(FieldValue::Objects(factory.build_many(element, items)?)))
                }
                None => Ok(Some(FieldValue::Value(coerced))),
            }
        }
    }
}

fn expect_list(value: &Value) -> Result<&[Value], HydrateError> {
    value.as_list().ok_or_else(|| {
        HydrateError::new(HydrateErrorKind::MalformedShape {
            expected: "list",
            found: value.to_string(),
        })
    })
}

fn expect_map(value: &Value) -> Result<&RawData, HydrateError> {
    value.as_map().ok_or_else(|| {
        HydrateError::new(HydrateErrorKind::MalformedShape {
            expected: "mapping",
            found: value.to_string(),
        })
    })
}

/// Registry-backed engine: hydrates objects and builds their nested
/// objects by looking variants up by name.
#[derive(Debug, Clone, Copy)]
pub struct Hydrator<'r> {
    registry: &'r Registry,
    config: HydrateConfig,
}

impl<'r> Hydrator<'r> {
    /// A hydrator with the default configuration.
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            config: HydrateConfig::default(),
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: HydrateConfig) -> Self {
        self.config = config;
        self
    }

    /// The registry variants are looked up in.
    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// The active configuration.
    pub fn config(&self) -> &HydrateConfig {
        &self.config
    }

    /// Hydrate `target` in place, building nested objects through `self`.
    pub fn hydrate(&self, target: &mut TypedObject) -> Result<(), HydrateError> {
        hydrate(target, self, &self.config)
    }

    /// Construct an object of `variant` around `raw` and hydrate it.
    pub fn create(&self, variant: &str, raw: RawData) -> Result<TypedObject, HydrateError> {
        let schema = self.registry.require(variant)?;
        TypedObject::create(Arc::clone(schema), raw, self)
    }
}

impl InstanceFactory for Hydrator<'_> {
    fn build_one(&self, variant: &str, raw: &RawData) -> Result<TypedObject, HydrateError> {
        self.create(variant, raw.clone())
    }
}
