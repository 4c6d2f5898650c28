//! Named schema variants.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use log::debug;
use owo_colors::OwoColorize;

use crate::{FieldPath, HydrateError, HydrateErrorKind, PathSegment, Schema};

/// The set of variants a hydration run can instantiate, by name.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    schemas: IndexMap<String, Arc<Schema>>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`Registry::register`].
    pub fn with(mut self, schema: Schema) -> Self {
        self.register(schema);
        self
    }

    /// Add a variant, replacing any earlier one of the same name.
    pub fn register(&mut self, schema: Schema) -> Arc<Schema> {
        let schema = Arc::new(schema);
        debug!(
            "Registering variant {} ({} field(s))",
            schema.name().blue(),
            schema.fields().len().yellow()
        );
        self.schemas
            .insert(schema.name().to_string(), Arc::clone(&schema));
        schema
    }

    /// Look a variant up.
    pub fn get(&self, name: &str) -> Option<&Arc<Schema>> {
        self.schemas.get(name)
    }

    /// Look a variant up, failing with [`HydrateErrorKind::UnknownVariant`].
    pub fn require(&self, name: &str) -> Result<&Arc<Schema>, HydrateError> {
        self.get(name).ok_or_else(|| {
            HydrateError::new(HydrateErrorKind::UnknownVariant {
                name: name.to_string(),
            })
        })
    }

    /// Registered variant names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    /// Number of registered variants.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Whether no variant is registered.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Check the whole variant graph before any data flows through it.
    ///
    /// Every variant named by a declared type or an element class must be
    /// registered, and the graph of those references must be acyclic.
    /// Hydration itself neither checks nor needs this; it only turns
    /// misconfiguration into an upfront error instead of a failure halfway
    /// through some input.
    pub fn validate(&self) -> Result<(), HydrateError> {
        for schema in self.schemas.values() {
            for field in schema.fields() {
                for variant in field.referenced_variants() {
                    if !self.schemas.contains_key(variant) {
                        let path: FieldPath = [
                            PathSegment::Field(schema.name().to_string()),
                            PathSegment::Field(field.name().to_string()),
                        ]
                        .into_iter()
                        .collect();
                        return Err(HydrateError::new(HydrateErrorKind::UnknownVariant {
                            name: variant.to_string(),
                        })
                        .at(path));
                    }
                }
            }
        }

        let mut marks = HashMap::new();
        let mut stack = Vec::new();
        for name in self.schemas.keys() {
            self.visit(name, &mut marks, &mut stack)?;
        }
        Ok(())
    }

    fn visit<'a>(
        &'a self,
        name: &'a str,
        marks: &mut HashMap<&'a str, Mark>,
        stack: &mut Vec<&'a str>,
    ) -> Result<(), HydrateError> {
        match marks.get(name) {
            Some(Mark::Done) => return Ok(()),
            Some(Mark::Active) => {
                let start = stack.iter().position(|n| *n == name).unwrap_or(0);
                let mut cycle: Vec<String> = stack[start..].iter().map(|n| n.to_string()).collect();
                cycle.push(name.to_string());
                return Err(HydrateError::new(HydrateErrorKind::CyclicSchema { cycle }));
            }
            None => {}
        }

        marks.insert(name, Mark::Active);
        stack.push(name);
        if let Some(schema) = self.schemas.get(name) {
            for field in schema.fields() {
                for next in field.referenced_variants() {
                    self.visit(next, marks, stack)?;
                }
            }
        }
        stack.pop();
        marks.insert(name, Mark::Done);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Active,
    Done,
}
