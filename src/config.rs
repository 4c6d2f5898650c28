//! Knobs for the hydration engine.

/// What a failed scalar cast does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoercionPolicy {
    /// Assign the target kind's default value (`0`, `0.0`, `""`, `false`).
    #[default]
    Lenient,
    /// Abort hydration with [`HydrateErrorKind::InvalidCoercion`](crate::HydrateErrorKind::InvalidCoercion).
    Strict,
}

/// How an explicit `null` under a field's source key is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NullPolicy {
    /// A null counts as a missing key and the field stays unset.
    #[default]
    Absent,
    /// A null is a present value and goes through resolution and coercion.
    Present,
}

/// Configuration shared by every object of one hydration run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HydrateConfig {
    /// Failed cast behavior.
    pub coercion: CoercionPolicy,
    /// Null handling.
    pub nulls: NullPolicy,
}

impl HydrateConfig {
    /// Lenient casts, nulls treated as absent.
    pub const fn new() -> Self {
        Self {
            coercion: CoercionPolicy::Lenient,
            nulls: NullPolicy::Absent,
        }
    }

    /// Set the coercion policy.
    pub const fn coercion_policy(mut self, policy: CoercionPolicy) -> Self {
        self.coercion = policy;
        self
    }

    /// Set the null policy.
    pub const fn null_policy(mut self, policy: NullPolicy) -> Self {
        self.nulls = policy;
        self
    }

    /// Shorthand for [`CoercionPolicy::Strict`].
    pub const fn strict(self) -> Self {
        self.coercion_policy(CoercionPolicy::Strict)
    }
}
