// SPDX-License-Identifier: MIT

//! Three-state "absent vs. explicitly set" fields.
//!
//! `workdir`, `output_file`, and `timeout` can each be left unset at a
//! template/group level and overridden (possibly to an empty value) at a
//! more specific level. Modelling that as a bare `Option<T>` works for
//! storage but invites the override rule ("command wins when set, else
//! inherit") to be re-implemented ad hoc at each call site; `Overridable`
//! carries the rule as a method instead.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overridable<T> {
    Unset,
    Explicit(T),
}

impl<T> Default for Overridable<T> {
    fn default() -> Self {
        Overridable::Unset
    }
}

impl<T> Overridable<T> {
    /// Resolve an override: `self` wins when explicitly set, otherwise
    /// fall back to `parent`.
    pub fn resolve(self, parent: Overridable<T>) -> Overridable<T> {
        match self {
            Overridable::Explicit(v) => Overridable::Explicit(v),
            Overridable::Unset => parent,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Overridable::Explicit(v) => Some(v),
            Overridable::Unset => None,
        }
    }

    pub fn as_ref(&self) -> Overridable<&T> {
        match self {
            Overridable::Explicit(v) => Overridable::Explicit(v),
            Overridable::Unset => Overridable::Unset,
        }
    }

    pub fn is_explicit(&self) -> bool {
        matches!(self, Overridable::Explicit(_))
    }
}

impl<'de, T> Deserialize<'de> for Overridable<T>
where
    T: Deserialize<'de>,
{
    /// Deserializes the same way `T` would. Combined with `#[serde(default)]`
    /// on the containing field, a missing TOML key yields `Unset` (via
    /// `Default`) while a present key yields `Explicit(value)` — so the
    /// three states map onto "key absent" / "key present with empty value"
    /// / "key present with a value", not onto a nested `Option<Option<T>>`.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        T::deserialize(deserializer).map(Overridable::Explicit)
    }
}

impl<T> Serialize for Overridable<T>
where
    T: Serialize,
{
    /// Mirrors [`Deserialize`]: `Unset` serializes as `null`, `Explicit(v)`
    /// serializes as `v` would on its own. There is no round-trip back to
    /// `Unset` through this path (TOML has no `null`) — serialization here
    /// exists so containing structs can derive `Serialize` for diagnostics
    /// and test fixtures, not to re-emit a loadable config.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Overridable::Explicit(v) => v.serialize(serializer),
            Overridable::Unset => serializer.serialize_none(),
        }
    }
}

#[cfg(test)]
#[path = "overridable_tests.rs"]
mod tests;
