// SPDX-License-Identifier: MIT

//! Env-var allowlist resolution: the three-state `env_allowed` field
//! (absent / empty / explicit names) combines with a parent scope's
//! already-resolved allowlist to produce the effective set of importable
//! system env var names at each scope.

use indexmap::IndexSet;

/// The resolved inheritance mode for a scope's `env_allowed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Allowlist {
    /// `env_allowed` absent: inherit the parent's resolved set unchanged.
    /// At global scope (no parent) this degrades to `Reject`, since there
    /// is nothing to inherit from.
    Inherit,
    /// `env_allowed = []`: explicitly allow nothing, regardless of parent.
    Reject,
    /// `env_allowed = [...]`: exactly these names, regardless of parent.
    Explicit(IndexSet<String>),
}

impl Allowlist {
    /// Classifies a scope's raw `env_allowed: Option<Vec<String>>` field.
    pub fn from_field(field: &Option<Vec<String>>, allows_inherit: bool) -> Self {
        match field {
            None if allows_inherit => Allowlist::Inherit,
            None => Allowlist::Reject,
            Some(names) if names.is_empty() => Allowlist::Reject,
            Some(names) => Allowlist::Explicit(names.iter().cloned().collect()),
        }
    }

    /// Resolves this scope's effective allowlist against its parent's
    /// already-resolved one.
    pub fn resolve(&self, parent: &IndexSet<String>) -> IndexSet<String> {
        match self {
            Allowlist::Inherit => parent.clone(),
            Allowlist::Reject => IndexSet::new(),
            Allowlist::Explicit(names) => names.clone(),
        }
    }

    pub fn is_allowed(name: &str, effective: &IndexSet<String>) -> bool {
        effective.contains(name)
    }
}

#[cfg(test)]
#[path = "allowlist_tests.rs"]
mod tests;
