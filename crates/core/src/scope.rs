// SPDX-License-Identifier: MIT

//! The `Scope` capability value.
//!
//! Global, group, and command expansion share one pipeline shape but differ
//! in a handful of rules: which case a user var name must start with,
//! whether `env_allowed = None` inherits from a parent or rejects
//! everything, and what extra auto-var bindings get injected. Rather than
//! modelling that as an inheritance hierarchy, each stage is handed a
//! `Scope` value describing its own position, and the shared expansion code
//! branches on it in the one place that needs to.

use std::fmt;

/// Which tier of the three-tier scope model an expansion is running at.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    Global,
    Group { name: String },
    Command { group: String, command: String },
    /// A `CommandTemplate` definition, validated once against
    /// `RuntimeGlobal` before any group/command exists. Not one of the
    /// three lexical-scoping tiers — templates can't declare their own
    /// `vars`/`env` — but expansion errors raised while scanning a
    /// template's fields still need a `Scope` to report.
    Template { name: String },
}

impl Scope {
    /// `true` for [`Scope::Global`] — global user var names must start
    /// uppercase; group/command names must start lowercase.
    pub fn is_global(&self) -> bool {
        matches!(self, Scope::Global)
    }

    /// Whether `env_allowed = None` at this scope means "inherit the
    /// parent's effective allowlist" or "reject everything".
    ///
    /// Global has no parent, so `None` there is always a reject. Group
    /// and command scopes inherit from their parent.
    pub fn absent_allowlist_inherits(&self) -> bool {
        !self.is_global()
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Global => write!(f, "global"),
            Scope::Group { name } => write!(f, "group:{name}"),
            Scope::Command { group, command } => write!(f, "group:{group}.command:{command}"),
            Scope::Template { name } => write!(f, "template:{name}"),
        }
    }
}

#[cfg(test)]
#[path = "scope_tests.rs"]
mod tests;
