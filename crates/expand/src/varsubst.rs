// SPDX-License-Identifier: MIT

//! The `%{NAME}` variable-substitution engine.
//!
//! A hand-rolled character scanner rather than a regex-based replace:
//! recursive depth tracking and the distinct `UndefinedVariable` /
//! `UnclosedVariableReference` diagnostics this grammar requires aren't
//! expressible cleanly through a single `replace_all` pass.

use indexmap::IndexMap;
use rcr_core::{Scope, MAX_EXPANSION_DEPTH};

/// A resolved error from `%{}` substitution, tagged with the scope and
/// variable name it occurred in.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VarSubstError {
    #[error("{scope}: variable '{name}' references itself or an undefined variable")]
    UndefinedVariable { scope: Scope, name: String },

    #[error("{scope}: unclosed '%{{' in value of '{name}'")]
    UnclosedVariableReference { scope: Scope, name: String },

    #[error("{scope}: empty variable name in '%{{}}' within '{name}'")]
    InvalidVariableName { scope: Scope, name: String },

    #[error("{scope}: invalid escape sequence '\\{ch}' in value of '{name}'")]
    InvalidEscapeSequence { scope: Scope, name: String, ch: char },

    #[error("{scope}: variable '{name}' exceeds max expansion depth ({MAX_EXPANSION_DEPTH})")]
    MaxRecursionDepthExceeded { scope: Scope, name: String },
}

impl VarSubstError {
    pub fn scope(&self) -> &Scope {
        match self {
            VarSubstError::UndefinedVariable { scope, .. }
            | VarSubstError::UnclosedVariableReference { scope, .. }
            | VarSubstError::InvalidVariableName { scope, .. }
            | VarSubstError::InvalidEscapeSequence { scope, .. }
            | VarSubstError::MaxRecursionDepthExceeded { scope, .. } => scope,
        }
    }

    /// The variable name the error is attributed to, for `Error::scope_path()`.
    pub fn symbol(&self) -> &str {
        match self {
            VarSubstError::UndefinedVariable { name, .. }
            | VarSubstError::UnclosedVariableReference { name, .. }
            | VarSubstError::InvalidVariableName { name, .. }
            | VarSubstError::InvalidEscapeSequence { name, .. }
            | VarSubstError::MaxRecursionDepthExceeded { name, .. } => name,
        }
    }

    pub fn kind(&self) -> crate::errors::ErrorKind {
        use crate::errors::ErrorKind;
        match self {
            VarSubstError::UndefinedVariable { .. } => ErrorKind::UndefinedVariable,
            VarSubstError::UnclosedVariableReference { .. } => {
                ErrorKind::UnclosedVariableReference
            }
            VarSubstError::InvalidVariableName { .. } => ErrorKind::InvalidVariableName,
            VarSubstError::InvalidEscapeSequence { .. } => ErrorKind::InvalidEscapeSequence,
            VarSubstError::MaxRecursionDepthExceeded { .. } => {
                ErrorKind::MaxRecursionDepthExceeded
            }
        }
    }
}

/// Expands every `name -> raw value` pair in `raw`, in insertion order,
/// resolving `%{OTHER}` references against already-expanded entries plus
/// whatever `extra_bindings` the caller supplies (auto-vars, parent-scope
/// values already expanded upstream).
///
/// Because entries are expanded strictly in insertion order and a
/// reference can only resolve to an already-expanded entry, a "circular"
/// reference surfaces as `UndefinedVariable` (the referenced name simply
/// isn't expanded yet). The chain length — how many levels of `%{}`
/// indirection a value sits behind — is tracked separately and capped at
/// [`MAX_EXPANSION_DEPTH`]: `extra_bindings` entries count as depth 0, and
/// each var's depth is one more than the deepest entry it references.
///
/// Returns the fully expanded map, still in the same order as `raw`.
pub fn expand_vars(
    scope: &Scope,
    raw: &IndexMap<String, String>,
    extra_bindings: &IndexMap<String, String>,
) -> Result<IndexMap<String, String>, VarSubstError> {
    let mut expanded: IndexMap<String, String> = IndexMap::new();
    let mut depths: IndexMap<String, usize> = IndexMap::new();
    for (name, value) in raw {
        let (resolved, depth) = expand_one(scope, name, value, &expanded, &depths, extra_bindings)?;
        expanded.insert(name.clone(), resolved);
        depths.insert(name.clone(), depth);
    }
    Ok(expanded)
}

/// Expands a single already-templated string value (e.g. a group's
/// `workdir` field) against a fully resolved variable map. Every binding
/// is already fully resolved, so each reference contributes depth 1.
pub fn expand_str(
    scope: &Scope,
    field_name: &str,
    value: &str,
    bindings: &IndexMap<String, String>,
) -> Result<String, VarSubstError> {
    let (resolved, _depth) = expand_one(
        scope,
        field_name,
        value,
        bindings,
        &IndexMap::new(),
        &IndexMap::new(),
    )?;
    Ok(resolved)
}

fn expand_one(
    scope: &Scope,
    name: &str,
    value: &str,
    expanded: &IndexMap<String, String>,
    depths: &IndexMap<String, usize>,
    extra_bindings: &IndexMap<String, String>,
) -> Result<(String, usize), VarSubstError> {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    let mut max_ref_depth: usize = 0;

    while let Some(ch) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some('%') => out.push('%'),
                Some('\\') => out.push('\\'),
                Some(other) => {
                    return Err(VarSubstError::InvalidEscapeSequence {
                        scope: scope.clone(),
                        name: name.to_string(),
                        ch: other,
                    })
                }
                None => {
                    return Err(VarSubstError::InvalidEscapeSequence {
                        scope: scope.clone(),
                        name: name.to_string(),
                        ch: '\\',
                    })
                }
            },
            '%' if chars.peek() == Some(&'{') => {
                chars.next();
                let mut ref_name = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    ref_name.push(c);
                }
                if !closed {
                    return Err(VarSubstError::UnclosedVariableReference {
                        scope: scope.clone(),
                        name: name.to_string(),
                    });
                }
                if ref_name.is_empty() {
                    return Err(VarSubstError::InvalidVariableName {
                        scope: scope.clone(),
                        name: name.to_string(),
                    });
                }

                if let Some(resolved) = expanded.get(&ref_name) {
                    out.push_str(resolved);
                    let ref_depth = depths.get(&ref_name).copied().unwrap_or(0) + 1;
                    if ref_depth > MAX_EXPANSION_DEPTH {
                        return Err(VarSubstError::MaxRecursionDepthExceeded {
                            scope: scope.clone(),
                            name: name.to_string(),
                        });
                    }
                    max_ref_depth = max_ref_depth.max(ref_depth);
                } else if let Some(resolved) = extra_bindings.get(&ref_name) {
                    out.push_str(resolved);
                    max_ref_depth = max_ref_depth.max(1);
                } else {
                    return Err(VarSubstError::UndefinedVariable {
                        scope: scope.clone(),
                        name: ref_name,
                    });
                }
            }
            other => out.push(other),
        }
    }

    Ok((out, max_ref_depth))
}

/// Pre-resolves `%{GlobalVar}` references inside a `CommandTemplate` field.
/// Global refs resolve first, template placeholder syntax second:
/// `${...}` placeholder tokens and any escape sequence other
/// than `\%`/`\\` are copied through untouched for
/// [`crate::placeholder`]'s own pass — running the two scanners
/// independently back to back would otherwise make each one reject the
/// other's escapes.
///
/// Templates never see local (group/command) vars, so a reference whose
/// name doesn't start uppercase is always rejected as
/// [`crate::errors::ExpandError::LocalVariableInTemplate`], even if
/// nothing by that name is ever defined anywhere.
pub fn resolve_template_global_refs(
    template: &str,
    raw: &str,
    globals: &IndexMap<String, String>,
) -> Result<String, crate::errors::ExpandError> {
    use crate::errors::ExpandError;

    let scope = Scope::Template {
        name: template.to_string(),
    };
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\\' => match chars.peek().copied() {
                Some('%') => {
                    chars.next();
                    out.push('%');
                }
                Some('\\') => {
                    chars.next();
                    out.push('\\');
                }
                _ => out.push('\\'),
            },
            '$' if chars.peek() == Some(&'{') => {
                out.push('$');
                if let Some(c) = chars.next() {
                    out.push(c);
                }
                for c in chars.by_ref() {
                    out.push(c);
                    if c == '}' {
                        break;
                    }
                }
            }
            '%' if chars.peek() == Some(&'{') => {
                chars.next();
                let mut name = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    name.push(c);
                }
                if !closed {
                    return Err(VarSubstError::UnclosedVariableReference {
                        scope: scope.clone(),
                        name: template.to_string(),
                    }
                    .into());
                }
                if name.is_empty() {
                    return Err(VarSubstError::InvalidVariableName {
                        scope: scope.clone(),
                        name: template.to_string(),
                    }
                    .into());
                }
                if !rcr_core::is_valid_global_name(&name) {
                    return Err(ExpandError::LocalVariableInTemplate {
                        template: template.to_string(),
                        name,
                    });
                }
                match globals.get(&name) {
                    Some(value) => out.push_str(value),
                    None => {
                        return Err(ExpandError::UndefinedGlobalVariableInTemplate {
                            template: template.to_string(),
                            name,
                        });
                    }
                }
            }
            other => out.push(other),
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "varsubst_tests.rs"]
mod tests;
