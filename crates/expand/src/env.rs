// SPDX-License-Identifier: MIT

//! `env` / `env_import` entry parsing and the injected system-env reader.
//!
//! `KEY=VALUE` parsing splits on the first `=` only, so values are free
//! to contain `=` themselves (`FOO=a=b` -> key `FOO`, value `a=b`).

use indexmap::{IndexMap, IndexSet};
use rcr_core::{ident, Scope};

use crate::errors::ExpandError;
use crate::varsubst::{expand_str, expand_vars};

/// Splits `KEY=VALUE` on the first `=`. Returns `None` if there is no `=`
/// or the key isn't a valid identifier.
pub fn parse_env_entry(entry: &str) -> Option<(String, String)> {
    let (key, value) = entry.split_once('=')?;
    if !ident::is_valid_env_key(key) {
        return None;
    }
    Some((key.to_string(), value.to_string()))
}

/// Splits a `LOCAL_NAME=SYSTEM_VAR` `env_import` entry the same way.
pub fn parse_env_import_entry(entry: &str) -> Option<(String, String)> {
    parse_env_entry(entry)
}

/// Reads the real process environment. The only collaborator this crate
/// touches for live system state besides the auto-var clock/pid reads —
/// abstracted so tests never depend on actual process env vars.
pub trait SystemEnvProvider: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

/// Production [`SystemEnvProvider`] backed by `std::env::var`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealSystemEnv;

impl SystemEnvProvider for RealSystemEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Imports `env_import` entries against the system env, enforcing:
/// - the system var named must be in `env_allowed`, else
///   [`ExpandError::EnvVarNotAllowed`];
/// - an imported value containing `=` or a NUL byte cannot be
///   represented and is rejected rather than silently mangled.
///
/// `env_allowed` is optional so callers that don't gate imports by an
/// allowlist (this module's own unit tests) can pass `None` to skip the
/// check; every real pipeline stage passes `Some`.
pub fn resolve_env_import(
    scope: &Scope,
    entries: &[String],
    env_allowed: Option<&indexmap::IndexSet<String>>,
    system_env: &dyn SystemEnvProvider,
) -> Result<Vec<(String, String)>, ExpandError> {
    let mut out = Vec::with_capacity(entries.len());
    let mut seen = indexmap::IndexSet::with_capacity(entries.len());
    for entry in entries {
        let (local_name, system_var) =
            parse_env_import_entry(entry).ok_or_else(|| ExpandError::MalformedEnvImport {
                scope: scope.clone(),
                name: entry.clone(),
            })?;
        // The reserved-prefix rule isn't scoped to declared `vars` alone —
        // an env_import's local name lands in the same namespace and must
        // be checked the same way, or a config could smuggle a spoofed
        // `__runner_workdir`/`__runner_datetime`/`__runner_pid` into the
        // resolved vars through env_import instead of `vars`.
        if ident::is_reserved(&local_name) {
            return Err(ExpandError::ReservedVariableName {
                scope: scope.clone(),
                name: local_name,
            });
        }
        if !seen.insert(local_name.clone()) {
            return Err(ExpandError::DuplicateVariableDefinition {
                scope: scope.clone(),
                name: local_name,
            });
        }
        if let Some(allowed) = env_allowed {
            if !allowed.contains(&system_var) {
                tracing::warn!(scope = %scope, system_var, "env_import rejected: not in allowlist");
                return Err(ExpandError::EnvVarNotAllowed {
                    scope: scope.clone(),
                    name: system_var,
                });
            }
        }
        let value = system_env.get(&system_var).unwrap_or_default();
        if value.contains('=') || value.contains('\0') {
            return Err(ExpandError::UnimportableSystemValue {
                scope: scope.clone(),
                system_var,
            });
        }
        out.push((local_name, value));
    }
    Ok(out)
}

/// Resolves a scope's `env_import` + `vars` together into one combined
/// variable namespace: the result contains exactly auto-vars ∪
/// env-import-produced internals ∪ user-declared vars.
///
/// `env_import` internals are produced first and folded into `seed`
/// (auto-vars at global scope, the parent's already-combined vars at
/// group/command scope) before `vars` is resolved, so a declared var can
/// reference `%{internal_name}`. A declared var sharing a name with an
/// import from *this same scope* is `EnvImportVarsConflict`; shadowing a
/// name already present in `seed` (i.e. inherited from a parent scope) is
/// allowed — command vars may shadow group vars and vice versa (see
/// `DESIGN.md`).
pub fn resolve_scope_vars(
    scope: &Scope,
    seed: &IndexMap<String, String>,
    declared_vars: &IndexMap<String, String>,
    env_import_entries: &[String],
    env_allowed: Option<&IndexSet<String>>,
    system_env: &dyn SystemEnvProvider,
) -> Result<IndexMap<String, String>, ExpandError> {
    let imports = resolve_env_import(scope, env_import_entries, env_allowed, system_env)?;
    let import_names: IndexSet<&str> = imports.iter().map(|(name, _)| name.as_str()).collect();

    for name in declared_vars.keys() {
        if import_names.contains(name.as_str()) {
            return Err(ExpandError::EnvImportVarsConflict {
                scope: scope.clone(),
                name: name.clone(),
            });
        }
    }

    let mut combined = seed.clone();
    for (name, value) in imports {
        combined.insert(name, value);
    }

    let resolved = expand_vars(scope, declared_vars, &combined)?;
    combined.extend(resolved);
    Ok(combined)
}

/// Resolves a scope's `env` (`KEY=VALUE`) list against an already-combined
/// variable namespace. Duplicate detection is scoped to `entries` alone —
/// overriding a parent scope's env entry with the same key is not a
/// duplicate, it's an override: group/command `env` layers on top of the
/// parent's already-resolved map.
pub fn resolve_env_entries(
    scope: &Scope,
    entries: &[String],
    bindings: &IndexMap<String, String>,
) -> Result<IndexMap<String, String>, ExpandError> {
    let mut out = IndexMap::with_capacity(entries.len());
    let mut seen: IndexSet<String> = IndexSet::with_capacity(entries.len());
    for entry in entries {
        let (key, raw_value) =
            parse_env_entry(entry).ok_or_else(|| ExpandError::MalformedEnvEntry {
                scope: scope.clone(),
                entry: entry.clone(),
            })?;
        if !seen.insert(key.clone()) {
            return Err(ExpandError::DuplicateVariableDefinition {
                scope: scope.clone(),
                name: key,
            });
        }
        let value = expand_str(scope, &key, &raw_value, bindings)?;
        out.insert(key, value);
    }
    Ok(out)
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
