// SPDX-License-Identifier: MIT

//! GroupExpander: turns a `GroupSpec` plus its already-resolved
//! `RuntimeGlobal` parent into a [`RuntimeGroup`], including
//! `cmd_allowed` canonicalization.

use std::path::{Path, PathBuf};

use indexmap::{IndexMap, IndexSet};

use rcr_config::GroupSpec;
use rcr_core::Scope;

use crate::allowlist::Allowlist;
use crate::env::{resolve_env_entries, resolve_scope_vars, SystemEnvProvider};
use crate::errors::ExpandError;
use crate::global::validate_var_name;
use crate::runtime::{RuntimeGlobal, RuntimeGroup};
use crate::varsubst::expand_str;

/// A filesystem canonicalizer, injected so tests don't depend on real
/// paths existing on disk (mirrors [`crate::env::SystemEnvProvider`]).
pub trait PathResolver: Send + Sync {
    fn canonicalize(&self, path: &Path) -> std::io::Result<PathBuf>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RealPathResolver;

impl PathResolver for RealPathResolver {
    fn canonicalize(&self, path: &Path) -> std::io::Result<PathBuf> {
        std::fs::canonicalize(path)
    }
}

pub fn expand_group(
    spec: &GroupSpec,
    global: &RuntimeGlobal,
    system_env: &dyn SystemEnvProvider,
    paths: &dyn PathResolver,
) -> Result<RuntimeGroup, ExpandError> {
    let span = tracing::info_span!("expand_group", group = %spec.name);
    let _guard = span.enter();
    tracing::debug!(vars = spec.vars.len(), cmd_allowed = spec.cmd_allowed.len(), "entering");

    let scope = Scope::Group {
        name: spec.name.clone(),
    };

    for name in spec.vars.keys() {
        validate_var_name(&scope, name, false)?;
    }

    // Effective allowlist.
    let allowlist = Allowlist::from_field(&spec.env_allowed, true);
    let env_allowed = allowlist.resolve(&global.env_allowed);

    // Computed ahead of the `vars`/`env_import` pipeline below, not after
    // it: `workdir` only ever references the global scope's vars, since
    // the group's own `vars` haven't resolved yet at this point.
    // `__runner_workdir` is seeded into the mapping `vars` resolves
    // against below, so a group var declaration can reference it the same
    // way it can reference any inherited global var — not just
    // command-stage expansion.
    let raw_workdir = spec.workdir.clone().or_else(|| global.workdir.clone());
    let resolved_workdir = match &raw_workdir {
        Some(raw) => Some(expand_str(&scope, "workdir", raw, &global.vars)?),
        None => None,
    };
    let mut seed = global.vars.clone();
    if let Some(workdir) = &resolved_workdir {
        seed.insert("__runner_workdir".to_string(), workdir.clone());
    }

    // env-imports + vars resolve together (seeded from the global's
    // combined vars plus `__runner_workdir`), then `env` resolves against
    // that same combined mapping.
    let vars = resolve_scope_vars(
        &scope,
        &seed,
        &spec.vars,
        &spec.env_import,
        Some(&env_allowed),
        system_env,
    )?;

    let mut env = global.env.clone();
    env.extend(resolve_env_entries(&scope, &spec.env, &vars)?);

    let mut verify_files = global.verify_files.clone();
    for (i, raw) in spec.verify_files.iter().enumerate() {
        verify_files.push(expand_str(&scope, &format!("verify_files[{i}]"), raw, &vars)?);
    }

    let mut expanded_cmd_allowed = Vec::with_capacity(spec.cmd_allowed.len());
    for (i, raw) in spec.cmd_allowed.iter().enumerate() {
        expanded_cmd_allowed.push(expand_str(
            &scope,
            &format!("cmd_allowed[{i}]"),
            raw,
            &vars,
        )?);
    }
    let cmd_allowed = canonicalize_cmd_allowed(&spec.name, &expanded_cmd_allowed, paths)?;

    tracing::debug!(resolved_vars = vars.len(), cmd_allowed = cmd_allowed.len(), "expand_group complete");

    Ok(RuntimeGroup {
        name: spec.name.clone(),
        vars,
        env,
        env_allowed,
        workdir: resolved_workdir,
        timeout: spec.timeout.or(global.timeout),
        output_size_limit: spec.output_size_limit.or(global.output_size_limit),
        verify_files,
        cmd_allowed,
        commands: Vec::new(),
    })
}

/// Canonicalizes `cmd_allowed` entries, detecting duplicates both in the
/// raw (pre-canonicalization) strings and in the resolved paths (e.g. two
/// differently-spelled entries that are the same path via a symlink).
///
/// Entries must be absolute, non-empty, at most 4096 bytes, and free of
/// NUL bytes before canonicalization is attempted.
fn canonicalize_cmd_allowed(
    group: &str,
    raw: &[String],
    paths: &dyn PathResolver,
) -> Result<Vec<PathBuf>, ExpandError> {
    let mut seen_raw: IndexSet<&str> = IndexSet::new();
    let mut resolved: Vec<PathBuf> = Vec::with_capacity(raw.len());
    let mut seen_resolved: IndexMap<PathBuf, &str> = IndexMap::new();

    // First pass: shape validation and raw-string duplicate detection only.
    // Kept separate from canonicalization below so a raw duplicate is
    // always reported as `DuplicatePath`, even if an earlier entry would
    // otherwise fail (or simply hasn't yet been resolved) during the
    // filesystem-touching canonicalize pass.
    for entry in raw {
        if entry.is_empty() {
            return Err(ExpandError::EmptyPath {
                group: group.to_string(),
            });
        }
        if entry.len() > 4096 {
            return Err(ExpandError::InvalidPath {
                group: group.to_string(),
                path: entry.clone(),
                reason: "exceeds the 4096-byte path length limit".to_string(),
            });
        }
        if entry.contains('\0') {
            return Err(ExpandError::InvalidPath {
                group: group.to_string(),
                path: entry.clone(),
                reason: "contains a NUL byte".to_string(),
            });
        }
        if !Path::new(entry).is_absolute() {
            return Err(ExpandError::InvalidPath {
                group: group.to_string(),
                path: entry.clone(),
                reason: "must be an absolute path".to_string(),
            });
        }

        if !seen_raw.insert(entry.as_str()) {
            tracing::warn!(group, path = %entry, "duplicate cmd_allowed entry");
            return Err(ExpandError::DuplicatePath {
                group: group.to_string(),
                path: entry.clone(),
            });
        }
    }

    for entry in raw {
        let canonical = paths
            .canonicalize(Path::new(entry))
            .map_err(|e| ExpandError::PathCanonicalizationFailed {
                group: group.to_string(),
                path: entry.clone(),
                reason: e.to_string(),
            })?;

        if let Some(first) = seen_resolved.get(&canonical) {
            tracing::warn!(group, first = %first, second = %entry, "cmd_allowed entries resolve to the same path");
            return Err(ExpandError::DuplicateResolvedPath {
                group: group.to_string(),
                first: first.to_string(),
                second: entry.clone(),
            });
        }
        seen_resolved.insert(canonical.clone(), entry);
        resolved.push(canonical);
    }

    Ok(resolved)
}

#[cfg(test)]
#[path = "group_tests.rs"]
mod tests;
