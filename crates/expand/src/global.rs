// SPDX-License-Identifier: MIT

//! GlobalExpander: turns a `GlobalSpec` into a [`RuntimeGlobal`] — the
//! first stage that actually resolves `%{}` references, since every
//! other scope's vars can see global vars.

use indexmap::{IndexMap, IndexSet};
use rcr_config::GlobalSpec;
use rcr_core::{ident, Scope};

use crate::allowlist::Allowlist;
use crate::env::{resolve_env_entries, resolve_scope_vars, SystemEnvProvider};
use crate::errors::ExpandError;
use crate::runtime::RuntimeGlobal;
use crate::varsubst::expand_str;

pub fn expand_global(
    spec: &GlobalSpec,
    process_bindings: &IndexMap<String, String>,
    system_env: &dyn SystemEnvProvider,
) -> Result<RuntimeGlobal, ExpandError> {
    let span = tracing::info_span!("expand_global");
    let _guard = span.enter();
    tracing::debug!(vars = spec.vars.len(), env_import = spec.env_import.len(), "entering");

    let scope = Scope::Global;

    for name in spec.vars.keys() {
        validate_var_name(&scope, name, true)?;
    }

    // Global has no parent: an absent allowlist at global scope always
    // means Reject.
    let allowlist = Allowlist::from_field(&spec.env_allowed, false);
    let env_allowed = allowlist.resolve(&IndexSet::new());

    // env-imports resolve into the same namespace `vars` resolves
    // against, not into the env map.
    let vars = resolve_scope_vars(
        &scope,
        process_bindings,
        &spec.vars,
        &spec.env_import,
        Some(&env_allowed),
        system_env,
    )?;

    // `env` (KEY=VALUE) entries substitute against the combined vars
    // namespace and populate the env map separately.
    let env = resolve_env_entries(&scope, &spec.env, &vars)?;

    let mut verify_files = Vec::with_capacity(spec.verify_files.len());
    for (i, raw) in spec.verify_files.iter().enumerate() {
        verify_files.push(expand_str(&scope, &format!("verify_files[{i}]"), raw, &vars)?);
    }

    let workdir = match &spec.workdir {
        Some(raw) => Some(expand_str(&scope, "workdir", raw, &vars)?),
        None => None,
    };

    tracing::debug!(resolved_vars = vars.len(), env_entries = env.len(), "expand_global complete");

    Ok(RuntimeGlobal {
        vars,
        env,
        env_allowed,
        workdir,
        timeout: spec.timeout,
        output_size_limit: spec.output_size_limit,
        verify_files,
    })
}

/// Shared by Global/Group/Command var-name validation: must be a valid
/// identifier and not use the reserved `__runner_` prefix. Global-level
/// names are additionally required to start uppercase, local-level names
/// lowercase.
pub fn validate_var_name(scope: &Scope, name: &str, require_uppercase: bool) -> Result<(), ExpandError> {
    if ident::is_reserved(name) {
        tracing::warn!(scope = %scope, name, "rejected reserved variable name");
        return Err(ExpandError::ReservedVariableName {
            scope: scope.clone(),
            name: name.to_string(),
        });
    }
    let valid = if require_uppercase {
        ident::is_valid_global_name(name)
    } else {
        ident::is_valid_local_name(name)
    };
    if !valid {
        return Err(ExpandError::InvalidVariableName {
            scope: scope.clone(),
            name: name.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "global_tests.rs"]
mod tests;
