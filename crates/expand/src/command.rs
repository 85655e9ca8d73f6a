// SPDX-License-Identifier: MIT

//! CommandExpander: produces a `RuntimeCommand` from a `CommandSpec`,
//! optionally applying a named `CommandTemplate` first, then layering the
//! command's own local scope and performing the final allowlist
//! arbitration against the group's canonicalized `cmd_allowed`.

use std::path::Path;

use indexmap::IndexMap;
use rcr_config::{CommandSpec, CommandTemplateSpec, ParamValue};
use rcr_core::{ident, Overridable, Scope};

use crate::env::{parse_env_entry, resolve_env_entries, resolve_scope_vars, SystemEnvProvider};
use crate::errors::ExpandError;
use crate::global::validate_var_name;
use crate::group::PathResolver;
use crate::placeholder::{expand_args, expand_env_entries, expand_scalar};
use crate::runtime::{RuntimeCommand, RuntimeGroup};
use crate::spec_ext::CommandField;
use crate::varsubst::{expand_str, resolve_template_global_refs};

fn from_option<T>(opt: Option<T>) -> Overridable<T> {
    match opt {
        Some(v) => Overridable::Explicit(v),
        None => Overridable::Unset,
    }
}

/// Resolves a template's fields against global vars and the command's
/// `params`. Every referenced `params` name must
/// itself be a valid identifier; unresolvable parameter usage surfaces
/// from the placeholder engine itself (`UndefinedParameter`,
/// `ParameterTypeMismatch`) rather than a separate pre-pass, since
/// re-deriving "is this name referenced" ahead of time would just
/// duplicate the scanner.
fn apply_template(
    template_name: &str,
    template: &CommandTemplateSpec,
    params: &IndexMap<String, ParamValue>,
    globals: &IndexMap<String, String>,
) -> Result<(String, Vec<String>, Vec<String>, Option<String>), ExpandError> {
    for name in params.keys() {
        if !ident::is_valid_identifier(name) {
            return Err(ExpandError::InvalidParamName { name: name.clone() });
        }
    }

    let scope = Scope::Template {
        name: template_name.to_string(),
    };

    let cmd_g = resolve_template_global_refs(template_name, &template.cmd, globals)?;
    let cmd = expand_scalar(&scope, CommandField::Cmd, &cmd_g, params)?;
    if cmd.trim().is_empty() {
        return Err(ExpandError::TemplateCmdNotSingleValue {
            template: template_name.to_string(),
        });
    }

    let mut args_g = Vec::with_capacity(template.args.len());
    for arg in &template.args {
        args_g.push(resolve_template_global_refs(template_name, arg, globals)?);
    }
    let args = expand_args(&scope, &args_g, params)?;

    let mut env_g = Vec::with_capacity(template.env.len());
    for entry in &template.env {
        env_g.push(resolve_template_global_refs(template_name, entry, globals)?);
    }
    let env = expand_env_entries(&scope, &env_g, params)?;

    let workdir = match &template.workdir {
        Some(raw) => {
            let raw_g = resolve_template_global_refs(template_name, raw, globals)?;
            Some(expand_scalar(&scope, CommandField::Workdir, &raw_g, params)?)
        }
        None => None,
    };

    Ok((cmd, args, env, workdir))
}

/// Produces a [`RuntimeCommand`]. `default_timeout`/`default_output_size_limit`
/// are the fallbacks used when neither the template nor the command sets
/// one — the pipeline driver is the one place that knows what a
/// caller-configured fallback should be, so they're threaded through
/// rather than hard-coded here.
#[allow(clippy::too_many_arguments)]
pub fn expand_command(
    spec: &CommandSpec,
    group: &str,
    templates: &IndexMap<String, CommandTemplateSpec>,
    runtime_group: &RuntimeGroup,
    system_env: &dyn SystemEnvProvider,
    paths: &dyn PathResolver,
    default_timeout: u64,
    default_output_size_limit: i64,
) -> Result<RuntimeCommand, ExpandError> {
    let span = tracing::info_span!("expand_command", group, command = %spec.name);
    let _guard = span.enter();
    tracing::debug!(template = ?spec.template, "entering");

    let scope = Scope::Command {
        group: group.to_string(),
        command: spec.name.clone(),
    };

    if spec.is_templated() && spec.has_inline_run_fields() {
        return Err(ExpandError::TemplateAndInlineFieldsBothSet {
            group: group.to_string(),
            command: spec.name.clone(),
            template: spec.template.clone().unwrap_or_default(),
        });
    }
    if !spec.is_templated() && spec.cmd.is_none() {
        return Err(ExpandError::NoCommandSource {
            group: group.to_string(),
            command: spec.name.clone(),
        });
    }

    let (run_cmd, run_args, run_env, template_workdir) = if let Some(template_name) = &spec.template
    {
        let template =
            templates
                .get(template_name)
                .ok_or_else(|| ExpandError::UndefinedTemplate {
                    group: group.to_string(),
                    command: spec.name.clone(),
                    template: template_name.clone(),
                })?;
        let (cmd, args, env, workdir) =
            apply_template(template_name, template, &spec.params, &runtime_group.vars)?;
        (Some(cmd), Some(args), env, workdir)
    } else {
        (None, None, Vec::new(), None)
    };

    for name in spec.vars.keys() {
        validate_var_name(&scope, name, false)?;
    }

    // env-imports + vars resolve together, seeded from the group's
    // combined vars (the same "internals join the var namespace" rule
    // global and group scope follow).
    let extra_bindings = resolve_scope_vars(
        &scope,
        &runtime_group.vars,
        &spec.vars,
        &spec.env_import,
        Some(&runtime_group.env_allowed),
        system_env,
    )?;

    let mut env: IndexMap<String, String> = runtime_group.env.clone();
    if let Some(raw_entries) = &spec.env {
        env.extend(resolve_env_entries(&scope, raw_entries, &extra_bindings)?);
    }

    // Template-produced env entries are already fully resolved (globals
    // and params both substituted) — they're layered straight on top,
    // with only KEY validity re-checked, not re-substituted.
    for entry in &run_env {
        let (key, value) = parse_env_entry(entry).ok_or_else(|| ExpandError::MalformedEnvEntry {
            scope: scope.clone(),
            entry: entry.clone(),
        })?;
        env.insert(key, value);
    }

    let workdir_override = spec
        .workdir
        .clone()
        .resolve(from_option(template_workdir))
        .resolve(from_option(runtime_group.workdir.clone()));
    let workdir = match workdir_override.into_option() {
        Some(raw) => Some(expand_str(&scope, "workdir", &raw, &extra_bindings)?),
        None => None,
    };

    let output_file = match spec.output_file.clone().into_option() {
        Some(raw) => Some(expand_str(&scope, "output_file", &raw, &extra_bindings)?),
        None => None,
    };

    let timeout = spec
        .timeout
        .clone()
        .resolve(from_option(runtime_group.timeout))
        .into_option()
        .unwrap_or(default_timeout);
    let output_size_limit = spec
        .output_size_limit
        .clone()
        .resolve(from_option(runtime_group.output_size_limit))
        .into_option()
        .unwrap_or(default_output_size_limit);

    let cmd = match run_cmd {
        Some(already_resolved) => already_resolved,
        None => {
            let raw = spec.cmd.clone().unwrap_or_default();
            expand_str(&scope, "cmd", &raw, &extra_bindings)?
        }
    };
    let args = match run_args {
        Some(already_resolved) => already_resolved,
        None => {
            let mut out = Vec::new();
            for raw in spec.args.clone().unwrap_or_default() {
                out.push(expand_str(&scope, "args", &raw, &extra_bindings)?);
            }
            out
        }
    };

    if !runtime_group.cmd_allowed.is_empty() {
        let canonical_cmd = paths.canonicalize(Path::new(&cmd)).map_err(|e| {
            ExpandError::PathCanonicalizationFailed {
                group: group.to_string(),
                path: cmd.clone(),
                reason: e.to_string(),
            }
        })?;
        if !runtime_group.cmd_allowed.contains(&canonical_cmd) {
            tracing::warn!(group, command = %spec.name, cmd = %cmd, "command rejected: not in cmd_allowed");
            return Err(ExpandError::CommandNotAllowed {
                group: group.to_string(),
                command: spec.name.clone(),
                cmd,
            });
        }
    }

    tracing::debug!(cmd = %cmd, args = args.len(), "expand_command complete");

    Ok(RuntimeCommand {
        name: spec.name.clone(),
        cmd,
        args,
        env,
        workdir,
        output_file,
        timeout,
        output_size_limit,
    })
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
