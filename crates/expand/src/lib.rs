// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rcr-expand: the typed three-tier variable-resolution and
//! command-template-expansion pipeline.
//!
//! Dependency order, leaves first: `varsubst`/`placeholder` (the two
//! substitution engines) → `global` → `template_validate` → `group` →
//! `command`. `rcr_config` supplies the typed, still unexpanded spec
//! records this crate consumes; `rcr_core` supplies the shared `Scope`
//! capability and identifier rules.

pub mod allowlist;
pub mod autovars;
pub mod command;
pub mod env;
pub mod errors;
pub mod global;
pub mod group;
pub mod placeholder;
pub mod runtime;
pub mod spec_ext;
pub mod template_validate;
pub mod varsubst;

pub use autovars::ProcessAutoVars;
pub use command::expand_command;
pub use env::{RealSystemEnv, SystemEnvProvider};
pub use errors::{ErrorKind, ExpandError};
pub use global::expand_global;
pub use group::{expand_group, PathResolver, RealPathResolver};
pub use runtime::{RuntimeCommand, RuntimeGlobal, RuntimeGroup};
pub use spec_ext::CommandField;
pub use template_validate::{validate_template, validate_templates};

use rcr_config::Config;

/// Drives the full pipeline over a loaded [`Config`]: validates every
/// template against the expanded globals, expands each group, and
/// expands every command within it. This is the one place in the crate
/// that wires every stage together end to end — each stage function
/// above remains independently callable for callers that need
/// finer-grained control (e.g. re-validating a single group).
pub fn expand_config(
    config: &Config,
    process_vars: &ProcessAutoVars,
    system_env: &dyn SystemEnvProvider,
    paths: &dyn PathResolver,
    default_timeout: u64,
    default_output_size_limit: i64,
) -> Result<(RuntimeGlobal, Vec<RuntimeGroup>), ExpandError> {
    let span = tracing::info_span!("expand_config", groups = config.groups.len());
    let _guard = span.enter();

    let global = expand_global(&config.global, &process_vars.as_bindings(), system_env)?;

    validate_templates(&config.templates, &global.vars)?;

    let mut groups = Vec::with_capacity(config.groups.len());
    for group_spec in &config.groups {
        let mut runtime_group = expand_group(group_spec, &global, system_env, paths)?;

        let mut commands = Vec::with_capacity(group_spec.commands.len());
        for command_spec in &group_spec.commands {
            commands.push(expand_command(
                command_spec,
                &group_spec.name,
                &config.templates,
                &runtime_group,
                system_env,
                paths,
                default_timeout,
                default_output_size_limit,
            )?);
        }
        runtime_group.commands = commands;
        groups.push(runtime_group);
    }

    Ok((global, groups))
}
