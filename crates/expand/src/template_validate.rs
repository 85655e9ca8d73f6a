// SPDX-License-Identifier: MIT

//! TemplateValidator: statically validates every `CommandTemplate`
//! against the global vars mapping produced by `GlobalExpander`, before
//! any group or command exists.

use indexmap::IndexMap;
use rcr_config::CommandTemplateSpec;
use rcr_core::Scope;

use crate::errors::ExpandError;
use crate::placeholder::{validate_args_field, validate_env_field, validate_scalar_field};
use crate::spec_ext::CommandField;
use crate::varsubst::resolve_template_global_refs;

/// Validates one template's fields: every `%{Name}` reference must name a
/// declared global var, and `${}` placeholder usage must respect each
/// field's array-legality rule. Returns nothing on success — the actual
/// substituted strings aren't needed again until a command applies the
/// template with concrete params.
pub fn validate_template(
    name: &str,
    template: &CommandTemplateSpec,
    globals: &IndexMap<String, String>,
) -> Result<(), ExpandError> {
    let scope = Scope::Template {
        name: name.to_string(),
    };

    let cmd_after_globals = resolve_template_global_refs(name, &template.cmd, globals)?;
    validate_scalar_field(&scope, CommandField::Cmd, &cmd_after_globals)?;

    let mut args_after_globals = Vec::with_capacity(template.args.len());
    for arg in &template.args {
        args_after_globals.push(resolve_template_global_refs(name, arg, globals)?);
    }
    validate_args_field(&scope, &args_after_globals)?;

    let mut env_after_globals = Vec::with_capacity(template.env.len());
    for entry in &template.env {
        env_after_globals.push(resolve_template_global_refs(name, entry, globals)?);
    }
    validate_env_field(&scope, &env_after_globals)?;

    if let Some(workdir) = &template.workdir {
        let workdir_after_globals = resolve_template_global_refs(name, workdir, globals)?;
        validate_scalar_field(&scope, CommandField::Workdir, &workdir_after_globals)?;
    }

    Ok(())
}

/// Validates every template in `templates`. The Loader runs this on each
/// template it merges.
pub fn validate_templates(
    templates: &IndexMap<String, CommandTemplateSpec>,
    globals: &IndexMap<String, String>,
) -> Result<(), ExpandError> {
    for (name, template) in templates {
        validate_template(name, template, globals)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "template_validate_tests.rs"]
mod tests;
