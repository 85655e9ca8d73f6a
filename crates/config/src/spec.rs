// SPDX-License-Identifier: MIT

//! Spec types: the immutable-after-parse records produced straight from
//! the surface TOML.

use indexmap::IndexMap;
use rcr_core::Overridable;
use serde::{Deserialize, Serialize};

/// A parameter value passed to a templated command: either a single
/// string (for `${name}` / `${?name}`) or a list of strings (for
/// `${@name}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    String(String),
    List(Vec<String>),
}

impl ParamValue {
    pub fn as_string(&self) -> Option<&str> {
        match self {
            ParamValue::String(s) => Some(s),
            ParamValue::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            ParamValue::List(v) => Some(v),
            ParamValue::String(_) => None,
        }
    }
}

/// A parameterized command skeleton, instantiated with `params` at
/// command-expansion time via `${}`-substitution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandTemplateSpec {
    /// Every template must declare `cmd`, but the field is kept
    /// `#[serde(default)]` so a missing key deserializes to `""` rather
    /// than failing inside `toml::from_str` — that way the Loader's own
    /// `MissingRequiredField` check (loader.rs) is what reports it, with a
    /// name/field pair, instead of an opaque TOML parse error.
    #[serde(default)]
    pub cmd: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub env: Vec<String>,
    #[serde(default)]
    pub workdir: Option<String>,
    /// Captures any fields the surface format didn't expect, so the Loader
    /// can specifically detect and reject a stray `name` field
    /// (`TemplateContainsNameField`) without rejecting genuinely forward
    /// compatible additions under a generic "unknown field" error.
    #[serde(flatten)]
    pub extra: IndexMap<String, toml::Value>,
}

/// The top-level `[global]` table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalSpec {
    #[serde(default)]
    pub timeout: Option<u64>,
    #[serde(default)]
    pub output_size_limit: Option<i64>,
    #[serde(default)]
    pub workdir: Option<String>,
    /// `None` = absent (global has no parent, so absent means Reject).
    /// `Some(vec![])` = empty (Reject). `Some(names)` = Explicit.
    #[serde(default)]
    pub env_allowed: Option<Vec<String>>,
    /// `internal=SYSTEM_VAR` entries, in declaration order.
    #[serde(default)]
    pub env_import: Vec<String>,
    /// name -> raw (pre-substitution) value, in declaration order.
    #[serde(default)]
    pub vars: IndexMap<String, String>,
    /// `KEY=VALUE` entries, in declaration order.
    #[serde(default)]
    pub env: Vec<String>,
    #[serde(default)]
    pub verify_files: Vec<String>,
}

/// A `[[groups]]` entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupSpec {
    pub name: String,
    #[serde(default)]
    pub timeout: Option<u64>,
    #[serde(default)]
    pub output_size_limit: Option<i64>,
    #[serde(default)]
    pub workdir: Option<String>,
    #[serde(default)]
    pub env_allowed: Option<Vec<String>>,
    #[serde(default)]
    pub env_import: Vec<String>,
    #[serde(default)]
    pub vars: IndexMap<String, String>,
    #[serde(default)]
    pub env: Vec<String>,
    #[serde(default)]
    pub verify_files: Vec<String>,
    #[serde(default)]
    pub cmd_allowed: Vec<String>,
    #[serde(default)]
    pub commands: Vec<CommandSpec>,
}

/// A single command entry, either templated or fully inline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandSpec {
    pub name: String,
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub params: IndexMap<String, ParamValue>,
    #[serde(default)]
    pub cmd: Option<String>,
    #[serde(default)]
    pub args: Option<Vec<String>>,
    #[serde(default)]
    pub env: Option<Vec<String>>,
    #[serde(default)]
    pub workdir: Overridable<String>,
    #[serde(default)]
    pub output_file: Overridable<String>,
    #[serde(default)]
    pub env_import: Vec<String>,
    #[serde(default)]
    pub vars: IndexMap<String, String>,
    #[serde(default)]
    pub timeout: Overridable<u64>,
    #[serde(default)]
    pub output_size_limit: Overridable<i64>,
}

impl CommandSpec {
    /// `true` if this command names a template (mutually exclusive with
    /// inline `cmd`/`args`/`env`).
    pub fn is_templated(&self) -> bool {
        self.template.is_some()
    }

    /// `true` if any inline run fields (`cmd`, `args`, `env`) are present.
    pub fn has_inline_run_fields(&self) -> bool {
        self.cmd.is_some() || self.args.is_some() || self.env.is_some()
    }
}

/// A template-only document, as loaded from an `includes` entry: must
/// contain only `version` and `command_templates`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateOnlyDoc {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub command_templates: IndexMap<String, CommandTemplateSpec>,
    /// Anything else present marks the file `TemplateFileInvalidFormat`.
    #[serde(flatten)]
    pub extra: IndexMap<String, toml::Value>,
}

/// The full surface document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigSpec {
    pub version: String,
    #[serde(default)]
    pub includes: Vec<String>,
    #[serde(default)]
    pub command_templates: IndexMap<String, CommandTemplateSpec>,
    #[serde(default)]
    pub global: GlobalSpec,
    #[serde(default)]
    pub groups: Vec<GroupSpec>,
}

#[cfg(test)]
#[path = "spec_tests.rs"]
mod tests;
