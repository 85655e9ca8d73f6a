// SPDX-License-Identifier: MIT

//! The unified expansion error: wraps the two substitution engines'
//! errors plus the stage-specific checks (allowlist denial, mutual
//! exclusion, path canonicalization, template validation) that don't
//! belong to either scanner.

use crate::placeholder::PlaceholderError;
use crate::spec_ext::CommandField;
use crate::varsubst::VarSubstError;
use rcr_core::Scope;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpandError {
    #[error(transparent)]
    VarSubst(#[from] VarSubstError),

    #[error(transparent)]
    Placeholder(#[from] PlaceholderError),

    #[error("{scope}: env var '{name}' is not in the effective allowlist")]
    EnvVarNotAllowed { scope: Scope, name: String },

    #[error("{scope}: env_import entry '{name}' is malformed, expected KEY=SYSTEM_VAR")]
    MalformedEnvImport { scope: Scope, name: String },

    #[error("{scope}: imported system env var '{system_var}' contains '=' or NUL and cannot be imported")]
    UnimportableSystemValue { scope: Scope, system_var: String },

    #[error("{scope}: env entry '{entry}' is malformed, expected KEY=VALUE")]
    MalformedEnvEntry { scope: Scope, entry: String },

    #[error("{scope}: variable name '{name}' uses the reserved __runner_ prefix")]
    ReservedVariableName { scope: Scope, name: String },

    #[error("{scope}: invalid variable name '{name}'")]
    InvalidVariableName { scope: Scope, name: String },

    #[error("command '{command}' in group '{group}' names template '{template}' but also sets inline run fields")]
    TemplateAndInlineFieldsBothSet {
        group: String,
        command: String,
        template: String,
    },

    #[error("command '{command}' in group '{group}' has neither a template nor a 'cmd' field")]
    NoCommandSource { group: String, command: String },

    #[error("command '{command}' in group '{group}' references undefined template '{template}'")]
    UndefinedTemplate {
        group: String,
        command: String,
        template: String,
    },

    #[error("template '{template}': local variable '{name}' referenced via %{{}} is not allowed in templates")]
    LocalVariableInTemplate { template: String, name: String },

    #[error("template '{template}': global variable '{name}' referenced via %{{}} is undefined")]
    UndefinedGlobalVariableInTemplate { template: String, name: String },

    #[error("template '{template}': cmd does not expand to exactly one non-empty value")]
    TemplateCmdNotSingleValue { template: String },

    #[error("parameter name '{name}' is not a valid identifier")]
    InvalidParamName { name: String },

    #[error("group '{group}': cmd_allowed entry '{path}' is invalid: {reason}")]
    InvalidPath {
        group: String,
        path: String,
        reason: String,
    },

    #[error("group '{group}': cmd_allowed contains an empty path entry")]
    EmptyPath { group: String },

    #[error("group '{group}': cmd_allowed entry '{path}' could not be canonicalized: {reason}")]
    PathCanonicalizationFailed {
        group: String,
        path: String,
        reason: String,
    },

    #[error("group '{group}': cmd_allowed entry '{path}' is a raw-string duplicate")]
    DuplicatePath { group: String, path: String },

    #[error("group '{group}': cmd_allowed entries '{first}' and '{second}' resolve to the same path")]
    DuplicateResolvedPath {
        group: String,
        first: String,
        second: String,
    },

    #[error("{scope}: internal name '{name}' is declared more than once in the same list")]
    DuplicateVariableDefinition { scope: Scope, name: String },

    #[error("{scope}: '{name}' is declared by both env_import and vars")]
    EnvImportVarsConflict { scope: Scope, name: String },

    #[error("command '{command}' in group '{group}': resolved cmd '{cmd}' is not under any cmd_allowed entry")]
    CommandNotAllowed {
        group: String,
        command: String,
        cmd: String,
    },
}

/// Coarse-grained, `match`-friendly classification of an [`ExpandError`],
/// so callers (e.g. a logging layer) can branch on "what kind of thing
/// went wrong" without matching every variant's payload.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidVariableName,
    InvalidSystemVariableName,
    ReservedVariablePrefix,
    VariableNotInAllowlist,
    UndefinedVariable,
    InvalidEscapeSequence,
    UnclosedVariableReference,
    MaxRecursionDepthExceeded,
    InvalidEnvImportFormat,
    InvalidEnvFormat,
    InvalidEnvKey,
    DuplicateVariableDefinition,
    EnvImportVarsConflict,
    DuplicatePath,
    DuplicateResolvedPath,
    InvalidPath,
    EmptyPath,
    TemplateNotFound,
    TemplateFieldConflict,
    RequiredParamMissing,
    TemplateTypeMismatch,
    ArrayInMixedContext,
    InvalidParamName,
    EmptyPlaceholderName,
    UnclosedPlaceholder,
    InvalidPlaceholderName,
    TemplateCmdNotSingleValue,
    PlaceholderInEnvKey,
    LocalVariableInTemplate,
    UndefinedGlobalVariableInTemplate,
    CommandNotAllowed,
}

impl ExpandError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExpandError::VarSubst(e) => e.kind(),
            ExpandError::Placeholder(e) => e.kind(),
            ExpandError::EnvVarNotAllowed { .. } => ErrorKind::VariableNotInAllowlist,
            ExpandError::MalformedEnvImport { .. } => ErrorKind::InvalidEnvImportFormat,
            ExpandError::UnimportableSystemValue { .. } => ErrorKind::InvalidSystemVariableName,
            ExpandError::MalformedEnvEntry { .. } => ErrorKind::InvalidEnvFormat,
            ExpandError::ReservedVariableName { .. } => ErrorKind::ReservedVariablePrefix,
            ExpandError::InvalidVariableName { .. } => ErrorKind::InvalidVariableName,
            ExpandError::TemplateAndInlineFieldsBothSet { .. } => ErrorKind::TemplateFieldConflict,
            ExpandError::NoCommandSource { .. } => ErrorKind::TemplateFieldConflict,
            ExpandError::UndefinedTemplate { .. } => ErrorKind::TemplateNotFound,
            ExpandError::LocalVariableInTemplate { .. } => ErrorKind::LocalVariableInTemplate,
            ExpandError::UndefinedGlobalVariableInTemplate { .. } => {
                ErrorKind::UndefinedGlobalVariableInTemplate
            }
            ExpandError::TemplateCmdNotSingleValue { .. } => ErrorKind::TemplateCmdNotSingleValue,
            ExpandError::InvalidParamName { .. } => ErrorKind::InvalidParamName,
            ExpandError::InvalidPath { .. } => ErrorKind::InvalidPath,
            ExpandError::EmptyPath { .. } => ErrorKind::EmptyPath,
            ExpandError::PathCanonicalizationFailed { .. } => ErrorKind::InvalidPath,
            ExpandError::DuplicatePath { .. } => ErrorKind::DuplicatePath,
            ExpandError::DuplicateResolvedPath { .. } => ErrorKind::DuplicateResolvedPath,
            ExpandError::DuplicateVariableDefinition { .. } => {
                ErrorKind::DuplicateVariableDefinition
            }
            ExpandError::EnvImportVarsConflict { .. } => ErrorKind::EnvImportVarsConflict,
            ExpandError::CommandNotAllowed { .. } => ErrorKind::CommandNotAllowed,
        }
    }

    /// Renders a `"scope.field"`-style dotted path for the offending
    /// symbol, when the variant carries enough structure to produce one.
    /// Returns `None` for variants that aren't anchored to a single
    /// `Scope` (template/group naming conflicts span two named entities
    /// rather than one scope).
    pub fn scope_path(&self) -> Option<String> {
        match self {
            ExpandError::VarSubst(e) => Some(format!("{}.{}", e.scope(), e.symbol())),
            ExpandError::Placeholder(e) => Some(format!("{}.{}", e.scope(), e.field())),
            ExpandError::EnvVarNotAllowed { scope, name }
            | ExpandError::MalformedEnvImport { scope, name }
            | ExpandError::ReservedVariableName { scope, name }
            | ExpandError::InvalidVariableName { scope, name }
            | ExpandError::DuplicateVariableDefinition { scope, name }
            | ExpandError::EnvImportVarsConflict { scope, name } => {
                Some(format!("{scope}.{name}"))
            }
            ExpandError::UnimportableSystemValue { scope, system_var } => {
                Some(format!("{scope}.{system_var}"))
            }
            ExpandError::MalformedEnvEntry { scope, entry } => Some(format!("{scope}.{entry}")),
            _ => None,
        }
    }
}
