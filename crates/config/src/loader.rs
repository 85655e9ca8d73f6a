// SPDX-License-Identifier: MIT

//! The Loader: reads and verifies the main config and any included
//! template-only files, parses both into typed specs, merges template
//! maps (rejecting duplicate names), and runs the syntactic-only sanity
//! checks that don't require a resolved `RuntimeGlobal` (full semantic
//! validation of `%{}` references against global vars is
//! `TemplateValidator`, which lives in `rcr-expand` since it needs the
//! global expansion stage's output).

use crate::spec::{CommandTemplateSpec, ConfigSpec, GlobalSpec, GroupSpec, TemplateOnlyDoc};
use crate::verify::{VerificationCapability, VerificationError};
use indexmap::IndexMap;
use rcr_core::ident;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Errors from loading and merging the surface config.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Verification(#[from] VerificationError),

    #[error("{path}: not valid UTF-8")]
    InvalidUtf8 { path: String },

    #[error("{path}: {source}")]
    Toml {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("include {path} not found (referenced from {referenced_from})")]
    IncludedFileNotFound {
        path: String,
        referenced_from: String,
    },

    #[error("template file {path} has invalid format: {reason}")]
    TemplateFileInvalidFormat { path: String, reason: String },

    #[error(
        "duplicate template name '{name}': defined in both {first_source} and {second_source}"
    )]
    DuplicateTemplateName {
        name: String,
        first_source: String,
        second_source: String,
    },

    #[error("invalid template name '{name}'")]
    InvalidTemplateName { name: String },

    #[error("template name '{name}' uses the reserved __runner_ prefix")]
    ReservedTemplateName { name: String },

    #[error("template '{name}' must not declare a 'name' field")]
    TemplateContainsNameField { name: String },

    #[error("template '{name}' is missing required field '{field}'")]
    MissingRequiredField { name: String, field: String },
}

/// The merged, typed result of loading a config and its includes.
#[derive(Debug, Clone)]
pub struct Config {
    pub version: String,
    pub global: GlobalSpec,
    pub groups: Vec<GroupSpec>,
    pub templates: IndexMap<String, CommandTemplateSpec>,
}

/// Loads and merges a main config file plus its `includes`.
///
/// Construction always requires a real [`VerificationCapability`] — there
/// is no constructor that omits it in non-test code, so a Loader can never
/// be built in a way that skips hash verification.
pub struct Loader {
    verifier: Arc<dyn VerificationCapability>,
}

impl Loader {
    pub fn new(verifier: Arc<dyn VerificationCapability>) -> Self {
        Self { verifier }
    }

    pub fn load(&self, main_path: &Path) -> Result<Config, LoadError> {
        let main_str = main_path.display().to_string();
        let bytes = self.verifier.verify_and_read_config(main_path)?;
        let content = String::from_utf8(bytes).map_err(|_| LoadError::InvalidUtf8 {
            path: main_str.clone(),
        })?;

        let config_spec: ConfigSpec = toml::from_str(&content).map_err(|source| LoadError::Toml {
            path: main_str.clone(),
            source,
        })?;

        tracing::debug!(path = %main_str, includes = config_spec.includes.len(), "loaded main config");

        let mut templates = config_spec.command_templates;
        let mut template_sources: IndexMap<String, String> = templates
            .keys()
            .map(|name| (name.clone(), main_str.clone()))
            .collect();

        let base_dir = main_path.parent().unwrap_or_else(|| Path::new("."));
        for include in &config_spec.includes {
            let include_path = resolve_include_path(base_dir, include);
            let include_str = include_path.display().to_string();

            let bytes = self
                .verifier
                .verify_and_read_template(&include_path)
                .map_err(|e| match e {
                    VerificationError::ReadFailed { path, .. } => LoadError::IncludedFileNotFound {
                        path,
                        referenced_from: main_str.clone(),
                    },
                    other => LoadError::Verification(other),
                })?;
            let content = String::from_utf8(bytes).map_err(|_| LoadError::InvalidUtf8 {
                path: include_str.clone(),
            })?;

            let doc: TemplateOnlyDoc = toml::from_str(&content).map_err(|source| LoadError::Toml {
                path: include_str.clone(),
                source,
            })?;
            if !doc.extra.is_empty() {
                let unexpected: Vec<&str> = doc.extra.keys().map(String::as_str).collect();
                return Err(LoadError::TemplateFileInvalidFormat {
                    path: include_str,
                    reason: format!("unexpected section(s): {}", unexpected.join(", ")),
                });
            }

            for (name, template) in doc.command_templates {
                if let Some(first_source) = template_sources.get(&name) {
                    return Err(LoadError::DuplicateTemplateName {
                        name,
                        first_source: first_source.clone(),
                        second_source: include_str,
                    });
                }
                template_sources.insert(name.clone(), include_str.clone());
                templates.insert(name, template);
            }
        }

        for (name, template) in &templates {
            validate_template_syntax(name, template)?;
        }

        Ok(Config {
            version: config_spec.version,
            global: config_spec.global,
            groups: config_spec.groups,
            templates,
        })
    }
}

fn resolve_include_path(base_dir: &Path, include: &str) -> PathBuf {
    let include_path = Path::new(include);
    if include_path.is_absolute() {
        include_path.to_path_buf()
    } else {
        base_dir.join(include_path)
    }
}

/// Syntactic-only sanity for a template: every template must declare
/// `cmd`, its name must be a valid identifier, and it must not carry a
/// stray `name` field. Full semantic validation (global-var existence,
/// placeholder field constraints) is [`rcr_expand`]'s `TemplateValidator`,
/// run once the global scope has been expanded.
fn validate_template_syntax(
    name: &str,
    template: &CommandTemplateSpec,
) -> Result<(), LoadError> {
    if !ident::is_valid_identifier(name) {
        return Err(LoadError::InvalidTemplateName {
            name: name.to_string(),
        });
    }
    if ident::is_reserved(name) {
        return Err(LoadError::ReservedTemplateName {
            name: name.to_string(),
        });
    }
    if template.extra.contains_key("name") {
        return Err(LoadError::TemplateContainsNameField {
            name: name.to_string(),
        });
    }
    if template.cmd.trim().is_empty() {
        return Err(LoadError::MissingRequiredField {
            name: name.to_string(),
            field: "cmd".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
