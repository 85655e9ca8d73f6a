// SPDX-License-Identifier: MIT

//! The `${name}` / `${?name}` / `${@name}` template-placeholder engine.
//!
//! This grammar is legal only inside `CommandTemplate` fields (`cmd`,
//! `args`, `env`, `workdir`) and is kept in its own scanner, deliberately
//! not unified with [`crate::varsubst`]'s `%{}` engine even though both
//! are hand-rolled `Peekable<Chars>` walks: the two grammars have
//! different escape rules (`\$` vs `\%`), different undefined-reference
//! semantics (missing author var is always an error; missing optional
//! param is an empty string), and `${@name}` has a whole-element
//! constraint `%{}` has no equivalent of.

use crate::spec_ext::CommandField;
use indexmap::IndexMap;
use rcr_config::ParamValue;
use rcr_core::{is_valid_identifier, Scope};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaceholderError {
    #[error("{scope}.{field}: required parameter '{name}' was not supplied")]
    UndefinedParameter {
        scope: Scope,
        field: CommandField,
        name: String,
    },

    #[error("{scope}.{field}: unclosed '${{' placeholder")]
    UnclosedPlaceholder { scope: Scope, field: CommandField },

    #[error("{scope}.{field}: empty placeholder name in '${{}}'")]
    InvalidPlaceholderName { scope: Scope, field: CommandField },

    #[error("{scope}.{field}: invalid escape sequence '\\{ch}'")]
    InvalidEscapeSequence {
        scope: Scope,
        field: CommandField,
        ch: char,
    },

    #[error(
        "{scope}.{field}: '${{@{name}}}' must be the entire array element, not mixed with other text"
    )]
    ArrayInMixedContext {
        scope: Scope,
        field: CommandField,
        name: String,
    },

    #[error("{scope}.{field}: '${{@{name}}}' (array expansion) is only legal in 'args'")]
    ArrayPlaceholderOutsideArgs {
        scope: Scope,
        field: CommandField,
        name: String,
    },

    #[error(
        "{scope}.{field}: parameter '{name}' is a list and cannot be used as '${{{name}}}' or '${{?{name}}}'"
    )]
    ParameterTypeMismatch {
        scope: Scope,
        field: CommandField,
        name: String,
    },

    #[error("{scope}.{field}: '${{}}' placeholder syntax is not legal in an env key")]
    PlaceholderInEnvKey { scope: Scope, field: CommandField },
}

impl PlaceholderError {
    pub fn scope(&self) -> &Scope {
        match self {
            PlaceholderError::UndefinedParameter { scope, .. }
            | PlaceholderError::UnclosedPlaceholder { scope, .. }
            | PlaceholderError::InvalidPlaceholderName { scope, .. }
            | PlaceholderError::InvalidEscapeSequence { scope, .. }
            | PlaceholderError::ArrayInMixedContext { scope, .. }
            | PlaceholderError::ArrayPlaceholderOutsideArgs { scope, .. }
            | PlaceholderError::ParameterTypeMismatch { scope, .. }
            | PlaceholderError::PlaceholderInEnvKey { scope, .. } => scope,
        }
    }

    pub fn field(&self) -> CommandField {
        match self {
            PlaceholderError::UndefinedParameter { field, .. }
            | PlaceholderError::UnclosedPlaceholder { field, .. }
            | PlaceholderError::InvalidPlaceholderName { field, .. }
            | PlaceholderError::InvalidEscapeSequence { field, .. }
            | PlaceholderError::ArrayInMixedContext { field, .. }
            | PlaceholderError::ArrayPlaceholderOutsideArgs { field, .. }
            | PlaceholderError::ParameterTypeMismatch { field, .. }
            | PlaceholderError::PlaceholderInEnvKey { field, .. } => *field,
        }
    }

    pub fn kind(&self) -> crate::errors::ErrorKind {
        use crate::errors::ErrorKind;
        match self {
            PlaceholderError::UndefinedParameter { .. } => ErrorKind::RequiredParamMissing,
            PlaceholderError::UnclosedPlaceholder { .. } => ErrorKind::UnclosedPlaceholder,
            PlaceholderError::InvalidPlaceholderName { .. } => ErrorKind::InvalidPlaceholderName,
            PlaceholderError::InvalidEscapeSequence { .. } => ErrorKind::InvalidEscapeSequence,
            PlaceholderError::ArrayInMixedContext { .. } => ErrorKind::ArrayInMixedContext,
            PlaceholderError::ArrayPlaceholderOutsideArgs { .. } => ErrorKind::ArrayInMixedContext,
            PlaceholderError::ParameterTypeMismatch { .. } => ErrorKind::TemplateTypeMismatch,
            PlaceholderError::PlaceholderInEnvKey { .. } => ErrorKind::PlaceholderInEnvKey,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Required,
    Optional,
    Array,
}

struct Token {
    kind: Kind,
    name: String,
}

/// Expands `cmd` or `workdir`: a single scalar string, `${@}` not allowed.
pub fn expand_scalar(
    scope: &Scope,
    field: CommandField,
    raw: &str,
    params: &IndexMap<String, ParamValue>,
) -> Result<String, PlaceholderError> {
    let mut out = String::new();
    scan(scope, field, raw, |piece| match piece {
        Piece::Literal(s) => {
            out.push_str(s);
            Ok(())
        }
        Piece::Token(tok) => {
            if tok.kind == Kind::Array {
                return Err(PlaceholderError::ArrayPlaceholderOutsideArgs {
                    scope: scope.clone(),
                    field,
                    name: tok.name.clone(),
                });
            }
            out.push_str(&resolve_scalar(scope, field, &tok, params)?);
            Ok(())
        }
    })?;
    Ok(out)
}

/// Expands one `env` entry's value half (the `KEY=` prefix is untouched
/// by this grammar and handled by the caller).
pub fn expand_env_value(
    scope: &Scope,
    raw: &str,
    params: &IndexMap<String, ParamValue>,
) -> Result<String, PlaceholderError> {
    expand_scalar(scope, CommandField::Env, raw, params)
}

/// Expands the `args` list. An element that is *exactly* `${@name}` (no
/// surrounding text) splices every item of the named list parameter in as
/// its own argument; any other appearance of `${@name}` is rejected as
/// [`PlaceholderError::ArrayInMixedContext`].
pub fn expand_args(
    scope: &Scope,
    raw_args: &[String],
    params: &IndexMap<String, ParamValue>,
) -> Result<Vec<String>, PlaceholderError> {
    let mut out = Vec::with_capacity(raw_args.len());
    for arg in raw_args {
        if let Some(name) = whole_array_placeholder(arg) {
            let list = lookup_list(scope, CommandField::Args, &name, params)?;
            out.extend(list.iter().cloned());
            continue;
        }

        let mut piece_out = String::new();
        scan(scope, CommandField::Args, arg, |piece| match piece {
            Piece::Literal(s) => {
                piece_out.push_str(s);
                Ok(())
            }
            Piece::Token(tok) => {
                if tok.kind == Kind::Array {
                    return Err(PlaceholderError::ArrayInMixedContext {
                        scope: scope.clone(),
                        field: CommandField::Args,
                        name: tok.name.clone(),
                    });
                }
                piece_out.push_str(&resolve_scalar(scope, CommandField::Args, &tok, params)?);
                Ok(())
            }
        })?;
        out.push(piece_out);
    }
    Ok(out)
}

/// Expands a template's `env` list (`KEY=VALUE` entries). A whole element
/// that is exactly `${@name}` splices the named list parameter in as that
/// many separate `KEY=VALUE` entries verbatim (not re-parsed); otherwise
/// the entry is split on the first `=` and only the value half may carry
/// placeholders — placeholders are forbidden in the key.
pub fn expand_env_entries(
    scope: &Scope,
    raw_entries: &[String],
    params: &IndexMap<String, ParamValue>,
) -> Result<Vec<String>, crate::errors::ExpandError> {
    use crate::errors::ExpandError;

    let mut out = Vec::with_capacity(raw_entries.len());
    for entry in raw_entries {
        if let Some(name) = whole_array_placeholder(entry) {
            let list = lookup_list(scope, CommandField::Env, &name, params)?;
            out.extend(list.iter().cloned());
            continue;
        }

        let (key, value) = split_env_entry(entry).ok_or_else(|| ExpandError::MalformedEnvEntry {
            scope: scope.clone(),
            entry: entry.clone(),
        })?;
        if key.contains("${") {
            return Err(PlaceholderError::PlaceholderInEnvKey {
                scope: scope.clone(),
                field: CommandField::Env,
            }
            .into());
        }
        let expanded_value = expand_env_value(scope, value, params)?;
        out.push(format!("{key}={expanded_value}"));
    }
    Ok(out)
}

/// Structural-only check of a scalar field (`cmd`/`workdir`): every
/// placeholder must be well-formed and none may be `${@name}` (array).
/// Unlike [`expand_scalar`], no particular parameter needs to actually be
/// supplied — `TemplateValidator` runs before any command names params.
pub fn validate_scalar_field(scope: &Scope, field: CommandField, raw: &str) -> Result<(), PlaceholderError> {
    scan(scope, field, raw, |piece| match piece {
        Piece::Literal(_) => Ok(()),
        Piece::Token(tok) => {
            if tok.kind == Kind::Array {
                return Err(PlaceholderError::ArrayPlaceholderOutsideArgs {
                    scope: scope.clone(),
                    field,
                    name: tok.name.clone(),
                });
            }
            Ok(())
        }
    })
}

/// Structural-only check of `args`: `${@name}` is legal only as an entire
/// element.
pub fn validate_args_field(scope: &Scope, raw_args: &[String]) -> Result<(), PlaceholderError> {
    for arg in raw_args {
        if whole_array_placeholder(arg).is_some() {
            continue;
        }
        scan(scope, CommandField::Args, arg, |piece| match piece {
            Piece::Literal(_) => Ok(()),
            Piece::Token(tok) => {
                if tok.kind == Kind::Array {
                    return Err(PlaceholderError::ArrayInMixedContext {
                        scope: scope.clone(),
                        field: CommandField::Args,
                        name: tok.name.clone(),
                    });
                }
                Ok(())
            }
        })?;
    }
    Ok(())
}

/// Structural-only check of a template's `env` list: same whole-element
/// array rule as `args`, plus placeholders are forbidden in the `KEY` half.
pub fn validate_env_field(scope: &Scope, raw_entries: &[String]) -> Result<(), PlaceholderError> {
    for entry in raw_entries {
        if whole_array_placeholder(entry).is_some() {
            continue;
        }
        let (key, value) = match split_env_entry(entry) {
            Some(kv) => kv,
            None => continue,
        };
        if key.contains("${") {
            return Err(PlaceholderError::PlaceholderInEnvKey {
                scope: scope.clone(),
                field: CommandField::Env,
            });
        }
        scan(scope, CommandField::Env, value, |piece| match piece {
            Piece::Literal(_) => Ok(()),
            Piece::Token(tok) => {
                if tok.kind == Kind::Array {
                    return Err(PlaceholderError::ArrayInMixedContext {
                        scope: scope.clone(),
                        field: CommandField::Env,
                        name: tok.name.clone(),
                    });
                }
                Ok(())
            }
        })?;
    }
    Ok(())
}

/// Splits `KEY=VALUE` on the first `=`. Unlike
/// [`crate::env::parse_env_entry`] this does not validate `KEY` as a POSIX
/// identifier — template `env` entries are validated for that once fully
/// expanded, by the same `parse_env_entry` call the command stage already
/// makes on every other `env` entry.
fn split_env_entry(entry: &str) -> Option<(&str, &str)> {
    entry.split_once('=')
}

/// `true` if `arg` is exactly one `${@name}` token with no other text.
fn whole_array_placeholder(arg: &str) -> Option<String> {
    let rest = arg.strip_prefix("${@")?;
    let name = rest.strip_suffix('}')?;
    if name.is_empty() || name.contains(['$', '{', '}']) {
        return None;
    }
    Some(name.to_string())
}

fn resolve_scalar(
    scope: &Scope,
    field: CommandField,
    tok: &Token,
    params: &IndexMap<String, ParamValue>,
) -> Result<String, PlaceholderError> {
    match params.get(&tok.name) {
        Some(ParamValue::String(s)) => Ok(s.clone()),
        Some(ParamValue::List(_)) => Err(PlaceholderError::ParameterTypeMismatch {
            scope: scope.clone(),
            field,
            name: tok.name.clone(),
        }),
        None => match tok.kind {
            Kind::Required => Err(PlaceholderError::UndefinedParameter {
                scope: scope.clone(),
                field,
                name: tok.name.clone(),
            }),
            Kind::Optional => Ok(String::new()),
            Kind::Array => unreachable!("array tokens never reach resolve_scalar"),
        },
    }
}

fn lookup_list<'a>(
    scope: &Scope,
    field: CommandField,
    name: &str,
    params: &'a IndexMap<String, ParamValue>,
) -> Result<&'a [String], PlaceholderError> {
    match params.get(name) {
        Some(ParamValue::List(items)) => Ok(items),
        Some(ParamValue::String(_)) => Err(PlaceholderError::ParameterTypeMismatch {
            scope: scope.clone(),
            field,
            name: name.to_string(),
        }),
        None => Err(PlaceholderError::UndefinedParameter {
            scope: scope.clone(),
            field,
            name: name.to_string(),
        }),
    }
}

enum Piece<'a> {
    Literal(&'a str),
    Token(Token),
}

fn scan(
    scope: &Scope,
    field: CommandField,
    raw: &str,
    mut on_piece: impl FnMut(Piece<'_>) -> Result<(), PlaceholderError>,
) -> Result<(), PlaceholderError> {
    let mut literal = String::new();
    let mut chars = raw.chars().peekable();

    macro_rules! flush_literal {
        () => {
            if !literal.is_empty() {
                on_piece(Piece::Literal(&literal))?;
                literal.clear();
            }
        };
    }

    while let Some(ch) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some('$') => literal.push('$'),
                Some('\\') => literal.push('\\'),
                Some(other) => {
                    return Err(PlaceholderError::InvalidEscapeSequence {
                        scope: scope.clone(),
                        field,
                        ch: other,
                    })
                }
                None => {
                    return Err(PlaceholderError::InvalidEscapeSequence {
                        scope: scope.clone(),
                        field,
                        ch: '\\',
                    })
                }
            },
            '$' if chars.peek() == Some(&'{') => {
                chars.next();
                let kind = match chars.peek() {
                    Some('?') => {
                        chars.next();
                        Kind::Optional
                    }
                    Some('@') => {
                        chars.next();
                        Kind::Array
                    }
                    _ => Kind::Required,
                };

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
                    return Err(PlaceholderError::UnclosedPlaceholder {
                        scope: scope.clone(),
                        field,
                    });
                }
                if name.is_empty() || !is_valid_identifier(&name) {
                    return Err(PlaceholderError::InvalidPlaceholderName {
                        scope: scope.clone(),
                        field,
                    });
                }

                flush_literal!();
                on_piece(Piece::Token(Token { kind, name }))?;
            }
            other => literal.push(other),
        }
    }
    flush_literal!();
    Ok(())
}

#[cfg(test)]
#[path = "placeholder_tests.rs"]
mod tests;
