// SPDX-License-Identifier: MIT

//! Identifier-pattern checks shared by every scope and both substitution
//! grammars.

/// Prefix reserved for engine-supplied auto-variables. User-defined names
/// may never begin with it.
pub const RESERVED_PREFIX: &str = "__runner_";

/// `true` if `name` matches `[A-Za-z_][A-Za-z0-9_]*` and is non-empty.
///
/// This is the base identifier pattern shared by variable names, template
/// names, and POSIX env-var keys.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// `true` if `name` is a valid identifier whose first character is
/// uppercase, as required of global-scope user var names.
pub fn is_valid_global_name(name: &str) -> bool {
    is_valid_identifier(name) && name.starts_with(|c: char| c.is_ascii_uppercase())
}

/// `true` if `name` is a valid identifier whose first character is
/// lowercase, as required of group/command-scope user var names.
pub fn is_valid_local_name(name: &str) -> bool {
    is_valid_identifier(name) && name.starts_with(|c: char| c.is_ascii_lowercase())
}

/// `true` if `name` begins with the reserved `__runner_` prefix.
pub fn is_reserved(name: &str) -> bool {
    name.starts_with(RESERVED_PREFIX)
}

/// `true` if `key` is a valid POSIX environment-variable identifier. Same
/// pattern as [`is_valid_identifier`], named separately because the two
/// checks are conceptually distinct call sites (env keys are never
/// scope-cased).
pub fn is_valid_env_key(key: &str) -> bool {
    is_valid_identifier(key)
}

#[cfg(test)]
#[path = "ident_tests.rs"]
mod tests;
