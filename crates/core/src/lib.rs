// SPDX-License-Identifier: MIT

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rcr-core: shared scope, identifier, and limit primitives for the
//! variable-resolution and template-expansion pipeline.
//!
//! This crate has no knowledge of the surface config format or of the
//! expansion algorithms themselves — it only supplies the small vocabulary
//! (`Scope`, identifier-pattern checks, the recursion-depth limit) that the
//! `rcr-config` and `rcr-expand` crates both build on, so that "global var
//! names are uppercase" and "`__runner_` is reserved" are defined exactly
//! once.

pub mod ident;
pub mod overridable;
pub mod scope;

pub use ident::{
    is_reserved, is_valid_env_key, is_valid_global_name, is_valid_identifier, is_valid_local_name,
    RESERVED_PREFIX,
};
pub use overridable::Overridable;
pub use scope::Scope;

/// Maximum recursion depth for `%{}` variable substitution.
///
/// Depth exactly this value succeeds; exceeding it is
/// `MaxRecursionDepthExceeded`.
pub const MAX_EXPANSION_DEPTH: usize = 100;
