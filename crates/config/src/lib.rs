// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rcr-config: surface TOML parsing, the injected verification boundary,
//! and the Loader that merges a main config with its included template
//! files into a single typed [`loader::Config`].
//!
//! This crate stops at the typed, still-unexpanded spec layer — turning
//! `%{}`/`${}` references into resolved `Runtime*` records is `rcr-expand`.

pub mod loader;
pub mod spec;
pub mod verify;

pub use loader::{Config, LoadError, Loader};
pub use spec::{
    CommandSpec, CommandTemplateSpec, ConfigSpec, GlobalSpec, GroupSpec, ParamValue,
    TemplateOnlyDoc,
};
pub use verify::{VerificationCapability, VerificationError};
