// SPDX-License-Identifier: MIT

//! The immutable `Runtime*` records: built once by the expansion pipeline
//! and shared read-only by every downstream consumer. None of these types
//! are mutated after construction — each stage produces the next record
//! from the previous one plus its own raw spec input.

use indexmap::{IndexMap, IndexSet};
use std::path::PathBuf;

/// Fully expanded global scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeGlobal {
    pub vars: IndexMap<String, String>,
    pub env: IndexMap<String, String>,
    pub env_allowed: IndexSet<String>,
    pub workdir: Option<String>,
    pub timeout: Option<u64>,
    pub output_size_limit: Option<i64>,
    pub verify_files: Vec<String>,
}

/// Fully expanded group scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeGroup {
    pub name: String,
    pub vars: IndexMap<String, String>,
    pub env: IndexMap<String, String>,
    pub env_allowed: IndexSet<String>,
    pub workdir: Option<String>,
    pub timeout: Option<u64>,
    pub output_size_limit: Option<i64>,
    pub verify_files: Vec<String>,
    /// Canonicalized, duplicate-checked absolute paths.
    pub cmd_allowed: Vec<PathBuf>,
    pub commands: Vec<RuntimeCommand>,
}

/// Fully expanded, ready-to-execute command. Execution itself lives
/// outside this crate — this is the final artifact handed off to
/// whatever runs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeCommand {
    pub name: String,
    pub cmd: String,
    pub args: Vec<String>,
    pub env: IndexMap<String, String>,
    pub workdir: Option<String>,
    pub output_file: Option<String>,
    pub timeout: u64,
    pub output_size_limit: i64,
}
