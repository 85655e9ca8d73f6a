// SPDX-License-Identifier: MIT

//! Small vocabulary shared across the expansion engines that doesn't
//! belong to the surface spec types themselves.

use std::fmt;

/// Which field of a `CommandTemplate` a placeholder error occurred in —
/// legality and array-whole-element rules differ by field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandField {
    Cmd,
    Args,
    Env,
    Workdir,
}

impl fmt::Display for CommandField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CommandField::Cmd => "cmd",
            CommandField::Args => "args",
            CommandField::Env => "env",
            CommandField::Workdir => "workdir",
        };
        write!(f, "{s}")
    }
}
