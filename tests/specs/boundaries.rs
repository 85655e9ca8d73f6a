//! Boundary behaviors: recursion depth, empty allowlists, and missing
//! system variables.

use crate::prelude::*;
use std::collections::HashMap;

/// Builds a chain of exactly `depth` global vars, each referencing the
/// previous one, so the deepest var requires `depth` levels of `%{}`
/// resolution to reach a literal.
fn chained_vars_toml(depth: usize) -> String {
    let mut body = String::from("version = \"1\"\n\n[global.vars]\nV0 = \"base\"\n");
    for i in 1..=depth {
        body.push_str(&format!("V{i} = \"%{{V{prev}}}\"\n", prev = i - 1));
    }
    body
}

#[test]
fn depth_exactly_100_succeeds() {
    let fixture = Fixture::new();
    fixture.write("main.toml", &chained_vars_toml(100));

    let (global, _) = run_pipeline(&fixture, "main.toml", HashMap::new()).unwrap();
    assert_eq!(global.vars.get("V100").unwrap(), "base");
}

#[test]
fn depth_101_fails_with_max_recursion_depth_exceeded() {
    let fixture = Fixture::new();
    fixture.write("main.toml", &chained_vars_toml(101));

    let err = run_pipeline(&fixture, "main.toml", HashMap::new()).unwrap_err();
    assert_eq!(err.expand_kind(), Some(ErrorKind::MaxRecursionDepthExceeded));
}

#[test]
fn empty_allowlist_rejects_every_env_import() {
    let fixture = Fixture::new();
    fixture.write(
        "main.toml",
        r#"
version = "1"

[global]
env_allowed = []
env_import = ["h=HOME"]
"#,
    );

    let mut env = HashMap::new();
    env.insert("HOME", "/root");
    let err = run_pipeline(&fixture, "main.toml", env).unwrap_err();
    assert_eq!(err.expand_kind(), Some(ErrorKind::VariableNotInAllowlist));
}

#[test]
fn env_import_of_missing_system_variable_yields_empty_string() {
    let fixture = Fixture::new();
    fixture.write(
        "main.toml",
        r#"
version = "1"

[global]
env_allowed = ["DOES_NOT_EXIST"]
env_import = ["imported=DOES_NOT_EXIST"]
"#,
    );

    let (global, _) = run_pipeline(&fixture, "main.toml", HashMap::new()).unwrap();
    assert_eq!(global.vars.get("imported").unwrap(), "");
}

#[test]
fn group_with_absent_env_allowed_inherits_global_allowlist() {
    let fixture = Fixture::new();
    fixture.write(
        "main.toml",
        r#"
version = "1"

[global]
env_allowed = ["HOME"]

[[groups]]
name = "deploy"
env_import = ["local_home=HOME"]
"#,
    );

    let mut env = HashMap::new();
    env.insert("HOME", "/root");
    let (_global, groups) = run_pipeline(&fixture, "main.toml", env).unwrap();
    assert_eq!(groups[0].vars.get("local_home").unwrap(), "/root");
}

#[test]
fn group_with_empty_env_allowed_rejects_all_even_when_global_permits() {
    let fixture = Fixture::new();
    fixture.write(
        "main.toml",
        r#"
version = "1"

[global]
env_allowed = ["HOME"]

[[groups]]
name = "deploy"
env_allowed = []
env_import = ["local_home=HOME"]
"#,
    );

    let mut env = HashMap::new();
    env.insert("HOME", "/root");
    let err = run_pipeline(&fixture, "main.toml", env).unwrap_err();
    assert_eq!(err.expand_kind(), Some(ErrorKind::VariableNotInAllowlist));
}
