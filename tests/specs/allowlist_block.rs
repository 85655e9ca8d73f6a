//! An `env_import` naming a system var absent from the effective
//! allowlist is rejected, not silently dropped.

use crate::prelude::*;
use std::collections::HashMap;

#[test]
fn env_import_outside_allowlist_is_rejected() {
    let fixture = Fixture::new();
    fixture.write(
        "main.toml",
        r#"
version = "1"

[global]
env_allowed = ["PATH"]
env_import = ["h=HOME"]
"#,
    );

    let mut env = HashMap::new();
    env.insert("HOME", "/root");
    let err = run_pipeline(&fixture, "main.toml", env).unwrap_err();

    assert_eq!(err.expand_kind(), Some(ErrorKind::VariableNotInAllowlist));
    match err {
        PipelineError::Expand(ExpandError::EnvVarNotAllowed { name, .. }) => {
            assert_eq!(name, "HOME");
        }
        other => panic!("expected EnvVarNotAllowed, got {other:?}"),
    }
}
