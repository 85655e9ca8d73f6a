//! A template field referencing a name that isn't a declared global var
//! is rejected before any group or command is ever expanded.

use crate::prelude::*;
use std::collections::HashMap;

#[test]
fn template_referencing_undeclared_local_var_is_rejected() {
    let fixture = Fixture::new();
    fixture.write(
        "main.toml",
        r#"
version = "1"

[command_templates.bad]
cmd = "%{local_var}"
"#,
    );

    let err = run_pipeline(&fixture, "main.toml", HashMap::new()).unwrap_err();
    assert_eq!(err.expand_kind(), Some(ErrorKind::LocalVariableInTemplate));
}
