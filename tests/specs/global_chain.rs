//! A chain of global vars each referencing the previous one resolves
//! left-to-right.

use crate::prelude::*;
use std::collections::HashMap;

#[test]
fn global_var_chain_resolves_in_declaration_order() {
    let fixture = Fixture::new();
    fixture.write(
        "main.toml",
        r#"
version = "1"

[global.vars]
A = "x"
B = "%{A}y"
C = "%{B}z"
"#,
    );

    let (global, _) = run_pipeline(&fixture, "main.toml", HashMap::new()).unwrap();
    assert_eq!(global.vars.get("C").unwrap(), "xyz");
}
