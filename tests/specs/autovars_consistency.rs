//! Two global vars both referencing `%{__runner_datetime}` within the
//! same `ExpandGlobal` call see the identical substring — the clock is
//! read once per process, not once per reference.

use crate::prelude::*;
use std::collections::HashMap;

#[test]
fn auto_vars_are_consistent_across_references_in_one_expansion() {
    let fixture = Fixture::new();
    fixture.write(
        "main.toml",
        r#"
version = "1"

[global.vars]
TAG_A = "a-%{__runner_datetime}"
TAG_B = "b-%{__runner_datetime}"
"#,
    );

    let (global, _) = run_pipeline(&fixture, "main.toml", HashMap::new()).unwrap();
    let suffix_a = global.vars.get("TAG_A").unwrap().trim_start_matches("a-");
    let suffix_b = global.vars.get("TAG_B").unwrap().trim_start_matches("b-");
    assert_eq!(suffix_a, suffix_b);
}
