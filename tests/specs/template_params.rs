//! A command built from a template substitutes globals into the
//! template and params into the command, in that order.

use crate::prelude::*;
use std::collections::HashMap;

#[test]
fn templated_command_expands_globals_then_params() {
    let fixture = Fixture::new();
    fixture.write(
        "main.toml",
        r#"
version = "1"

[global.vars]
AwsPath = "/usr/bin/aws"
AwsRegion = "us-west-2"

[command_templates.s3_sync]
cmd = "%{AwsPath}"
args = ["--region", "%{AwsRegion}", "s3", "sync", "${src}", "${dst}"]

[[groups]]
name = "deploy"

[[groups.commands]]
name = "sync-data"
template = "s3_sync"

[groups.commands.params]
src = "/data"
dst = "s3://b"
"#,
    );

    let (_global, groups) = run_pipeline(&fixture, "main.toml", HashMap::new()).unwrap();
    let command = &groups[0].commands[0];
    assert_eq!(command.cmd, "/usr/bin/aws");
    assert_eq!(
        command.args,
        vec!["--region", "us-west-2", "s3", "sync", "/data", "s3://b"]
    );
}
