//! Loader include-resolution: template-only files named by `includes`
//! merge into the main config's template map, resolved relative to the
//! main config's own directory, and a name collision between two
//! sources is rejected.

use crate::prelude::*;
use std::collections::HashMap;

#[test]
fn included_template_file_merges_and_resolves_relative_to_main_config() {
    let fixture = Fixture::new();
    fixture.write(
        "templates/shared.toml",
        r#"
version = "1"

[command_templates.notify]
cmd = "/usr/bin/notify-send"
args = ["${msg}"]
"#,
    );
    fixture.write(
        "main.toml",
        r#"
version = "1"
includes = ["templates/shared.toml"]

[[groups]]
name = "ops"

[[groups.commands]]
name = "ping"
template = "notify"

[groups.commands.params]
msg = "hello"
"#,
    );

    let (_global, groups) = run_pipeline(&fixture, "main.toml", HashMap::new()).unwrap();
    let command = &groups[0].commands[0];
    assert_eq!(command.cmd, "/usr/bin/notify-send");
    assert_eq!(command.args, vec!["hello".to_string()]);
}

#[test]
fn duplicate_template_name_across_main_and_include_is_rejected() {
    let fixture = Fixture::new();
    fixture.write(
        "templates/shared.toml",
        r#"
version = "1"

[command_templates.notify]
cmd = "/usr/bin/notify-send"
"#,
    );
    fixture.write(
        "main.toml",
        r#"
version = "1"
includes = ["templates/shared.toml"]

[command_templates.notify]
cmd = "/usr/bin/other-notify"
"#,
    );

    let loader = Loader::new(std::sync::Arc::new(DiskVerifier));
    let err = loader.load(&fixture.path("main.toml")).unwrap_err();
    assert!(matches!(err, LoadError::DuplicateTemplateName { .. }));
}
