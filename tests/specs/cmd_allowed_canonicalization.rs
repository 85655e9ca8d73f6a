//! Two `cmd_allowed` entries that canonicalize to the same path — one a
//! symlink to the other — are rejected as a resolved-path duplicate,
//! using the real filesystem canonicalizer.

use crate::prelude::*;
use std::collections::HashMap;

#[test]
fn symlinked_cmd_allowed_entry_is_a_duplicate() {
    let fixture = Fixture::new();
    let bin_dir = fixture.path("bin");
    std::fs::create_dir_all(&bin_dir).unwrap();
    let real_tool = bin_dir.join("tool");
    std::fs::write(&real_tool, b"").unwrap();
    let link = bin_dir.join("tool-link");
    #[cfg(unix)]
    std::os::unix::fs::symlink(&real_tool, &link).unwrap();

    fixture.write(
        "main.toml",
        &format!(
            r#"
version = "1"

[[groups]]
name = "deploy"
cmd_allowed = ["{}", "{}"]
"#,
            real_tool.display(),
            link.display()
        ),
    );

    let loader = Loader::new(std::sync::Arc::new(DiskVerifier));
    let config = loader.load(&fixture.path("main.toml")).unwrap();
    let process_vars = ProcessAutoVars::from_parts("20260726120000.000", "1");
    let err = expand_config(
        &config,
        &process_vars,
        &FixedEnv(HashMap::new()),
        &RealPathResolver,
        30,
        1_048_576,
    )
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::DuplicateResolvedPath);
}
