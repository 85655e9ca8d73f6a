use super::*;
use crate::verify::fake::FakeVerifier;
use std::path::PathBuf;

fn loader_with(main: (&str, &str), includes: &[(&str, &str)]) -> (Loader, PathBuf) {
    let verifier = FakeVerifier::new();
    let main_path = PathBuf::from(main.0);
    verifier.put(main_path.clone(), main.1.as_bytes());
    for (path, contents) in includes {
        verifier.put(PathBuf::from(path), contents.as_bytes());
    }
    (Loader::new(Arc::new(verifier)), main_path)
}

#[test]
fn loads_minimal_config() {
    let (loader, path) = loader_with(
        (
            "/etc/rcr/main.toml",
            r#"
            version = "1"

            [global]
            vars = { ROOT = "/srv" }

            [[groups]]
            name = "deploy"
            "#,
        ),
        &[],
    );
    let config = loader.load(&path).unwrap();
    assert_eq!(config.version, "1");
    assert_eq!(config.groups.len(), 1);
    assert_eq!(config.groups[0].name, "deploy");
    assert!(config.templates.is_empty());
}

#[test]
fn merges_included_template_file() {
    let (loader, path) = loader_with(
        (
            "/etc/rcr/main.toml",
            r#"
            version = "1"
            includes = ["templates.toml"]
            "#,
        ),
        &[(
            "/etc/rcr/templates.toml",
            r#"
            version = "1"
            [command_templates.s3_sync]
            cmd = "aws"
            args = ["s3", "sync"]
            "#,
        )],
    );
    let config = loader.load(&path).unwrap();
    assert!(config.templates.contains_key("s3_sync"));
}

#[test]
fn rejects_duplicate_template_name_across_main_and_include() {
    let (loader, path) = loader_with(
        (
            "/etc/rcr/main.toml",
            r#"
            version = "1"
            includes = ["templates.toml"]
            [command_templates.s3_sync]
            cmd = "aws"
            "#,
        ),
        &[(
            "/etc/rcr/templates.toml",
            r#"
            version = "1"
            [command_templates.s3_sync]
            cmd = "aws"
            "#,
        )],
    );
    let err = loader.load(&path).unwrap_err();
    assert!(matches!(err, LoadError::DuplicateTemplateName { name, .. } if name == "s3_sync"));
}

#[test]
fn rejects_template_with_name_field() {
    let (loader, path) = loader_with(
        (
            "/etc/rcr/main.toml",
            r#"
            version = "1"
            [command_templates.s3_sync]
            cmd = "aws"
            name = "s3_sync"
            "#,
        ),
        &[],
    );
    let err = loader.load(&path).unwrap_err();
    assert!(matches!(err, LoadError::TemplateContainsNameField { name } if name == "s3_sync"));
}

#[test]
fn rejects_template_missing_cmd() {
    let (loader, path) = loader_with(
        (
            "/etc/rcr/main.toml",
            r#"
            version = "1"
            [command_templates.broken]
            args = ["x"]
            "#,
        ),
        &[],
    );
    let err = loader.load(&path).unwrap_err();
    assert!(matches!(err, LoadError::MissingRequiredField { name, field } if name == "broken" && field == "cmd"));
}

#[test]
fn rejects_reserved_template_name() {
    let (loader, path) = loader_with(
        (
            "/etc/rcr/main.toml",
            r#"
            version = "1"
            [command_templates.__runner_evil]
            cmd = "aws"
            "#,
        ),
        &[],
    );
    let err = loader.load(&path).unwrap_err();
    assert!(matches!(err, LoadError::ReservedTemplateName { name } if name == "__runner_evil"));
}

#[test]
fn rejects_template_file_with_extra_section() {
    let (loader, path) = loader_with(
        (
            "/etc/rcr/main.toml",
            r#"
            version = "1"
            includes = ["templates.toml"]
            "#,
        ),
        &[(
            "/etc/rcr/templates.toml",
            r#"
            version = "1"
            [[groups]]
            name = "nope"
            "#,
        )],
    );
    let err = loader.load(&path).unwrap_err();
    assert!(matches!(err, LoadError::TemplateFileInvalidFormat { .. }));
}

#[test]
fn surfaces_verification_failure_on_main_config() {
    let verifier = FakeVerifier::new();
    let main_path = PathBuf::from("/etc/rcr/main.toml");
    verifier.put(main_path.clone(), b"version = \"1\"".to_vec());
    verifier.fail_for(main_path.clone());
    let loader = Loader::new(Arc::new(verifier));
    let err = loader.load(&main_path).unwrap_err();
    assert!(matches!(err, LoadError::Verification(VerificationError::HashMismatch { .. })));
}

#[test]
fn surfaces_missing_include_as_included_file_not_found() {
    let (loader, path) = loader_with(
        (
            "/etc/rcr/main.toml",
            r#"
            version = "1"
            includes = ["missing.toml"]
            "#,
        ),
        &[],
    );
    let err = loader.load(&path).unwrap_err();
    assert!(matches!(err, LoadError::IncludedFileNotFound { .. }));
}
