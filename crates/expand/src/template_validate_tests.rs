use super::*;

fn globals() -> IndexMap<String, String> {
    let mut g = IndexMap::new();
    g.insert("AwsPath".to_string(), "/usr/bin/aws".to_string());
    g.insert("AwsRegion".to_string(), "us-west-2".to_string());
    g
}

#[test]
fn valid_template_passes() {
    let template = CommandTemplateSpec {
        cmd: "%{AwsPath}".to_string(),
        args: vec![
            "--region".to_string(),
            "%{AwsRegion}".to_string(),
            "s3".to_string(),
            "sync".to_string(),
            "${src}".to_string(),
            "${dst}".to_string(),
        ],
        env: vec![],
        workdir: None,
        extra: IndexMap::new(),
    };
    assert!(validate_template("s3_sync", &template, &globals()).is_ok());
}

#[test]
fn local_variable_reference_is_rejected() {
    let template = CommandTemplateSpec {
        cmd: "%{local_var}".to_string(),
        ..CommandTemplateSpec::default()
    };
    let err = validate_template("broken", &template, &globals()).unwrap_err();
    assert!(matches!(err, ExpandError::LocalVariableInTemplate { .. }));
}

#[test]
fn undefined_global_reference_is_rejected() {
    let template = CommandTemplateSpec {
        cmd: "%{NoSuchGlobal}".to_string(),
        ..CommandTemplateSpec::default()
    };
    let err = validate_template("broken", &template, &globals()).unwrap_err();
    assert!(matches!(
        err,
        ExpandError::UndefinedGlobalVariableInTemplate { .. }
    ));
}

#[test]
fn array_placeholder_in_cmd_is_rejected() {
    let template = CommandTemplateSpec {
        cmd: "${@tags}".to_string(),
        ..CommandTemplateSpec::default()
    };
    let err = validate_template("broken", &template, &globals()).unwrap_err();
    assert!(matches!(
        err,
        ExpandError::Placeholder(crate::placeholder::PlaceholderError::ArrayPlaceholderOutsideArgs { .. })
    ));
}

#[test]
fn array_placeholder_mixed_with_text_in_args_is_rejected() {
    let template = CommandTemplateSpec {
        cmd: "%{AwsPath}".to_string(),
        args: vec!["prefix-${@tags}".to_string()],
        ..CommandTemplateSpec::default()
    };
    let err = validate_template("broken", &template, &globals()).unwrap_err();
    assert!(matches!(
        err,
        ExpandError::Placeholder(crate::placeholder::PlaceholderError::ArrayInMixedContext { .. })
    ));
}

#[test]
fn placeholder_in_env_key_is_rejected() {
    let template = CommandTemplateSpec {
        cmd: "%{AwsPath}".to_string(),
        env: vec!["${name}=bar".to_string()],
        ..CommandTemplateSpec::default()
    };
    let err = validate_template("broken", &template, &globals()).unwrap_err();
    assert!(matches!(
        err,
        ExpandError::Placeholder(crate::placeholder::PlaceholderError::PlaceholderInEnvKey { .. })
    ));
}

#[test]
fn workdir_is_validated_when_present() {
    let template = CommandTemplateSpec {
        cmd: "%{AwsPath}".to_string(),
        workdir: Some("%{local_workdir}".to_string()),
        ..CommandTemplateSpec::default()
    };
    let err = validate_template("broken", &template, &globals()).unwrap_err();
    assert!(matches!(err, ExpandError::LocalVariableInTemplate { .. }));
}

#[test]
fn validate_templates_runs_every_entry() {
    let mut templates = IndexMap::new();
    templates.insert(
        "ok".to_string(),
        CommandTemplateSpec {
            cmd: "%{AwsPath}".to_string(),
            ..CommandTemplateSpec::default()
        },
    );
    templates.insert(
        "broken".to_string(),
        CommandTemplateSpec {
            cmd: "%{local_var}".to_string(),
            ..CommandTemplateSpec::default()
        },
    );
    let err = validate_templates(&templates, &globals()).unwrap_err();
    assert!(matches!(err, ExpandError::LocalVariableInTemplate { .. }));
}
