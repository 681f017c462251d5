use kusto_delta_cli::config::JobsConfig;
use kusto_delta_cli::overrides;

fn config() -> JobsConfig {
    toml::from_str(
        r#"
        [jobs.main]
        current = { scripts = ["current.kql"] }
        target = { scripts = ["target.kql"] }
        action = { file_path = "delta.kql" }

        [jobs.extra]
        current = { scripts = ["a.kql", "b.kql"] }
        target = { scripts = ["t.kql"] }
        "#,
    )
    .unwrap()
}

#[test]
fn overrides_replace_declared_fields() {
    let config = overrides::apply(
        config(),
        &["jobs.main.action.file_path=other.kql".to_string()],
    )
    .unwrap();
    assert_eq!(
        config.jobs["main"].action.file_path.as_deref(),
        Some(std::path::Path::new("other.kql"))
    );
}

#[test]
fn overrides_reach_array_elements() {
    let config = overrides::apply(
        config(),
        &["jobs.extra.current.scripts[1]=c.kql".to_string()],
    )
    .unwrap();
    assert_eq!(
        config.jobs["extra"].current.scripts[1],
        std::path::PathBuf::from("c.kql")
    );
}

#[test]
fn overrides_parse_json_scalars() {
    let config = overrides::apply(
        config(),
        &["jobs.main.action.push_to_console=true".to_string()],
    )
    .unwrap();
    assert!(config.jobs["main"].action.push_to_console);
}

#[test]
fn unknown_field_is_rejected() {
    let err = overrides::apply(config(), &["jobs.main.action.color=red".to_string()])
        .unwrap_err();
    assert!(
        format!("{err:#}").contains("not valid"),
        "got: {err:#}"
    );
}

#[test]
fn missing_intermediate_segment_is_rejected() {
    let err = overrides::apply(
        config(),
        &["jobs.nonexistent.action.file_path=x.kql".to_string()],
    )
    .unwrap_err();
    assert!(
        format!("{err:#}").contains("no field `nonexistent`"),
        "got: {err:#}"
    );
}

#[test]
fn out_of_bounds_index_is_rejected() {
    let err = overrides::apply(
        config(),
        &["jobs.extra.current.scripts[9]=x.kql".to_string()],
    )
    .unwrap_err();
    assert!(format!("{err:#}").contains("out of bounds"), "got: {err:#}");
}

#[test]
fn empty_config_fails_validation() {
    let config: JobsConfig = toml::from_str("[jobs]").unwrap();
    assert!(config.validate().is_err());
}
