use std::fs;

use tempfile::TempDir;

#[test]
fn delta_subcommand_writes_a_script_file() {
    let dir = TempDir::new().unwrap();
    let current = dir.path().join("current.kql");
    let target = dir.path().join("target.kql");
    let output = dir.path().join("delta.kql");

    fs::write(&current, ".create table T (a:int)").unwrap();
    fs::write(
        &target,
        ".create table T (a:int, b:string)\n\n.alter table T policy caching hot = 12h",
    )
    .unwrap();

    kusto_delta_cli::parse_and_run_from([
        "kusto-delta",
        "delta",
        "--current",
        current.to_str().unwrap(),
        "--target",
        target.to_str().unwrap(),
        "--output",
        output.to_str().unwrap(),
    ])
    .unwrap();

    let delta = fs::read_to_string(&output).unwrap();
    assert_eq!(
        delta,
        ".create-merge table T (a:int, b:string)\n\n.alter table T policy caching hot = 12h"
    );
}

#[test]
fn delta_subcommand_writes_a_folder_layout() {
    let dir = TempDir::new().unwrap();
    let current = dir.path().join("current.kql");
    let target = dir.path().join("target.kql");
    let folder = dir.path().join("delta");

    fs::write(&current, "").unwrap();
    fs::write(
        &target,
        ".create table T (a:int) with (folder=\"ops\")\n\n.alter database DB policy caching hot = 1d",
    )
    .unwrap();

    kusto_delta_cli::parse_and_run_from([
        "kusto-delta",
        "delta",
        "--current",
        current.to_str().unwrap(),
        "--target",
        target.to_str().unwrap(),
        "--folder",
        folder.to_str().unwrap(),
    ])
    .unwrap();

    assert_eq!(
        fs::read_to_string(folder.join("tables/create/ops/T.kql")).unwrap(),
        ".create table T (a:int) with (folder=\"ops\")"
    );
    assert_eq!(
        fs::read_to_string(folder.join("databases/policies/caching/create.kql")).unwrap(),
        ".alter database DB policy caching hot = 1d"
    );
}

#[test]
fn run_subcommand_executes_configured_jobs() {
    let dir = TempDir::new().unwrap();
    let current = dir.path().join("current.kql");
    let target = dir.path().join("target.kql");
    let output = dir.path().join("out.kql");
    let config = dir.path().join("kusto-delta.toml");

    fs::write(&current, ".create table T (a:int)").unwrap();
    fs::write(&target, ".create table T (a:int)\n\n.create table U (x:real)").unwrap();
    fs::write(
        &config,
        format!(
            "[jobs.main]\n\
             current = {{ scripts = [{:?}] }}\n\
             target = {{ scripts = [{:?}] }}\n\
             action = {{ file_path = {:?} }}\n",
            current, target, output
        ),
    )
    .unwrap();

    kusto_delta_cli::parse_and_run_from([
        "kusto-delta",
        "run",
        "--config",
        config.to_str().unwrap(),
    ])
    .unwrap();

    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        ".create table U (x:real)"
    );
}

#[test]
fn run_subcommand_honors_overrides() {
    let dir = TempDir::new().unwrap();
    let current = dir.path().join("current.kql");
    let target = dir.path().join("target.kql");
    let output = dir.path().join("overridden.kql");
    let config = dir.path().join("kusto-delta.toml");

    fs::write(&current, "").unwrap();
    fs::write(&target, ".create table T (a:int)").unwrap();
    fs::write(
        &config,
        format!(
            "[jobs.main]\n\
             current = {{ scripts = [{:?}] }}\n\
             target = {{ scripts = [{:?}] }}\n",
            current, target
        ),
    )
    .unwrap();

    kusto_delta_cli::parse_and_run_from([
        "kusto-delta",
        "run",
        "--config",
        config.to_str().unwrap(),
        "--set",
        &format!("jobs.main.action.file_path={}", output.display()),
    ])
    .unwrap();

    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        ".create table T (a:int)"
    );
}

#[test]
fn unknown_job_fails() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("kusto-delta.toml");
    fs::write(
        &config,
        "[jobs.main]\n\
         current = { scripts = [\"a.kql\"] }\n\
         target = { scripts = [\"b.kql\"] }\n",
    )
    .unwrap();

    let err = kusto_delta_cli::parse_and_run_from([
        "kusto-delta",
        "run",
        "--config",
        config.to_str().unwrap(),
        "--job",
        "nope",
    ])
    .unwrap_err();
    assert!(format!("{err:#}").contains("no job named `nope`"), "got: {err:#}");
}

#[test]
fn folder_sources_read_every_script() {
    let dir = TempDir::new().unwrap();
    let schemas = dir.path().join("schemas");
    fs::create_dir_all(schemas.join("01-tables")).unwrap();
    fs::write(schemas.join("01-tables/t.kql"), ".create table T (a:int)").unwrap();
    fs::write(
        schemas.join("02-policies.kql"),
        ".alter table T policy caching hot = 1d",
    )
    .unwrap();

    let current = dir.path().join("empty.kql");
    fs::write(&current, "").unwrap();
    let output = dir.path().join("delta.kql");

    kusto_delta_cli::parse_and_run_from([
        "kusto-delta",
        "delta",
        "--current",
        current.to_str().unwrap(),
        "--target",
        schemas.to_str().unwrap(),
        "--output",
        output.to_str().unwrap(),
    ])
    .unwrap();

    let delta = fs::read_to_string(&output).unwrap();
    assert_eq!(
        delta,
        ".create table T (a:int)\n\n.alter table T policy caching hot = 1d"
    );
}
