use kusto_delta_core::command::Command;
use kusto_delta_core::{compute_delta, parse_script, DatabaseModel, ScriptingContext};

fn model(script: &str) -> DatabaseModel {
    let commands = parse_script(script).expect("script parses");
    DatabaseModel::from_commands(&commands).expect("commands fold")
}

fn scripts(delta: &[Command]) -> Vec<String> {
    let context = ScriptingContext::default();
    delta.iter().map(|command| command.to_script(&context)).collect()
}

fn assert_reaches(current: &DatabaseModel, target: &DatabaseModel, delta: &[Command]) {
    let mut applied = current.clone();
    applied.apply_all(delta).expect("delta applies cleanly");
    assert_eq!(&applied, target);
}

#[test]
fn dropped_table_drops_its_mappings_first() {
    let current = model(
        ".create table T (a:int)\n\n\
         .create table T ingestion json mapping \"M\" '[]'",
    );
    let target = DatabaseModel::default();

    let delta = compute_delta(&current, &target);
    assert_eq!(
        scripts(&delta),
        vec![
            ".drop table T ingestion json mapping \"M\"",
            ".drop table T",
        ]
    );
    assert_reaches(&current, &target, &delta);
}

#[test]
fn removed_mapping_is_dropped() {
    let current = model(
        ".create table T (a:int)\n\n\
         .create table T ingestion json mapping \"M\" '[]'",
    );
    let target = model(".create table T (a:int)");

    let delta = compute_delta(&current, &target);
    assert_eq!(
        scripts(&delta),
        vec![".drop table T ingestion json mapping \"M\""]
    );
    assert_reaches(&current, &target, &delta);
}

#[test]
fn changed_mapping_is_recreated_without_a_drop() {
    let current = model(
        ".create table T (a:int)\n\n\
         .create table T ingestion json mapping \"M\" '[{\"column\":\"a\"}]'",
    );
    let target = model(
        ".create table T (a:int)\n\n\
         .create table T ingestion json mapping \"M\" '[{\"column\":\"a\",\"path\":\"$.a\"}]'",
    );

    let delta = compute_delta(&current, &target);
    assert_eq!(
        scripts(&delta),
        vec![".create table T ingestion json mapping \"M\" '[{\"column\":\"a\",\"path\":\"$.a\"}]'"]
    );
    assert_reaches(&current, &target, &delta);
}

#[test]
fn new_mapping_is_created() {
    let current = model(".create table T (a:int)");
    let target = model(
        ".create table T (a:int)\n\n\
         .create table T ingestion csv mapping \"M\" '[]' with (removeOldestIfRequired=true)",
    );

    let delta = compute_delta(&current, &target);
    assert_eq!(
        scripts(&delta),
        vec![".create table T ingestion csv mapping \"M\" '[]' with (removeOldestIfRequired=true)"]
    );
    assert_reaches(&current, &target, &delta);
}

#[test]
fn recreated_table_gets_its_mappings_back() {
    let current = model(
        ".create table T (a:int)\n\n\
         .create table T ingestion json mapping \"M\" '[]'",
    );
    // A column type change forces drop + create
    let target = model(
        ".create table T (a:string)\n\n\
         .create table T ingestion json mapping \"M\" '[]'",
    );

    let delta = compute_delta(&current, &target);
    assert_eq!(
        scripts(&delta),
        vec![
            ".drop table T ingestion json mapping \"M\"",
            ".drop table T",
            ".create table T (a:string)",
            ".create table T ingestion json mapping \"M\" '[]'",
        ]
    );
    assert_reaches(&current, &target, &delta);
}
