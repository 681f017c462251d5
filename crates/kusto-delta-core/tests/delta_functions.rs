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
fn removed_function_is_dropped_first() {
    let current = model(
        ".create table T (a:int)\n\n\
         .create-or-alter function Old() { T | count }",
    );
    let target = DatabaseModel::default();

    let delta = compute_delta(&current, &target);
    assert_eq!(scripts(&delta), vec![".drop function Old", ".drop table T"]);
    assert_reaches(&current, &target, &delta);
}

#[test]
fn changed_function_is_recreated_without_a_drop() {
    let current = model(".create-or-alter function F(n:int) { print n }");
    let target = model(".create-or-alter function F(n:int) { print n + 1 }");

    let delta = compute_delta(&current, &target);
    assert_eq!(
        scripts(&delta),
        vec![".create-or-alter function F(n:int) {\nprint n + 1\n}"]
    );
    assert_reaches(&current, &target, &delta);
}

#[test]
fn new_function_is_created_last() {
    let current = DatabaseModel::default();
    let target = model(
        ".create table T (a:int)\n\n\
         .alter table T policy caching hot = 1d\n\n\
         .create-or-alter function with (folder=\"queries\") F() { T | count }",
    );

    let delta = compute_delta(&current, &target);
    assert_eq!(
        scripts(&delta),
        vec![
            ".create table T (a:int)",
            ".alter table T policy caching hot = 1d",
            ".create-or-alter function with (folder=\"queries\") F() {\nT | count\n}",
        ]
    );
    assert_reaches(&current, &target, &delta);
}

#[test]
fn folder_change_alone_recreates_the_function() {
    let current = model(".create-or-alter function with (folder=\"a\") F() { print 1 }");
    let target = model(".create-or-alter function with (folder=\"b\") F() { print 1 }");

    let delta = compute_delta(&current, &target);
    assert_eq!(
        scripts(&delta),
        vec![".create-or-alter function with (folder=\"b\") F() {\nprint 1\n}"]
    );
    assert_reaches(&current, &target, &delta);
}

#[test]
fn functions_sort_by_name_within_the_stage() {
    let current = DatabaseModel::default();
    let target = model(
        ".create-or-alter function Zeta() { print 1 }\n\n\
         .create-or-alter function Alpha() { print 2 }",
    );

    let delta = compute_delta(&current, &target);
    assert_eq!(
        scripts(&delta),
        vec![
            ".create-or-alter function Alpha() {\nprint 2\n}",
            ".create-or-alter function Zeta() {\nprint 1\n}",
        ]
    );
}
