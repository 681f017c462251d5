use kusto_delta_core::command::Command;
use kusto_delta_core::schema::{EntityName, EntityType, KustoTimespan, PolicyKind};
use kusto_delta_core::{compute_delta, parse_script, DatabaseModel, ScriptingContext};

fn model(script: &str) -> DatabaseModel {
    let commands = parse_script(script).expect("script parses");
    DatabaseModel::from_commands(&commands).expect("commands fold")
}

fn scripts(delta: &[Command]) -> Vec<String> {
    let context = ScriptingContext::default();
    delta.iter().map(|command| command.to_script(&context)).collect()
}

#[test]
fn none_to_one_emits_a_single_alter() {
    let current = model(".create table T (a:int)");
    let target = model(
        ".create table T (a:int)\n\n\
         .alter table T policy caching hot = 12h",
    );

    let delta = compute_delta(&current, &target);
    assert_eq!(delta.len(), 1);
    let Command::AlterCachingPolicy(alter) = &delta[0] else {
        panic!("expected a caching alter, got {delta:?}");
    };
    assert_eq!(alter.entity_type, EntityType::Table);
    assert_eq!(alter.entity, EntityName::new("T"));
    assert_eq!(alter.hot_data, KustoTimespan::hours(12));
    assert!(alter.hot_windows.is_empty());
}

#[test]
fn one_to_none_emits_a_single_delete() {
    let current = model(
        ".create table T (a:int)\n\n\
         .alter table T policy caching hot = 12h",
    );
    let target = model(".create table T (a:int)");

    let delta = compute_delta(&current, &target);
    assert_eq!(scripts(&delta), vec![".delete table T policy caching"]);

    let mut applied = current.clone();
    applied.apply_all(&delta).unwrap();
    assert_eq!(applied, target);
}

#[test]
fn unchanged_caching_is_a_no_op() {
    let script = ".create table A (a:int)\n\n.alter table A policy caching hot = 45ms";
    let delta = compute_delta(&model(script), &model(script));
    assert!(delta.is_empty(), "got {delta:?}");
}

#[test]
fn changed_hot_span_emits_the_target_value() {
    let current = model(".alter database DB policy caching hot = 1d");
    let target = model(".alter database DB policy caching hot = 2d");

    let delta = compute_delta(&current, &target);
    assert_eq!(
        scripts(&delta),
        vec![".alter database DB policy caching hot = 2d"]
    );
}

#[test]
fn hot_windows_participate_in_equality() {
    let base = ".create table T (a:int)\n\n";
    let current = model(&format!(
        "{base}.alter table T policy caching hot = 7d, hot_window = datetime(2023-01-01) .. datetime(2023-02-01)"
    ));
    let same = model(&format!(
        "{base}.alter table T policy caching hot = 7d, hot_window = datetime(2023-01-01) .. datetime(2023-02-01)"
    ));
    let moved = model(&format!(
        "{base}.alter table T policy caching hot = 7d, hot_window = datetime(2023-03-01) .. datetime(2023-04-01)"
    ));

    assert!(compute_delta(&current, &same).is_empty());

    let delta = compute_delta(&current, &moved);
    assert_eq!(
        scripts(&delta),
        vec![
            ".alter table T policy caching hot = 7d, hot_window = datetime(2023-03-01T00:00:00) .. datetime(2023-04-01T00:00:00)"
        ]
    );
}

#[test]
fn caching_delta_is_keyed_by_policy_kind() {
    let current = model(
        ".create table T (a:int)\n\n\
         .alter table T policy caching hot = 1d",
    );
    let target = model(
        ".create table T (a:int)\n\n\
         .alter table T policy caching hot = 1d\n\n\
         .alter table T policy retention\n```\n{\"SoftDeletePeriod\": \"30.00:00:00\"}\n```",
    );

    let delta = compute_delta(&current, &target);
    assert_eq!(delta.len(), 1);
    let Command::AlterPolicy(alter) = &delta[0] else {
        panic!("expected a retention alter, got {delta:?}");
    };
    assert_eq!(alter.kind, PolicyKind::Retention);
}
