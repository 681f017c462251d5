use kusto_delta_core::schema::{EntityName, EntityType, MappingKey, MappingKind, PolicyKind};
use kusto_delta_core::{compute_delta, parse_script, DatabaseModel, ScriptingContext};

fn model(script: &str) -> DatabaseModel {
    let commands = parse_script(script).expect("script parses");
    DatabaseModel::from_commands(&commands).expect("commands fold")
}

#[test]
fn later_create_wins() {
    let model = model(
        ".create table T (a:int)\n\n\
         .create table T (b:string)",
    );
    let spec = &model.tables[&EntityName::new("T")];
    assert_eq!(spec.columns.len(), 1);
    assert_eq!(spec.columns[0].name, EntityName::new("b"));
}

#[test]
fn create_merge_extends_an_existing_table() {
    let model = model(
        ".create table T (a:int)\n\n\
         .create-merge table T (a:int, b:string)",
    );
    let spec = &model.tables[&EntityName::new("T")];
    assert_eq!(spec.columns.len(), 2);
}

#[test]
fn drop_table_cascades_mappings_and_policies() {
    let model = model(
        ".create table T (a:int)\n\n\
         .create table T ingestion json mapping \"M\" '[]'\n\n\
         .alter table T policy retention\n```\n{\"SoftDeletePeriod\": \"10.00:00:00\"}\n```\n\n\
         .drop table T",
    );
    assert!(model.tables.is_empty());
    assert!(model.mappings.is_empty());
    assert!(model.policies.is_empty());
}

#[test]
fn drop_then_recreate_yields_the_recreated_form() {
    let model = model(
        ".create table T (a:int)\n\n\
         .drop table T\n\n\
         .create table T (b:string)",
    );
    let spec = &model.tables[&EntityName::new("T")];
    assert_eq!(spec.columns[0].name, EntityName::new("b"));
}

#[test]
fn mapping_for_unknown_table_fails() {
    let commands = parse_script(".create table T ingestion json mapping \"M\" '[]'").unwrap();
    let err = DatabaseModel::from_commands(&commands).unwrap_err();
    assert!(
        err.to_string().contains("unknown table `T`"),
        "got: {err}"
    );
}

#[test]
fn table_policy_for_unknown_table_fails() {
    let commands =
        parse_script(".alter table T policy retention\n```\n{}\n```").unwrap();
    let err = DatabaseModel::from_commands(&commands).unwrap_err();
    assert!(
        err.to_string().contains("unknown table `T`"),
        "got: {err}"
    );
}

#[test]
fn drop_mapping_removes_one_key() {
    let model = model(
        ".create table T (a:int)\n\n\
         .create table T ingestion json mapping \"M\" '[]'\n\n\
         .create table T ingestion csv mapping \"M\" '[]'\n\n\
         .drop table T ingestion json mapping \"M\"",
    );
    assert_eq!(model.mappings.len(), 1);
    assert!(model.mappings.contains_key(&MappingKey {
        table: EntityName::new("T"),
        name: "M".to_string(),
        kind: MappingKind::Csv,
    }));
}

#[test]
fn delete_policy_removes_the_key() {
    let model = model(
        ".alter database DB policy caching hot = 1d\n\n\
         .delete database DB policy caching",
    );
    assert!(model.policies.is_empty());
}

#[test]
fn database_policies_do_not_require_tables() {
    let model = model(".alter database DB policy retention\n```\n{\"SoftDeletePeriod\": \"30.00:00:00\"}\n```");
    assert_eq!(model.policies.len(), 1);
    let key = model.policies.keys().next().unwrap();
    assert_eq!(key.entity_type, EntityType::Database);
    assert_eq!(key.kind, PolicyKind::Retention);
}

// model(parse(emit(model(parse(s))))) == model(parse(s)), with the delta
// from an empty model standing in for emit
#[test]
fn fold_is_idempotent_through_emission() {
    let original = model(
        ".create table T (a:int, b:string) with (folder=\"ops\")\n\n\
         .create table U (x:real)\n\n\
         .create table T ingestion json mapping \"M\" '[{\"column\":\"a\"}]'\n\n\
         .alter table T policy caching hot = 12h\n\n\
         .alter database DB policy retention\n```\n{\"SoftDeletePeriod\": \"30.00:00:00\"}\n```\n\n\
         .create-or-alter function with (folder=\"queries\") F(n:int) { T | take n }",
    );

    let script = kusto_delta_core::script::to_script(
        &compute_delta(&DatabaseModel::default(), &original),
        &ScriptingContext::default(),
    );
    let reparsed = model(&script);
    assert_eq!(reparsed, original);
}
