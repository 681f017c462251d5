use std::collections::BTreeSet;

use indexmap::IndexMap;

use crate::command::{
    AlterCachingPolicy, AlterPolicy, Command, CreateFunction, CreateMapping, CreateTable,
    CreateTables, DeletePolicy, DropFunction, DropMapping, DropTable,
};
use crate::schema::{
    DatabaseModel, EntityName, EntityType, PolicyKey, PolicyKind, PolicyPayload, QuotedText,
    TableSpec,
};

/// Computes the ordered command sequence that drives `current` to
/// `target`.
///
/// Stages run in a fixed global order: drop functions, drop mappings,
/// drop tables, create/alter tables, policy deltas, create mappings,
/// create functions. Dropping before creating avoids name collisions;
/// policies follow table creation so they attach to existing entities;
/// mappings and functions follow policies so their targets are in final
/// state. Within a stage, order is `(sort_index, priority)` ascending.
///
/// Pure: neither model is mutated, and valid models always produce a
/// valid delta.
pub fn compute_delta(current: &DatabaseModel, target: &DatabaseModel) -> Vec<Command> {
    let mut drop_tables = Vec::new();
    let mut create_tables = Vec::new();

    // Tables removed from the target, plus tables whose change is
    // breaking and must be recreated. Either way the table's mappings and
    // table-scoped policies do not survive the drop.
    let mut gone: BTreeSet<&EntityName> = BTreeSet::new();

    for (name, current_spec) in &current.tables {
        match target.tables.get(name) {
            None => {
                gone.insert(name);
                drop_tables.push(DropTable { name: name.clone() }.into());
            }
            Some(target_spec) if target_spec == current_spec => {}
            Some(target_spec) => {
                if is_additive(current_spec, target_spec) {
                    create_tables.push(CreateTable::from_spec(name.clone(), target_spec, true).into());
                } else {
                    gone.insert(name);
                    drop_tables.push(DropTable { name: name.clone() }.into());
                    create_tables
                        .push(CreateTable::from_spec(name.clone(), target_spec, false).into());
                }
            }
        }
    }
    for (name, target_spec) in &target.tables {
        if !current.tables.contains_key(name) {
            create_tables.push(CreateTable::from_spec(name.clone(), target_spec, false).into());
        }
    }

    let mut drop_functions = Vec::new();
    for name in current.functions.keys() {
        if !target.functions.contains_key(name) {
            drop_functions.push(DropFunction { name: name.clone() }.into());
        }
    }

    let mut drop_mappings = Vec::new();
    for key in current.mappings.keys() {
        if gone.contains(&key.table) || !target.mappings.contains_key(key) {
            drop_mappings.push(
                DropMapping {
                    table: key.table.clone(),
                    kind: key.kind,
                    name: QuotedText::new(key.name.clone()),
                }
                .into(),
            );
        }
    }

    let mut policies = Vec::new();
    let survives = |key: &PolicyKey| {
        key.entity_type != EntityType::Table || !gone.contains(&key.entity)
    };
    for (key, current_payload) in &current.policies {
        if !survives(key) {
            continue;
        }
        match target.policies.get(key) {
            None => policies.push(
                DeletePolicy {
                    entity_type: key.entity_type,
                    entity: key.entity.clone(),
                    kind: key.kind,
                }
                .into(),
            ),
            Some(target_payload) if target_payload == current_payload => {}
            Some(target_payload) => policies.push(alter_policy(key, target_payload)),
        }
    }
    for (key, target_payload) in &target.policies {
        let current_payload = current.policies.get(key).filter(|_| survives(key));
        if current_payload.is_none() {
            policies.push(alter_policy(key, target_payload));
        }
    }

    let mut create_mappings = Vec::new();
    for (key, target_spec) in &target.mappings {
        let survives_drop = !gone.contains(&key.table);
        let unchanged = survives_drop && current.mappings.get(key) == Some(target_spec);
        if !unchanged {
            create_mappings.push(
                CreateMapping::from_spec(
                    key.table.clone(),
                    key.kind,
                    QuotedText::new(key.name.clone()),
                    target_spec,
                )
                .into(),
            );
        }
    }

    let mut create_functions = Vec::new();
    for (name, target_spec) in &target.functions {
        if current.functions.get(name) != Some(target_spec) {
            create_functions.push(CreateFunction::from_spec(name.clone(), target_spec).into());
        }
    }

    let mut result = Vec::new();
    for mut stage in [
        drop_functions,
        drop_mappings,
        drop_tables,
        create_tables,
        policies,
        create_mappings,
        create_functions,
    ] {
        sort_stage(&mut stage);
        result.append(&mut stage);
    }
    batch_plural(result)
}

/// A change is additive when the target keeps every current column, in
/// order, with identical types; only then can `.create-merge table`
/// express it. Anything else (removed column, changed type, reorder) is
/// breaking and becomes drop + create.
fn is_additive(current: &TableSpec, target: &TableSpec) -> bool {
    current.columns.len() <= target.columns.len()
        && current.columns[..] == target.columns[..current.columns.len()]
}

fn alter_policy(key: &PolicyKey, payload: &PolicyPayload) -> Command {
    if key.kind == PolicyKind::Caching {
        return AlterCachingPolicy::from_payload(key.entity_type, key.entity.clone(), payload)
            .into();
    }
    AlterPolicy {
        entity_type: key.entity_type,
        entity: key.entity.clone(),
        kind: key.kind,
        payload: payload.clone(),
    }
    .into()
}

fn sort_stage(stage: &mut [Command]) {
    stage.sort_by_key(|command| (command.sort_index(), command.priority()));
}

/// Replaces runs of singular creates that share `(merge, folder,
/// docstring)` with one plural command, positioned at the first member's
/// slot and ordered by sort index within the batch.
fn batch_plural(commands: Vec<Command>) -> Vec<Command> {
    type GroupKey = (bool, Option<QuotedText>, Option<QuotedText>);

    let mut groups: IndexMap<GroupKey, Vec<usize>> = IndexMap::new();
    for (index, command) in commands.iter().enumerate() {
        if let Command::CreateTable(create) = command {
            groups
                .entry((
                    create.merge,
                    create.folder.clone(),
                    create.doc_string.clone(),
                ))
                .or_default()
                .push(index);
        }
    }

    let mut batched: IndexMap<usize, Command> = IndexMap::new();
    let mut absorbed: BTreeSet<usize> = BTreeSet::new();
    for indices in groups.into_values() {
        if indices.len() < 2 {
            continue;
        }
        let singulars = indices
            .iter()
            .map(|&index| match &commands[index] {
                Command::CreateTable(create) => create.clone(),
                _ => unreachable!("group members are singular creates"),
            })
            .collect();
        batched.insert(indices[0], CreateTables::from_singulars(singulars).into());
        absorbed.extend(indices.into_iter().skip(1));
    }

    commands
        .into_iter()
        .enumerate()
        .filter_map(|(index, command)| {
            if absorbed.contains(&index) {
                return None;
            }
            Some(batched.shift_remove(&index).unwrap_or(command))
        })
        .collect()
}
