use super::cursor::Cursor;
use crate::command::{
    AlterCachingPolicy, AlterPolicy, Command, CreateFunction, CreateMapping, CreateTable,
    CreateTables, DeletePolicy, DropFunction, DropMapping, DropTable, TableDef,
};
use crate::schema::{
    EntityName, EntityType, HotWindow, KustoTimespan, MappingKind, PolicyKind, PolicyPayload,
    QuotedText, TableColumn,
};
use crate::{DeltaError, Result};

pub(super) fn create_table(cursor: &mut Cursor<'_>) -> Result<Command> {
    create_table_impl(cursor, false)
}

pub(super) fn create_merge_table(cursor: &mut Cursor<'_>) -> Result<Command> {
    create_table_impl(cursor, true)
}

fn create_table_impl(cursor: &mut Cursor<'_>, merge: bool) -> Result<Command> {
    let name = cursor.read_entity_name()?;
    if cursor.peek_word() == Some("ingestion") {
        if merge {
            return Err(DeltaError::parse(
                "ingestion mappings use the plain `.create table` form",
            ));
        }
        return create_mapping(cursor, name);
    }
    let columns = parse_columns(cursor)?;
    let (folder, doc_string) = folder_and_doc(cursor)?;
    Ok(CreateTable {
        name,
        columns,
        folder,
        doc_string,
        merge,
    }
    .into())
}

pub(super) fn create_tables(cursor: &mut Cursor<'_>) -> Result<Command> {
    create_tables_impl(cursor, false)
}

pub(super) fn create_merge_tables(cursor: &mut Cursor<'_>) -> Result<Command> {
    create_tables_impl(cursor, true)
}

fn create_tables_impl(cursor: &mut Cursor<'_>, merge: bool) -> Result<Command> {
    let mut tables = Vec::new();
    loop {
        let name = cursor.read_entity_name()?;
        let columns = parse_columns(cursor)?;
        tables.push(TableDef { name, columns });
        if !cursor.eat(',') {
            break;
        }
    }
    let (folder, doc_string) = folder_and_doc(cursor)?;
    Ok(CreateTables {
        tables,
        folder,
        doc_string,
        merge,
    }
    .into())
}

pub(super) fn drop_table(cursor: &mut Cursor<'_>) -> Result<Command> {
    let name = cursor.read_entity_name()?;
    if cursor.try_keyword("ingestion") {
        let kind = parse_mapping_kind(cursor)?;
        expect_keyword(cursor, "mapping")?;
        let mapping_name = QuotedText::new(cursor.read_string_literal()?);
        return Ok(DropMapping {
            table: name,
            kind,
            name: mapping_name,
        }
        .into());
    }
    Ok(DropTable { name }.into())
}

fn create_mapping(cursor: &mut Cursor<'_>, table: EntityName) -> Result<Command> {
    expect_keyword(cursor, "ingestion")?;
    let kind = parse_mapping_kind(cursor)?;
    expect_keyword(cursor, "mapping")?;
    let name = QuotedText::new(cursor.read_string_literal()?);

    // The mapping JSON may be split across adjacent literals; stitch them
    // back into a single string before the `with` clause.
    let mut mapping = cursor.read_string_literal()?;
    while cursor.peek_is_quote() {
        mapping.push_str(&cursor.read_string_literal()?);
    }

    let mut remove_oldest_if_required = false;
    for (property, value) in parse_with_properties(cursor)? {
        match property.as_str() {
            "removeoldestifrequired" => {
                remove_oldest_if_required = value.as_bool().ok_or_else(|| {
                    DeltaError::parse("property `removeOldestIfRequired` expects a boolean")
                })?;
            }
            other => {
                return Err(DeltaError::parse(format!(
                    "unrecognized property `{other}` on ingestion mapping"
                )))
            }
        }
    }

    Ok(CreateMapping {
        table,
        kind,
        name,
        mapping: QuotedText::new(mapping),
        remove_oldest_if_required,
    }
    .into())
}

pub(super) fn create_function(cursor: &mut Cursor<'_>) -> Result<Command> {
    // The `with` clause precedes the name in this command
    let mut folder = None;
    let mut doc_string = None;
    for (property, value) in parse_with_properties(cursor)? {
        match property.as_str() {
            "folder" => folder = Some(value.into_text()?),
            "docstring" => doc_string = Some(value.into_text()?),
            // Accepted for compatibility; validation is server-side anyway
            "skipvalidation" => {}
            other => {
                return Err(DeltaError::parse(format!(
                    "unrecognized property `{other}` on function"
                )))
            }
        }
    }
    let name = cursor.read_entity_name()?;
    let parameters = cursor.read_parenthesized()?;
    let body = cursor.read_braced()?;
    Ok(CreateFunction {
        name,
        parameters,
        body,
        folder,
        doc_string,
    }
    .into())
}

pub(super) fn drop_function(cursor: &mut Cursor<'_>) -> Result<Command> {
    let name = cursor.read_entity_name()?;
    Ok(DropFunction { name }.into())
}

pub(super) fn alter_table_policy(cursor: &mut Cursor<'_>) -> Result<Command> {
    alter_policy(cursor, EntityType::Table)
}

pub(super) fn alter_database_policy(cursor: &mut Cursor<'_>) -> Result<Command> {
    alter_policy(cursor, EntityType::Database)
}

fn alter_policy(cursor: &mut Cursor<'_>, entity_type: EntityType) -> Result<Command> {
    let entity = read_policy_entity(cursor, entity_type)?;
    expect_keyword(cursor, "policy")?;
    let kind = parse_policy_kind(cursor, entity_type)?;

    if kind == PolicyKind::Caching {
        return parse_caching(cursor, entity_type, entity);
    }

    let block = cursor.read_backtick_block()?;
    let payload = PolicyPayload::from_json_text(block)?;
    Ok(AlterPolicy {
        entity_type,
        entity,
        kind,
        payload,
    }
    .into())
}

fn parse_caching(
    cursor: &mut Cursor<'_>,
    entity_type: EntityType,
    entity: EntityName,
) -> Result<Command> {
    expect_keyword(cursor, "hot")?;
    cursor.expect('=')?;
    let hot_data = KustoTimespan::parse(cursor.read_scalar())?;

    let mut command = AlterCachingPolicy::new(entity_type, entity, hot_data);
    while cursor.eat(',') {
        expect_keyword(cursor, "hot_window")?;
        cursor.expect('=')?;
        expect_keyword(cursor, "datetime")?;
        cursor.expect('(')?;
        let from = cursor.read_until(')')?;
        cursor.expect(')')?;
        cursor.expect('.')?;
        cursor.expect('.')?;
        expect_keyword(cursor, "datetime")?;
        cursor.expect('(')?;
        let to = cursor.read_until(')')?;
        cursor.expect(')')?;
        command.hot_windows.push(HotWindow::parse(from, to)?);
    }
    Ok(command.into())
}

pub(super) fn delete_table_policy(cursor: &mut Cursor<'_>) -> Result<Command> {
    delete_policy(cursor, EntityType::Table)
}

pub(super) fn delete_database_policy(cursor: &mut Cursor<'_>) -> Result<Command> {
    delete_policy(cursor, EntityType::Database)
}

fn delete_policy(cursor: &mut Cursor<'_>, entity_type: EntityType) -> Result<Command> {
    let entity = read_policy_entity(cursor, entity_type)?;
    expect_keyword(cursor, "policy")?;
    let kind = parse_policy_kind(cursor, entity_type)?;
    Ok(DeletePolicy {
        entity_type,
        entity,
        kind,
    }
    .into())
}

fn read_policy_entity(cursor: &mut Cursor<'_>, entity_type: EntityType) -> Result<EntityName> {
    if entity_type == EntityType::Database && cursor.peek_word() == Some("policy") {
        // The current-database form is an emission convenience only
        return Err(DeltaError::parse("a database name is required"));
    }
    cursor.read_entity_name()
}

fn parse_policy_kind(cursor: &mut Cursor<'_>, entity_type: EntityType) -> Result<PolicyKind> {
    let word = cursor.read_word()?;
    let kind = PolicyKind::from_keyword(word)
        .ok_or_else(|| DeltaError::parse(format!("unknown policy kind `{word}`")))?;
    if !kind.applies_to(entity_type) {
        return Err(DeltaError::parse(format!(
            "policy `{}` does not apply to {} entities",
            kind,
            entity_type.keyword()
        )));
    }
    Ok(kind)
}

fn parse_columns(cursor: &mut Cursor<'_>) -> Result<Vec<TableColumn>> {
    cursor.expect('(')?;
    let mut columns = Vec::new();
    loop {
        let name = cursor.read_entity_name()?;
        cursor.expect(':')?;
        let column_type = cursor.read_word()?;
        columns.push(TableColumn::new(name, column_type));
        if !cursor.eat(',') {
            break;
        }
    }
    cursor.expect(')')?;
    Ok(columns)
}

fn parse_mapping_kind(cursor: &mut Cursor<'_>) -> Result<MappingKind> {
    let word = cursor.read_word()?;
    MappingKind::from_keyword(word)
        .ok_or_else(|| DeltaError::parse(format!("unknown mapping kind `{word}`")))
}

fn expect_keyword(cursor: &mut Cursor<'_>, keyword: &str) -> Result<()> {
    if cursor.try_keyword(keyword) {
        Ok(())
    } else {
        Err(DeltaError::parse(format!(
            "expected `{keyword}` at `{}`",
            cursor.current_line()
        )))
    }
}

enum PropertyValue {
    Text(QuotedText),
    Word(String),
}

impl PropertyValue {
    fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Word(word) if word == "true" => Some(true),
            PropertyValue::Word(word) if word == "false" => Some(false),
            _ => None,
        }
    }

    fn into_text(self) -> Result<QuotedText> {
        match self {
            PropertyValue::Text(text) => Ok(text),
            PropertyValue::Word(word) => Err(DeltaError::parse(format!(
                "expected a quoted string, found `{word}`"
            ))),
        }
    }
}

/// `with (name=value, ...)`; property names are matched case-insensitively.
fn parse_with_properties(cursor: &mut Cursor<'_>) -> Result<Vec<(String, PropertyValue)>> {
    if !cursor.try_keyword("with") {
        return Ok(Vec::new());
    }
    cursor.expect('(')?;
    let mut properties = Vec::new();
    loop {
        let name = cursor.read_word()?.to_ascii_lowercase();
        cursor.expect('=')?;
        let value = if cursor.peek_is_quote() {
            PropertyValue::Text(QuotedText::new(cursor.read_string_literal()?))
        } else {
            PropertyValue::Word(cursor.read_word()?.to_string())
        };
        properties.push((name, value));
        if !cursor.eat(',') {
            break;
        }
    }
    cursor.expect(')')?;
    Ok(properties)
}

fn folder_and_doc(cursor: &mut Cursor<'_>) -> Result<(Option<QuotedText>, Option<QuotedText>)> {
    let mut folder = None;
    let mut doc_string = None;
    for (property, value) in parse_with_properties(cursor)? {
        match property.as_str() {
            "folder" => folder = Some(value.into_text()?),
            "docstring" => doc_string = Some(value.into_text()?),
            other => {
                return Err(DeltaError::parse(format!(
                    "unrecognized property `{other}`"
                )))
            }
        }
    }
    Ok((folder, doc_string))
}
