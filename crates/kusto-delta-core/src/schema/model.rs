use std::collections::BTreeMap;
use std::fmt;

use super::{EntityName, EntityType, PolicyKind, PolicyPayload, QuotedText, TableColumn};
use crate::command::Command;
use crate::{DeltaError, Result};

/// A table's canonical shape.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableSpec {
    pub columns: Vec<TableColumn>,
    pub folder: Option<QuotedText>,
    pub doc_string: Option<QuotedText>,
}

/// A function's canonical shape; parameters and body are raw text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FunctionSpec {
    pub parameters: String,
    pub body: String,
    pub folder: Option<QuotedText>,
    pub doc_string: Option<QuotedText>,
}

/// Ingestion mapping formats the command surface recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MappingKind {
    Avro,
    Csv,
    Json,
    Orc,
    Parquet,
    W3cLogFile,
}

impl MappingKind {
    pub fn keyword(self) -> &'static str {
        match self {
            MappingKind::Avro => "avro",
            MappingKind::Csv => "csv",
            MappingKind::Json => "json",
            MappingKind::Orc => "orc",
            MappingKind::Parquet => "parquet",
            MappingKind::W3cLogFile => "w3clogfile",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        [
            MappingKind::Avro,
            MappingKind::Csv,
            MappingKind::Json,
            MappingKind::Orc,
            MappingKind::Parquet,
            MappingKind::W3cLogFile,
        ]
        .into_iter()
        .find(|kind| kind.keyword() == keyword)
    }
}

impl fmt::Display for MappingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Identifies an ingestion mapping: the parent table, the mapping name,
/// and the format.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MappingKey {
    pub table: EntityName,
    pub name: String,
    pub kind: MappingKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MappingSpec {
    /// The mapping JSON as a single stitched string.
    pub mapping: String,
    pub remove_oldest_if_required: bool,
}

/// Identifies a policy attachment.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct PolicyKey {
    pub entity_type: EntityType,
    pub entity: EntityName,
    pub kind: PolicyKind,
}

/// The canonical, order-independent representation of a database's schema
/// and per-entity policies, reached by folding a command sequence.
///
/// Later commands win within a key; distinct keys commute.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DatabaseModel {
    pub tables: BTreeMap<EntityName, TableSpec>,
    pub functions: BTreeMap<EntityName, FunctionSpec>,
    pub mappings: BTreeMap<MappingKey, MappingSpec>,
    pub policies: BTreeMap<PolicyKey, PolicyPayload>,
}

impl DatabaseModel {
    pub fn from_commands(commands: &[Command]) -> Result<Self> {
        let mut model = Self::default();
        model.apply_all(commands)?;
        Ok(model)
    }

    pub fn apply_all(&mut self, commands: &[Command]) -> Result<()> {
        for command in commands {
            self.apply(command)?;
        }
        Ok(())
    }

    pub fn apply(&mut self, command: &Command) -> Result<()> {
        match command {
            Command::CreateTable(cmd) => {
                self.fold_create_table(
                    &cmd.name,
                    &cmd.columns,
                    cmd.folder.clone(),
                    cmd.doc_string.clone(),
                    cmd.merge,
                );
            }
            Command::CreateTables(cmd) => {
                for def in &cmd.tables {
                    self.fold_create_table(
                        &def.name,
                        &def.columns,
                        cmd.folder.clone(),
                        cmd.doc_string.clone(),
                        cmd.merge,
                    );
                }
            }
            Command::DropTable(cmd) => {
                self.tables.remove(&cmd.name);
                // A dropped table takes its mappings and policies with it
                self.mappings.retain(|key, _| key.table != cmd.name);
                self.policies.retain(|key, _| {
                    key.entity_type != EntityType::Table || key.entity != cmd.name
                });
            }
            Command::CreateFunction(cmd) => {
                self.functions.insert(
                    cmd.name.clone(),
                    FunctionSpec {
                        parameters: cmd.parameters.clone(),
                        body: cmd.body.clone(),
                        folder: cmd.folder.clone(),
                        doc_string: cmd.doc_string.clone(),
                    },
                );
            }
            Command::DropFunction(cmd) => {
                self.functions.remove(&cmd.name);
            }
            Command::CreateMapping(cmd) => {
                if !self.tables.contains_key(&cmd.table) {
                    return Err(DeltaError::model(format!(
                        "ingestion mapping `{}` references unknown table `{}`",
                        cmd.name, cmd.table
                    )));
                }
                self.mappings.insert(
                    MappingKey {
                        table: cmd.table.clone(),
                        name: cmd.name.as_str().to_string(),
                        kind: cmd.kind,
                    },
                    MappingSpec {
                        mapping: cmd.mapping.as_str().to_string(),
                        remove_oldest_if_required: cmd.remove_oldest_if_required,
                    },
                );
            }
            Command::DropMapping(cmd) => {
                self.mappings.remove(&MappingKey {
                    table: cmd.table.clone(),
                    name: cmd.name.as_str().to_string(),
                    kind: cmd.kind,
                });
            }
            Command::AlterCachingPolicy(cmd) => {
                self.fold_policy(cmd.entity_type, &cmd.entity, PolicyKind::Caching, cmd.payload())?;
            }
            Command::AlterPolicy(cmd) => {
                self.fold_policy(cmd.entity_type, &cmd.entity, cmd.kind, cmd.payload.clone())?;
            }
            Command::DeletePolicy(cmd) => {
                self.policies.remove(&PolicyKey {
                    entity_type: cmd.entity_type,
                    entity: cmd.entity.clone(),
                    kind: cmd.kind,
                });
            }
        }
        Ok(())
    }

    fn fold_create_table(
        &mut self,
        name: &EntityName,
        columns: &[TableColumn],
        folder: Option<QuotedText>,
        doc_string: Option<QuotedText>,
        merge: bool,
    ) {
        if merge {
            let spec = self.tables.entry(name.clone()).or_default();
            for column in columns {
                match spec.columns.iter_mut().find(|c| c.name == column.name) {
                    Some(existing) => existing.column_type = column.column_type.clone(),
                    None => spec.columns.push(column.clone()),
                }
            }
            spec.folder = folder;
            spec.doc_string = doc_string;
        } else {
            self.tables.insert(
                name.clone(),
                TableSpec {
                    columns: columns.to_vec(),
                    folder,
                    doc_string,
                },
            );
        }
    }

    fn fold_policy(
        &mut self,
        entity_type: EntityType,
        entity: &EntityName,
        kind: PolicyKind,
        payload: PolicyPayload,
    ) -> Result<()> {
        if entity_type == EntityType::Table && !self.tables.contains_key(entity) {
            return Err(DeltaError::model(format!(
                "policy `{}` references unknown table `{}`",
                kind, entity
            )));
        }
        self.policies.insert(
            PolicyKey {
                entity_type,
                entity: entity.clone(),
                kind,
            },
            payload,
        );
        Ok(())
    }
}
