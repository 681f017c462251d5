use super::{Command, CreateTable};
use crate::schema::{EntityName, QuotedText, TableColumn};

/// One table definition inside a plural create.
#[derive(Debug, Clone, PartialEq)]
pub struct TableDef {
    pub name: EntityName,
    pub columns: Vec<TableColumn>,
}

/// `.create tables` / `.create-merge tables`: the batched form of repeated
/// singular creates that share a folder and docstring.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTables {
    pub tables: Vec<TableDef>,
    pub folder: Option<QuotedText>,
    pub doc_string: Option<QuotedText>,
    pub merge: bool,
}

impl CreateTables {
    /// Batches singular creates. Callers group by `(merge, folder,
    /// docstring)` beforehand; the batch preserves the given order.
    pub fn from_singulars(commands: Vec<CreateTable>) -> Self {
        let first = commands.first().expect("batch is never empty");
        let folder = first.folder.clone();
        let doc_string = first.doc_string.clone();
        let merge = first.merge;
        Self {
            tables: commands
                .into_iter()
                .map(|cmd| TableDef {
                    name: cmd.name,
                    columns: cmd.columns,
                })
                .collect(),
            folder,
            doc_string,
            merge,
        }
    }
}

impl From<CreateTables> for Command {
    fn from(value: CreateTables) -> Self {
        Self::CreateTables(value)
    }
}
