use super::Command;
use crate::schema::{EntityName, QuotedText, TableColumn, TableSpec};

/// `.create table` / `.create-merge table`.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTable {
    pub name: EntityName,
    pub columns: Vec<TableColumn>,
    pub folder: Option<QuotedText>,
    pub doc_string: Option<QuotedText>,
    /// True for the additive `.create-merge table` form.
    pub merge: bool,
}

impl CreateTable {
    pub fn from_spec(name: EntityName, spec: &TableSpec, merge: bool) -> Self {
        Self {
            name,
            columns: spec.columns.clone(),
            folder: spec.folder.clone(),
            doc_string: spec.doc_string.clone(),
            merge,
        }
    }
}

impl From<CreateTable> for Command {
    fn from(value: CreateTable) -> Self {
        Self::CreateTable(value)
    }
}
