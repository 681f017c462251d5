use super::Command;
use crate::schema::{EntityName, MappingKind, QuotedText};

/// `.drop table <table> ingestion <kind> mapping <name>`.
#[derive(Debug, Clone, PartialEq)]
pub struct DropMapping {
    pub table: EntityName,
    pub kind: MappingKind,
    pub name: QuotedText,
}

impl From<DropMapping> for Command {
    fn from(value: DropMapping) -> Self {
        Self::DropMapping(value)
    }
}
