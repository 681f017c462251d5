use super::Command;
use crate::schema::{EntityName, MappingKind, MappingSpec, QuotedText};

/// `.create table <table> ingestion <kind> mapping <name> <json>`.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateMapping {
    pub table: EntityName,
    pub kind: MappingKind,
    pub name: QuotedText,
    /// The mapping JSON, stitched into a single string.
    pub mapping: QuotedText,
    pub remove_oldest_if_required: bool,
}

impl CreateMapping {
    pub fn from_spec(
        table: EntityName,
        kind: MappingKind,
        name: QuotedText,
        spec: &MappingSpec,
    ) -> Self {
        Self {
            table,
            kind,
            name,
            mapping: QuotedText::new(spec.mapping.clone()),
            remove_oldest_if_required: spec.remove_oldest_if_required,
        }
    }
}

impl From<CreateMapping> for Command {
    fn from(value: CreateMapping) -> Self {
        Self::CreateMapping(value)
    }
}
