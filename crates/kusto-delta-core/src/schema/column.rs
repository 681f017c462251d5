use super::EntityName;

/// A table column: name plus the Kusto primitive type keyword
/// (`int`, `string`, `datetime`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableColumn {
    pub name: EntityName,
    pub column_type: String,
}

impl TableColumn {
    pub fn new(name: impl Into<EntityName>, column_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_type: column_type.into(),
        }
    }

    pub fn to_script(&self) -> String {
        format!("{}:{}", self.name.to_script(), self.column_type)
    }
}
