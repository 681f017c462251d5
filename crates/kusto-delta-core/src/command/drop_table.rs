use super::Command;
use crate::schema::EntityName;

/// `.drop table`.
#[derive(Debug, Clone, PartialEq)]
pub struct DropTable {
    pub name: EntityName,
}

impl From<DropTable> for Command {
    fn from(value: DropTable) -> Self {
        Self::DropTable(value)
    }
}
