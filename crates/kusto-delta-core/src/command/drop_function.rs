use super::Command;
use crate::schema::EntityName;

/// `.drop function`.
#[derive(Debug, Clone, PartialEq)]
pub struct DropFunction {
    pub name: EntityName,
}

impl From<DropFunction> for Command {
    fn from(value: DropFunction) -> Self {
        Self::DropFunction(value)
    }
}
