use super::Command;
use crate::schema::{EntityName, EntityType, PolicyKind};

/// `.delete <table|database> <name> policy <kind>`.
#[derive(Debug, Clone, PartialEq)]
pub struct DeletePolicy {
    pub entity_type: EntityType,
    pub entity: EntityName,
    pub kind: PolicyKind,
}

impl From<DeletePolicy> for Command {
    fn from(value: DeletePolicy) -> Self {
        Self::DeletePolicy(value)
    }
}
