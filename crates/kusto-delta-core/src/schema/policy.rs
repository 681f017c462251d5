use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::EntityType;
use crate::{DeltaError, Result};

/// The policy families the command surface supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PolicyKind {
    AutoDelete,
    Caching,
    Encoding,
    HardRetentionViolations,
    IngestionBatching,
    IngestionTime,
    ManagedIdentity,
    Merge,
    Partitioning,
    RestrictedViewAccess,
    Retention,
    RowLevelSecurity,
    Sharding,
    ShardGroups,
    StreamingIngestion,
    Update,
}

impl PolicyKind {
    pub const ALL: [PolicyKind; 16] = [
        PolicyKind::AutoDelete,
        PolicyKind::Caching,
        PolicyKind::Encoding,
        PolicyKind::HardRetentionViolations,
        PolicyKind::IngestionBatching,
        PolicyKind::IngestionTime,
        PolicyKind::ManagedIdentity,
        PolicyKind::Merge,
        PolicyKind::Partitioning,
        PolicyKind::RestrictedViewAccess,
        PolicyKind::Retention,
        PolicyKind::RowLevelSecurity,
        PolicyKind::Sharding,
        PolicyKind::ShardGroups,
        PolicyKind::StreamingIngestion,
        PolicyKind::Update,
    ];

    /// The keyword following `policy` in the DSL.
    pub fn keyword(self) -> &'static str {
        match self {
            PolicyKind::AutoDelete => "auto_delete",
            PolicyKind::Caching => "caching",
            PolicyKind::Encoding => "encoding",
            PolicyKind::HardRetentionViolations => "hardretentionviolations",
            PolicyKind::IngestionBatching => "ingestionbatching",
            PolicyKind::IngestionTime => "ingestiontime",
            PolicyKind::ManagedIdentity => "managed_identity",
            PolicyKind::Merge => "merge",
            PolicyKind::Partitioning => "partitioning",
            PolicyKind::RestrictedViewAccess => "restricted_view_access",
            PolicyKind::Retention => "retention",
            PolicyKind::RowLevelSecurity => "row_level_security",
            PolicyKind::Sharding => "sharding",
            PolicyKind::ShardGroups => "shard_groups",
            PolicyKind::StreamingIngestion => "streamingingestion",
            PolicyKind::Update => "update",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.keyword() == keyword)
    }

    /// Segment used in multi-file script paths.
    pub fn path_segment(self) -> &'static str {
        match self {
            PolicyKind::AutoDelete => "auto-delete",
            PolicyKind::Caching => "caching",
            PolicyKind::Encoding => "encoding",
            PolicyKind::HardRetentionViolations => "hard-retention-violations",
            PolicyKind::IngestionBatching => "ingestion-batching",
            PolicyKind::IngestionTime => "ingestion-time",
            PolicyKind::ManagedIdentity => "managed-identity",
            PolicyKind::Merge => "merge",
            PolicyKind::Partitioning => "partitioning",
            PolicyKind::RestrictedViewAccess => "restricted-view-access",
            PolicyKind::Retention => "retention",
            PolicyKind::RowLevelSecurity => "row-level-security",
            PolicyKind::Sharding => "sharding",
            PolicyKind::ShardGroups => "shard-groups",
            PolicyKind::StreamingIngestion => "streaming-ingestion",
            PolicyKind::Update => "update",
        }
    }

    pub fn applies_to(self, entity_type: EntityType) -> bool {
        match self {
            PolicyKind::AutoDelete
            | PolicyKind::IngestionTime
            | PolicyKind::Partitioning
            | PolicyKind::RestrictedViewAccess
            | PolicyKind::RowLevelSecurity
            | PolicyKind::Update => entity_type == EntityType::Table,
            _ => true,
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A policy document, compared by semantic JSON equality: object fields
/// unordered, arrays ordered, numbers by value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolicyPayload {
    value: Value,
}

impl PolicyPayload {
    pub fn from_value(value: Value) -> Self {
        Self { value }
    }

    pub fn from_json_text(text: &str) -> Result<Self> {
        let value = serde_json::from_str(text)
            .map_err(|err| DeltaError::policy(format!("invalid JSON: {err}")))?;
        Ok(Self { value })
    }

    pub fn as_value(&self) -> &Value {
        &self.value
    }

    pub fn to_json_text(&self) -> String {
        serde_json::to_string_pretty(&self.value).expect("JSON value always serializes")
    }
}

impl PartialEq for PolicyPayload {
    fn eq(&self, other: &Self) -> bool {
        json_eq(&self.value, &other.value)
    }
}

impl Eq for PolicyPayload {}

fn json_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => {
            // `1` and `1.0` denote the same value for integer-typed fields
            a == b || a.as_f64() == b.as_f64()
        }
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(a, b)| json_eq(a, b))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, a)| b.get(key).is_some_and(|b| json_eq(a, b)))
        }
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn field_order_is_irrelevant() {
        let a = PolicyPayload::from_json_text(r#"{"a": 1, "b": 2}"#).unwrap();
        let b = PolicyPayload::from_json_text(r#"{"b": 2, "a": 1}"#).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn numeric_spelling_is_irrelevant() {
        let a = PolicyPayload::from_value(json!({"n": 1}));
        let b = PolicyPayload::from_value(json!({"n": 1.0}));
        assert_eq!(a, b);
    }

    #[test]
    fn arrays_are_ordered() {
        let a = PolicyPayload::from_value(json!([1, 2]));
        let b = PolicyPayload::from_value(json!([2, 1]));
        assert_ne!(a, b);
    }

    #[test]
    fn keyword_round_trip() {
        for kind in PolicyKind::ALL {
            assert_eq!(PolicyKind::from_keyword(kind.keyword()), Some(kind));
        }
    }
}
