use serde_json::{json, Value};

use super::Command;
use crate::schema::{
    EntityName, EntityType, HotWindow, KustoTimespan, PolicyPayload,
};

/// `.alter <table|database> <name> policy caching hot = <span>`, with
/// optional `hot_window` clauses.
///
/// Caching is the one policy with typed DSL syntax instead of a JSON
/// block; the typed fields serialize to the canonical payload the model
/// stores.
#[derive(Debug, Clone, PartialEq)]
pub struct AlterCachingPolicy {
    pub entity_type: EntityType,
    pub entity: EntityName,
    pub hot_data: KustoTimespan,
    pub hot_windows: Vec<HotWindow>,
}

impl AlterCachingPolicy {
    pub fn new(entity_type: EntityType, entity: EntityName, hot_data: KustoTimespan) -> Self {
        Self {
            entity_type,
            entity,
            hot_data,
            hot_windows: Vec::new(),
        }
    }

    /// The canonical payload stored in the database model.
    pub fn payload(&self) -> PolicyPayload {
        let mut value = json!({
            "DataHotSpan": self.hot_data.to_constant(),
            "IndexHotSpan": self.hot_data.to_constant(),
        });
        if !self.hot_windows.is_empty() {
            let windows: Vec<Value> = self
                .hot_windows
                .iter()
                .map(|window| {
                    json!({
                        "MinValue": window.min_value(),
                        "MaxValue": window.max_value(),
                    })
                })
                .collect();
            value["HotWindows"] = Value::Array(windows);
        }
        PolicyPayload::from_value(value)
    }

    /// Rebuilds the typed command from a stored payload.
    ///
    /// Payloads only ever reach the model through [`Self::payload`], so
    /// unreadable fields degrade to their defaults instead of failing.
    pub fn from_payload(
        entity_type: EntityType,
        entity: EntityName,
        payload: &PolicyPayload,
    ) -> Self {
        let value = payload.as_value();
        let hot_data = value
            .get("DataHotSpan")
            .and_then(Value::as_str)
            .and_then(|text| KustoTimespan::parse(text).ok())
            .unwrap_or_else(|| KustoTimespan::from_ticks(0));
        let hot_windows = value
            .get("HotWindows")
            .and_then(Value::as_array)
            .map(|windows| {
                windows
                    .iter()
                    .filter_map(|window| {
                        let from = window.get("MinValue")?.as_str()?;
                        let to = window.get("MaxValue")?.as_str()?;
                        HotWindow::parse(from, to).ok()
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self {
            entity_type,
            entity,
            hot_data,
            hot_windows,
        }
    }
}

impl From<AlterCachingPolicy> for Command {
    fn from(value: AlterCachingPolicy) -> Self {
        Self::AlterCachingPolicy(value)
    }
}
