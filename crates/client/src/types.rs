//! Shared types: the wire envelope spoken with the persistence service and
//! the outcomes the record store reports back to its callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use stockroom_core::RecordId;

use crate::transport::TransportError;

/// Operation requested from the persistence service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    GetInventory,
    GetSuppliers,
    SaveInventoryItem,
    SaveSupplier,
    DeleteInventoryItem,
    DeleteSupplier,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::GetInventory => "getInventory",
            Action::GetSuppliers => "getSuppliers",
            Action::SaveInventoryItem => "saveInventoryItem",
            Action::SaveSupplier => "saveSupplier",
            Action::DeleteInventoryItem => "deleteInventoryItem",
            Action::DeleteSupplier => "deleteSupplier",
        }
    }
}

impl core::fmt::Display for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body: `{"action": ..., ...payload}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiRequest {
    pub action: Action,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl ApiRequest {
    pub fn new(action: Action) -> Self {
        Self {
            action,
            payload: Map::new(),
        }
    }

    pub fn with(mut self, key: &str, value: Value) -> Self {
        self.payload.insert(key.to_string(), value);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiStatus {
    Ok,
    Error,
}

/// Response body: `{"status": "ok"|"error", "data"?, "message"?}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: ApiStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiResponse {
    pub fn ok(data: Value) -> Self {
        Self {
            status: ApiStatus::Ok,
            data: Some(data),
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ApiStatus::Error,
            data: None,
            message: Some(message.into()),
        }
    }
}

/// Where a mutation ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Persistence {
    /// The persistence service acknowledged the change.
    Remote,
    /// No persistence service is available; only the in-memory state changed.
    LocalOnly,
}

/// Result of a successful save.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveOutcome<R> {
    /// The record as stored after the save (merged on update).
    pub record: R,
    /// `true` when the save appended a new record.
    pub created: bool,
    pub persistence: Persistence,
}

/// Result of a successful delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub id: RecordId,
    /// `false` when no record had the id (benign no-op).
    pub removed: bool,
    pub persistence: Persistence,
}

/// Where the initial collections came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadSource {
    Remote,
    Seed,
    Empty,
}

/// Summary of `RecordStore::load_initial`.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    pub source: LoadSource,
    pub items: usize,
    pub suppliers: usize,
    /// The transport failure that forced a fallback, if any.
    pub error: Option<TransportError>,
    pub loaded_at: DateTime<Utc>,
}

impl LoadReport {
    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_flattens_payload_next_to_action() {
        let req = ApiRequest::new(Action::DeleteInventoryItem).with("id", json!("SKU001"));
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body, json!({ "action": "deleteInventoryItem", "id": "SKU001" }));
    }

    #[test]
    fn response_parses_error_without_data() {
        let resp: ApiResponse =
            serde_json::from_value(json!({ "status": "error", "message": "boom" })).unwrap();
        assert_eq!(resp, ApiResponse::error("boom"));
    }

    #[test]
    fn action_names_match_serde() {
        for action in [
            Action::GetInventory,
            Action::GetSuppliers,
            Action::SaveInventoryItem,
            Action::SaveSupplier,
            Action::DeleteInventoryItem,
            Action::DeleteSupplier,
        ] {
            assert_eq!(serde_json::to_value(action).unwrap(), json!(action.as_str()));
        }
    }
}
