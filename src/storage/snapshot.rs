//! Best-effort mirror of the last execution result and the last saved
//! request, so a restart can pick up where the user left off.
//!
//! Nothing here returns an error: failures are logged and dropped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::request_state::RequestPayload;
use crate::state::response_state::ExecutionResult;
use super::local::LocalStorage;

pub const LAST_EXECUTION_KEY: &str = "api-haven:last-execution-result";
pub const LAST_SAVED_REQUEST_KEY: &str = "api-haven:last-saved-request";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedRequestSnapshot {
    pub collection_id: String,
    pub request_id: String,
    pub payload: RequestPayload,
    pub saved_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Persistence {
    storage: LocalStorage,
}

impl Persistence {
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }

    pub fn save_last_result(&self, result: &ExecutionResult) {
        self.write(LAST_EXECUTION_KEY, result);
    }

    pub fn load_last_result(&self) -> Option<ExecutionResult> {
        self.read(LAST_EXECUTION_KEY)
    }

    pub fn save_request_snapshot(&self, collection_id: &str, request_id: &str, payload: &RequestPayload) {
        let snapshot = SavedRequestSnapshot {
            collection_id: collection_id.to_string(),
            request_id: request_id.to_string(),
            payload: payload.clone(),
            saved_at: Utc::now(),
        };
        self.write(LAST_SAVED_REQUEST_KEY, &snapshot);
    }

    /// The saved payload, only if it belongs to this exact request.
    pub fn request_snapshot_for(&self, collection_id: &str, request_id: &str) -> Option<RequestPayload> {
        let snapshot: SavedRequestSnapshot = self.read(LAST_SAVED_REQUEST_KEY)?;
        (snapshot.collection_id == collection_id && snapshot.request_id == request_id)
            .then_some(snapshot.payload)
    }

    fn write<T: Serialize>(&self, key: &str, value: &T) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to serialize local snapshot");
                return;
            }
        };
        if let Err(e) = self.storage.set_item(key, &json) {
            tracing::warn!(key, error = %e, "failed to persist local snapshot");
        }
    }

    fn read<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Option<T> {
        let raw = match self.storage.get_item(key) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to read local snapshot");
                return None;
            }
        };
        serde_json::from_str(&raw)
            .inspect_err(|e| tracing::warn!(key, error = %e, "discarding unreadable local snapshot"))
            .ok()
    }
}
