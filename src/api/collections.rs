//! Collections REST surface.
//!
//! Every call is fire-once: no batching, retries or idempotency keys.

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::collection::Collection;
use crate::state::request_state::{ApiRequest, RequestPayload};
use super::client::ApiClient;

#[derive(Debug, Clone, Serialize)]
struct UpsertCollection<'a> {
    name: &'a str,
}

/// Answer of the delete endpoints, when they send one.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Deleted {
    pub id: String,
}

#[derive(Debug, Clone)]
pub struct CollectionsClient {
    api: ApiClient,
}

impl CollectionsClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list_collections(&self) -> Result<Vec<Collection>, AppError> {
        self.api.get(&["collections"]).await
    }

    pub async fn create_collection(&self, name: &str) -> Result<Collection, AppError> {
        self.api.post(&["collections"], &UpsertCollection { name }).await
    }

    pub async fn update_collection(&self, collection_id: &str, name: &str) -> Result<Collection, AppError> {
        self.api
            .patch(&["collections", collection_id], &UpsertCollection { name })
            .await
    }

    pub async fn delete_collection(&self, collection_id: &str) -> Result<Option<Deleted>, AppError> {
        self.api.delete(&["collections", collection_id]).await
    }

    pub async fn create_request(
        &self,
        collection_id: &str,
        payload: &RequestPayload,
    ) -> Result<ApiRequest, AppError> {
        self.api
            .post(&["collections", collection_id, "requests"], payload)
            .await
    }

    pub async fn update_request(
        &self,
        collection_id: &str,
        request_id: &str,
        payload: &RequestPayload,
    ) -> Result<ApiRequest, AppError> {
        self.api
            .patch(&["collections", collection_id, "requests", request_id], payload)
            .await
    }

    pub async fn delete_request(&self, collection_id: &str, request_id: &str) -> Result<Option<Deleted>, AppError> {
        self.api
            .delete(&["collections", collection_id, "requests", request_id])
            .await
    }
}
