//! Client-side cache of collections and the selection cursor.
//!
//! Mutations are confirm-then-apply: the cache changes only after the backend
//! has accepted the call, so a failure never needs a rollback.

use crate::api::CollectionsClient;
use crate::error::AppError;
use super::collection::{Collection, sample_collections};
use super::request_state::{ApiRequest, RequestPayload};

/// Cursor into the collections tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub collection_id: Option<String>,
    pub request_id: Option<String>,
}

impl Selection {
    fn first_of(collection: Option<&Collection>) -> Self {
        Self {
            collection_id: collection.map(|c| c.id.clone()),
            request_id: collection.and_then(Collection::first_request_id),
        }
    }
}

pub struct CollectionsStore {
    client: CollectionsClient,
    collections: Vec<Collection>,
    selection: Selection,
    is_loading: bool,
    last_error: Option<String>,
}

impl CollectionsStore {
    pub fn new(client: CollectionsClient) -> Self {
        Self {
            client,
            collections: Vec::new(),
            selection: Selection::default(),
            is_loading: false,
            last_error: None,
        }
    }

    pub fn collections(&self) -> &[Collection] {
        &self.collections
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Message of the last failed backend call, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn collection(&self, collection_id: &str) -> Option<&Collection> {
        self.collections.iter().find(|c| c.id == collection_id)
    }

    pub fn selected_collection(&self) -> Option<&Collection> {
        self.selection
            .collection_id
            .as_deref()
            .and_then(|id| self.collection(id))
    }

    pub fn selected_request(&self) -> Option<&ApiRequest> {
        let request_id = self.selection.request_id.as_deref()?;
        self.selected_collection()?.request(request_id)
    }

    /// Collections whose name contains `query`, ignoring case.
    pub fn filter(&self, query: &str) -> Vec<&Collection> {
        let query = query.trim().to_lowercase();
        self.collections
            .iter()
            .filter(|c| query.is_empty() || c.name.to_lowercase().contains(&query))
            .collect()
    }

    /// Fetch everything. An unreachable backend degrades to the sample set.
    pub async fn load(&mut self) {
        self.is_loading = true;
        match self.client.list_collections().await {
            Ok(collections) => {
                tracing::info!(count = collections.len(), "collections loaded");
                self.collections = collections;
                self.last_error = None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "falling back to sample collections");
                self.collections = sample_collections();
                self.last_error = Some(e.to_string());
            }
        }
        self.is_loading = false;
        self.ensure_selection();
    }

    pub fn select_collection(&mut self, collection_id: Option<&str>) {
        match collection_id {
            None => self.selection = Selection::default(),
            Some(id) => match self.collection(id) {
                Some(collection) => self.selection = Selection::first_of(Some(collection)),
                None => tracing::debug!(collection_id = id, "ignoring unknown collection"),
            },
        }
    }

    /// Returns `false` when the pair does not exist.
    pub fn select_request(&mut self, collection_id: &str, request_id: &str) -> bool {
        let exists = self
            .collection(collection_id)
            .is_some_and(|c| c.request(request_id).is_some());
        if exists {
            self.selection = Selection {
                collection_id: Some(collection_id.to_string()),
                request_id: Some(request_id.to_string()),
            };
        }
        exists
    }

    pub async fn create_collection(&mut self, name: &str) -> Result<Collection, AppError> {
        let created = self.client.create_collection(name).await.inspect_err(|e| {
            tracing::error!(error = %e, "failed to create collection");
        })?;

        self.collections.retain(|c| c.id != created.id);
        self.collections.insert(0, created.clone());
        self.selection = Selection::first_of(Some(&created));
        tracing::info!(collection_id = %created.id, "collection created");
        Ok(created)
    }

    pub async fn rename_collection(&mut self, collection_id: &str, name: &str) -> Result<Collection, AppError> {
        let updated = self
            .client
            .update_collection(collection_id, name)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "failed to rename collection"))?;

        if let Some(col) = self.collections.iter_mut().find(|c| c.id == collection_id) {
            col.name = updated.name.clone();
            col.updated_at = updated.updated_at.or(col.updated_at);
        }
        Ok(updated)
    }

    pub async fn delete_collection(&mut self, collection_id: &str) -> Result<(), AppError> {
        self.client
            .delete_collection(collection_id)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "failed to delete collection"))?;

        self.collections.retain(|c| c.id != collection_id);
        if self.selection.collection_id.as_deref() == Some(collection_id) {
            self.selection = Selection::first_of(self.collections.first());
        }
        self.ensure_selection();
        tracing::info!(collection_id, "collection deleted");
        Ok(())
    }

    /// `None` when the backend refuses; the cache is then untouched.
    pub async fn create_request(&mut self, collection_id: &str, payload: &RequestPayload) -> Option<ApiRequest> {
        let created = match self.client.create_request(collection_id, payload).await {
            Ok(created) => created,
            Err(e) => {
                tracing::error!(error = %e, collection_id, "failed to create request");
                self.last_error = Some(e.to_string());
                return None;
            }
        };

        match self.collections.iter_mut().find(|c| c.id == collection_id) {
            Some(col) => {
                match col.requests.iter_mut().find(|r| r.id == created.id) {
                    Some(existing) => *existing = created.clone(),
                    None => col.requests.push(created.clone()),
                }
                self.selection = Selection {
                    collection_id: Some(collection_id.to_string()),
                    request_id: Some(created.id.clone()),
                };
            }
            None => tracing::warn!(collection_id, "created request for a collection not in cache"),
        }
        self.ensure_selection();
        Some(created)
    }

    /// Replaces the cached request in place. Selection is left alone.
    ///
    /// An answer stamped older than the cached copy does not overwrite it,
    /// so out-of-order completions settle on the newest server state.
    pub async fn update_request(
        &mut self,
        collection_id: &str,
        request_id: &str,
        payload: &RequestPayload,
    ) -> Option<ApiRequest> {
        let updated = match self.client.update_request(collection_id, request_id, payload).await {
            Ok(updated) => updated,
            Err(e) => {
                tracing::error!(error = %e, collection_id, request_id, "failed to update request");
                self.last_error = Some(e.to_string());
                return None;
            }
        };

        let cached = self
            .collections
            .iter_mut()
            .find(|c| c.id == collection_id)
            .and_then(|c| c.requests.iter_mut().find(|r| r.id == request_id));
        if let Some(cached) = cached {
            match (cached.updated_at, updated.updated_at) {
                (Some(have), Some(got)) if got < have => {
                    tracing::debug!(request_id, "ignoring stale update answer");
                }
                _ => *cached = updated.clone(),
            }
        }
        Some(updated)
    }

    pub async fn delete_request(&mut self, collection_id: &str, request_id: &str) -> Result<(), AppError> {
        self.client
            .delete_request(collection_id, request_id)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "failed to delete request"))?;

        let mut next_first = None;
        if let Some(col) = self.collections.iter_mut().find(|c| c.id == collection_id) {
            col.requests.retain(|r| r.id != request_id);
            next_first = col.first_request_id();
        }
        if self.selection.collection_id.as_deref() == Some(collection_id)
            && self.selection.request_id.as_deref() == Some(request_id)
        {
            self.selection.request_id = next_first;
        }
        tracing::info!(collection_id, request_id, "request deleted");
        Ok(())
    }

    /// Select the first collection when something is cached but nothing is
    /// selected.
    fn ensure_selection(&mut self) {
        if self.selection.collection_id.is_none() && !self.collections.is_empty() {
            self.selection = Selection::first_of(self.collections.first());
        }
    }

    #[cfg(test)]
    pub(crate) fn with_collections(client: CollectionsClient, collections: Vec<Collection>) -> Self {
        let mut store = Self::new(client);
        store.collections = collections;
        store.ensure_selection();
        store
    }
}
