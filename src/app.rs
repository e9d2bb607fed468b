use tokio::sync::mpsc::UnboundedSender;
use url::Url;

use crate::api::{ApiClient, CollectionsClient};
use crate::config::Config;
use crate::error::AppError;
use crate::event::Event;
use crate::http::{client::build_client, executor::execute_and_report, prepare};
use crate::state::app_state::{AppState, RequestStatus, Variant};
use crate::state::key_value::KvField;
use crate::state::request_state::{HttpMethod, RequestPayload};
use crate::state::response_state::ExecutionResult;
use crate::state::store::{CollectionsStore, Selection};
use crate::state::workspace::RequestEditor;
use crate::storage::{LocalStorage, Persistence};

/// Owns the collections store, the request editor and the send pipeline.
pub struct App {
    pub state: AppState,
    pub store: CollectionsStore,
    client: reqwest::Client,
    origin: Url,
    persistence: Persistence,
    tx: UnboundedSender<Event>,
    /// Method of the send in flight.
    in_flight: Option<HttpMethod>,
}

impl App {
    pub fn new(config: &Config, tx: UnboundedSender<Event>) -> Result<Self, AppError> {
        let client = build_client()?;
        let api = ApiClient::new(client.clone(), config.api_base_url.clone());
        Ok(Self {
            state: AppState::default(),
            store: CollectionsStore::new(CollectionsClient::new(api)),
            client,
            origin: config.origin.clone(),
            persistence: Persistence::new(LocalStorage::new(&config.data_dir)),
            tx,
            in_flight: None,
        })
    }

    /// Load collections, restore the last response and fill the editor.
    pub async fn init(&mut self) {
        self.store.load().await;
        self.state.response = self.persistence.load_last_result();
        self.load_editor();
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Response(result) => self.handle_response(result),
        }
    }

    /// Rebuild the editor from the current selection.
    fn load_editor(&mut self) {
        let editor = match (self.store.selection().collection_id.as_deref(), self.store.selected_request()) {
            (Some(collection_id), Some(request)) => {
                let saved = self.persistence.request_snapshot_for(collection_id, &request.id);
                RequestEditor::from_request(request, saved)
            }
            _ => RequestEditor::default(),
        };
        self.state.editor = editor;
    }

    /// Unsaved edits survive unless the selection actually changed.
    fn reload_editor_if_moved(&mut self, before: &Selection) {
        if self.store.selection() != before {
            self.load_editor();
        }
    }

    // Editor

    pub fn set_method(&mut self, method: HttpMethod) {
        self.state.editor.method = method;
    }

    pub fn set_url(&mut self, url: impl Into<String>) {
        self.state.editor.url = url.into();
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.state.editor.body = body.into();
    }

    pub fn add_param(&mut self) {
        self.state.editor.add_param();
    }

    pub fn remove_param(&mut self, id: &str) {
        self.state.editor.remove_param(id);
    }

    pub fn update_param(&mut self, id: &str, field: KvField, value: &str) {
        self.state.editor.update_param(id, field, value);
    }

    pub fn add_header(&mut self) {
        self.state.editor.add_header();
    }

    pub fn remove_header(&mut self, id: &str) {
        self.state.editor.remove_header(id);
    }

    pub fn update_header(&mut self, id: &str, field: KvField, value: &str) {
        self.state.editor.update_header(id, field, value);
    }

    // Send

    /// Start sending the edited request. Returns `false` when nothing was
    /// sent: a send is already in flight or the request did not validate.
    pub fn send_request(&mut self) -> bool {
        if self.state.is_sending() {
            return false;
        }

        let editor = &self.state.editor;
        let prepared = match prepare(
            &self.origin,
            editor.method,
            &editor.url,
            &editor.params,
            &editor.headers,
            Some(&editor.body),
        ) {
            Ok(prepared) => prepared,
            Err(AppError::Validation(msg)) => {
                self.state.notify("URL required", msg, Variant::Destructive);
                return false;
            }
            Err(e @ AppError::InvalidHeader(_)) => {
                tracing::warn!(error = %e, "request not sent");
                self.state.notify(
                    "Invalid header",
                    format!("Fix the header row before sending. ({e})"),
                    Variant::Destructive,
                );
                return false;
            }
            Err(e) => {
                tracing::warn!(error = %e, "request not sent");
                self.state.notify(
                    "Invalid URL",
                    format!("Please provide a valid absolute or relative URL before sending. ({e})"),
                    Variant::Destructive,
                );
                return false;
            }
        };

        self.state.request_status = RequestStatus::Loading;
        self.in_flight = Some(prepared.method);

        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            execute_and_report(client, prepared, tx).await;
        });
        true
    }

    fn handle_response(&mut self, result: Result<ExecutionResult, AppError>) {
        let method = self.in_flight.take().unwrap_or(self.state.editor.method);
        match result {
            Ok(response) => {
                let variant = if response.ok { Variant::Default } else { Variant::Destructive };
                self.state.notify(
                    format!("Response {}", response.status),
                    format!("{method} request completed in {}ms", response.time_ms),
                    variant,
                );
                self.persistence.save_last_result(&response);
                self.state.response = Some(response);
                self.state.request_status = RequestStatus::Idle;
            }
            Err(e) => {
                tracing::error!(error = %e, "request failed");
                let message = e.to_string();
                self.state.notify("Request failed", message.clone(), Variant::Destructive);
                self.state.request_status = RequestStatus::Error(message);
            }
        }
    }

    // Collections

    /// Save the editor over the selected request.
    pub async fn save_request(&mut self) -> bool {
        let Some(collection_id) = self.store.selection().collection_id.clone() else {
            self.notify_no_selection();
            return false;
        };
        let Some(request) = self.store.selected_request() else {
            self.notify_no_selection();
            return false;
        };
        let request_id = request.id.clone();
        let payload = self.state.editor.to_payload(&request.name, request.description.clone());

        match self.store.update_request(&collection_id, &request_id, &payload).await {
            Some(_) => {
                self.persistence
                    .save_request_snapshot(&collection_id, &request_id, &payload);
                self.state.notify(
                    "Request saved",
                    format!("{} {} updated successfully.", payload.method, payload.name),
                    Variant::Default,
                );
                true
            }
            None => {
                self.state.notify(
                    "Save failed",
                    "We could not persist the request. Please try again.",
                    Variant::Destructive,
                );
                false
            }
        }
    }

    fn notify_no_selection(&mut self) {
        self.state.notify(
            "No request selected",
            "Pick or create a request in the sidebar before saving.",
            Variant::Destructive,
        );
    }

    pub async fn create_collection(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            self.state
                .notify("Name required", "Give the collection a name.", Variant::Destructive);
            return false;
        }
        match self.store.create_collection(name).await {
            Ok(_) => {
                self.state.notify(
                    "Collection created",
                    format!("\"{name}\" is ready for new requests."),
                    Variant::Default,
                );
                self.load_editor();
                true
            }
            Err(_) => {
                self.state.notify(
                    "Creation failed",
                    "We couldn't create the collection. Please try again.",
                    Variant::Destructive,
                );
                false
            }
        }
    }

    pub async fn rename_collection(&mut self, collection_id: &str, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            self.state
                .notify("Name required", "Give the collection a name.", Variant::Destructive);
            return false;
        }
        match self.store.rename_collection(collection_id, name).await {
            Ok(_) => true,
            Err(_) => {
                self.state.notify(
                    "Rename failed",
                    "We couldn't rename the collection. Please try again.",
                    Variant::Destructive,
                );
                false
            }
        }
    }

    pub async fn delete_collection(&mut self, collection_id: &str) -> bool {
        let before = self.store.selection().clone();
        match self.store.delete_collection(collection_id).await {
            Ok(()) => {
                self.state
                    .notify("Collection deleted", "The collection was removed.", Variant::Default);
                self.reload_editor_if_moved(&before);
                true
            }
            Err(_) => {
                self.state.notify(
                    "Deletion failed",
                    "We couldn't delete the collection. Please try again.",
                    Variant::Destructive,
                );
                false
            }
        }
    }

    pub async fn create_request(&mut self, collection_id: &str, name: &str, method: HttpMethod) -> bool {
        let name = name.trim();
        if name.is_empty() {
            self.state
                .notify("Name required", "Give the request a name.", Variant::Destructive);
            return false;
        }
        let payload = RequestPayload::new(name, method, "");
        match self.store.create_request(collection_id, &payload).await {
            Some(_) => {
                self.state.notify(
                    "Request created",
                    format!("{method} {name} is ready to edit."),
                    Variant::Default,
                );
                self.load_editor();
                true
            }
            None => {
                self.state.notify(
                    "Creation failed",
                    "We couldn't create the request. Please try again.",
                    Variant::Destructive,
                );
                false
            }
        }
    }

    /// Rename a saved request or change its method, keeping everything else
    /// as stored.
    pub async fn edit_request(
        &mut self,
        collection_id: &str,
        request_id: &str,
        name: &str,
        method: HttpMethod,
    ) -> bool {
        let name = name.trim();
        if name.is_empty() {
            self.state
                .notify("Name required", "Give the request a name.", Variant::Destructive);
            return false;
        }
        let Some(existing) = self
            .store
            .collection(collection_id)
            .and_then(|c| c.request(request_id))
        else {
            self.state.notify(
                "Request not found",
                "The request no longer exists. Refresh and try again.",
                Variant::Destructive,
            );
            return false;
        };
        let payload = RequestPayload {
            name: name.to_string(),
            method,
            ..existing.payload()
        };

        match self.store.update_request(collection_id, request_id, &payload).await {
            Some(_) => {
                self.state.notify(
                    "Request updated",
                    format!("{method} {name} saved successfully."),
                    Variant::Default,
                );
                if self.store.selection().request_id.as_deref() == Some(request_id) {
                    self.load_editor();
                }
                true
            }
            None => {
                self.state.notify(
                    "Update failed",
                    "We couldn't update the request. Please try again.",
                    Variant::Destructive,
                );
                false
            }
        }
    }

    pub async fn delete_request(&mut self, collection_id: &str, request_id: &str) -> bool {
        let before = self.store.selection().clone();
        match self.store.delete_request(collection_id, request_id).await {
            Ok(()) => {
                self.state
                    .notify("Request deleted", "The request was removed.", Variant::Default);
                self.reload_editor_if_moved(&before);
                true
            }
            Err(_) => {
                self.state.notify(
                    "Deletion failed",
                    "We couldn't delete the request. Please try again.",
                    Variant::Destructive,
                );
                false
            }
        }
    }

    pub fn select_collection(&mut self, collection_id: Option<&str>) {
        self.store.select_collection(collection_id);
        self.load_editor();
    }

    pub fn select_request(&mut self, collection_id: &str, request_id: &str) -> bool {
        let selected = self.store.select_request(collection_id, request_id);
        if selected {
            self.load_editor();
        }
        selected
    }
}
