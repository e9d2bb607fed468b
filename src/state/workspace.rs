use super::key_value::{self, KvField};
use super::request_state::{ApiRequest, HttpMethod, KeyValuePair, RequestPayload};

/// Editable copy of the selected request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestEditor {
    pub method: HttpMethod,
    pub url: String,
    pub params: Vec<KeyValuePair>,
    pub headers: Vec<KeyValuePair>,
    pub body: String,
}

impl Default for RequestEditor {
    fn default() -> Self {
        Self {
            method: HttpMethod::Get,
            url: String::new(),
            params: key_value::normalize(&[], None),
            headers: key_value::normalize(&[], Some(&key_value::default_headers())),
            body: String::new(),
        }
    }
}

impl RequestEditor {
    /// Load `request`, preferring a locally saved payload for it.
    pub fn from_request(request: &ApiRequest, saved: Option<RequestPayload>) -> Self {
        let payload = saved.unwrap_or_else(|| request.payload());
        Self::from_payload(&payload)
    }

    pub fn from_payload(payload: &RequestPayload) -> Self {
        Self {
            method: payload.method,
            url: payload.url.clone(),
            params: key_value::normalize(&payload.params, None),
            headers: key_value::normalize(&payload.headers, Some(&key_value::default_headers())),
            body: payload.body.clone().unwrap_or_default(),
        }
    }

    /// Payload for a save. A blank body is sent as absent.
    pub fn to_payload(&self, name: &str, description: Option<String>) -> RequestPayload {
        RequestPayload {
            name: name.to_string(),
            method: self.method,
            url: self.url.clone(),
            params: self.params.clone(),
            headers: self.headers.clone(),
            body: (!self.body.trim().is_empty()).then(|| self.body.clone()),
            description,
        }
    }

    pub fn add_param(&mut self) {
        self.params = key_value::add_row(&self.params);
    }

    pub fn remove_param(&mut self, id: &str) {
        self.params = key_value::remove_row(&self.params, id);
    }

    pub fn update_param(&mut self, id: &str, field: KvField, value: &str) {
        self.params = key_value::update_field(&self.params, id, field, value);
    }

    pub fn add_header(&mut self) {
        self.headers = key_value::add_row(&self.headers);
    }

    pub fn remove_header(&mut self, id: &str) {
        self.headers = key_value::remove_row(&self.headers, id);
    }

    pub fn update_header(&mut self, id: &str, field: KvField, value: &str) {
        self.headers = key_value::update_field(&self.headers, id, field, value);
    }

    /// Whether the remove control for a row list should be enabled.
    pub fn can_remove(rows: &[KeyValuePair]) -> bool {
        rows.len() > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_editor_has_rows() {
        let editor = RequestEditor::default();
        assert_eq!(editor.params.len(), 1);
        assert_eq!(editor.headers[0].key, "Content-Type");
        assert!(!RequestEditor::can_remove(&editor.params));
    }

    #[test]
    fn test_saved_payload_wins_over_request() {
        let request: ApiRequest = serde_json::from_str(
            r#"{"id":"r1","name":"Ping","method":"GET","url":"https://old.test"}"#,
        )
        .unwrap();
        let mut saved = request.payload();
        saved.url = "https://new.test".into();
        saved.method = HttpMethod::Put;

        let editor = RequestEditor::from_request(&request, Some(saved));
        assert_eq!(editor.url, "https://new.test");
        assert_eq!(editor.method, HttpMethod::Put);

        let editor = RequestEditor::from_request(&request, None);
        assert_eq!(editor.url, "https://old.test");
        assert_eq!(editor.headers[0].key, "Content-Type");
    }

    #[test]
    fn test_blank_body_saved_as_none() {
        let mut editor = RequestEditor::default();
        editor.body = "  ".into();
        assert!(editor.to_payload("n", None).body.is_none());
        editor.body = "{}".into();
        assert_eq!(editor.to_payload("n", None).body.as_deref(), Some("{}"));
    }

    #[test]
    fn test_row_edits_keep_one_row() {
        let mut editor = RequestEditor::default();
        let only = editor.params[0].id.clone();
        editor.remove_param(&only);
        assert_eq!(editor.params.len(), 1);

        editor.add_header();
        let added = editor.headers[1].id.clone();
        editor.update_header(&added, KvField::Key, "X-Trace");
        assert_eq!(editor.headers[1].key, "X-Trace");
        editor.remove_header(&added);
        assert_eq!(editor.headers.len(), 1);
    }
}
