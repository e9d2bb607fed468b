use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
    Trace,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 8] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Patch,
        HttpMethod::Head,
        HttpMethod::Options,
        HttpMethod::Trace,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Trace => "TRACE",
        }
    }

    pub fn next(&self) -> HttpMethod {
        let idx = Self::ALL.iter().position(|m| m == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> HttpMethod {
        let idx = Self::ALL.iter().position(|m| m == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// GET and HEAD never carry a request body.
    pub fn allows_body(&self) -> bool {
        !matches!(self, HttpMethod::Get | HttpMethod::Head)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == upper)
            .ok_or_else(|| AppError::Validation(format!("Unsupported HTTP method: {s}")))
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Head => reqwest::Method::HEAD,
            HttpMethod::Options => reqwest::Method::OPTIONS,
            HttpMethod::Trace => reqwest::Method::TRACE,
        }
    }
}

/// One row of the params or headers editor.
///
/// `key` and `value` may be empty while the row is being edited; only rows
/// with a non-blank key take part in an outgoing request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValuePair {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub description: String,
}

impl Default for KeyValuePair {
    fn default() -> Self {
        Self {
            id: new_id(),
            key: String::new(),
            value: String::new(),
            description: String::new(),
        }
    }
}

impl KeyValuePair {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            ..Default::default()
        }
    }

    pub fn is_active(&self) -> bool {
        !self.key.trim().is_empty()
    }
}

pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// A saved request definition, owned by exactly one collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRequest {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub method: HttpMethod,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub params: Vec<KeyValuePair>,
    #[serde(default)]
    pub headers: Vec<KeyValuePair>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ApiRequest {
    pub fn payload(&self) -> RequestPayload {
        RequestPayload {
            name: self.name.clone(),
            method: self.method,
            url: self.url.clone(),
            params: self.params.clone(),
            headers: self.headers.clone(),
            body: self.body.clone(),
            description: self.description.clone(),
        }
    }
}

/// Body of the create/update request calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestPayload {
    pub name: String,
    pub method: HttpMethod,
    pub url: String,
    #[serde(default)]
    pub params: Vec<KeyValuePair>,
    #[serde(default)]
    pub headers: Vec<KeyValuePair>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RequestPayload {
    pub fn new(name: impl Into<String>, method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            method,
            url: url.into(),
            params: Vec::new(),
            headers: Vec::new(),
            body: None,
            description: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_cycles_through_all_eight() {
        let mut m = HttpMethod::Get;
        for _ in 0..HttpMethod::ALL.len() {
            m = m.next();
        }
        assert_eq!(m, HttpMethod::Get);
        assert_eq!(HttpMethod::Get.prev(), HttpMethod::Trace);
    }

    #[test]
    fn test_method_parse_case_insensitive() {
        assert_eq!("patch".parse::<HttpMethod>().unwrap(), HttpMethod::Patch);
        assert!("BREW".parse::<HttpMethod>().is_err());
    }

    #[test]
    fn test_method_serializes_upper_case() {
        let json = serde_json::to_string(&HttpMethod::Options).unwrap();
        assert_eq!(json, "\"OPTIONS\"");
    }

    #[test]
    fn test_api_request_reads_camel_case_and_missing_fields() {
        let raw = r#"{
            "id": "r1",
            "name": "Ping",
            "method": "GET",
            "url": "https://example.test",
            "headers": [{"id": "h1", "key": "Accept", "value": "*/*"}],
            "updatedAt": "2024-05-01T10:00:00Z"
        }"#;
        let req: ApiRequest = serde_json::from_str(raw).unwrap();
        assert!(req.params.is_empty());
        assert_eq!(req.headers[0].description, "");
        assert!(req.updated_at.is_some());
        assert!(req.body.is_none());
    }

    #[test]
    fn test_payload_omits_absent_body() {
        let payload = RequestPayload::new("Ping", HttpMethod::Get, "https://example.test/ok");
        let json = serde_json::to_string(&payload).unwrap();
        insta::assert_snapshot!(json, @r#"{"name":"Ping","method":"GET","url":"https://example.test/ok","params":[],"headers":[]}"#);
    }
}
