use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::request_state::{ApiRequest, HttpMethod, KeyValuePair};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub requests: Vec<ApiRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Collection {
    pub fn request(&self, request_id: &str) -> Option<&ApiRequest> {
        self.requests.iter().find(|r| r.id == request_id)
    }

    pub fn first_request_id(&self) -> Option<String> {
        self.requests.first().map(|r| r.id.clone())
    }
}

/// Shown when the backend cannot be reached on first load.
pub fn sample_collections() -> Vec<Collection> {
    fn json_header(id: &str) -> Vec<KeyValuePair> {
        vec![KeyValuePair {
            id: id.to_string(),
            key: "Content-Type".to_string(),
            value: "application/json".to_string(),
            description: String::new(),
        }]
    }

    fn sample(id: &str, name: &str, method: HttpMethod, url: &str, header_id: &str, body: &str) -> ApiRequest {
        ApiRequest {
            id: id.to_string(),
            name: name.to_string(),
            method,
            url: url.to_string(),
            params: Vec::new(),
            headers: json_header(header_id),
            body: Some(body.to_string()),
            description: None,
            created_at: None,
            updated_at: None,
        }
    }

    vec![
        Collection {
            id: "sample-1".to_string(),
            name: "User Management".to_string(),
            requests: vec![
                sample("sample-1-req-1", "Get Users", HttpMethod::Get, "https://api.example.com/users", "h1", ""),
                sample(
                    "sample-1-req-2",
                    "Create User",
                    HttpMethod::Post,
                    "https://api.example.com/users",
                    "h2",
                    "{\n  \"name\": \"John Doe\"\n}",
                ),
            ],
            created_at: None,
            updated_at: None,
        },
        Collection {
            id: "sample-2".to_string(),
            name: "Authentication".to_string(),
            requests: vec![sample(
                "sample-2-req-1",
                "Login",
                HttpMethod::Post,
                "https://api.example.com/auth/login",
                "h3",
                "{\n  \"email\": \"user@example.com\",\n  \"password\": \"password\"\n}",
            )],
            created_at: None,
            updated_at: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_have_unique_request_ids() {
        for col in sample_collections() {
            let mut ids: Vec<_> = col.requests.iter().map(|r| r.id.clone()).collect();
            ids.sort();
            ids.dedup();
            assert_eq!(ids.len(), col.requests.len());
        }
    }

    #[test]
    fn test_collection_without_requests_field() {
        let col: Collection = serde_json::from_str(r#"{"id":"c1","name":"Smoke"}"#).unwrap();
        assert!(col.requests.is_empty());
        assert!(col.first_request_id().is_none());
    }
}
