use humansize::{DECIMAL, format_size};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyFormat {
    Json,
    Text,
}

/// Response body, classified once when it is received.
///
/// `raw` is exactly what the server sent; the parsed value is only a view.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json { raw: String, value: Value },
    Text(String),
}

impl ResponseBody {
    pub fn classify(raw: String) -> Self {
        if raw.is_empty() {
            return ResponseBody::Text(raw);
        }
        match serde_json::from_str::<Value>(&raw) {
            Ok(value) => ResponseBody::Json { raw, value },
            Err(_) => ResponseBody::Text(raw),
        }
    }

    pub fn raw(&self) -> &str {
        match self {
            ResponseBody::Json { raw, .. } => raw,
            ResponseBody::Text(raw) => raw,
        }
    }

    pub fn format(&self) -> BodyFormat {
        match self {
            ResponseBody::Json { .. } => BodyFormat::Json,
            ResponseBody::Text(_) => BodyFormat::Text,
        }
    }

    pub fn json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json { value, .. } => Some(value),
            ResponseBody::Text(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseHeader {
    pub key: String,
    pub value: String,
}

/// Outcome of one executed call. Not tied to the saved request it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "StoredExecution", from = "StoredExecution")]
pub struct ExecutionResult {
    pub status: u16,
    pub status_text: String,
    pub ok: bool,
    pub time_ms: u64,
    pub size: usize,
    pub headers: Vec<ResponseHeader>,
    pub body: ResponseBody,
}

impl ExecutionResult {
    pub fn body_format(&self) -> BodyFormat {
        self.body.format()
    }

    /// One-line summary, e.g. `200 OK · 12 ms · 1.2 kB`.
    pub fn summary(&self) -> String {
        let status = if self.status_text.is_empty() {
            self.status.to_string()
        } else {
            format!("{} {}", self.status, self.status_text)
        };
        format!("{status} · {} ms · {}", self.time_ms, format_size(self.size, DECIMAL))
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredExecution {
    status: u16,
    status_text: String,
    ok: bool,
    time_ms: u64,
    size: usize,
    headers: Vec<ResponseHeader>,
    body: String,
    body_format: BodyFormat,
}

impl From<ExecutionResult> for StoredExecution {
    fn from(result: ExecutionResult) -> Self {
        let body_format = result.body.format();
        let body = match result.body {
            ResponseBody::Json { raw, .. } => raw,
            ResponseBody::Text(raw) => raw,
        };
        Self {
            status: result.status,
            status_text: result.status_text,
            ok: result.ok,
            time_ms: result.time_ms,
            size: result.size,
            headers: result.headers,
            body,
            body_format,
        }
    }
}

impl From<StoredExecution> for ExecutionResult {
    fn from(stored: StoredExecution) -> Self {
        let body = match stored.body_format {
            BodyFormat::Json => ResponseBody::classify(stored.body),
            BodyFormat::Text => ResponseBody::Text(stored.body),
        };
        Self {
            status: stored.status,
            status_text: stored.status_text,
            ok: stored.ok,
            time_ms: stored.time_ms,
            size: stored.size,
            headers: stored.headers,
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_keeps_raw_json_untouched() {
        let raw = "{ \"a\" :1,\n\"b\":[1, 2] }".to_string();
        let body = ResponseBody::classify(raw.clone());
        assert_eq!(body.format(), BodyFormat::Json);
        assert_eq!(body.raw(), raw);
        assert_eq!(body.json().unwrap()["a"], 1);
    }

    #[test]
    fn test_classify_text_and_empty() {
        assert_eq!(ResponseBody::classify("hello".into()).format(), BodyFormat::Text);
        assert_eq!(ResponseBody::classify(String::new()).format(), BodyFormat::Text);
    }

    #[test]
    fn test_stored_shape() {
        let result = ExecutionResult {
            status: 200,
            status_text: "OK".into(),
            ok: true,
            time_ms: 5,
            size: 2,
            headers: vec![ResponseHeader { key: "x".into(), value: "y".into() }],
            body: ResponseBody::classify("{}".into()),
        };
        let json = serde_json::to_string(&result).unwrap();
        insta::assert_snapshot!(json, @r#"{"status":200,"statusText":"OK","ok":true,"timeMs":5,"size":2,"headers":[{"key":"x","value":"y"}],"body":"{}","bodyFormat":"json"}"#);
        let back: ExecutionResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }

    #[test]
    fn test_summary() {
        let result = ExecutionResult {
            status: 404,
            status_text: "Not Found".into(),
            ok: false,
            time_ms: 31,
            size: 1234,
            headers: Vec::new(),
            body: ResponseBody::Text("missing".into()),
        };
        assert_eq!(result.summary(), "404 Not Found · 31 ms · 1.23 kB");
    }
}
