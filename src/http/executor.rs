use std::time::Instant;

use reqwest::Client;
use tokio::sync::mpsc::UnboundedSender;
use url::Url;

use crate::error::AppError;
use crate::event::Event;
use crate::state::request_state::{HttpMethod, KeyValuePair};
use crate::state::response_state::{ExecutionResult, ResponseBody, ResponseHeader};
use super::builder::{PreparedRequest, prepare};

/// Validate, then issue exactly one call. A validation failure never
/// touches the network.
pub async fn send(
    client: &Client,
    origin: &Url,
    method: HttpMethod,
    raw_url: &str,
    params: &[KeyValuePair],
    headers: &[KeyValuePair],
    body: Option<&str>,
) -> Result<ExecutionResult, AppError> {
    let prepared = prepare(origin, method, raw_url, params, headers, body)?;
    execute(client, prepared).await
}

/// Run a prepared call and report the outcome on the event channel.
pub async fn execute_and_report(client: Client, request: PreparedRequest, tx: UnboundedSender<Event>) {
    let result = execute(&client, request).await;
    let _ = tx.send(Event::Response(result));
}

pub async fn execute(client: &Client, request: PreparedRequest) -> Result<ExecutionResult, AppError> {
    tracing::info!(method = %request.method, url = %request.url, "sending request");

    let mut builder = client
        .request(request.method.into(), request.url.clone())
        .headers(request.headers);
    if let Some(body) = request.body {
        builder = builder.body(body);
    }

    let start = Instant::now();
    let response = builder.send().await.map_err(network_error)?;
    let time_ms = (start.elapsed().as_secs_f64() * 1000.0).round() as u64;

    let status = response.status();
    let headers: Vec<ResponseHeader> = response
        .headers()
        .iter()
        .map(|(k, v)| ResponseHeader {
            key: k.to_string(),
            value: String::from_utf8_lossy(v.as_bytes()).into_owned(),
        })
        .collect();

    let raw = response.text().await.map_err(network_error)?;
    let size = raw.len();

    tracing::info!(status = status.as_u16(), time_ms, size, "response received");

    Ok(ExecutionResult {
        status: status.as_u16(),
        status_text: status.canonical_reason().unwrap_or("").to_string(),
        ok: status.is_success(),
        time_ms,
        size,
        headers,
        body: ResponseBody::classify(raw),
    })
}

/// Human-readable message for a transport failure.
pub fn network_error(e: reqwest::Error) -> AppError {
    tracing::debug!(error = ?e, "transport failure");
    let msg = if e.is_timeout() {
        "Request timed out".to_string()
    } else if e.is_connect() {
        format!("Connection failed: {e}")
    } else if e.is_body() || e.is_decode() {
        format!("Error reading body: {e}")
    } else {
        format!("Request failed: {e}")
    };
    AppError::Network(msg)
}

