use reqwest::{Client, Method, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::error::{ApiErrorBody, AppError};
use crate::http::executor::network_error;

/// JSON-over-HTTP access to the collections backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Base URL with `segments` appended as percent-encoded path segments.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, AppError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::InvalidUrl(format!("{} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, AppError> {
        self.call::<T, ()>(Method::GET, segments, None).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, segments: &[&str], body: &B) -> Result<T, AppError> {
        self.call(Method::POST, segments, Some(body)).await
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize>(&self, segments: &[&str], body: &B) -> Result<T, AppError> {
        self.call(Method::PATCH, segments, Some(body)).await
    }

    /// `None` when the backend confirms with an empty body, e.g. `204 No Content`.
    pub async fn delete<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<Option<T>, AppError> {
        let text = self.send::<()>(Method::DELETE, segments, None).await?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&text)?))
    }

    async fn call<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<T, AppError> {
        let text = self.send(method, segments, body).await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Issue one call and return the body of a 2xx answer.
    async fn send<B: Serialize>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<String, AppError> {
        let url = self.endpoint(segments)?;
        tracing::debug!(%method, %url, "backend call");

        let mut builder = self
            .client
            .request(method, url)
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            builder = builder.body(serde_json::to_vec(body)?);
        }

        let response = builder.send().await.map_err(network_error)?;
        let status = response.status();
        let is_json = is_json_response(&response);
        let text = response.text().await.map_err(network_error)?;

        if !status.is_success() {
            let body = if is_json {
                ApiErrorBody::Json(serde_json::from_str(&text).unwrap_or(Value::Null))
            } else {
                ApiErrorBody::Text(text)
            };
            return Err(AppError::Api {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Request failed").to_string(),
                body,
            });
        }

        Ok(text)
    }
}

fn is_json_response(response: &Response) -> bool {
    response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<mime::Mime>().ok())
        .is_some_and(|m| m.subtype() == mime::JSON || m.suffix() == Some(mime::JSON))
}
