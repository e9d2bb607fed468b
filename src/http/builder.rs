use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use url::Url;

use crate::error::AppError;
use crate::state::key_value::active_rows;
use crate::state::request_state::{HttpMethod, KeyValuePair};

/// A validated outbound call, ready to execute.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

/// Resolve `raw` against `origin` when it is relative.
pub fn resolve_url(origin: &Url, raw: &str) -> Result<Url, AppError> {
    let raw = raw.trim();
    match Url::parse(raw) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => origin
            .join(raw)
            .map_err(|e| AppError::InvalidUrl(format!("{raw}: {e}"))),
        Err(e) => Err(AppError::InvalidUrl(format!("{raw}: {e}"))),
    }
}

/// Set each active param on the query string. A key that is set again
/// replaces every earlier value for that key, keeping the first position.
pub fn apply_params(url: &mut Url, params: &[KeyValuePair]) {
    let mut active = active_rows(params).peekable();
    if active.peek().is_none() {
        return;
    }

    let mut pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    for param in active {
        match pairs.iter().position(|(k, _)| *k == param.key) {
            Some(first) => {
                pairs[first].1 = param.value.clone();
                let mut idx = 0;
                pairs.retain(|(k, _)| {
                    let keep = idx <= first || *k != param.key;
                    idx += 1;
                    keep
                });
            }
            None => pairs.push((param.key.clone(), param.value.clone())),
        }
    }

    url.query_pairs_mut().clear().extend_pairs(pairs);
}

/// Repeated keys produce repeated header lines.
pub fn build_headers(headers: &[KeyValuePair]) -> Result<HeaderMap, AppError> {
    let mut map = HeaderMap::new();
    for header in active_rows(headers) {
        let key = header.key.trim();
        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|_| AppError::InvalidHeader(format!("invalid name {key:?}")))?;
        let value = HeaderValue::from_str(&header.value)
            .map_err(|_| AppError::InvalidHeader(format!("invalid value for {key:?}")))?;
        map.append(name, value);
    }
    Ok(map)
}

/// Validate and assemble one call. Performs no I/O.
pub fn prepare(
    origin: &Url,
    method: HttpMethod,
    raw_url: &str,
    params: &[KeyValuePair],
    headers: &[KeyValuePair],
    body: Option<&str>,
) -> Result<PreparedRequest, AppError> {
    if raw_url.trim().is_empty() {
        return Err(AppError::Validation(
            "Provide a request URL before sending.".to_string(),
        ));
    }

    let mut url = resolve_url(origin, raw_url)?;
    apply_params(&mut url, params);
    let headers = build_headers(headers)?;

    let body = body
        .filter(|b| method.allows_body() && !b.trim().is_empty())
        .map(str::to_string);

    Ok(PreparedRequest { method, url, headers, body })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Url {
        Url::parse("http://localhost").unwrap()
    }

    fn kv(key: &str, value: &str) -> KeyValuePair {
        KeyValuePair::new(key, value)
    }

    #[test]
    fn test_empty_url_is_validation_error() {
        let err = prepare(&origin(), HttpMethod::Get, "   ", &[], &[], None).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_single_param_appended_once() {
        let req = prepare(
            &origin(),
            HttpMethod::Get,
            "https://x.test/search",
            &[kv("q", "a b")],
            &[],
            None,
        )
        .unwrap();
        assert_eq!(req.url.as_str(), "https://x.test/search?q=a+b");
    }

    #[test]
    fn test_empty_key_param_is_skipped() {
        let req = prepare(
            &origin(),
            HttpMethod::Get,
            "https://x.test/search",
            &[kv("", "x"), kv("  ", "y")],
            &[],
            None,
        )
        .unwrap();
        assert_eq!(req.url.as_str(), "https://x.test/search");
    }

    #[test]
    fn test_param_last_write_wins() {
        let req = prepare(
            &origin(),
            HttpMethod::Get,
            "https://x.test/s?q=old&page=2&q=older",
            &[kv("q", "1"), kv("q", "2")],
            &[],
            None,
        )
        .unwrap();
        assert_eq!(req.url.query(), Some("q=2&page=2"));
    }

    #[test]
    fn test_relative_url_resolves_against_origin() {
        let origin = Url::parse("http://localhost:5173").unwrap();
        let req = prepare(&origin, HttpMethod::Get, "/api/ping", &[], &[], None).unwrap();
        assert_eq!(req.url.as_str(), "http://localhost:5173/api/ping");
    }

    #[test]
    fn test_unresolvable_url() {
        let err = prepare(&origin(), HttpMethod::Get, "http://", &[], &[], None).unwrap_err();
        assert!(matches!(err, AppError::InvalidUrl(_)));
    }

    #[test]
    fn test_headers_append_and_skip_inactive() {
        let headers = [kv("X-Tag", "a"), kv("", "ignored"), kv("X-Tag", "b")];
        let map = build_headers(&headers).unwrap();
        let values: Vec<_> = map.get_all("x-tag").iter().map(|v| v.to_str().unwrap()).collect();
        assert_eq!(values, ["a", "b"]);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_invalid_header_name() {
        let err = build_headers(&[kv("Bad Header", "v")]).unwrap_err();
        assert!(matches!(err, AppError::InvalidHeader(_)));
    }

    #[test]
    fn test_body_dropped_for_get_and_blank() {
        let get = prepare(&origin(), HttpMethod::Get, "/x", &[], &[], Some("{}")).unwrap();
        assert!(get.body.is_none());
        let head = prepare(&origin(), HttpMethod::Head, "/x", &[], &[], Some("{}")).unwrap();
        assert!(head.body.is_none());
        let blank = prepare(&origin(), HttpMethod::Post, "/x", &[], &[], Some("  \n")).unwrap();
        assert!(blank.body.is_none());
        let post = prepare(&origin(), HttpMethod::Post, "/x", &[], &[], Some(" {} ")).unwrap();
        assert_eq!(post.body.as_deref(), Some(" {} "));
    }
}
