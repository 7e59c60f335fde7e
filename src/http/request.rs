//! Request data extraction.
//!
//! # Responsibilities
//! - Carry the request ID (from `x-request-id` or freshly generated)
//! - Parse query strings and bodies into JSON values
//! - Merge query, path, and body parameters into one data bag
//!
//! # Design Decisions
//! - Query and path values are always strings; JSON bodies keep their types
//! - Later sources win on key collision: query, then path, then body
//! - Non-object JSON bodies contribute nothing to the bag

use std::collections::HashMap;
use std::fmt;
use axum::http::{header, HeaderMap, Uri};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Correlation identifier for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    /// Use the incoming header if present, otherwise generate a UUID v4.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(|v| Self(v.to_string()))
            .unwrap_or_else(|| Self(Uuid::new_v4().to_string()))
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The request body could not be read as its declared content type.
#[derive(Debug, Error)]
pub enum BodyError {
    #[error("invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid form body: {0}")]
    Form(#[from] serde_urlencoded::de::Error),

    #[error("invalid query string: {0}")]
    Query(serde_urlencoded::de::Error),
}

/// Query string pairs as string values.
pub fn query_params(uri: &Uri) -> Result<Map<String, Value>, BodyError> {
    let pairs: Vec<(String, String)> =
        serde_urlencoded::from_str(uri.query().unwrap_or("")).map_err(BodyError::Query)?;
    Ok(into_bag(pairs))
}

/// Body fields for JSON objects and urlencoded forms; empty for anything else.
pub fn body_params(headers: &HeaderMap, body: &[u8]) -> Result<Map<String, Value>, BodyError> {
    if body.is_empty() {
        return Ok(Map::new());
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase();

    if content_type.starts_with("application/json") || content_type.contains("+json") {
        match serde_json::from_slice::<Value>(body)? {
            Value::Object(map) => Ok(map),
            _ => Ok(Map::new()),
        }
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)?;
        Ok(into_bag(pairs))
    } else {
        Ok(Map::new())
    }
}

/// Merge the three sources; later ones override earlier ones.
pub fn aggregate(
    query: Map<String, Value>,
    path: &HashMap<String, String>,
    body: Map<String, Value>,
) -> Map<String, Value> {
    let mut data = query;
    for (key, value) in path {
        data.insert(key.clone(), Value::String(value.clone()));
    }
    data.extend(body);
    data
}

fn into_bag(pairs: Vec<(String, String)>) -> Map<String, Value> {
    pairs
        .into_iter()
        .map(|(key, value)| (key, Value::String(value)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use serde_json::json;

    fn json_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    #[test]
    fn test_request_id_from_header() {
        let mut headers = HeaderMap::new();
        headers.insert(X_REQUEST_ID, HeaderValue::from_static("abc-123"));
        assert_eq!(RequestId::from_headers(&headers).0, "abc-123");

        let generated = RequestId::from_headers(&HeaderMap::new());
        assert!(Uuid::parse_str(&generated.0).is_ok());
    }

    #[test]
    fn test_query_params() {
        let uri: Uri = "/users?page=2&q=a%20b".parse().unwrap();
        let query = query_params(&uri).unwrap();
        assert_eq!(query["page"], json!("2"));
        assert_eq!(query["q"], json!("a b"));
    }

    #[test]
    fn test_json_body() {
        let body = body_params(&json_headers(), br#"{"name": 42}"#).unwrap();
        assert_eq!(body["name"], json!(42));

        assert!(body_params(&json_headers(), b"[1,2]").unwrap().is_empty());
        assert!(body_params(&json_headers(), b"{oops").is_err());
    }

    #[test]
    fn test_form_body() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        let body = body_params(&headers, b"name=ada&age=36").unwrap();
        assert_eq!(body["age"], json!("36"));
    }

    #[test]
    fn test_later_sources_win() {
        let mut query = Map::new();
        query.insert("id".into(), json!("from-query"));
        query.insert("page".into(), json!("1"));
        let mut path = HashMap::new();
        path.insert("id".to_string(), "from-path".to_string());
        let mut body = Map::new();
        body.insert("page".into(), json!(3));

        let data = aggregate(query, &path, body);
        assert_eq!(data["id"], json!("from-path"));
        assert_eq!(data["page"], json!(3));
    }
}
