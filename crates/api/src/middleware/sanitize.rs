//! Request input sanitization.
//!
//! Rewrites the request before any handler sees it: every string leaf of a
//! JSON body and every query-string key/value is HTML-escaped via
//! [`gatehouse_core::sanitize`]. Non-JSON bodies pass through untouched.

use axum::body::{to_bytes, Body};
use axum::extract::Request;
use axum::http::header::CONTENT_LENGTH;
use axum::http::uri::Uri;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use gatehouse_core::sanitize::{escape_html, sanitize_value};
use url::form_urlencoded;

/// Maximum buffered request body. Larger bodies are rejected outright.
const BODY_LIMIT: usize = 1024 * 1024;

/// Axum middleware: sanitize body and query in place, then continue.
pub async fn sanitize_request(request: Request, next: Next) -> Response {
    let (mut parts, body) = request.into_parts();

    if let Some(sanitized_uri) = sanitize_query(&parts.uri) {
        parts.uri = sanitized_uri;
    }

    let bytes = match to_bytes(body, BODY_LIMIT).await {
        Ok(bytes) => bytes,
        Err(_) => {
            return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response()
        }
    };

    let body = match sanitize_body(&bytes) {
        Some(rewritten) => {
            parts.headers.insert(CONTENT_LENGTH, rewritten.len().into());
            Body::from(rewritten)
        }
        None => Body::from(bytes),
    };

    next.run(Request::from_parts(parts, body)).await
}

/// Escape string leaves of a JSON body. Returns `None` when the body is not
/// JSON or needs no rewriting.
fn sanitize_body(bytes: &[u8]) -> Option<Vec<u8>> {
    let mut value: serde_json::Value = serde_json::from_slice(bytes).ok()?;
    sanitize_value(&mut value);
    serde_json::to_vec(&value).ok()
}

/// Escape query keys and values, rebuilding the URI. Returns `None` when
/// there is no query or nothing changes.
fn sanitize_query(uri: &Uri) -> Option<Uri> {
    let query = uri.query()?;

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    let mut changed = false;
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        let clean_key = escape_html(&key);
        let clean_value = escape_html(&value);
        changed |= clean_key != key || clean_value != value;
        serializer.append_pair(&clean_key, &clean_value);
    }
    if !changed {
        return None;
    }

    let path_and_query = format!("{}?{}", uri.path(), serializer.finish());
    let mut uri_parts = uri.clone().into_parts();
    uri_parts.path_and_query = path_and_query.parse().ok();
    Uri::from_parts(uri_parts).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_body_is_rewritten() {
        let body = br#"{"name":"<script>alert(1)</script>Hi","age":3}"#;
        let rewritten = sanitize_body(body).expect("json body should rewrite");
        let value: serde_json::Value = serde_json::from_slice(&rewritten).unwrap();
        assert!(!value["name"].as_str().unwrap().contains("<script>"));
        assert_eq!(value["age"], 3);
    }

    #[test]
    fn test_non_json_body_passes_through() {
        assert!(sanitize_body(b"plain text, not json").is_none());
    }

    #[test]
    fn test_query_is_rewritten() {
        let uri: Uri = "/api/admin/logs?type=%3Cscript%3Ex%3C%2Fscript%3E&limit=5"
            .parse()
            .unwrap();
        let sanitized = sanitize_query(&uri).expect("query should rewrite");
        let query = sanitized.query().unwrap();

        let pairs: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        let type_value = &pairs.iter().find(|(k, _)| k == "type").unwrap().1;
        assert!(!type_value.contains('<'), "decoded value: {type_value}");
        assert!(pairs.contains(&("limit".to_string(), "5".to_string())));
    }

    #[test]
    fn test_clean_query_is_untouched() {
        let uri: Uri = "/api/admin/logs?type=AUTH_LOGIN".parse().unwrap();
        assert!(sanitize_query(&uri).is_none());
    }
}
