//! Response classification.
//!
//! [`classify`] is the single place where a raw HTTP response is turned into
//! a typed outcome. It is a total, pure function: every (status, headers,
//! body) triple maps to exactly one outcome and no side effects occur, so it
//! is unit-testable without any network. Transport-level failures never
//! reach it; they are already `WorldAnvilError::Network` by the time the
//! pipeline sees them.

use crate::errors::{ValidationDetail, WorldAnvilError, WorldAnvilResult};
use http::HeaderMap;
use serde_json::Value;
use std::time::Duration;

/// Classify an HTTP response into a success payload or a typed error.
///
/// Status mapping, checked in order: 401/403 authentication, 404 not found,
/// 422 validation (with field details when the body carries them), 429 rate
/// limit (honoring `Retry-After`), 5xx server. A 2xx response must carry a
/// JSON body with an explicit `"success": true` to count as a success; a
/// body whose flag is false or missing is an [`WorldAnvilError::ApiFailure`]
/// because the upstream reports some operational failures with a 200 status.
pub fn classify(status: u16, headers: &HeaderMap, body: &[u8]) -> WorldAnvilResult<Value> {
    match status {
        401 | 403 => Err(WorldAnvilError::Authentication {
            message: error_message(body, "authentication rejected"),
        }),
        404 => Err(WorldAnvilError::NotFound {
            message: error_message(body, "resource not found"),
        }),
        422 => Err(WorldAnvilError::Validation {
            message: error_message(body, "request validation failed"),
            details: validation_details(body),
        }),
        429 => Err(WorldAnvilError::RateLimit {
            message: error_message(body, "rate limit exceeded"),
            retry_after: retry_after(headers),
        }),
        s if s >= 500 => Err(WorldAnvilError::Server {
            message: error_message(body, "server error"),
            status_code: s,
        }),
        s if (200..300).contains(&s) => classify_success_body(body),
        s => Err(WorldAnvilError::Internal {
            message: format!("unexpected HTTP status {}: {}", s, body_excerpt(body)),
        }),
    }
}

/// Apply the success-flag check to a 2xx body.
fn classify_success_body(body: &[u8]) -> WorldAnvilResult<Value> {
    let parsed: Value = match serde_json::from_slice(body) {
        Ok(v) => v,
        Err(_) => {
            return Err(WorldAnvilError::ApiFailure {
                message: format!("response body is not JSON: {}", body_excerpt(body)),
            })
        }
    };

    match parsed.get("success").and_then(Value::as_bool) {
        Some(true) => Ok(parsed),
        Some(false) => Err(WorldAnvilError::ApiFailure {
            message: extract_message(&parsed)
                .unwrap_or_else(|| "API reported success=false".to_string()),
        }),
        None => Err(WorldAnvilError::ApiFailure {
            message: "response body lacks the success indicator".to_string(),
        }),
    }
}

/// Pull the `Retry-After` header as a whole number of seconds.
fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

/// Best-effort error message from a response body.
fn error_message(body: &[u8], fallback: &str) -> String {
    serde_json::from_slice::<Value>(body)
        .ok()
        .as_ref()
        .and_then(extract_message)
        .unwrap_or_else(|| {
            if body.is_empty() {
                fallback.to_string()
            } else {
                body_excerpt(body)
            }
        })
}

fn extract_message(value: &Value) -> Option<String> {
    value
        .get("error")
        .or_else(|| value.get("message"))
        .and_then(Value::as_str)
        .map(String::from)
}

fn validation_details(body: &[u8]) -> Vec<ValidationDetail> {
    serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("errors")
                .cloned()
                .and_then(|e| serde_json::from_value(e).ok())
        })
        .unwrap_or_default()
}

fn body_excerpt(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    if text.chars().count() > 200 {
        let excerpt: String = text.chars().take(200).collect();
        format!("{}...", excerpt)
    } else {
        text.to_string()
    }
}
