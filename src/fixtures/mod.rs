//! Test fixtures: canned World Anvil response bodies.

use crate::transport::HttpResponse;
use bytes::Bytes;
use http::HeaderMap;
use serde_json::{json, Value};

/// Build an HTTP response with a JSON body.
pub fn json_response(status: u16, body: Value) -> HttpResponse {
    HttpResponse {
        status,
        headers: HeaderMap::new(),
        body: Bytes::from(body.to_string()),
    }
}

/// A 200 response whose body carries `"success": true` merged with `extra`.
pub fn ok_response(extra: Value) -> HttpResponse {
    let mut body = json!({"success": true});
    if let (Some(map), Some(extra)) = (body.as_object_mut(), extra.as_object()) {
        for (k, v) in extra {
            map.insert(k.clone(), v.clone());
        }
    }
    json_response(200, body)
}

/// A 200 response reporting a logical failure, the upstream quirk.
pub fn api_failure_response(message: &str) -> HttpResponse {
    json_response(200, json!({"success": false, "error": message}))
}

/// An error response with an empty JSON body.
pub fn error_response(status: u16) -> HttpResponse {
    json_response(status, json!({"error": format!("status {}", status)}))
}

/// A 429 response carrying a Retry-After header.
pub fn rate_limited_response(retry_after_secs: u64) -> HttpResponse {
    let mut response = json_response(429, json!({"error": "rate limit exceeded"}));
    response.headers.insert(
        "retry-after",
        retry_after_secs.to_string().parse().expect("valid header"),
    );
    response
}

/// A world payload at standard granularity.
pub fn world_body(id: &str) -> Value {
    json!({
        "id": id,
        "title": "Aerth",
        "slug": "aerth",
        "url": format!("https://www.worldanvil.com/w/aerth-{}", id),
        "description": "A high-fantasy setting."
    })
}

/// An article payload at standard granularity.
pub fn article_body(id: &str, world_id: &str) -> Value {
    json!({
        "id": id,
        "title": "The Sundering",
        "slug": "the-sundering",
        "world": {"id": world_id},
        "content": "Long ago the continents were one."
    })
}

/// A category payload.
pub fn category_body(id: &str) -> Value {
    json!({
        "id": id,
        "title": "Geography",
        "slug": "geography"
    })
}

/// An identity payload.
pub fn identity_body() -> Value {
    json!({
        "id": "user-1",
        "username": "worldsmith",
        "userhash": "abc123"
    })
}
