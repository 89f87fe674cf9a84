//! Reqwest-based transport implementation.

use super::{HttpResponse, HttpTransport};
use crate::errors::{WorldAnvilError, WorldAnvilResult};
use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, Method};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Reqwest-based HTTP transport.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a new transport with the given request timeout.
    pub fn new(timeout: Duration) -> WorldAnvilResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(8)
            .build()
            .map_err(|e| WorldAnvilError::Configuration {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self { client })
    }

    fn to_reqwest_method(method: &Method) -> reqwest::Method {
        match *method {
            Method::GET => reqwest::Method::GET,
            Method::POST => reqwest::Method::POST,
            Method::PUT => reqwest::Method::PUT,
            Method::DELETE => reqwest::Method::DELETE,
            Method::PATCH => reqwest::Method::PATCH,
            _ => reqwest::Method::GET,
        }
    }

    fn to_reqwest_headers(headers: &HeaderMap) -> reqwest::header::HeaderMap {
        let mut out = reqwest::header::HeaderMap::new();
        for (name, value) in headers.iter() {
            if let (Ok(name), Ok(value)) = (
                reqwest::header::HeaderName::from_bytes(name.as_str().as_bytes()),
                reqwest::header::HeaderValue::from_bytes(value.as_bytes()),
            ) {
                out.insert(name, value);
            }
        }
        out
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(
        &self,
        method: Method,
        url: Url,
        headers: HeaderMap,
        body: Option<Bytes>,
    ) -> WorldAnvilResult<HttpResponse> {
        let mut request = self
            .client
            .request(Self::to_reqwest_method(&method), url.as_str())
            .headers(Self::to_reqwest_headers(&headers));

        if let Some(body) = body {
            request = request.body(body.to_vec());
        }

        let response = request.send().await?;

        let status = response.status().as_u16();
        let mut response_headers = HeaderMap::new();
        for (name, value) in response.headers().iter() {
            if let (Ok(name), Ok(value)) = (
                http::header::HeaderName::from_bytes(name.as_str().as_bytes()),
                http::header::HeaderValue::from_bytes(value.as_bytes()),
            ) {
                response_headers.insert(name, value);
            }
        }
        let body = response.bytes().await?;

        Ok(HttpResponse {
            status,
            headers: response_headers,
            body,
        })
    }
}
