//! HTTP transport layer.
//!
//! The transport performs exactly one network exchange per call and returns
//! the raw response regardless of status; classification and retries are
//! the pipeline's job.

mod http_transport;

pub use http_transport::ReqwestTransport;

use crate::errors::WorldAnvilResult;
use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, Method};
use url::Url;

/// HTTP transport abstraction for testability.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Execute a single HTTP exchange.
    ///
    /// Fails only on transport-level problems (connection refused, timeout,
    /// DNS); a non-2xx status is a successful exchange from this layer's
    /// point of view.
    async fn send(
        &self,
        method: Method,
        url: Url,
        headers: HeaderMap,
        body: Option<Bytes>,
    ) -> WorldAnvilResult<HttpResponse>;
}

/// Raw HTTP response handed to the classifier.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HeaderMap,
    /// Response body bytes
    pub body: Bytes,
}
