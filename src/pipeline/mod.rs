//! The resilient request pipeline.
//!
//! Turns a logical operation into zero or one outbound HTTP calls: consult
//! the response cache, acquire a rate-limiter token, execute the transport
//! call with bounded retries, classify the outcome, and update the cache.
//! Every failure path surfaces as a [`WorldAnvilError`] variant; the
//! pipeline never panics and never throws an undifferentiated error.
//!
//! Concurrency notes: many logical operations may be in flight at once and
//! interleave at the awaited suspension points (rate-limiter wait, network
//! I/O, retry sleep). Cache and bucket state are lock-guarded, so the
//! pipeline is safe on a multi-threaded runtime. Two concurrent cache-miss
//! reads for the same key may both reach the network; the second write wins
//! and the entries are identical, so no single-flight guard is applied.

use crate::auth::AuthManager;
use crate::cache::ResponseCache;
use crate::errors::{classify, WorldAnvilResult};
use crate::observability::{log_request, log_response};
use crate::resilience::{RateLimiter, RetryExecutor};
use crate::transport::HttpTransport;
use bytes::Bytes;
use http::Method;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// A logical operation for the pipeline to execute.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    /// HTTP method
    pub method: Method,
    /// Path relative to the API base URL, e.g. `"world"`
    pub path: String,
    /// Query parameters
    pub query: Vec<(String, String)>,
    /// JSON request body for writes
    pub body: Option<Value>,
    /// Cache key; only honored for reads
    pub cache_key: Option<String>,
    /// TTL for the cached payload; the cache default applies when unset
    pub cache_ttl: Option<Duration>,
    /// Resource family whose cached reads a successful write invalidates
    pub resource_family: Option<String>,
}

impl RequestSpec {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            cache_key: None,
            cache_ttl: None,
            resource_family: None,
        }
    }

    /// A GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// A POST request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// A PATCH request.
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    /// A PUT request.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// A DELETE request.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append a query parameter.
    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Attach a JSON body.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Cache the payload under `key` for `ttl` on success. Reads only.
    pub fn with_cache(mut self, key: impl Into<String>, ttl: Duration) -> Self {
        self.cache_key = Some(key.into());
        self.cache_ttl = Some(ttl);
        self
    }

    /// Tag the resource family to invalidate after a successful write.
    pub fn with_resource_family(mut self, family: impl Into<String>) -> Self {
        self.resource_family = Some(family.into());
        self
    }

    fn is_read(&self) -> bool {
        self.method == Method::GET
    }

    fn operation(&self) -> String {
        format!("{} /{}", self.method, self.path)
    }
}

/// Orchestrates cache, rate limiter, transport, classification and retries.
pub struct RequestPipeline {
    transport: Arc<dyn HttpTransport>,
    auth: Arc<dyn AuthManager>,
    cache: Arc<ResponseCache>,
    rate_limiter: Arc<RateLimiter>,
    retry: RetryExecutor,
    base_url: Url,
}

impl RequestPipeline {
    /// Create a new pipeline over the given collaborators.
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        auth: Arc<dyn AuthManager>,
        cache: Arc<ResponseCache>,
        rate_limiter: Arc<RateLimiter>,
        retry: RetryExecutor,
        base_url: Url,
    ) -> Self {
        Self {
            transport,
            auth,
            cache,
            rate_limiter,
            retry,
            base_url,
        }
    }

    /// Execute a logical operation.
    ///
    /// A cache hit returns immediately without touching the rate limiter or
    /// the network. Otherwise one token is consumed for the whole logical
    /// call, the transport call runs under the retry policy, and the cache
    /// is updated from the terminal outcome: successful cached reads are
    /// stored, successful writes invalidate their resource family.
    pub async fn execute(&self, spec: &RequestSpec) -> WorldAnvilResult<Value> {
        if spec.is_read() {
            if let Some(key) = spec.cache_key.as_deref() {
                if let Some(value) = self.cache.get(key) {
                    return Ok(value);
                }
            }
        }

        self.rate_limiter.acquire().await;

        let url = self.build_url(spec)?;
        let headers = self.auth.headers()?;
        let body = match &spec.body {
            Some(body) => Some(Bytes::from(serde_json::to_vec(body)?)),
            None => None,
        };

        let operation = spec.operation();
        log_request(spec.method.as_str(), &spec.path);

        let result = self
            .retry
            .execute(&operation, || {
                let transport = self.transport.clone();
                let method = spec.method.clone();
                let url = url.clone();
                let headers = headers.clone();
                let body = body.clone();
                async move {
                    let response = transport.send(method, url, headers, body).await?;
                    log_response(response.status, response.body.len());
                    classify(response.status, &response.headers, &response.body)
                }
            })
            .await;

        if let Ok(payload) = &result {
            if spec.is_read() {
                if let Some(key) = spec.cache_key.as_deref() {
                    let ttl = spec
                        .cache_ttl
                        .unwrap_or_else(|| self.cache.config().default_ttl());
                    self.cache.set(key, payload.clone(), ttl);
                }
            } else if let Some(family) = spec.resource_family.as_deref() {
                let removed = self.cache.invalidate_pattern(family);
                tracing::debug!(family, removed, "Invalidated cached reads after write");
            }
        }

        result
    }

    fn build_url(&self, spec: &RequestSpec) -> WorldAnvilResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments =
                url.path_segments_mut()
                    .map_err(|_| crate::errors::WorldAnvilError::Configuration {
                        message: format!("base URL cannot be a base: {}", self.base_url),
                    })?;
            for segment in spec.path.split('/').filter(|s| !s.is_empty()) {
                segments.push(segment);
            }
        }
        if !spec.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &spec.query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }
}
