//! Shared service-test plumbing: a pipeline wired to mock collaborators.

use crate::auth::KeyPairAuthManager;
use crate::cache::{CacheConfig, ResponseCache};
use crate::mocks::{ManualClock, MockHttpTransport, RecordingSleeper};
use crate::pipeline::RequestPipeline;
use crate::resilience::{RateLimitConfig, RateLimiter, RetryConfig, RetryExecutor};
use secrecy::SecretString;
use std::sync::Arc;
use url::Url;

/// Build a pipeline over a mock transport, manual clock and recording
/// sleeper, returning the pipeline and the transport for scripting.
pub(crate) fn pipeline_harness() -> (Arc<RequestPipeline>, Arc<MockHttpTransport>) {
    let clock = Arc::new(ManualClock::new());
    let sleeper = Arc::new(RecordingSleeper::advancing(clock.clone()));
    let transport = Arc::new(MockHttpTransport::new());
    let cache = Arc::new(ResponseCache::new(CacheConfig::default(), clock.clone()));
    let rate_limiter = Arc::new(RateLimiter::new(
        RateLimitConfig::default(),
        clock,
        sleeper.clone(),
    ));
    let auth = Arc::new(KeyPairAuthManager::new(
        SecretString::new("app-key".to_string()),
        SecretString::new("token".to_string()),
    ));
    let retry = RetryExecutor::new(RetryConfig::default(), sleeper);
    let pipeline = Arc::new(RequestPipeline::new(
        transport.clone(),
        auth,
        cache,
        rate_limiter,
        retry,
        Url::parse("https://api.example.com/external").expect("valid test URL"),
    ));
    (pipeline, transport)
}
