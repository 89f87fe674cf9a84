//! Identity service.

use super::types::Identity;
use crate::cache::{cache_key, CacheConfig};
use crate::errors::WorldAnvilResult;
use crate::pipeline::{RequestPipeline, RequestSpec};
use async_trait::async_trait;
use std::sync::Arc;

/// Access to the authenticated user's identity.
#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Fetch the identity behind the configured auth token.
    async fn current(&self) -> WorldAnvilResult<Identity>;
}

/// Pipeline-backed identity service.
pub struct IdentityServiceImpl {
    pipeline: Arc<RequestPipeline>,
    cache_config: CacheConfig,
}

impl IdentityServiceImpl {
    /// Create a new identity service.
    pub fn new(pipeline: Arc<RequestPipeline>, cache_config: CacheConfig) -> Self {
        Self {
            pipeline,
            cache_config,
        }
    }
}

#[async_trait]
impl IdentityService for IdentityServiceImpl {
    async fn current(&self) -> WorldAnvilResult<Identity> {
        let spec = RequestSpec::get("identity").with_cache(
            cache_key("identity", "self", 0),
            self.cache_config.ttl_for("identity"),
        );

        let payload = self.pipeline.execute(&spec).await?;
        Ok(serde_json::from_value(payload)?)
    }
}
