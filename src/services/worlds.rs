//! Worlds service.

use super::types::{Granularity, ListEnvelope, World};
use crate::cache::{cache_key, CacheConfig};
use crate::errors::WorldAnvilResult;
use crate::pipeline::{RequestPipeline, RequestSpec};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Access to worlds owned by a user.
#[async_trait]
pub trait WorldsService: Send + Sync {
    /// List the worlds owned by a user.
    async fn list(&self, user_id: &str) -> WorldAnvilResult<Vec<World>>;

    /// Fetch one world at the requested detail level.
    async fn get(&self, id: &str, granularity: Granularity) -> WorldAnvilResult<World>;

    /// Apply a partial update to a world.
    ///
    /// On success every cached world read is invalidated, at every
    /// granularity level.
    async fn update(&self, id: &str, patch: Value) -> WorldAnvilResult<World>;
}

/// Pipeline-backed worlds service.
pub struct WorldsServiceImpl {
    pipeline: Arc<RequestPipeline>,
    cache_config: CacheConfig,
}

impl WorldsServiceImpl {
    /// Create a new worlds service.
    pub fn new(pipeline: Arc<RequestPipeline>, cache_config: CacheConfig) -> Self {
        Self {
            pipeline,
            cache_config,
        }
    }
}

#[async_trait]
impl WorldsService for WorldsServiceImpl {
    async fn list(&self, user_id: &str) -> WorldAnvilResult<Vec<World>> {
        let spec = RequestSpec::get("user/worlds")
            .with_query("id", user_id)
            .with_cache(
                format!("world:list:{}", user_id),
                self.cache_config.ttl_for("world"),
            );

        let payload = self.pipeline.execute(&spec).await?;
        let envelope: ListEnvelope<World> = serde_json::from_value(payload)?;
        Ok(envelope.entities)
    }

    async fn get(&self, id: &str, granularity: Granularity) -> WorldAnvilResult<World> {
        let spec = RequestSpec::get("world")
            .with_query("id", id)
            .with_query("granularity", granularity)
            .with_cache(
                cache_key("world", id, granularity.level()),
                self.cache_config.ttl_for("world"),
            );

        let payload = self.pipeline.execute(&spec).await?;
        Ok(serde_json::from_value(payload)?)
    }

    async fn update(&self, id: &str, patch: Value) -> WorldAnvilResult<World> {
        let spec = RequestSpec::patch("world")
            .with_query("id", id)
            .with_body(patch)
            .with_resource_family("world");

        let payload = self.pipeline.execute(&spec).await?;
        Ok(serde_json::from_value(payload)?)
    }
}
