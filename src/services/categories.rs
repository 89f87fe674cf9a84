//! Categories service.

use super::types::{Category, Granularity, ListEnvelope};
use crate::cache::{cache_key, CacheConfig};
use crate::errors::WorldAnvilResult;
use crate::pipeline::{RequestPipeline, RequestSpec};
use async_trait::async_trait;
use std::sync::Arc;

/// Access to categories within a world.
#[async_trait]
pub trait CategoriesService: Send + Sync {
    /// List the categories of a world.
    async fn list(&self, world_id: &str) -> WorldAnvilResult<Vec<Category>>;

    /// Fetch one category at the requested detail level.
    async fn get(&self, id: &str, granularity: Granularity) -> WorldAnvilResult<Category>;
}

/// Pipeline-backed categories service.
pub struct CategoriesServiceImpl {
    pipeline: Arc<RequestPipeline>,
    cache_config: CacheConfig,
}

impl CategoriesServiceImpl {
    /// Create a new categories service.
    pub fn new(pipeline: Arc<RequestPipeline>, cache_config: CacheConfig) -> Self {
        Self {
            pipeline,
            cache_config,
        }
    }
}

#[async_trait]
impl CategoriesService for CategoriesServiceImpl {
    async fn list(&self, world_id: &str) -> WorldAnvilResult<Vec<Category>> {
        let spec = RequestSpec::get("world/categories")
            .with_query("id", world_id)
            .with_cache(
                format!("category:list:{}", world_id),
                self.cache_config.ttl_for("category"),
            );

        let payload = self.pipeline.execute(&spec).await?;
        let envelope: ListEnvelope<Category> = serde_json::from_value(payload)?;
        Ok(envelope.entities)
    }

    async fn get(&self, id: &str, granularity: Granularity) -> WorldAnvilResult<Category> {
        let spec = RequestSpec::get("category")
            .with_query("id", id)
            .with_query("granularity", granularity)
            .with_cache(
                cache_key("category", id, granularity.level()),
                self.cache_config.ttl_for("category"),
            );

        let payload = self.pipeline.execute(&spec).await?;
        Ok(serde_json::from_value(payload)?)
    }
}
