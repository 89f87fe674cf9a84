//! Articles service.

use super::types::{Article, Granularity, ListEnvelope};
use crate::cache::{cache_key, CacheConfig};
use crate::errors::WorldAnvilResult;
use crate::pipeline::{RequestPipeline, RequestSpec};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Access to articles within a world.
#[async_trait]
pub trait ArticlesService: Send + Sync {
    /// List articles in a world, paginated.
    async fn list(
        &self,
        world_id: &str,
        limit: u32,
        offset: u32,
    ) -> WorldAnvilResult<Vec<Article>>;

    /// Fetch one article at the requested detail level.
    async fn get(&self, id: &str, granularity: Granularity) -> WorldAnvilResult<Article>;

    /// Apply a partial update to an article.
    ///
    /// On success every cached article read, lists included, is
    /// invalidated.
    async fn update(&self, id: &str, patch: Value) -> WorldAnvilResult<Article>;
}

/// Pipeline-backed articles service.
pub struct ArticlesServiceImpl {
    pipeline: Arc<RequestPipeline>,
    cache_config: CacheConfig,
}

impl ArticlesServiceImpl {
    /// Create a new articles service.
    pub fn new(pipeline: Arc<RequestPipeline>, cache_config: CacheConfig) -> Self {
        Self {
            pipeline,
            cache_config,
        }
    }
}

#[async_trait]
impl ArticlesService for ArticlesServiceImpl {
    async fn list(
        &self,
        world_id: &str,
        limit: u32,
        offset: u32,
    ) -> WorldAnvilResult<Vec<Article>> {
        let spec = RequestSpec::get("world/articles")
            .with_query("id", world_id)
            .with_query("limit", limit)
            .with_query("offset", offset)
            .with_cache(
                format!("article:list:{}:{}:{}", world_id, limit, offset),
                self.cache_config.ttl_for("article"),
            );

        let payload = self.pipeline.execute(&spec).await?;
        let envelope: ListEnvelope<Article> = serde_json::from_value(payload)?;
        Ok(envelope.entities)
    }

    async fn get(&self, id: &str, granularity: Granularity) -> WorldAnvilResult<Article> {
        let spec = RequestSpec::get("article")
            .with_query("id", id)
            .with_query("granularity", granularity)
            .with_cache(
                cache_key("article", id, granularity.level()),
                self.cache_config.ttl_for("article"),
            );

        let payload = self.pipeline.execute(&spec).await?;
        Ok(serde_json::from_value(payload)?)
    }

    async fn update(&self, id: &str, patch: Value) -> WorldAnvilResult<Article> {
        let spec = RequestSpec::patch("article")
            .with_query("id", id)
            .with_body(patch)
            .with_resource_family("article");

        let payload = self.pipeline.execute(&spec).await?;
        Ok(serde_json::from_value(payload)?)
    }
}
