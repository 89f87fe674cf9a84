//! Client interface and factory functions.

use crate::auth::{AuthManager, KeyPairAuthManager};
use crate::cache::ResponseCache;
use crate::clock::{Clock, Sleeper, SystemClock, TokioSleeper};
use crate::config::WorldAnvilConfig;
use crate::errors::{WorldAnvilError, WorldAnvilResult};
use crate::pipeline::RequestPipeline;
use crate::resilience::{RateLimiter, RetryExecutor};
use crate::services::{
    ArticlesService, ArticlesServiceImpl, CategoriesService, CategoriesServiceImpl,
    IdentityService, IdentityServiceImpl, WorldsService, WorldsServiceImpl,
};
use crate::transport::{HttpTransport, ReqwestTransport};
use std::sync::Arc;
use url::Url;

/// World Anvil API client.
///
/// Each instance owns its own cache and rate-limiter state, constructed
/// from its configuration and passed by reference to the pipeline; there
/// are no process-wide globals. Two clients pointed at different base URLs
/// or credentials share nothing.
pub struct WorldAnvilClient {
    config: Arc<WorldAnvilConfig>,
    cache: Arc<ResponseCache>,
    identity: Arc<dyn IdentityService>,
    worlds: Arc<dyn WorldsService>,
    articles: Arc<dyn ArticlesService>,
    categories: Arc<dyn CategoriesService>,
}

impl WorldAnvilClient {
    /// Create a new client from configuration.
    pub fn new(config: WorldAnvilConfig) -> WorldAnvilResult<Self> {
        let transport = Arc::new(ReqwestTransport::new(config.timeout)?) as Arc<dyn HttpTransport>;
        let auth = Arc::new(KeyPairAuthManager::new(
            config.application_key.clone(),
            config.auth_token.clone(),
        )) as Arc<dyn AuthManager>;
        Self::with_dependencies(config, transport, auth)
    }

    /// Create a client with custom transport and auth manager.
    ///
    /// Used by tests to substitute mock collaborators; production callers
    /// go through [`WorldAnvilClient::new`].
    pub fn with_dependencies(
        config: WorldAnvilConfig,
        transport: Arc<dyn HttpTransport>,
        auth: Arc<dyn AuthManager>,
    ) -> WorldAnvilResult<Self> {
        auth.validate().map_err(|e| WorldAnvilError::Configuration {
            message: format!("Invalid credentials: {}", e),
        })?;

        let config = Arc::new(config);
        let base_url = Url::parse(&config.base_url)?;

        let clock = Arc::new(SystemClock) as Arc<dyn Clock>;
        let sleeper = Arc::new(TokioSleeper) as Arc<dyn Sleeper>;

        let cache = Arc::new(ResponseCache::new(config.cache.clone(), clock.clone()));
        let rate_limiter = Arc::new(RateLimiter::new(
            config.rate_limit.clone(),
            clock,
            sleeper.clone(),
        ));
        let retry = RetryExecutor::new(config.retry.clone(), sleeper);

        let pipeline = Arc::new(RequestPipeline::new(
            transport,
            auth,
            cache.clone(),
            rate_limiter,
            retry,
            base_url,
        ));

        Ok(Self {
            identity: Arc::new(IdentityServiceImpl::new(
                pipeline.clone(),
                config.cache.clone(),
            )),
            worlds: Arc::new(WorldsServiceImpl::new(
                pipeline.clone(),
                config.cache.clone(),
            )),
            articles: Arc::new(ArticlesServiceImpl::new(
                pipeline.clone(),
                config.cache.clone(),
            )),
            categories: Arc::new(CategoriesServiceImpl::new(pipeline, config.cache.clone())),
            config,
            cache,
        })
    }

    /// The client configuration.
    pub fn config(&self) -> &WorldAnvilConfig {
        &self.config
    }

    /// The identity service.
    pub fn identity(&self) -> Arc<dyn IdentityService> {
        self.identity.clone()
    }

    /// The worlds service.
    pub fn worlds(&self) -> Arc<dyn WorldsService> {
        self.worlds.clone()
    }

    /// The articles service.
    pub fn articles(&self) -> Arc<dyn ArticlesService> {
        self.articles.clone()
    }

    /// The categories service.
    pub fn categories(&self) -> Arc<dyn CategoriesService> {
        self.categories.clone()
    }

    /// Drop every cached response, e.g. at the start of a new session.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

/// Create a new World Anvil client from configuration.
pub fn create_client(config: WorldAnvilConfig) -> WorldAnvilResult<WorldAnvilClient> {
    WorldAnvilClient::new(config)
}

/// Create a new World Anvil client from environment variables.
pub fn create_client_from_env() -> WorldAnvilResult<WorldAnvilClient> {
    let config = WorldAnvilConfig::from_env()?;
    create_client(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn config(key: &str, token: &str) -> WorldAnvilConfig {
        WorldAnvilConfig::builder()
            .application_key(SecretString::new(key.to_string()))
            .auth_token(SecretString::new(token.to_string()))
            .build()
            .unwrap()
    }

    #[test]
    fn test_create_client() {
        let client = create_client(config("app-key", "token"));
        assert!(client.is_ok());
    }

    #[test]
    fn test_create_client_rejects_empty_credentials() {
        let client = create_client(config("", "token"));
        assert!(matches!(
            client,
            Err(WorldAnvilError::Configuration { .. })
        ));
    }

    #[test]
    fn test_create_client_rejects_bad_base_url() {
        let mut cfg = config("app-key", "token");
        cfg.base_url = "not a url".to_string();
        assert!(matches!(
            WorldAnvilClient::new(cfg),
            Err(WorldAnvilError::Configuration { .. })
        ));
    }
}
