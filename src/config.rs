//! Configuration types for the World Anvil API client.

use crate::cache::CacheConfig;
use crate::errors::{WorldAnvilError, WorldAnvilResult};
use crate::resilience::{RateLimitConfig, RetryConfig};
use crate::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use secrecy::SecretString;
use std::time::Duration;

/// Configuration for the World Anvil API client.
///
/// Each client instance owns its own cache and rate-limiter state built
/// from this configuration; nothing is shared ambiently between clients
/// pointed at different base URLs or credentials.
#[derive(Clone)]
pub struct WorldAnvilConfig {
    /// Application key identifying this integration
    pub application_key: SecretString,
    /// Per-user authentication token
    pub auth_token: SecretString,
    /// Base URL for the World Anvil external API
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Response cache settings
    pub cache: CacheConfig,
    /// Rate limiter settings
    pub rate_limit: RateLimitConfig,
    /// Retry settings
    pub retry: RetryConfig,
}

impl WorldAnvilConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> WorldAnvilConfigBuilder {
        WorldAnvilConfigBuilder::default()
    }

    /// Creates a configuration from environment variables.
    ///
    /// Requires `WORLD_ANVIL_APPLICATION_KEY` and `WORLD_ANVIL_AUTH_TOKEN`;
    /// `WORLD_ANVIL_BASE_URL` and `WORLD_ANVIL_TIMEOUT` are optional.
    pub fn from_env() -> WorldAnvilResult<Self> {
        let application_key = std::env::var("WORLD_ANVIL_APPLICATION_KEY").map_err(|_| {
            WorldAnvilError::Configuration {
                message: "WORLD_ANVIL_APPLICATION_KEY environment variable not set".to_string(),
            }
        })?;

        let auth_token =
            std::env::var("WORLD_ANVIL_AUTH_TOKEN").map_err(|_| WorldAnvilError::Configuration {
                message: "WORLD_ANVIL_AUTH_TOKEN environment variable not set".to_string(),
            })?;

        let base_url =
            std::env::var("WORLD_ANVIL_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let timeout_secs = std::env::var("WORLD_ANVIL_TIMEOUT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            application_key: SecretString::new(application_key),
            auth_token: SecretString::new(auth_token),
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            cache: CacheConfig::default(),
            rate_limit: RateLimitConfig::default(),
            retry: RetryConfig::default(),
        })
    }
}

/// Builder for [`WorldAnvilConfig`].
#[derive(Default)]
pub struct WorldAnvilConfigBuilder {
    application_key: Option<SecretString>,
    auth_token: Option<SecretString>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    cache: Option<CacheConfig>,
    rate_limit: Option<RateLimitConfig>,
    retry: Option<RetryConfig>,
}

impl WorldAnvilConfigBuilder {
    /// Sets the application key.
    pub fn application_key(mut self, key: SecretString) -> Self {
        self.application_key = Some(key);
        self
    }

    /// Sets the user authentication token.
    pub fn auth_token(mut self, token: SecretString) -> Self {
        self.auth_token = Some(token);
        self
    }

    /// Sets the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the cache configuration.
    pub fn cache(mut self, cache: CacheConfig) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Sets the rate limiter configuration.
    pub fn rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
        self.rate_limit = Some(rate_limit);
        self
    }

    /// Sets the retry configuration.
    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.retry = Some(retry);
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> WorldAnvilResult<WorldAnvilConfig> {
        let application_key =
            self.application_key
                .ok_or_else(|| WorldAnvilError::Configuration {
                    message: "application key is required".to_string(),
                })?;

        let auth_token = self.auth_token.ok_or_else(|| WorldAnvilError::Configuration {
            message: "auth token is required".to_string(),
        })?;

        Ok(WorldAnvilConfig {
            application_key,
            auth_token,
            base_url: self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout: self
                .timeout
                .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            cache: self.cache.unwrap_or_default(),
            rate_limit: self.rate_limit.unwrap_or_default(),
            retry: self.retry.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder_defaults() {
        let config = WorldAnvilConfig::builder()
            .application_key(SecretString::new("app-key".to_string()))
            .auth_token(SecretString::new("token".to_string()))
            .build()
            .unwrap();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.rate_limit.requests_per_minute, 50);
        assert_eq!(config.cache.max_entries, 500);
    }

    #[test]
    fn test_config_builder_custom() {
        let config = WorldAnvilConfig::builder()
            .application_key(SecretString::new("app-key".to_string()))
            .auth_token(SecretString::new("token".to_string()))
            .base_url("https://staging.example.com/api")
            .timeout(Duration::from_secs(5))
            .retry(RetryConfig {
                max_attempts: 5,
                ..Default::default()
            })
            .build()
            .unwrap();

        assert_eq!(config.base_url, "https://staging.example.com/api");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.retry.max_attempts, 5);
    }

    #[test]
    fn test_config_builder_requires_credentials() {
        let result = WorldAnvilConfig::builder().build();
        assert!(matches!(
            result,
            Err(WorldAnvilError::Configuration { .. })
        ));

        let result = WorldAnvilConfig::builder()
            .application_key(SecretString::new("app-key".to_string()))
            .build();
        assert!(matches!(
            result,
            Err(WorldAnvilError::Configuration { .. })
        ));
    }
}
