//! # World Anvil API Client
//!
//! Production-ready Rust client for the World Anvil worldbuilding platform
//! (Boromir external API).
//!
//! ## Features
//!
//! - Resource coverage: identity, worlds, articles, categories
//! - Resilient request pipeline: response cache (TTL + LRU), token-bucket
//!   rate limiting, bounded retries with jittered exponential backoff
//! - Total response classification, including the upstream quirk of
//!   reporting operational failures with an HTTP 200 status
//! - Comprehensive observability (structured logging via `tracing`)
//! - Secure credential handling with `SecretString`
//! - Injectable clock, sleeper and transport for deterministic tests
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use integrations_worldanvil::{create_client, Granularity, WorldAnvilConfig};
//! use secrecy::SecretString;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = WorldAnvilConfig::builder()
//!         .application_key(SecretString::new("app-key".to_string()))
//!         .auth_token(SecretString::new("user-token".to_string()))
//!         .build()?;
//!
//!     let client = create_client(config)?;
//!
//!     // Or create from environment variables
//!     // let client = create_client_from_env()?;
//!
//!     let world = client.worlds().get("world-id", Granularity::Standard).await?;
//!     println!("{}", world.title);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - `client` - Main client interface and factory functions
//! - `config` - Configuration types and builder
//! - `auth` - Authentication and header management
//! - `transport` - HTTP transport layer
//! - `errors` - Error taxonomy and response classification
//! - `cache` - Bounded TTL + LRU response cache
//! - `resilience` - Rate limiting and retry policies
//! - `pipeline` - The request pipeline orchestrating the above
//! - `services` - Thin per-resource services and typed models
//! - `mocks` / `fixtures` - Test support

#![warn(missing_docs)]
#![warn(clippy::all)]

// Public modules
pub mod auth;
pub mod cache;
pub mod client;
pub mod clock;
pub mod config;
pub mod errors;
pub mod observability;
pub mod pipeline;
pub mod resilience;
pub mod services;
pub mod transport;

// Development/testing modules
#[cfg(test)]
pub mod fixtures;
#[cfg(test)]
pub mod mocks;

// Re-exports for convenience
pub use auth::{AuthManager, KeyPairAuthManager};
pub use cache::{cache_key, CacheConfig, ResponseCache};
pub use client::{create_client, create_client_from_env, WorldAnvilClient};
pub use clock::{Clock, Sleeper, SystemClock, TokioSleeper};
pub use config::{WorldAnvilConfig, WorldAnvilConfigBuilder};
pub use errors::{classify, ValidationDetail, WorldAnvilError, WorldAnvilResult};
pub use observability::{LogFormat, LogLevel, LoggingConfig};
pub use pipeline::{RequestPipeline, RequestSpec};
pub use resilience::{RateLimitConfig, RateLimiter, RetryConfig, RetryExecutor};
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};

// Service re-exports
pub use services::{
    Article, ArticlesService, ArticlesServiceImpl, CategoriesService, CategoriesServiceImpl,
    Category, Granularity, Identity, IdentityService, IdentityServiceImpl, ResourceRef, World,
    WorldsService, WorldsServiceImpl,
};

/// The default World Anvil external API base URL
pub const DEFAULT_BASE_URL: &str = "https://www.worldanvil.com/api/external/boromir";

/// The default request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
