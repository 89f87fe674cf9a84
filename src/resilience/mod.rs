//! Resilience primitives for the request pipeline.
//!
//! - [`RateLimiter`]: token-bucket admission control sized to the upstream
//!   request budget.
//! - [`RetryExecutor`]: bounded retries with jittered exponential backoff
//!   for transient failures.

pub mod rate_limiter;
pub mod retry;


pub use rate_limiter::{RateLimitConfig, RateLimiter};
pub use retry::{RetryConfig, RetryExecutor};
