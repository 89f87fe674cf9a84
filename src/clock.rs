//! Time abstractions for deterministic testing.
//!
//! Cache expiry, token-bucket refill and retry backoff all depend on the
//! passage of time. The clock and the sleeper are injected so tests can
//! drive time manually without real wall-clock waits.

use async_trait::async_trait;
use std::time::{Duration, Instant};

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> Instant;
}

/// Clock backed by the system monotonic clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Suspends the calling task for a duration.
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Sleep for the given duration.
    async fn sleep(&self, duration: Duration);
}

/// Sleeper backed by the tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
