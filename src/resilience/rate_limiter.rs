//! Token-bucket rate limiting.

use crate::clock::{Clock, Sleeper};
use parking_lot::Mutex;
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Configuration for rate limiting.
///
/// The defaults stay under the upstream's published limit of 60 requests
/// per minute with a conservative margin, so bursts from concurrent tool
/// invocations cannot trip the server-side limiter. Zero values are
/// clamped to one when the limiter is built, so `acquire` always makes
/// progress.
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Steady-state request budget per minute
    #[serde(default = "default_requests_per_minute")]
    pub requests_per_minute: u32,
    /// Bucket capacity, i.e. the largest admissible burst
    #[serde(default = "default_burst")]
    pub burst: u32,
}

fn default_requests_per_minute() -> u32 {
    50
}

fn default_burst() -> u32 {
    10
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_minute: default_requests_per_minute(),
            burst: default_burst(),
        }
    }
}

/// Token-bucket rate limiter.
///
/// `acquire` never fails; it only ever delays the caller until a token is
/// available. Callers needing bounded waiting apply their own cancellation
/// around the returned future. A consumed token is not refunded on
/// cancellation since the network call may already be in flight.
pub struct RateLimiter {
    bucket: Mutex<TokenBucket>,
    clock: Arc<dyn Clock>,
    sleeper: Arc<dyn Sleeper>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given configuration.
    ///
    /// A zero `burst` or `requests_per_minute` is clamped to one: a bucket
    /// that can never hold a token or never refills would make `acquire`
    /// loop forever or divide by zero when computing the wait.
    pub fn new(config: RateLimitConfig, clock: Arc<dyn Clock>, sleeper: Arc<dyn Sleeper>) -> Self {
        let now = clock.now();
        Self {
            bucket: Mutex::new(TokenBucket::new(
                config.burst.max(1),
                config.requests_per_minute.max(1) as f64 / 60.0,
                now,
            )),
            clock,
            sleeper,
        }
    }

    /// Wait until a token is available, then consume exactly one.
    ///
    /// Refill is computed lazily from the elapsed time at each attempt. The
    /// refill + decrement sequence runs under the bucket lock, so a permit
    /// is never granted while tokens are below one, even under concurrent
    /// callers.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let now = self.clock.now();
                let mut bucket = self.bucket.lock();
                bucket.refill(now);
                if bucket.try_consume(1) {
                    return;
                }
                bucket.time_until_available(1)
            };

            tracing::debug!(wait_ms = wait.as_millis() as u64, "Rate limit budget exhausted, waiting");
            self.sleeper.sleep(wait).await;
        }
    }

    /// Tokens currently available, after a lazy refill.
    pub fn available(&self) -> f64 {
        let now = self.clock.now();
        let mut bucket = self.bucket.lock();
        bucket.refill(now);
        bucket.tokens
    }
}

/// Token bucket state. Tokens increase only via refill (elapsed time times
/// rate, capped at capacity) and decrease only by whole permits.
struct TokenBucket {
    capacity: u32,
    tokens: f64,
    refill_rate: f64,
    last_refill: Instant,
}

impl TokenBucket {
    fn new(capacity: u32, refill_rate: f64, now: Instant) -> Self {
        Self {
            capacity,
            tokens: capacity as f64,
            refill_rate,
            last_refill: now,
        }
    }

    fn refill(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.refill_rate).min(self.capacity as f64);
        self.last_refill = now;
    }

    fn try_consume(&mut self, count: u32) -> bool {
        if self.tokens >= count as f64 {
            self.tokens -= count as f64;
            true
        } else {
            false
        }
    }

    fn time_until_available(&self, count: u32) -> Duration {
        if self.tokens >= count as f64 {
            Duration::ZERO
        } else {
            let needed = count as f64 - self.tokens;
            let wait = Duration::from_secs_f64(needed / self.refill_rate);
            // Never a zero wait for a missing token; float rounding can
            // leave a sub-nanosecond deficit that would stall the acquire
            // loop.
            wait.max(Duration::from_millis(1))
        }
    }
}
