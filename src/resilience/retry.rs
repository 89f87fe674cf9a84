//! Retry with jittered exponential backoff.

use crate::clock::Sleeper;
use crate::errors::WorldAnvilResult;
use serde::Deserialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Configuration for retry behavior.
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    /// Total attempts per logical call, the first one included
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Backoff floor
    #[serde(default = "default_initial_backoff", with = "duration_secs")]
    pub initial_backoff: Duration,
    /// Backoff ceiling
    #[serde(default = "default_max_backoff", with = "duration_secs")]
    pub max_backoff: Duration,
    /// Multiplier applied per attempt
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
    /// Jitter fraction (0.1 = up to 10% either way)
    #[serde(default = "default_jitter")]
    pub jitter: f64,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_backoff() -> Duration {
    Duration::from_secs(2)
}

fn default_max_backoff() -> Duration {
    Duration::from_secs(10)
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_jitter() -> f64 {
    0.1
}

mod duration_secs {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = f64::deserialize(deserializer)?;
        Ok(Duration::from_secs_f64(secs))
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_backoff: default_initial_backoff(),
            max_backoff: default_max_backoff(),
            backoff_multiplier: default_backoff_multiplier(),
            jitter: default_jitter(),
        }
    }
}

/// Executes an operation with bounded retries.
///
/// Retries only errors for which
/// [`WorldAnvilError::is_retryable`](crate::errors::WorldAnvilError::is_retryable) holds:
/// rate limits, server errors and network failures. Terminal errors surface
/// immediately with a single attempt spent.
pub struct RetryExecutor {
    config: RetryConfig,
    sleeper: Arc<dyn Sleeper>,
}

impl RetryExecutor {
    /// Create a new retry executor with the given configuration.
    pub fn new(config: RetryConfig, sleeper: Arc<dyn Sleeper>) -> Self {
        Self { config, sleeper }
    }

    /// Run `f` up to `max_attempts` times, sleeping between attempts.
    ///
    /// Once the attempt ceiling is reached the last classified error is
    /// surfaced unchanged, including any server-advised retry delay it
    /// carries.
    pub async fn execute<F, Fut, T>(&self, operation: &str, f: F) -> WorldAnvilResult<T>
    where
        F: Fn() -> Fut + Send,
        Fut: Future<Output = WorldAnvilResult<T>> + Send,
        T: Send,
    {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            match f().await {
                Ok(result) => return Ok(result),
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) => {
                    if attempt >= max_attempts {
                        tracing::warn!(
                            operation,
                            attempt,
                            error = %e,
                            "Retry attempts exhausted"
                        );
                        return Err(e);
                    }

                    let delay = self.calculate_backoff(attempt, e.retry_after());
                    tracing::debug!(
                        operation,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Transient failure, retrying"
                    );
                    self.sleeper.sleep(delay).await;
                }
            }
        }
    }

    /// Backoff for a given attempt: doubling from the floor, capped at the
    /// ceiling, with randomized jitter. A server-provided retry-after takes
    /// precedence over the computed value.
    fn calculate_backoff(&self, attempt: u32, server_retry_after: Option<Duration>) -> Duration {
        if let Some(server_delay) = server_retry_after {
            return server_delay;
        }

        let base = self.config.initial_backoff.as_secs_f64()
            * self.config.backoff_multiplier.powi(attempt.saturating_sub(1) as i32);

        let jitter_range = base * self.config.jitter;
        let jitter = rand::random::<f64>() * jitter_range * 2.0 - jitter_range;
        let delay = (base + jitter)
            .clamp(0.0, self.config.max_backoff.as_secs_f64());

        Duration::from_secs_f64(delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::WorldAnvilError;
    use crate::mocks::RecordingSleeper;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn executor(config: RetryConfig) -> (RetryExecutor, Arc<RecordingSleeper>) {
        let sleeper = Arc::new(RecordingSleeper::new());
        (RetryExecutor::new(config, sleeper.clone()), sleeper)
    }

    fn server_error() -> WorldAnvilError {
        WorldAnvilError::Server {
            message: "Service unavailable".to_string(),
            status_code: 503,
        }
    }

    #[tokio::test]
    async fn test_succeeds_on_first_attempt() {
        let (executor, sleeper) = executor(RetryConfig::default());
        let attempts = AtomicU32::new(0);

        let result = executor
            .execute("test", || {
                attempts.fetch_add(1, Ordering::SeqCst);
                async { Ok(42) }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        assert!(sleeper.sleeps().is_empty());
    }

    #[tokio::test]
    async fn test_retries_retryable_error_then_succeeds() {
        let (executor, sleeper) = executor(RetryConfig {
            max_attempts: 3,
            ..Default::default()
        });
        let attempts = AtomicU32::new(0);

        let result = executor
            .execute("test", || {
                let n = attempts.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(server_error())
                    } else {
                        Ok(42)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
        assert_eq!(sleeper.sleeps().len(), 2);
    }

    #[tokio::test]
    async fn test_exactly_max_attempts_for_persistent_failure() {
        let (executor, _sleeper) = executor(RetryConfig {
            max_attempts: 3,
            ..Default::default()
        });
        let attempts = AtomicU32::new(0);

        let result: WorldAnvilResult<()> = executor
            .execute("test", || {
                attempts.fetch_add(1, Ordering::SeqCst);
                async { Err(server_error()) }
            })
            .await;

        assert!(matches!(result, Err(WorldAnvilError::Server { .. })));
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_terminal_error_spends_single_attempt() {
        let (executor, sleeper) = executor(RetryConfig::default());
        let attempts = AtomicU32::new(0);

        let result: WorldAnvilResult<()> = executor
            .execute("test", || {
                attempts.fetch_add(1, Ordering::SeqCst);
                async {
                    Err(WorldAnvilError::NotFound {
                        message: "no such world".to_string(),
                    })
                }
            })
            .await;

        assert!(matches!(result, Err(WorldAnvilError::NotFound { .. })));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        assert!(sleeper.sleeps().is_empty());
    }

    #[tokio::test]
    async fn test_server_retry_after_takes_precedence() {
        let (executor, sleeper) = executor(RetryConfig {
            max_attempts: 2,
            ..Default::default()
        });

        let result: WorldAnvilResult<()> = executor
            .execute("test", || async {
                Err(WorldAnvilError::RateLimit {
                    message: "slow down".to_string(),
                    retry_after: Some(Duration::from_secs(7)),
                })
            })
            .await;

        assert!(matches!(result, Err(WorldAnvilError::RateLimit { .. })));
        assert_eq!(sleeper.sleeps(), vec![Duration::from_secs(7)]);
    }

    #[test]
    fn test_calculate_backoff_doubles_from_floor() {
        let (executor, _sleeper) = executor(RetryConfig {
            jitter: 0.0,
            ..Default::default()
        });

        assert_eq!(executor.calculate_backoff(1, None), Duration::from_secs(2));
        assert_eq!(executor.calculate_backoff(2, None), Duration::from_secs(4));
        assert_eq!(executor.calculate_backoff(3, None), Duration::from_secs(8));
    }

    #[test]
    fn test_calculate_backoff_respects_ceiling() {
        let (executor, _sleeper) = executor(RetryConfig {
            jitter: 0.0,
            ..Default::default()
        });

        assert_eq!(executor.calculate_backoff(10, None), Duration::from_secs(10));
    }

    #[test]
    fn test_calculate_backoff_jitter_stays_in_range() {
        let (executor, _sleeper) = executor(RetryConfig::default());

        for _ in 0..100 {
            let delay = executor.calculate_backoff(1, None);
            assert!(delay >= Duration::from_secs_f64(1.8));
            assert!(delay <= Duration::from_secs_f64(2.2));
        }
    }

    #[tokio::test]
    async fn test_zero_max_attempts_still_runs_once() {
        let (executor, _sleeper) = executor(RetryConfig {
            max_attempts: 0,
            ..Default::default()
        });
        let attempts = AtomicU32::new(0);

        let result = executor
            .execute("test", || {
                attempts.fetch_add(1, Ordering::SeqCst);
                async { Ok(1) }
            })
            .await;

        assert_eq!(result.unwrap(), 1);
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}
