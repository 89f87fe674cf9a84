//! Mock implementations for testing.
//!
//! Scripted transport, manual clock and recording sleeper so the pipeline,
//! cache and rate limiter can be exercised deterministically without a
//! network or wall-clock waits.

use crate::clock::{Clock, Sleeper};
use crate::errors::{WorldAnvilError, WorldAnvilResult};
use crate::transport::{HttpResponse, HttpTransport};
use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, Method};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// Mock HTTP transport with per-path scripted responses.
///
/// Responses are keyed by URL path. `expect` queues a one-shot response;
/// `expect_sticky` installs a response returned for every remaining call to
/// that path. Queued responses are consumed before the sticky one.
pub struct MockHttpTransport {
    queued: Mutex<HashMap<String, VecDeque<WorldAnvilResult<HttpResponse>>>>,
    sticky: Mutex<HashMap<String, WorldAnvilResult<HttpResponse>>>,
    calls: Mutex<Vec<(Method, String)>>,
}

impl MockHttpTransport {
    /// Create a new mock transport with no scripted responses.
    pub fn new() -> Self {
        Self {
            queued: Mutex::new(HashMap::new()),
            sticky: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue a one-shot response for a path.
    pub fn expect(&self, path: impl Into<String>, response: HttpResponse) {
        self.queued
            .lock()
            .entry(path.into())
            .or_default()
            .push_back(Ok(response));
    }

    /// Queue a one-shot transport error for a path.
    pub fn expect_err(&self, path: impl Into<String>, error: WorldAnvilError) {
        self.queued
            .lock()
            .entry(path.into())
            .or_default()
            .push_back(Err(error));
    }

    /// Install a response returned for every call to a path.
    pub fn expect_sticky(&self, path: impl Into<String>, response: HttpResponse) {
        self.sticky.lock().insert(path.into(), Ok(response));
    }

    /// Install a transport error returned for every call to a path.
    pub fn expect_sticky_err(&self, path: impl Into<String>, error: WorldAnvilError) {
        self.sticky.lock().insert(path.into(), Err(error));
    }

    /// Total number of transport calls made.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// The recorded (method, path) call sequence.
    pub fn calls(&self) -> Vec<(Method, String)> {
        self.calls.lock().clone()
    }
}

impl Default for MockHttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for MockHttpTransport {
    async fn send(
        &self,
        method: Method,
        url: Url,
        _headers: HeaderMap,
        _body: Option<Bytes>,
    ) -> WorldAnvilResult<HttpResponse> {
        let path = url.path().to_string();
        self.calls.lock().push((method, path.clone()));

        if let Some(queue) = self.queued.lock().get_mut(&path) {
            if let Some(scripted) = queue.pop_front() {
                return scripted;
            }
        }

        if let Some(scripted) = self.sticky.lock().get(&path) {
            return scripted.clone();
        }

        Err(WorldAnvilError::Internal {
            message: format!("no mock response configured for path: {}", path),
        })
    }
}

/// Clock whose time only moves when a test advances it.
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    /// Create a clock pinned at the current instant.
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    /// Advance the clock by a duration.
    pub fn advance(&self, duration: Duration) {
        *self.now.lock() += duration;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock()
    }
}

/// Sleeper that records requested durations instead of waiting.
///
/// When linked to a [`ManualClock`] it advances the clock by the requested
/// duration, which keeps rate-limiter liveness tests honest: a wait really
/// does make time pass.
pub struct RecordingSleeper {
    sleeps: Mutex<Vec<Duration>>,
    clock: Option<Arc<ManualClock>>,
}

impl RecordingSleeper {
    /// Create a sleeper that records and returns immediately.
    pub fn new() -> Self {
        Self {
            sleeps: Mutex::new(Vec::new()),
            clock: None,
        }
    }

    /// Create a sleeper that also advances a manual clock.
    pub fn advancing(clock: Arc<ManualClock>) -> Self {
        Self {
            sleeps: Mutex::new(Vec::new()),
            clock: Some(clock),
        }
    }

    /// The recorded sleep durations, in order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().clone()
    }
}

impl Default for RecordingSleeper {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().push(duration);
        if let Some(clock) = &self.clock {
            clock.advance(duration);
        }
    }
}
