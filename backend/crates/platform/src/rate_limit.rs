//! Rate Limiting Infrastructure
//!
//! Fixed-window request counting keyed by client address. The store is
//! behind a trait so a shared backing (e.g. Redis) can replace the
//! in-process map without touching call sites.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use thiserror::Error;

/// Rate limit configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests allowed in the window
    pub max_requests: u32,
    /// Time window duration
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window: Duration::from_secs(15 * 60),
        }
    }
}

impl RateLimitConfig {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_secs),
        }
    }

    pub fn window_ms(&self) -> i64 {
        self.window.as_millis() as i64
    }
}

/// Rate limit check result
#[derive(Debug, Clone)]
pub struct RateLimitResult {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    pub reset_at_ms: i64,
}

impl RateLimitResult {
    /// Seconds until the current window resets (rounded up, never negative)
    pub fn retry_after_secs(&self, now_ms: i64) -> u64 {
        let remaining_ms = (self.reset_at_ms - now_ms).max(0) as u64;
        remaining_ms.div_ceil(1000)
    }
}

/// Rate limit store errors
#[derive(Debug, Error)]
pub enum RateLimitError {
    /// Backing store failure (not produced by the in-memory store)
    #[error("Rate limit store unavailable: {0}")]
    Store(String),
}

/// Trait for rate limit storage backends
#[trait_variant::make(RateLimitStore: Send)]
pub trait LocalRateLimitStore {
    /// Check and increment the rate limit counter for `key`
    async fn check_and_increment(
        &self,
        key: &str,
        config: &RateLimitConfig,
    ) -> Result<RateLimitResult, RateLimitError>;
}

// ============================================================================
// In-memory fixed-window store
// ============================================================================

/// Counter state for one client key
#[derive(Debug)]
struct Window {
    count: u32,
    window_start_ms: i64,
    window_ms: i64,
}

impl Window {
    fn expired(&self, now_ms: i64) -> bool {
        now_ms >= self.window_start_ms + self.window_ms
    }
}

/// Process-local fixed-window rate limiter
///
/// Counters live in a mutex-guarded map. Expired windows are replaced
/// lazily when their key is touched again; when the map grows past
/// `sweep_above` entries, stale keys are swept out on the next check so
/// abandoned clients do not accumulate unbounded.
///
/// Intended to be owned by the router state and injected where needed,
/// never held in a module-level global.
#[derive(Debug)]
pub struct MemoryRateLimiter {
    windows: Mutex<HashMap<String, Window>>,
    sweep_above: usize,
}

impl Default for MemoryRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRateLimiter {
    pub fn new() -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
            sweep_above: 10_000,
        }
    }

    fn now_ms() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0)
    }

    /// Check and increment the counter for `key`
    ///
    /// A new window fully replaces an expired one; counts never go
    /// negative.
    pub fn check(&self, key: &str, config: &RateLimitConfig) -> RateLimitResult {
        let now_ms = Self::now_ms();
        let window_ms = config.window_ms();

        let mut windows = self
            .windows
            .lock()
            .expect("rate limiter mutex poisoned");

        if windows.len() >= self.sweep_above {
            windows.retain(|_, w| !w.expired(now_ms));
        }

        let window = windows.entry(key.to_string()).or_insert(Window {
            count: 0,
            window_start_ms: now_ms,
            window_ms,
        });

        if window.expired(now_ms) {
            window.count = 0;
            window.window_start_ms = now_ms;
            window.window_ms = window_ms;
        }

        window.count = window.count.saturating_add(1);

        let allowed = window.count <= config.max_requests;
        let remaining = config.max_requests.saturating_sub(window.count);
        let reset_at_ms = window.window_start_ms + window.window_ms;

        if !allowed {
            tracing::warn!(
                key = %key,
                count = window.count,
                max = config.max_requests,
                "Rate limit exceeded"
            );
        }

        RateLimitResult {
            allowed,
            limit: config.max_requests,
            remaining,
            reset_at_ms,
        }
    }

    /// Drop all expired windows, returning how many were removed
    pub fn evict_expired(&self) -> usize {
        let now_ms = Self::now_ms();
        let mut windows = self
            .windows
            .lock()
            .expect("rate limiter mutex poisoned");

        let before = windows.len();
        windows.retain(|_, w| !w.expired(now_ms));
        before - windows.len()
    }
}

impl RateLimitStore for MemoryRateLimiter {
    async fn check_and_increment(
        &self,
        key: &str,
        config: &RateLimitConfig,
    ) -> Result<RateLimitResult, RateLimitError> {
        Ok(self.check(key, config))
    }
}
