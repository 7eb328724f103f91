//! Attempt counting for the login and secret reset endpoints
//!
//! Each key gets `max_attempts` tries per window. The next try after that
//! starts a ban. Keys whose window and ban have both run out are pruned, so
//! callers sending random identifiers cannot grow the table without bound.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Table size above which a lookup first sweeps out stale keys
const PRUNE_THRESHOLD: usize = 1024;

/// Rate limiter configuration
#[derive(Debug, Clone)]
pub struct RateLimiterConfig {
    /// Attempts allowed per window
    pub max_attempts: u32,
    pub window_seconds: u64,
    pub ban_duration_seconds: u64,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            window_seconds: 300,
            ban_duration_seconds: 3600,
        }
    }
}

#[derive(Debug)]
struct Attempts {
    count: u32,
    window_start: Instant,
    banned_until: Option<Instant>,
}

impl Attempts {
    fn fresh(now: Instant) -> Self {
        Self {
            count: 0,
            window_start: now,
            banned_until: None,
        }
    }

    fn is_stale(&self, now: Instant, window: Duration) -> bool {
        let ban_over = self.banned_until.is_none_or(|until| now >= until);
        ban_over && now.duration_since(self.window_start) >= window
    }
}

/// Rate limiter keyed by login identifier
#[derive(Debug, Clone)]
pub struct RateLimiter {
    config: RateLimiterConfig,
    entries: Arc<Mutex<HashMap<String, Attempts>>>,
}

impl RateLimiter {
    pub fn new(config: RateLimiterConfig) -> Self {
        Self {
            config,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn window(&self) -> Duration {
        Duration::from_secs(self.config.window_seconds)
    }

    /// Record an attempt for `key` and report whether it may proceed
    pub async fn is_allowed(&self, key: &str) -> bool {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();
        let window = self.window();

        if entries.len() >= PRUNE_THRESHOLD {
            let pruned = prune_stale(&mut entries, now, window);
            debug!("Pruned {} stale rate limiter keys", pruned);
        }

        let attempts = entries
            .entry(key.to_string())
            .or_insert_with(|| Attempts::fresh(now));

        if let Some(until) = attempts.banned_until {
            if now < until {
                return false;
            }
            *attempts = Attempts::fresh(now);
        }

        if now.duration_since(attempts.window_start) >= window {
            *attempts = Attempts::fresh(now);
        }

        if attempts.count >= self.config.max_attempts {
            attempts.banned_until =
                Some(now + Duration::from_secs(self.config.ban_duration_seconds));
            info!(
                "Banned key {} for {} seconds",
                key, self.config.ban_duration_seconds
            );
            return false;
        }

        attempts.count += 1;
        true
    }

    /// Forget the attempts for `key` after a successful login
    pub async fn reset(&self, key: &str) {
        self.entries.lock().await.remove(key);
    }
}

/// Drop every key whose window and ban have both run out
fn prune_stale(entries: &mut HashMap<String, Attempts>, now: Instant, window: Duration) -> usize {
    let before = entries.len();
    entries.retain(|_, attempts| !attempts.is_stale(now, window));
    before - entries.len()
}
