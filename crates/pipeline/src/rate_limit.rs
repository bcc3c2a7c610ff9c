//! Pacing for calls to the geocoding service.
//!
//! The public Nominatim instance allows one request per second per
//! application. The resolvers call [`RateLimiter::pause`] after every
//! request they issue; swapping the limiter lets tests run without real
//! sleeps.

use std::time::Duration;

use async_trait::async_trait;

/// Default gap enforced after each geocoding request.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Suspend the caller until the next request is allowed.
    async fn pause(&self);
}

/// Sleeps a fixed interval on every pause.
#[derive(Debug, Clone, Copy)]
pub struct IntervalLimiter {
    interval: Duration,
}

impl IntervalLimiter {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Default for IntervalLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL)
    }
}

#[async_trait]
impl RateLimiter for IntervalLimiter {
    async fn pause(&self) {
        if !self.interval.is_zero() {
            tokio::time::sleep(self.interval).await;
        }
    }
}
