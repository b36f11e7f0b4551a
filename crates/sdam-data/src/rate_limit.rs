//! Request spacing shared by the upstream clients.

use std::time::Duration;
use tokio::time::{Instant, sleep};

/// Minimum interval between consecutive requests.
///
/// Shared behind `Arc<tokio::sync::Mutex<_>>`: the lock is held across the
/// sleep, so concurrent callers are spaced out one after another.
#[derive(Debug)]
pub(crate) struct RateLimiter {
    last_request: Instant,
    min_interval: Duration,
}

impl RateLimiter {
    pub(crate) fn new(min_interval: Duration) -> Self {
        Self {
            last_request: Instant::now()
                .checked_sub(min_interval)
                .unwrap_or_else(Instant::now),
            min_interval,
        }
    }

    pub(crate) async fn wait(&mut self) {
        let elapsed = self.last_request.elapsed();
        if elapsed < self.min_interval {
            sleep(self.min_interval - elapsed).await;
        }
        self.last_request = Instant::now();
    }
}
