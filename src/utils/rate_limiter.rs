use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{sleep, Duration, Instant};

/// RateLimiter enforces a minimum wall-clock interval between any two
/// dispatched upstream calls, shared by every clone.
#[derive(Clone)]
pub struct RateLimiter {
    min_delay: Duration,
    last_request: Arc<Mutex<Option<Instant>>>,
}

impl RateLimiter {
    pub fn new(min_delay_ms: u64) -> Self {
        RateLimiter {
            min_delay: Duration::from_millis(min_delay_ms),
            last_request: Arc::new(Mutex::new(None)),
        }
    }

    /// Wait until a dispatch is allowed and record it.
    /// Returns the instant the caller was cleared to dispatch.
    pub async fn acquire(&self) -> Instant {
        // The lock is held across the sleep so waiters are released one at a time.
        let mut last_request = self.last_request.lock().await;
        if let Some(last) = *last_request {
            let elapsed = last.elapsed();
            if elapsed < self.min_delay {
                let wait_time = self.min_delay - elapsed;
                tracing::debug!("Rate limiting: waiting {:?}", wait_time);
                sleep(wait_time).await;
            }
        }
        let now = Instant::now();
        *last_request = Some(now);
        now
    }
}
