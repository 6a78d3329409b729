use rand::Rng;
use std::future::Future;
use tokio::time::{sleep, Duration};
use tracing::warn;

use crate::{models::error::FetchError, utils::rate_limiter::RateLimiter};

/// Exponential backoff with jitter for upstream calls.
#[derive(Clone, Debug)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_retries: 3,
            base_delay: Duration::from_millis(1000),
            max_jitter: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay_ms: u64, max_jitter_ms: u64) -> Self {
        RetryPolicy {
            max_retries,
            base_delay: Duration::from_millis(base_delay_ms),
            max_jitter: Duration::from_millis(max_jitter_ms),
        }
    }

    /// `base_delay * 2^attempt` plus up to `max_jitter` of random spread.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exp = self.base_delay.saturating_mul(2u32.saturating_pow(attempt));
        let jitter_ms = self.max_jitter.as_millis() as u64;
        let jitter = if jitter_ms == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..=jitter_ms)
        };
        exp.saturating_add(Duration::from_millis(jitter))
    }

    /// Run `request` until it succeeds, fails permanently, or `max_retries`
    /// retries have been spent. Every attempt passes through `limiter`.
    pub async fn run<F, Fut, T>(&self, limiter: &RateLimiter, mut request: F) -> Result<T, FetchError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        let mut attempt = 0;
        loop {
            limiter.acquire().await;
            match request().await {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) if attempt >= self.max_retries => {
                    warn!("Giving up after {} attempts: {}", attempt + 1, e);
                    return Err(e);
                }
                Err(e) => {
                    let delay = self.backoff(attempt);
                    attempt += 1;
                    warn!("Attempt {} failed ({}), retrying in {:?}", attempt, e, delay);
                    sleep(delay).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn status(code: StatusCode) -> FetchError {
        FetchError::Status {
            status: code,
            url: "http://upstream/test".to_string(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn recovers_after_two_rate_limits() {
        let limiter = RateLimiter::new(1000);
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result = RetryPolicy::default()
            .run(&limiter, || {
                let counter = counter.clone();
                async move {
                    if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err(status(StatusCode::TOO_MANY_REQUESTS))
                    } else {
                        Ok("standings")
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), "standings");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn not_found_is_not_retried() {
        let limiter = RateLimiter::new(1000);
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result: Result<(), _> = RetryPolicy::default()
            .run(&limiter, || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Err(status(StatusCode::NOT_FOUND)) }
            })
            .await;

        assert_eq!(result.unwrap_err().status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausts_retries_and_returns_last_error() {
        let limiter = RateLimiter::new(0);
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result: Result<(), _> = RetryPolicy::new(3, 100, 0)
            .run(&limiter, || {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                async move { Err(FetchError::Network(format!("attempt {n}"))) }
            })
            .await;

        match result {
            Err(FetchError::Network(msg)) => assert_eq!(msg, "attempt 3"),
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn waits_grow_exponentially() {
        let limiter = RateLimiter::new(0);
        let start = tokio::time::Instant::now();

        let _: Result<(), _> = RetryPolicy::new(3, 100, 0)
            .run(&limiter, || async {
                Err(status(StatusCode::SERVICE_UNAVAILABLE))
            })
            .await;

        // 100 + 200 + 400
        assert_eq!(start.elapsed(), Duration::from_millis(700));
    }

    #[test]
    fn jitter_stays_within_bound() {
        let policy = RetryPolicy::new(3, 1000, 1000);
        for attempt in 0..4 {
            let delay = policy.backoff(attempt);
            let floor = Duration::from_millis(1000 * 2u64.pow(attempt));
            assert!(delay >= floor);
            assert!(delay <= floor + Duration::from_millis(1000));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn retries_pass_through_the_rate_gate() {
        let limiter = RateLimiter::new(1000);
        let stamps = Arc::new(std::sync::Mutex::new(Vec::new()));
        let recorder = stamps.clone();

        let _: Result<(), _> = RetryPolicy::new(2, 10, 0)
            .run(&limiter, || {
                recorder.lock().unwrap().push(tokio::time::Instant::now());
                async { Err(status(StatusCode::TOO_MANY_REQUESTS)) }
            })
            .await;

        let stamps = stamps.lock().unwrap();
        assert_eq!(stamps.len(), 3);
        for pair in stamps.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_millis(1000));
        }
    }
}
