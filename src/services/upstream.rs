use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{trace, warn};

use crate::{
    models::error::FetchError,
    utils::{
        config::Config, rate_limiter::RateLimiter, request_queue::RequestQueue,
        retry::RetryPolicy,
    },
};

/// Shared GET path for both upstream APIs. Every call is queued, paced by the
/// rate gate and retried with backoff.
#[derive(Clone)]
pub struct Upstream {
    http_client: Client,
    queue: RequestQueue,
    limiter: RateLimiter,
    retry: RetryPolicy,
}

impl Upstream {
    pub fn new(config: &Config) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|e| {
                warn!("Falling back to default HTTP client: {e}");
                Client::new()
            });
        Upstream {
            http_client,
            queue: RequestQueue::new(config.queue_batch_size, config.queue_batch_delay_ms),
            limiter: RateLimiter::new(config.rate_limit_interval_ms),
            retry: RetryPolicy::new(
                config.max_retries,
                config.retry_base_delay_ms,
                config.retry_max_jitter_ms,
            ),
        }
    }

    pub async fn get_json<T>(&self, url: String) -> Result<T, FetchError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let this = self.clone();
        self.queue
            .enqueue(move || async move {
                this.retry
                    .run(&this.limiter, || fetch_json::<T>(&this.http_client, &url))
                    .await
            })
            .await
    }
}

async fn fetch_json<T: DeserializeOwned>(client: &Client, url: &str) -> Result<T, FetchError> {
    trace!("GET {url}");
    let res = client.get(url).send().await?;
    let status = res.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            status,
            url: url.to_string(),
        });
    }
    let body = res.text().await?;
    serde_json::from_str(&body).map_err(|e| FetchError::Decode {
        url: url.to_string(),
        message: e.to_string(),
    })
}
