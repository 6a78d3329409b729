use std::str::FromStr;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct Config {
    pub openf1_base_url: String,
    pub ergast_base_url: String,
    pub cache_ttl_seconds: u64,
    pub queue_batch_size: usize,
    pub queue_batch_delay_ms: u64,
    pub rate_limit_interval_ms: u64,
    pub max_retries: u32,
    pub retry_base_delay_ms: u64,
    pub retry_max_jitter_ms: u64,
    pub request_timeout_seconds: u64,
    pub overrides_path: Option<String>,
    pub bind_addr: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            openf1_base_url: "https://api.openf1.org/v1".to_string(),
            ergast_base_url: "https://api.jolpi.ca/ergast/f1".to_string(),
            cache_ttl_seconds: 5 * 60,
            queue_batch_size: 3,
            queue_batch_delay_ms: 500,
            rate_limit_interval_ms: 1000,
            max_retries: 3,
            retry_base_delay_ms: 1000,
            retry_max_jitter_ms: 1000,
            request_timeout_seconds: 15,
            overrides_path: None,
            bind_addr: "127.0.0.1:3000".to_string(),
        }
    }
}

impl Config {
    pub fn init() -> Self {
        let defaults = Config::default();
        Config {
            openf1_base_url: env_string("OPENF1_BASE_URL", &defaults.openf1_base_url),
            ergast_base_url: env_string("ERGAST_BASE_URL", &defaults.ergast_base_url),
            cache_ttl_seconds: env_parse("CACHE_TTL_SECONDS", defaults.cache_ttl_seconds),
            queue_batch_size: env_parse("QUEUE_BATCH_SIZE", defaults.queue_batch_size),
            queue_batch_delay_ms: env_parse("QUEUE_BATCH_DELAY_MS", defaults.queue_batch_delay_ms),
            rate_limit_interval_ms: env_parse(
                "RATE_LIMIT_INTERVAL_MS",
                defaults.rate_limit_interval_ms,
            ),
            max_retries: env_parse("MAX_RETRIES", defaults.max_retries),
            retry_base_delay_ms: env_parse("RETRY_BASE_DELAY_MS", defaults.retry_base_delay_ms),
            retry_max_jitter_ms: env_parse("RETRY_MAX_JITTER_MS", defaults.retry_max_jitter_ms),
            request_timeout_seconds: env_parse(
                "REQUEST_TIMEOUT_SECONDS",
                defaults.request_timeout_seconds,
            ),
            overrides_path: std::env::var("OVERRIDES_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty()),
            bind_addr: env_string("BIND_ADDR", &defaults.bind_addr),
        }
    }

    /// Same as the defaults but without any pacing, for talking to a local
    /// mock upstream.
    pub fn unthrottled(openf1_base_url: &str, ergast_base_url: &str) -> Self {
        Config {
            openf1_base_url: openf1_base_url.trim_end_matches('/').to_string(),
            ergast_base_url: ergast_base_url.trim_end_matches('/').to_string(),
            queue_batch_delay_ms: 0,
            rate_limit_interval_ms: 0,
            max_retries: 1,
            retry_base_delay_ms: 0,
            retry_max_jitter_ms: 0,
            request_timeout_seconds: 5,
            ..Config::default()
        }
    }
}

fn env_string(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().trim_end_matches('/').to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_parse<T: FromStr + Copy + std::fmt::Debug>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{key}={raw:?} is not valid, using {default:?}");
            default
        }),
        Err(_) => default,
    }
}
