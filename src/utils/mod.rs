pub mod cache;
pub mod config;
pub mod overrides;
pub mod race_utils;
pub mod rate_limiter;
pub mod request_queue;
pub mod retry;
pub mod season;
pub mod state;
pub mod teams;
