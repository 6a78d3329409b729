//! Source adapters over the two upstream APIs.
//!
//! Every adapter follows the same chain: fresh cache, primary source,
//! secondary source, stale cache, empty default. Nothing here returns an
//! error; upstream failures are logged and degrade to less data.

pub mod championship;
pub mod drivers;
pub mod ergast;
pub mod openf1;
pub mod races;
pub mod results;
pub mod sessions;
pub mod standings;
pub mod statistics;
pub mod upstream;

use serde::{de::DeserializeOwned, Serialize};
use std::future::Future;
use tracing::{debug, info, warn};

use crate::{
    models::{error::FetchError, standings::ChampionshipView},
    utils::{cache::ResponseCache, config::Config, overrides::OverrideTable},
};
use ergast::HistoricalSource;
use openf1::LiveSource;
use upstream::Upstream;

/// A value an adapter can cache and fall back from.
pub trait Payload: Serialize + DeserializeOwned + Default {
    /// Whether the value carries data worth returning. Structurally valid
    /// but empty responses trigger the next source in the chain.
    fn has_data(&self) -> bool;
}

impl<T: Serialize + DeserializeOwned> Payload for Vec<T> {
    fn has_data(&self) -> bool {
        !self.is_empty()
    }
}

impl Payload for ChampionshipView {
    fn has_data(&self) -> bool {
        !self.is_empty()
    }
}

#[derive(Clone)]
pub struct StatsService {
    pub(crate) cache: ResponseCache,
    pub(crate) live: LiveSource,
    pub(crate) historical: HistoricalSource,
    pub(crate) overrides: OverrideTable,
}

impl StatsService {
    pub fn new(
        cache: ResponseCache,
        live: LiveSource,
        historical: HistoricalSource,
        overrides: OverrideTable,
    ) -> Self {
        StatsService {
            cache,
            live,
            historical,
            overrides,
        }
    }

    /// Wires both sources onto one shared queue and rate gate.
    pub fn from_config(config: &Config, overrides: OverrideTable) -> Self {
        let upstream = Upstream::new(config);
        StatsService::new(
            ResponseCache::new(config.cache_ttl_seconds),
            LiveSource::new(upstream.clone(), &config.openf1_base_url),
            HistoricalSource::new(upstream, &config.ergast_base_url),
            overrides,
        )
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub fn flush(&self) {
        info!("Flushing {} cached responses", self.cache.len());
        self.cache.clear();
    }

    pub(crate) async fn resolve<T, P, PF, S, SF>(&self, key: &str, primary: P, secondary: S) -> T
    where
        T: Payload,
        P: FnOnce() -> PF,
        PF: Future<Output = Result<T, FetchError>>,
        S: FnOnce() -> SF,
        SF: Future<Output = Result<T, FetchError>>,
    {
        if let Some(hit) = self.cache.get_as::<T>(key, false) {
            return hit;
        }

        match primary().await {
            Ok(value) if value.has_data() => return self.store(key, value),
            Ok(_) => info!("{key}: primary source returned no data, trying secondary"),
            Err(e) if e.is_cancelled() => {
                debug!("{key}: request cancelled");
                return T::default();
            }
            Err(e) => warn!("{key}: primary source failed: {e}"),
        }

        match secondary().await {
            Ok(value) if value.has_data() => return self.store(key, value),
            Ok(_) => info!("{key}: secondary source returned no data"),
            Err(e) if e.is_cancelled() => {
                debug!("{key}: request cancelled");
                return T::default();
            }
            Err(e) => warn!("{key}: secondary source failed: {e}"),
        }

        if let Some(stale) = self.cache.get_as::<T>(key, true) {
            warn!("{key}: serving stale cached data");
            return stale;
        }

        warn!("{key}: no data available, returning empty result");
        T::default()
    }

    fn store<T: Payload>(&self, key: &str, value: T) -> T {
        self.cache.set_as(key, &value);
        value
    }
}

/// Absorb a failure on a best-effort enrichment call.
pub(crate) fn or_empty<T: Default>(label: &str, result: Result<T, FetchError>) -> T {
    result.unwrap_or_else(|e| {
        warn!("{label} unavailable: {e}");
        T::default()
    })
}
