use chrono::Duration;
use dashmap::DashMap;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::models::cache::CacheEntry;

/// Process-wide response cache keyed by request signature.
///
/// Entries are only replaced, never evicted. Expired entries stay readable
/// through `get(key, true)` so adapters can serve stale data after a failed
/// refresh.
#[derive(Clone)]
pub struct ResponseCache {
    entries: Arc<DashMap<String, CacheEntry<Value>>>,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(ttl_seconds: u64) -> Self {
        Self::with_ttl(Duration::seconds(ttl_seconds as i64))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        ResponseCache {
            entries: Arc::new(DashMap::new()),
            ttl,
        }
    }

    pub fn get(&self, key: &str, ignore_expiration: bool) -> Option<Value> {
        let entry = self.entries.get(key)?;
        if ignore_expiration || !entry.is_expired(self.ttl) {
            Some(entry.value.clone())
        } else {
            None
        }
    }

    pub fn set(&self, key: &str, payload: Value) {
        self.entries.insert(key.to_string(), CacheEntry::new(payload));
    }

    pub fn invalidate(&self, key: &str) {
        self.entries.remove(key);
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Typed read. A payload that no longer deserializes counts as a miss.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str, ignore_expiration: bool) -> Option<T> {
        let value = self.get(key, ignore_expiration)?;
        match serde_json::from_value(value) {
            Ok(typed) => {
                debug!("Cache hit for {key}");
                Some(typed)
            }
            Err(e) => {
                warn!("Discarding unreadable cache entry {key}: {e}");
                None
            }
        }
    }

    pub fn set_as<T: Serialize>(&self, key: &str, payload: &T) {
        match serde_json::to_value(payload) {
            Ok(value) => self.set(key, value),
            Err(e) => warn!("Failed to cache {key}: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn set_then_get_returns_payload() {
        let cache = ResponseCache::new(300);
        cache.set("drivers:2024", json!([{"driver_number": 1}]));
        assert_eq!(
            cache.get("drivers:2024", false),
            Some(json!([{"driver_number": 1}]))
        );
    }

    #[test]
    fn missing_key_is_none() {
        let cache = ResponseCache::new(300);
        assert!(cache.get("nope", false).is_none());
        assert!(cache.get("nope", true).is_none());
    }

    #[tokio::test]
    async fn expired_entries_are_only_served_when_ignoring_expiration() {
        let cache = ResponseCache::with_ttl(Duration::milliseconds(20));
        cache.set("races:2023", json!({"round": 1}));
        tokio::time::sleep(std::time::Duration::from_millis(40)).await;

        assert!(cache.get("races:2023", false).is_none());
        assert_eq!(cache.get("races:2023", true), Some(json!({"round": 1})));
    }

    #[test]
    fn refresh_overwrites_single_entry() {
        let cache = ResponseCache::new(300);
        cache.set("k", json!(1));
        cache.set("k", json!(2));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("k", false), Some(json!(2)));
    }

    #[test]
    fn invalidate_and_clear() {
        let cache = ResponseCache::new(300);
        cache.set("a", json!("a"));
        cache.set("b", json!("b"));

        cache.invalidate("a");
        assert!(cache.get("a", true).is_none());
        assert!(cache.get("b", false).is_some());

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn typed_round_trip_and_bad_shape_is_a_miss() {
        let cache = ResponseCache::new(300);
        cache.set_as("nums", &vec![1u32, 2, 3]);
        assert_eq!(cache.get_as::<Vec<u32>>("nums", false), Some(vec![1, 2, 3]));
        assert_eq!(cache.get_as::<Vec<String>>("nums", false), None);
    }
}
