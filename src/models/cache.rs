use chrono::{DateTime, Duration, Utc};

#[derive(Clone, Debug)]
pub struct CacheEntry<T> {
    pub value: T,
    pub stored_at: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            stored_at: Utc::now(),
        }
    }

    pub fn is_expired(&self, ttl: Duration) -> bool {
        Utc::now() - self.stored_at >= ttl
    }
}
