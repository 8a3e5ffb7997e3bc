use dashmap::DashMap;
use serde::{de::DeserializeOwned, Serialize};
use std::time::{Duration, Instant};

/// Maximum number of cache entries before eviction kicks in
const MAX_CACHE_ENTRIES: usize = 64;

/// TTL cache for reference lookups (filter options and the like).
///
/// Search results are never stored here; every search runs against the database.
#[derive(Default)]
pub struct LookupCache {
    entries: DashMap<String, CacheEntry>,
}

/// Cache entry with expiration and access tracking
struct CacheEntry {
    data: String,
    expires_at: Instant,
    last_accessed: Instant,
}

impl LookupCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get cached data if it exists and hasn't expired
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        if let Some(mut entry) = self.entries.get_mut(key) {
            if Instant::now() < entry.expires_at {
                entry.last_accessed = Instant::now();
                if let Ok(data) = serde_json::from_str(&entry.data) {
                    return Some(data);
                }
            } else {
                drop(entry);
                self.entries.remove(key);
            }
        }

        None
    }

    /// Set cached data with TTL (time to live)
    pub fn set<T: Serialize>(&self, key: &str, data: &T, ttl: Duration) -> Result<(), serde_json::Error> {
        if self.entries.len() >= MAX_CACHE_ENTRIES {
            self.evict_lru_entries();
        }

        let now = Instant::now();
        let entry = CacheEntry {
            data: serde_json::to_string(data)?,
            expires_at: now + ttl,
            last_accessed: now,
        };

        self.entries.insert(key.to_string(), entry);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes the least recently used 20% of entries.
    fn evict_lru_entries(&self) {
        let current_size = self.entries.len();
        let target_remove = (current_size / 5).max(1);

        let mut entries: Vec<(String, Instant)> = self
            .entries
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().last_accessed))
            .collect();
        entries.sort_by_key(|(_, last_accessed)| *last_accessed);

        for (key, _) in entries.iter().take(target_remove) {
            self.entries.remove(key);
        }

        tracing::info!(
            "🗑️  Cache eviction: removed {} LRU entries (cache size: {} -> {})",
            target_remove,
            current_size,
            self.entries.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_values_round_trip_until_expiry() {
        let cache = LookupCache::new();
        cache
            .set("positions", &vec!["ST", "GK"], Duration::from_secs(60))
            .unwrap();
        assert_eq!(
            cache.get::<Vec<String>>("positions"),
            Some(vec!["ST".to_string(), "GK".to_string()])
        );
    }

    #[test]
    fn expired_entries_are_dropped_on_read() {
        let cache = LookupCache::new();
        cache.set("stale", &1u32, Duration::ZERO).unwrap();
        assert_eq!(cache.get::<u32>("stale"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn full_cache_evicts_before_inserting() {
        let cache = LookupCache::new();
        for i in 0..MAX_CACHE_ENTRIES {
            cache.set(&format!("key-{i}"), &i, Duration::from_secs(60)).unwrap();
        }
        cache.set("one-more", &0usize, Duration::from_secs(60)).unwrap();

        assert!(cache.len() < MAX_CACHE_ENTRIES + 1);
        assert_eq!(cache.get::<usize>("one-more"), Some(0));
    }
}
