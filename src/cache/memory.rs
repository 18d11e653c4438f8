//! In-process cache store
//!
//! Holds rating snapshots in a concurrent map for the lifetime of the process.
//! Entries carry their own deadline. An expired entry is dropped when it is
//! read, and every write sweeps out all expired entries, so keys that are
//! never read again do not accumulate.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde_json::Value;

use super::CacheStore;

#[derive(Debug, Clone)]
struct MemoryEntry {
    value: Value,
    expires_at: Option<Instant>,
}

impl MemoryEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| now >= deadline)
    }
}

/// Concurrent in-memory cache with per-entry TTL
///
/// Cloning is cheap and clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    entries: Arc<DashMap<String, MemoryEntry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included until the next read or write
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CacheStore for MemoryCache {
    fn get(&self, key: &str) -> Option<Value> {
        let now = Instant::now();
        {
            let entry = self.entries.get(key)?;
            if !entry.is_expired(now) {
                return Some(entry.value.clone());
            }
        }
        self.entries.remove_if(key, |_, entry| entry.is_expired(now));
        None
    }

    fn set(&self, key: &str, value: Value, ttl_seconds: u64) {
        let now = Instant::now();
        self.entries.retain(|_, entry| !entry.is_expired(now));

        // Deadlines past Instant's range never expire
        let expires_at = now.checked_add(Duration::from_secs(ttl_seconds));
        self.entries
            .insert(key.to_string(), MemoryEntry { value, expires_at });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::thread;

    #[test]
    fn test_get_missing_key() {
        let cache = MemoryCache::new();
        assert!(cache.get("missing").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_set_then_get() {
        let cache = MemoryCache::new();
        cache.set("k", json!({"rating": 4.2}), 60);
        assert_eq!(cache.get("k"), Some(json!({"rating": 4.2})));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_zero_ttl_expires_immediately_and_is_evicted() {
        let cache = MemoryCache::new();
        cache.set("k", json!(1), 0);
        assert!(cache.get("k").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_set_sweeps_expired_entries_that_are_never_read() {
        let cache = MemoryCache::new();
        for i in 0..10 {
            cache.set(&format!("stale{}", i), json!(i), 0);
        }
        cache.set("fresh", json!("kept"), 60);

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("fresh"), Some(json!("kept")));
    }

    #[test]
    fn test_last_write_wins() {
        let cache = MemoryCache::new();
        cache.set("k", json!(1), 60);
        cache.set("k", json!(2), 60);
        assert_eq!(cache.get("k"), Some(json!(2)));
    }

    #[test]
    fn test_clones_share_entries() {
        let cache = MemoryCache::new();
        let other = cache.clone();
        cache.set("k", json!("shared"), 60);
        assert_eq!(other.get("k"), Some(json!("shared")));
    }

    #[test]
    fn test_concurrent_access() {
        let cache = MemoryCache::new();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = cache.clone();
                thread::spawn(move || {
                    for j in 0..100 {
                        cache.set(&format!("k{}", j % 4), json!(i), 60);
                        let _ = cache.get(&format!("k{}", (j + 1) % 4));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.len(), 4);
    }
}
