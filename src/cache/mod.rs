//! Cache stores for rating snapshots
//!
//! Rating lookups are cached per place so that page views do not hit the Places
//! API every time. Two backends are provided: a file-backed store that persists
//! across process runs and an in-process store for long-lived servers. Both
//! expire entries lazily; there is no invalidation beyond the TTL.

mod manager;
mod memory;

pub use manager::{CacheManager, CachedData};
pub use memory::MemoryCache;

use serde_json::Value;

/// Namespace prefix separating badge rating entries from anything else in the store
pub const RATING_NAMESPACE: &str = "gbp_rating_badge";

/// Key-value store with TTL expiry
///
/// Implementations must tolerate concurrent `get`/`set` from several render
/// calls. Races on a single key resolve as last-write-wins.
pub trait CacheStore: Send + Sync {
    /// Returns the value for `key` if present and not expired
    fn get(&self, key: &str) -> Option<Value>;

    /// Stores `value` under `key` for `ttl_seconds`
    fn set(&self, key: &str, value: Value, ttl_seconds: u64);
}

/// Builds the cache key for a place inside `namespace`
///
/// The key depends only on the place id. A cached snapshot therefore outlives
/// an API key rotation until its TTL runs out.
pub fn cache_key(namespace: &str, place_id: &str) -> String {
    format!("{}_{:x}", namespace, md5::compute(place_id.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_is_stable_and_namespaced() {
        let key = cache_key(RATING_NAMESPACE, "ChIJN1t_tDeuEmsRUsoyG83frY4");
        assert_eq!(key, cache_key(RATING_NAMESPACE, "ChIJN1t_tDeuEmsRUsoyG83frY4"));
        assert!(key.starts_with("gbp_rating_badge_"));
        // md5 hex digest
        assert_eq!(key.len(), "gbp_rating_badge_".len() + 32);
    }

    #[test]
    fn test_cache_key_known_digest() {
        assert_eq!(
            cache_key("ns", "abc"),
            "ns_900150983cd24fb0d6963f7d28e17f72"
        );
    }

    #[test]
    fn test_cache_key_differs_per_place_and_namespace() {
        assert_ne!(cache_key("ns", "place-a"), cache_key("ns", "place-b"));
        assert_ne!(cache_key("ns-a", "place"), cache_key("ns-b", "place"));
    }
}
