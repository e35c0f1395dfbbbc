// Response cache - expiring key/value store behind a capability trait
// Author: kelexine (https://github.com/kelexine)

use parking_lot::RwLock;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::debug;

/// Capability interface for the response cache.
///
/// Orchestrators only ever see this trait, so a persistent or distributed
/// backing store can replace the in-memory map without touching them. None
/// of the operations can fail; a miss is the normal "go generate" path.
pub trait CacheStore: Send + Sync {
    /// Returns the stored value, or `None` if the key is unseen or expired.
    /// An expired entry is removed as a side effect of the lookup.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key` with the default TTL, overwriting any
    /// prior entry unconditionally.
    fn set(&self, key: &str, value: String);

    /// Stores `value` with an explicit TTL.
    fn set_with_ttl(&self, key: &str, value: String, ttl: Duration);

    /// Removes `key` if present.
    fn delete(&self, key: &str);

    /// Removes every entry.
    fn clear(&self);

    /// Removes every expired entry and returns the count removed. Intended
    /// to run once at process start; there is no background timer.
    fn sweep(&self) -> usize;

    /// Number of live entries, expired or not.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

struct CacheEntry {
    value: String,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// In-memory `CacheStore` implementation with per-entry expiry.
pub struct MemoryCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    default_ttl: Duration,
}

impl MemoryCache {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            default_ttl,
        }
    }
}

impl CacheStore for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        let now = Instant::now();

        {
            let entries = self.entries.read();
            match entries.get(key) {
                Some(entry) if !entry.is_expired(now) => return Some(entry.value.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        // Expired: evict lazily. Re-check under the write lock since another
        // job may have overwritten the entry in the meantime.
        let mut entries = self.entries.write();
        if entries.get(key).is_some_and(|entry| entry.is_expired(now)) {
            entries.remove(key);
            debug!(key, "evicted expired cache entry");
        }
        None
    }

    fn set(&self, key: &str, value: String) {
        self.set_with_ttl(key, value, self.default_ttl);
    }

    fn set_with_ttl(&self, key: &str, value: String, ttl: Duration) {
        let entry = CacheEntry {
            value,
            expires_at: Instant::now() + ttl,
        };
        self.entries.write().insert(key.to_string(), entry);
    }

    fn delete(&self, key: &str) {
        self.entries.write().remove(key);
    }

    fn clear(&self) {
        self.entries.write().clear();
    }

    fn sweep(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        before - entries.len()
    }

    fn len(&self) -> usize {
        self.entries.read().len()
    }
}

/// Build a deterministic cache fingerprint from a namespace and a parameter
/// set.
///
/// Parameters are rendered as `name=value`, sorted by name, and the joined
/// canonical string is hashed so logically-identical requests always collide
/// regardless of the order the caller supplied the fields in.
pub fn make_key(namespace: &str, params: &[(&str, &str)]) -> String {
    let mut parts: Vec<String> = params
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect();
    parts.sort();

    let mut hasher = Sha256::new();
    hasher.update(parts.join(":").as_bytes());

    format!("{}:{:x}", namespace, hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_roundtrip() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        cache.set("k", "v".to_string());
        assert_eq!(cache.get("k"), Some("v".to_string()));
    }

    #[test]
    fn test_zero_ttl_expires_immediately() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        cache.set_with_ttl("k", "v".to_string(), Duration::ZERO);
        assert_eq!(cache.get("k"), None);
        // Idempotent miss: the lazy eviction must not resurrect anything.
        assert_eq!(cache.get("k"), None);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_overwrite_is_total() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        cache.set("k", "old".to_string());
        cache.set("k", "new".to_string());
        assert_eq!(cache.get("k"), Some("new".to_string()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_sweep_counts_removals() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        cache.set_with_ttl("a", "1".to_string(), Duration::ZERO);
        cache.set_with_ttl("b", "2".to_string(), Duration::ZERO);
        cache.set("c", "3".to_string());
        assert_eq!(cache.sweep(), 2);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_make_key_is_order_independent() {
        let key1 = make_key("ns", &[("a", "1"), ("b", "2")]);
        let key2 = make_key("ns", &[("b", "2"), ("a", "1")]);
        assert_eq!(key1, key2);
    }

    #[test]
    fn test_make_key_distinguishes_namespaces() {
        let params = [("product_name", "Widget")];
        assert_ne!(make_key("text", &params), make_key("image", &params));
    }
}
