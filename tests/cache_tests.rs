// Cache behavior and key fingerprint tests
// Author: kelexine (https://github.com/kelexine)

use copystream::cache::{make_key, CacheStore, MemoryCache};
use proptest::prelude::*;
use std::time::Duration;

#[test]
fn test_miss_on_unseen_key() {
    let cache = MemoryCache::new(Duration::from_secs(60));
    assert_eq!(cache.get("never-stored"), None);
}

#[test]
fn test_expired_entry_never_comes_back() {
    let cache = MemoryCache::new(Duration::from_secs(60));
    cache.set_with_ttl("k", "v".to_string(), Duration::ZERO);

    // Repeated lookups after expiry must stay misses (idempotent miss),
    // and the lazy eviction must actually drop the entry.
    assert_eq!(cache.get("k"), None);
    assert_eq!(cache.get("k"), None);
    assert_eq!(cache.len(), 0);
}

#[test]
fn test_fresh_entry_survives_lookup() {
    let cache = MemoryCache::new(Duration::from_secs(60));
    cache.set("k", "v".to_string());
    assert_eq!(cache.get("k"), Some("v".to_string()));
    assert_eq!(cache.get("k"), Some("v".to_string()));
}

#[test]
fn test_sweep_removes_only_expired_entries() {
    let cache = MemoryCache::new(Duration::from_secs(60));
    cache.set_with_ttl("gone-a", "1".to_string(), Duration::ZERO);
    cache.set_with_ttl("gone-b", "2".to_string(), Duration::ZERO);
    cache.set("kept", "3".to_string());

    assert_eq!(cache.sweep(), 2);
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.get("kept"), Some("3".to_string()));
    // A second sweep finds nothing left to remove.
    assert_eq!(cache.sweep(), 0);
}

#[test]
fn test_delete_and_clear_are_unconditional() {
    let cache = MemoryCache::new(Duration::from_secs(60));
    cache.set("a", "1".to_string());
    cache.set("b", "2".to_string());

    cache.delete("a");
    assert_eq!(cache.get("a"), None);
    cache.delete("a"); // deleting a missing key is fine

    cache.clear();
    assert!(cache.is_empty());
}

#[test]
fn test_set_overwrites_whole_entry() {
    let cache = MemoryCache::new(Duration::from_secs(60));
    cache.set_with_ttl("k", "old".to_string(), Duration::ZERO);
    cache.set("k", "new".to_string());
    assert_eq!(cache.get("k"), Some("new".to_string()));
}

#[test]
fn test_make_key_namespace_separates_caches() {
    let params = [("product_name", "Solar Lantern")];
    assert_ne!(
        make_key("product_description", &params),
        make_key("product_image", &params)
    );
}

proptest! {
    /// Equal parameter sets produce equal keys regardless of the order the
    /// caller supplied the fields in.
    #[test]
    fn prop_make_key_is_order_independent(
        pairs in prop::collection::vec((r"[a-z_]{1,12}", r"[a-zA-Z0-9 ]{0,24}"), 1..6)
    ) {
        let forward: Vec<(&str, &str)> =
            pairs.iter().map(|(n, v)| (n.as_str(), v.as_str())).collect();
        let mut reversed = forward.clone();
        reversed.reverse();

        prop_assert_eq!(make_key("ns", &forward), make_key("ns", &reversed));
    }

    /// Distinct values for the same field never collide.
    #[test]
    fn prop_make_key_distinguishes_values(
        a in r"[a-zA-Z0-9 ]{1,24}",
        b in r"[a-zA-Z0-9 ]{1,24}",
    ) {
        prop_assume!(a != b);
        prop_assert_ne!(
            make_key("ns", &[("field", a.as_str())]),
            make_key("ns", &[("field", b.as_str())])
        );
    }
}
