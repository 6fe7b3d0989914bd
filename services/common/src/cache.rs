//! Injected TTL cache for collaborator boundaries
//!
//! The data-fetching collaborators own caching policy; the analytics core
//! never caches derived results. This type exists so that callers can hold
//! snapshot responses with an explicit, constructor-supplied TTL instead
//! of ambient module-level state. Entries past their TTL read as absent
//! and are dropped lazily.

use std::hash::Hash;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

struct CacheEntry<V> {
    inserted_at: Instant,
    value: V,
}

/// Key/value cache with a fixed per-cache TTL
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: RwLock<FxHashMap<K, CacheEntry<V>>>,
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
    /// Create a cache whose entries expire `ttl` after insertion
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(FxHashMap::default()),
        }
    }

    /// The TTL this cache was constructed with
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fetch a live entry, `None` if missing or expired
    #[must_use]
    pub fn get(&self, key: &K) -> Option<V> {
        let entries = self.entries.read();
        entries
            .get(key)
            .filter(|e| e.inserted_at.elapsed() < self.ttl)
            .map(|e| e.value.clone())
    }

    /// Insert or replace an entry, resetting its TTL
    pub fn insert(&self, key: K, value: V) {
        let mut entries = self.entries.write();
        entries.insert(
            key,
            CacheEntry {
                inserted_at: Instant::now(),
                value,
            },
        );
    }

    /// Remove an entry regardless of freshness
    pub fn remove(&self, key: &K) -> Option<V> {
        self.entries.write().remove(key).map(|e| e.value)
    }

    /// Drop every expired entry
    pub fn purge_expired(&self) {
        let mut entries = self.entries.write();
        entries.retain(|_, e| e.inserted_at.elapsed() < self.ttl);
    }

    /// Number of stored entries, including not-yet-purged expired ones
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// True when no entries are stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Remove all entries
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}
