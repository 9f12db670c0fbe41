//! In-memory TTL cache for airdrop records.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::Serialize;

use era_core::AirdropRecord;

/// A cached record and the moment its fetch started.
#[derive(Clone, Debug, PartialEq)]
pub struct CacheEntry {
    /// When the upstream fetch for this record began
    pub fetched_at: DateTime<Utc>,
    /// The normalized record
    pub record: AirdropRecord,
}

impl CacheEntry {
    /// Creates an entry.
    pub fn new(fetched_at: DateTime<Utc>, record: AirdropRecord) -> Self {
        Self { fetched_at, record }
    }

    /// True while `now - fetched_at < ttl`.
    pub fn is_fresh(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.fetched_at) < ttl
    }
}

/// Cache statistics.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Distinct cached addresses (fresh or stale)
    pub total_entries: usize,
    /// Entries still within the TTL
    pub fresh_entries: usize,
    /// Entries past the TTL, kept until overwritten
    pub stale_entries: usize,
}

/// Process-local cache of airdrop records keyed by wallet address.
///
/// Thread-safe; locks are held only for the map operation itself. There is no
/// size bound and no eviction: stale entries stay until the next fetch for the
/// same address overwrites them.
#[derive(Debug, Default)]
pub struct AirdropCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl AirdropCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    fn normalize(key: &str) -> String {
        key.trim().to_lowercase()
    }

    /// Gets the entry for an address, fresh or not.
    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        self.entries.read().get(&Self::normalize(key)).cloned()
    }

    /// Gets the entry for an address only if it is still fresh at `now`.
    pub fn get_fresh(&self, key: &str, ttl: Duration, now: DateTime<Utc>) -> Option<CacheEntry> {
        self.get(key).filter(|e| e.is_fresh(ttl, now))
    }

    /// Stores an entry, replacing whatever was cached for the address.
    pub fn put(&self, key: &str, entry: CacheEntry) {
        self.entries.write().insert(Self::normalize(key), entry);
    }

    /// Removes a cached entry.
    pub fn remove(&self, key: &str) -> Option<CacheEntry> {
        self.entries.write().remove(&Self::normalize(key))
    }

    /// Clears all cached entries.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Returns the number of distinct cached addresses.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Returns cache statistics relative to `ttl` at `now`.
    pub fn stats(&self, ttl: Duration, now: DateTime<Utc>) -> CacheStats {
        let entries = self.entries.read();
        let fresh = entries.values().filter(|e| e.is_fresh(ttl, now)).count();

        CacheStats {
            total_entries: entries.len(),
            fresh_entries: fresh,
            stale_entries: entries.len() - fresh,
        }
    }
}
