//! Generic key/value store with per-entry expiry.

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Default time-to-live for cache entries (5 minutes).
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// A cached value with its absolute expiry.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub value: V,
    /// `None` when `now + ttl` overflows the clock; such entries never expire.
    pub expires_at: Option<Instant>,
}

impl<V> CacheEntry<V> {
    fn new(value: V, now: Instant, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: now.checked_add(ttl),
        }
    }

    /// An entry is still valid at its exact expiry instant.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        matches!(self.expires_at, Some(expires_at) if now > expires_at)
    }
}

/// Statistics about cache usage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of entries currently stored (expired ones included until evicted).
    pub size: usize,
    /// Stored keys, sorted.
    pub keys: Vec<String>,
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
}

impl CacheStats {
    /// Calculate the hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// In-memory TTL cache.
///
/// The map is sharded and locked per shard, so concurrent `get`/`set` on the
/// same key cannot lose updates.
#[derive(Debug)]
pub struct TtlCache<V> {
    entries: DashMap<String, CacheEntry<V>>,
    default_ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<V> Default for TtlCache<V>
where
    V: Clone,
{
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}

impl<V> TtlCache<V>
where
    V: Clone,
{
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            default_ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Get a value if present and not expired.
    ///
    /// An expired entry is removed on the way out.
    pub fn get(&self, key: &str) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    fn get_at(&self, key: &str, now: Instant) -> Option<V> {
        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired_at(now) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Some(entry.value.clone());
            }
        }

        // Re-checked under the shard lock in case a fresh value raced in
        self.entries
            .remove_if(key, |_, entry| entry.is_expired_at(now));
        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Store a value with the default TTL, replacing any existing entry.
    pub fn set(&self, key: impl Into<String>, value: V) {
        self.set_with_ttl(key, value, self.default_ttl);
    }

    /// Store a value with an explicit TTL, replacing any existing entry.
    pub fn set_with_ttl(&self, key: impl Into<String>, value: V, ttl: Duration) {
        self.entries
            .insert(key.into(), CacheEntry::new(value, Instant::now(), ttl));
    }

    /// Remove an entry. Returns whether it existed.
    pub fn delete(&self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Remove all entries.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Remove every expired entry and return how many were removed.
    pub fn cleanup(&self) -> usize {
        self.cleanup_at(Instant::now())
    }

    fn cleanup_at(&self, now: Instant) -> usize {
        let mut removed = 0;
        self.entries.retain(|_, entry| {
            let keep = !entry.is_expired_at(now);
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current size and stored keys. No expiry filtering is applied.
    pub fn stats(&self) -> CacheStats {
        let mut keys: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        CacheStats {
            size: keys.len(),
            keys,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
