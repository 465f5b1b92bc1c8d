//! In-memory TTL cache for provider responses.
//!
//! Entries carry an absolute expiry instant. Expired entries are never
//! returned: `get` evicts them lazily, and `cleanup` sweeps them actively.
//! Sweeping is not scheduled here; the caller decides the cadence.
//!
//! # Example
//!
//! ```
//! use poseidon_storage::cache::{generate_key, TtlCache};
//! use std::time::Duration;
//!
//! let cache: TtlCache<String> = TtlCache::new(Duration::from_secs(300));
//! let key = generate_key("journals:id", Some(&serde_json::json!({ "id": "jls" })));
//! cache.set(key.clone(), "cached".to_string());
//! assert_eq!(cache.get(&key).as_deref(), Some("cached"));
//! ```

pub mod key;
pub mod ttl_cache;

pub use key::generate_key;
pub use ttl_cache::{CacheEntry, CacheStats, TtlCache, DEFAULT_CACHE_TTL};
