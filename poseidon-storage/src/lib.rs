//! POSEIDON Storage - Cache and Provider Implementations
//!
//! Holds the in-memory TTL cache used to memoize provider responses and the
//! journal provider abstraction with its mock (static catalog) variant.

pub mod cache;
pub mod catalog;
pub mod provider;

pub use cache::{generate_key, CacheEntry, CacheStats, TtlCache, DEFAULT_CACHE_TTL};
pub use catalog::Catalog;
pub use provider::{JournalProvider, MockProvider, Provider};
