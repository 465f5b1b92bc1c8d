//! Shared application state for Axum routers.

use std::sync::Arc;
use std::time::Instant;

use poseidon_storage::Provider;

use crate::config::ApiConfig;
use crate::middleware::TokenBucketLimiter;
use crate::services::{JournalService, ResponseCache};

/// Application-wide state shared across all routes.
///
/// Built once by the process entry point (or a test) and injected into the
/// router; nothing here is a global.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<JournalService>,
    pub limiter: Arc<TokenBucketLimiter>,
    pub config: Arc<ApiConfig>,
    pub start_time: Instant,
}

impl AppState {
    /// Wire a provider, a fresh response cache and a fresh limiter from `config`.
    pub fn new(config: ApiConfig, provider: Provider) -> Self {
        let cache = Arc::new(ResponseCache::new(config.cache_ttl));
        let limiter = Arc::new(TokenBucketLimiter::new(config.rate_limit_config()));
        Self {
            service: Arc::new(JournalService::new(provider, cache)),
            limiter,
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Process uptime in seconds.
    pub fn uptime_secs(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }
}

crate::impl_from_ref!(Arc<JournalService>, service);
crate::impl_from_ref!(Arc<TokenBucketLimiter>, limiter);
crate::impl_from_ref!(Arc<ApiConfig>, config);
