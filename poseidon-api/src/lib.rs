//! POSEIDON API - REST Layer for the Journal Recommender
//!
//! Exposes the journal catalog, fit-scored search and journal briefs over
//! HTTP (Axum). Provider reads are memoized in a TTL cache and every `/api`
//! request passes a per-client token-bucket rate limiter.

pub mod config;
pub mod constants;
pub mod error;
pub mod extractors;
pub mod jobs;
pub mod macros;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
pub mod telemetry;

// Re-export commonly used types
pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ApiResult, ErrorCode, ErrorEnvelope};
pub use jobs::{maintenance_task, MaintenanceConfig, MaintenanceMetrics};
pub use middleware::{RateLimitConfig, RateLimitDecision, TokenBucketLimiter};
pub use routes::create_api_router;
pub use services::{CachedRead, JournalService, ResponseCache};
pub use state::AppState;
