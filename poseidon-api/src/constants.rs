//! Constants for POSEIDON API
//!
//! Centralized defaults for configuration, rate limiting and the service.

// ============================================================================
// SERVER
// ============================================================================

/// API name reported by the root endpoint
pub const API_NAME: &str = "POSEIDON API";

/// API version reported by the root endpoint
pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default listen port
pub const DEFAULT_PORT: u16 = 3000;

/// Default provider mode
pub const DEFAULT_PROVIDER_MODE: &str = "mock";

/// Default environment name; error messages are only exposed here
pub const DEVELOPMENT_ENVIRONMENT: &str = "development";

// ============================================================================
// CACHE
// ============================================================================

/// Default response cache TTL in seconds (5 minutes)
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Cache key prefix for catalog pages
pub const CACHE_PREFIX_LIST: &str = "journals:all";

/// Cache key prefix for single journals
pub const CACHE_PREFIX_BY_ID: &str = "journals:id";

/// Cache key prefix for search responses
pub const CACHE_PREFIX_SEARCH: &str = "journals:search";

// ============================================================================
// CORS
// ============================================================================

/// Default CORS max age in seconds (24 hours)
pub const DEFAULT_CORS_MAX_AGE_SECS: u64 = 86400;

// ============================================================================
// RATE LIMITING
// ============================================================================

/// Default bucket size (requests per window, per client)
pub const DEFAULT_RATE_LIMIT_MAX_REQUESTS: u32 = 100;

/// Default refill window in seconds
pub const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 60;

/// Buckets untouched for this long are pruned by the maintenance job
pub const DEFAULT_RATE_LIMIT_IDLE_SECS: u64 = 600;

/// Client identifier used when no address can be determined
pub const UNKNOWN_CLIENT: &str = "unknown";

// ============================================================================
// MAINTENANCE
// ============================================================================

/// Maintenance sweep interval in seconds; 0 disables the job
pub const DEFAULT_MAINTENANCE_INTERVAL_SECS: u64 = 0;
