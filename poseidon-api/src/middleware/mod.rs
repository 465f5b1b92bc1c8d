//! Middleware modules for POSEIDON API
//!
//! - `rate_limit`: per-client token-bucket admission, applied to `/api`
//!
//! Panic recovery, CORS and request tracing come from `tower-http` layers
//! assembled in [`crate::routes::create_api_router`].

pub mod rate_limit;

pub use rate_limit::{
    client_identifier, rate_limit_middleware, RateLimitConfig, RateLimitDecision,
    RateLimitRejection, TokenBucket, TokenBucketLimiter,
};
