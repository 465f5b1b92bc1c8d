//! Per-client token-bucket rate limiting.
//!
//! Every client gets a bucket holding up to `max_requests` tokens that
//! refills continuously at `max_requests / window` tokens per second. A
//! request costs one token; a request arriving at an empty bucket is
//! rejected with the number of seconds until a token is available.

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, HeaderName, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use dashmap::DashMap;
use serde::Serialize;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::constants::{
    DEFAULT_RATE_LIMIT_MAX_REQUESTS, DEFAULT_RATE_LIMIT_WINDOW_SECS, UNKNOWN_CLIENT,
};
use crate::error::ErrorCode;

// ============================================================================
// CONFIGURATION
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct RateLimitConfig {
    pub enabled: bool,
    /// Bucket capacity. Zero is treated as one.
    pub max_requests: u32,
    /// Time to refill an empty bucket. Shorter than one second is treated as one second.
    pub window: Duration,
    /// Identify clients by `X-Forwarded-For` / `X-Real-IP` when present.
    pub trust_proxy: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_requests: DEFAULT_RATE_LIMIT_MAX_REQUESTS,
            window: Duration::from_secs(DEFAULT_RATE_LIMIT_WINDOW_SECS),
            trust_proxy: false,
        }
    }
}

impl RateLimitConfig {
    fn capacity(&self) -> f64 {
        f64::from(self.max_requests.max(1))
    }

    /// Tokens added per second.
    fn refill_rate(&self) -> f64 {
        self.capacity() / self.window.as_secs_f64().max(1.0)
    }
}

// ============================================================================
// TOKEN BUCKET
// ============================================================================

#[derive(Debug, Clone)]
pub struct TokenBucket {
    tokens: f64,
    last_refill: Instant,
    max_tokens: f64,
    refill_rate: f64,
}

impl TokenBucket {
    /// A full bucket.
    pub fn new(max_tokens: f64, refill_rate: f64, now: Instant) -> Self {
        Self {
            tokens: max_tokens,
            last_refill: now,
            max_tokens,
            refill_rate,
        }
    }

    fn tokens_at(&self, now: Instant) -> f64 {
        let elapsed = now.saturating_duration_since(self.last_refill).as_secs_f64();
        (self.tokens + elapsed * self.refill_rate).min(self.max_tokens)
    }

    fn refill(&mut self, now: Instant) {
        self.tokens = self.tokens_at(now);
        self.last_refill = now;
    }

    /// Whether the bucket will have refilled to capacity by `now`.
    pub fn is_full_at(&self, now: Instant) -> bool {
        self.tokens_at(now) >= self.max_tokens
    }

    /// Refill, then take one token if available.
    pub fn try_consume(&mut self, now: Instant) -> bool {
        self.refill(now);
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// Whole seconds until one token is available; 0 if one already is.
    pub fn retry_after_secs(&self) -> u64 {
        if self.tokens >= 1.0 {
            return 0;
        }
        ((1.0 - self.tokens) / self.refill_rate).ceil() as u64
    }

    pub fn tokens(&self) -> f64 {
        self.tokens
    }

    pub fn last_refill(&self) -> Instant {
        self.last_refill
    }
}

// ============================================================================
// LIMITER
// ============================================================================

/// Outcome of one admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    /// Zero when allowed.
    pub retry_after_secs: u64,
}

/// Per-client buckets, created lazily on first request.
///
/// Buckets are only removed by [`TokenBucketLimiter::prune_idle`], which the
/// maintenance job calls; the request path never evicts.
#[derive(Debug)]
pub struct TokenBucketLimiter {
    config: RateLimitConfig,
    buckets: DashMap<String, TokenBucket>,
}

impl TokenBucketLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            buckets: DashMap::new(),
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    pub fn check(&self, client_id: &str) -> RateLimitDecision {
        self.check_at(client_id, Instant::now())
    }

    /// Admission check against an explicit clock reading.
    pub fn check_at(&self, client_id: &str, now: Instant) -> RateLimitDecision {
        // The shard lock is held for the whole refill-and-consume
        let mut bucket = match self.buckets.get_mut(client_id) {
            Some(bucket) => bucket,
            None => self
                .buckets
                .entry(client_id.to_string())
                .or_insert_with(|| {
                    TokenBucket::new(self.config.capacity(), self.config.refill_rate(), now)
                }),
        };

        if bucket.try_consume(now) {
            RateLimitDecision {
                allowed: true,
                retry_after_secs: 0,
            }
        } else {
            RateLimitDecision {
                allowed: false,
                retry_after_secs: bucket.retry_after_secs(),
            }
        }
    }

    /// Drop buckets untouched for longer than `max_idle` that have refilled
    /// to capacity. Returns how many were removed.
    ///
    /// A bucket still short of tokens is kept however long it has been idle,
    /// so pruning never hands a client a fresh quota early.
    pub fn prune_idle(&self, max_idle: Duration, now: Instant) -> usize {
        let mut removed = 0;
        self.buckets.retain(|_, bucket| {
            let idle = now.saturating_duration_since(bucket.last_refill) > max_idle;
            let keep = !(idle && bucket.is_full_at(now));
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }
}

// ============================================================================
// MIDDLEWARE
// ============================================================================

/// 429 response in the shape clients already parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitRejection {
    pub error: &'static str,
    pub message: String,
    pub retry_after: u64,
}

impl RateLimitRejection {
    pub fn new(retry_after: u64) -> Self {
        Self {
            error: ErrorCode::TooManyRequests.default_message(),
            message: format!("Rate limit exceeded. Try again in {} seconds.", retry_after),
            retry_after,
        }
    }
}

impl IntoResponse for RateLimitRejection {
    fn into_response(self) -> Response {
        let retry_after = HeaderValue::from(self.retry_after);
        let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(self)).into_response();
        response.headers_mut().insert(header::RETRY_AFTER, retry_after);
        response
    }
}

/// Identify the client: forwarding headers (when trusted), then the socket
/// address, else `"unknown"`.
pub fn client_identifier(request: &Request, trust_proxy: bool) -> String {
    if trust_proxy {
        if let Some(ip) = forwarded_ip(request) {
            return ip.to_string();
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

fn forwarded_ip(request: &Request) -> Option<IpAddr> {
    let headers = request.headers();

    // X-Forwarded-For can contain multiple IPs, take the first one
    if let Some(ip) = headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|first| first.trim().parse().ok())
    {
        return Some(ip);
    }

    headers
        .get("x-real-ip")
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

/// Rate limiting middleware.
///
/// Rejected requests get 429 with a `Retry-After` header. Allowed responses
/// carry `X-RateLimit-Limit`.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<TokenBucketLimiter>>,
    request: Request,
    next: Next,
) -> Result<Response, RateLimitRejection> {
    let config = limiter.config();
    if !config.enabled {
        return Ok(next.run(request).await);
    }

    let client = client_identifier(&request, config.trust_proxy);
    let decision = limiter.check(&client);
    if !decision.allowed {
        tracing::debug!(
            client = %client,
            retry_after = decision.retry_after_secs,
            "Rate limit exceeded"
        );
        return Err(RateLimitRejection::new(decision.retry_after_secs));
    }

    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert(
            HeaderName::from_static("x-ratelimit-limit"),
            HeaderValue::from(config.max_requests),
        );
    Ok(response)
}
