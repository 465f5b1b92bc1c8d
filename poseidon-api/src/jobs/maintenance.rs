//! Maintenance Background Task
//!
//! Periodically sweeps the two in-memory maps that otherwise only shrink
//! lazily:
//!
//! - the response cache, via `TtlCache::cleanup` (expired entries)
//! - the rate limiter, via `TokenBucketLimiter::prune_idle` (buckets untouched
//!   for longer than `bucket_idle` and refilled to capacity)
//!
//! Neither sweep is needed for correctness; they bound memory on long-running
//! processes with many distinct clients or query shapes.

use crate::config::ApiConfig;
use crate::constants::DEFAULT_RATE_LIMIT_IDLE_SECS;
use crate::middleware::TokenBucketLimiter;
use crate::services::ResponseCache;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Configuration for the maintenance task.
#[derive(Debug, Clone)]
pub struct MaintenanceConfig {
    /// How often to sweep (default: 60 seconds when enabled)
    pub interval: Duration,

    /// Buckets idle for longer than this are pruned (default: 10 minutes)
    pub bucket_idle: Duration,
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            bucket_idle: Duration::from_secs(DEFAULT_RATE_LIMIT_IDLE_SECS),
        }
    }
}

impl MaintenanceConfig {
    /// Build from the API configuration. `None` when the job is disabled.
    pub fn from_api_config(config: &ApiConfig) -> Option<Self> {
        config.maintenance_interval.map(|interval| Self {
            interval,
            bucket_idle: config.rate_limit_idle,
        })
    }
}

// ============================================================================
// METRICS
// ============================================================================

/// Counters for maintenance activity since startup.
#[derive(Debug, Default)]
pub struct MaintenanceMetrics {
    /// Total sweeps completed
    pub cycles: AtomicU64,

    /// Total expired cache entries evicted
    pub cache_entries_evicted: AtomicU64,

    /// Total idle rate-limit buckets pruned
    pub buckets_pruned: AtomicU64,
}

impl MaintenanceMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> MaintenanceSnapshot {
        MaintenanceSnapshot {
            cycles: self.cycles.load(Ordering::Relaxed),
            cache_entries_evicted: self.cache_entries_evicted.load(Ordering::Relaxed),
            buckets_pruned: self.buckets_pruned.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaintenanceSnapshot {
    pub cycles: u64,
    pub cache_entries_evicted: u64,
    pub buckets_pruned: u64,
}

// ============================================================================
// BACKGROUND TASK
// ============================================================================

/// Runs sweeps on `config.interval` until the shutdown signal flips to `true`.
///
/// ```ignore
/// let (shutdown_tx, shutdown_rx) = watch::channel(false);
/// let handle = tokio::spawn(maintenance_task(cache, limiter, config, shutdown_rx));
///
/// // Later
/// let _ = shutdown_tx.send(true);
/// let metrics = handle.await?;
/// ```
pub async fn maintenance_task(
    cache: Arc<ResponseCache>,
    limiter: Arc<TokenBucketLimiter>,
    config: MaintenanceConfig,
    mut shutdown_rx: watch::Receiver<bool>,
) -> Arc<MaintenanceMetrics> {
    let metrics = Arc::new(MaintenanceMetrics::new());

    let mut sweep_interval = interval(config.interval);
    sweep_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    tracing::info!(
        interval_secs = config.interval.as_secs(),
        bucket_idle_secs = config.bucket_idle.as_secs(),
        "Maintenance task started"
    );

    loop {
        tokio::select! {
            changed = shutdown_rx.changed() => {
                // A dropped sender also ends the task
                if changed.is_err() || *shutdown_rx.borrow() {
                    tracing::info!("Maintenance task shutting down");
                    break;
                }
            }

            _ = sweep_interval.tick() => {
                run_maintenance_cycle(&cache, &limiter, &config, &metrics, Instant::now());
            }
        }
    }

    let snapshot = metrics.snapshot();
    tracing::info!(
        cycles = snapshot.cycles,
        cache_entries_evicted = snapshot.cache_entries_evicted,
        buckets_pruned = snapshot.buckets_pruned,
        "Maintenance task completed"
    );

    metrics
}

/// Perform one sweep.
pub fn run_maintenance_cycle(
    cache: &ResponseCache,
    limiter: &TokenBucketLimiter,
    config: &MaintenanceConfig,
    metrics: &MaintenanceMetrics,
    now: Instant,
) {
    metrics.cycles.fetch_add(1, Ordering::Relaxed);

    let evicted = cache.cleanup();
    let pruned = limiter.prune_idle(config.bucket_idle, now);

    metrics
        .cache_entries_evicted
        .fetch_add(evicted as u64, Ordering::Relaxed);
    metrics
        .buckets_pruned
        .fetch_add(pruned as u64, Ordering::Relaxed);

    if evicted > 0 || pruned > 0 {
        tracing::info!(
            cache_entries_evicted = evicted,
            buckets_pruned = pruned,
            "Maintenance cycle completed"
        );
    } else {
        tracing::trace!("Maintenance cycle completed with nothing to remove");
    }
}
