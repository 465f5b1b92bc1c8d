//! API Configuration Module
//!
//! Server, cache, CORS and rate-limit settings. Configuration is loaded from
//! environment variables with defaults suited to local development.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use thiserror::Error;

use crate::constants::{
    DEFAULT_CACHE_TTL_SECS, DEFAULT_CORS_MAX_AGE_SECS,
    DEFAULT_MAINTENANCE_INTERVAL_SECS, DEFAULT_PORT, DEFAULT_PROVIDER_MODE,
    DEFAULT_RATE_LIMIT_IDLE_SECS, DEFAULT_RATE_LIMIT_MAX_REQUESTS,
    DEFAULT_RATE_LIMIT_WINDOW_SECS, DEVELOPMENT_ENVIRONMENT,
};
use crate::middleware::rate_limit::RateLimitConfig;

/// Configuration values that cannot start a server.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid PORT '{0}'")]
    InvalidPort(String),

    #[error("Invalid bind address '{0}'")]
    InvalidBindAddr(String),
}

// ============================================================================
// API CONFIGURATION
// ============================================================================

#[derive(Debug, Clone)]
pub struct ApiConfig {
    // ========================================================================
    // Server
    // ========================================================================
    pub bind_host: IpAddr,
    pub port: u16,

    /// Provider variant name (`mock` is the only one implemented).
    pub provider_mode: String,

    /// `development` exposes panic messages in 500 responses.
    pub environment: String,

    /// Default TTL for cached provider responses.
    pub cache_ttl: Duration,

    // ========================================================================
    // CORS Configuration
    // ========================================================================
    /// Allowed CORS origins. Empty means allow all origins.
    pub cors_origins: Vec<String>,

    /// Max age for CORS preflight cache in seconds.
    pub cors_max_age_secs: u64,

    // ========================================================================
    // Rate Limiting Configuration
    // ========================================================================
    pub rate_limit_enabled: bool,

    /// Bucket size per client.
    pub rate_limit_max_requests: u32,

    /// Time for an empty bucket to refill completely.
    pub rate_limit_window: Duration,

    /// Honor `X-Forwarded-For` / `X-Real-IP` when identifying clients.
    pub rate_limit_trust_proxy: bool,

    /// Buckets idle for longer than this are pruned by maintenance.
    pub rate_limit_idle: Duration,

    // ========================================================================
    // Maintenance
    // ========================================================================
    /// Sweep interval; `None` disables the maintenance job.
    pub maintenance_interval: Option<Duration>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_host: IpAddr::from([0, 0, 0, 0]),
            port: DEFAULT_PORT,
            provider_mode: DEFAULT_PROVIDER_MODE.to_string(),
            environment: DEVELOPMENT_ENVIRONMENT.to_string(),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            cors_origins: Vec::new(),
            cors_max_age_secs: DEFAULT_CORS_MAX_AGE_SECS,
            rate_limit_enabled: true,
            rate_limit_max_requests: DEFAULT_RATE_LIMIT_MAX_REQUESTS,
            rate_limit_window: Duration::from_secs(DEFAULT_RATE_LIMIT_WINDOW_SECS),
            rate_limit_trust_proxy: false,
            rate_limit_idle: Duration::from_secs(DEFAULT_RATE_LIMIT_IDLE_SECS),
            maintenance_interval: None,
        }
    }
}

impl ApiConfig {
    /// Create ApiConfig from environment variables.
    ///
    /// Environment variables:
    /// - `PORT`: listen port (default: 3000)
    /// - `POSEIDON_BIND`: listen host (default: 0.0.0.0)
    /// - `PROVIDER_MODE`: provider variant (default: mock)
    /// - `CACHE_TTL`: cache TTL in seconds (default: 300)
    /// - `POSEIDON_ENVIRONMENT` or `NODE_ENV`: environment name (default: development)
    /// - `CORS_ORIGINS`: comma-separated allowed origins (empty = allow all)
    /// - `CORS_MAX_AGE_SECS`: preflight cache duration (default: 86400)
    /// - `RATE_LIMIT_ENABLED`: "true" or "false" (default: true)
    /// - `RATE_LIMIT_MAX_REQUESTS`: bucket size per client (default: 100)
    /// - `RATE_LIMIT_WINDOW_SECS`: refill window (default: 60)
    /// - `RATE_LIMIT_TRUST_PROXY`: honor forwarding headers (default: false)
    /// - `RATE_LIMIT_IDLE_SECS`: idle bucket prune threshold (default: 600)
    /// - `MAINTENANCE_INTERVAL_SECS`: sweep cadence, 0 disables (default: 0)
    ///
    /// Unparseable values fall back to defaults, except `PORT` and
    /// `POSEIDON_BIND` which are errors.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match var("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw.clone()))?,
            None => defaults.port,
        };

        let bind_host = match var("POSEIDON_BIND") {
            Some(raw) => raw
                .trim()
                .parse::<IpAddr>()
                .map_err(|_| ConfigError::InvalidBindAddr(raw.clone()))?,
            None => defaults.bind_host,
        };

        let provider_mode = var("PROVIDER_MODE")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.provider_mode);

        let environment = var("POSEIDON_ENVIRONMENT")
            .or_else(|| var("NODE_ENV"))
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.environment);

        let cache_ttl = parse_var(&var, "CACHE_TTL")
            .map(Duration::from_secs)
            .unwrap_or(defaults.cache_ttl);

        let cors_origins = var("CORS_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let cors_max_age_secs =
            parse_var(&var, "CORS_MAX_AGE_SECS").unwrap_or(defaults.cors_max_age_secs);

        let rate_limit_enabled = var("RATE_LIMIT_ENABLED")
            .map(|s| s.trim().to_lowercase() != "false")
            .unwrap_or(defaults.rate_limit_enabled);

        let rate_limit_max_requests = parse_var(&var, "RATE_LIMIT_MAX_REQUESTS")
            .filter(|n: &u32| *n > 0)
            .unwrap_or(defaults.rate_limit_max_requests);

        let rate_limit_window = parse_var(&var, "RATE_LIMIT_WINDOW_SECS")
            .filter(|n: &u64| *n > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.rate_limit_window);

        let rate_limit_trust_proxy = var("RATE_LIMIT_TRUST_PROXY")
            .map(|s| s.trim().to_lowercase() == "true")
            .unwrap_or(defaults.rate_limit_trust_proxy);

        // An empty bucket needs a full window to refill
        let rate_limit_idle = parse_var(&var, "RATE_LIMIT_IDLE_SECS")
            .map(Duration::from_secs)
            .unwrap_or(defaults.rate_limit_idle)
            .max(rate_limit_window);

        let maintenance_interval = parse_var(&var, "MAINTENANCE_INTERVAL_SECS")
            .unwrap_or(DEFAULT_MAINTENANCE_INTERVAL_SECS);
        let maintenance_interval =
            (maintenance_interval > 0).then(|| Duration::from_secs(maintenance_interval));

        Ok(Self {
            bind_host,
            port,
            provider_mode,
            environment,
            cache_ttl,
            cors_origins,
            cors_max_age_secs,
            rate_limit_enabled,
            rate_limit_max_requests,
            rate_limit_window,
            rate_limit_trust_proxy,
            rate_limit_idle,
            maintenance_interval,
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_host, self.port)
    }

    /// Whether internal error messages may be shown to clients.
    pub fn is_development(&self) -> bool {
        self.environment == DEVELOPMENT_ENVIRONMENT
    }

    pub fn rate_limit_config(&self) -> RateLimitConfig {
        RateLimitConfig {
            enabled: self.rate_limit_enabled,
            max_requests: self.rate_limit_max_requests,
            window: self.rate_limit_window,
            trust_proxy: self.rate_limit_trust_proxy,
        }
    }
}

fn parse_var<F, T>(var: &F, name: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    var(name).and_then(|s| s.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_map(pairs: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_vars(|name| map.get(name).cloned())
    }

    #[test]
    fn test_default_config() -> Result<(), ConfigError> {
        let config = from_map(&[])?;
        assert_eq!(config.port, 3000);
        assert_eq!(config.bind_addr().to_string(), "0.0.0.0:3000");
        assert_eq!(config.provider_mode, "mock");
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
        assert!(config.is_development());
        assert!(config.cors_origins.is_empty());
        assert!(config.rate_limit_enabled);
        assert_eq!(config.rate_limit_max_requests, 100);
        assert_eq!(config.rate_limit_window, Duration::from_secs(60));
        assert!(!config.rate_limit_trust_proxy);
        assert_eq!(config.maintenance_interval, None);
        Ok(())
    }

    #[test]
    fn test_overrides() -> Result<(), ConfigError> {
        let config = from_map(&[
            ("PORT", "8080"),
            ("POSEIDON_BIND", "127.0.0.1"),
            ("CACHE_TTL", "10"),
            ("NODE_ENV", "production"),
            ("CORS_ORIGINS", "https://a.example, https://b.example,"),
            ("RATE_LIMIT_ENABLED", "FALSE"),
            ("RATE_LIMIT_MAX_REQUESTS", "5"),
            ("RATE_LIMIT_TRUST_PROXY", "true"),
            ("MAINTENANCE_INTERVAL_SECS", "30"),
        ])?;
        assert_eq!(config.bind_addr().to_string(), "127.0.0.1:8080");
        assert_eq!(config.cache_ttl, Duration::from_secs(10));
        assert!(!config.is_development());
        assert_eq!(config.cors_origins.len(), 2);
        assert!(!config.rate_limit_enabled);
        assert_eq!(config.rate_limit_max_requests, 5);
        assert!(config.rate_limit_trust_proxy);
        assert_eq!(config.maintenance_interval, Some(Duration::from_secs(30)));
        Ok(())
    }

    #[test]
    fn test_poseidon_environment_wins_over_node_env() -> Result<(), ConfigError> {
        let config = from_map(&[
            ("POSEIDON_ENVIRONMENT", "Development"),
            ("NODE_ENV", "production"),
        ])?;
        assert!(config.is_development());
        Ok(())
    }

    #[test]
    fn test_invalid_values_fall_back() -> Result<(), ConfigError> {
        let config = from_map(&[
            ("CACHE_TTL", "soon"),
            ("RATE_LIMIT_MAX_REQUESTS", "0"),
            ("RATE_LIMIT_WINDOW_SECS", "-1"),
        ])?;
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
        assert_eq!(config.rate_limit_max_requests, 100);
        assert_eq!(config.rate_limit_window, Duration::from_secs(60));
        Ok(())
    }

    #[test]
    fn test_invalid_port_is_error() {
        assert_eq!(
            from_map(&[("PORT", "http")]).unwrap_err(),
            ConfigError::InvalidPort("http".to_string())
        );
        assert!(matches!(
            from_map(&[("POSEIDON_BIND", "localhost:3000")]),
            Err(ConfigError::InvalidBindAddr(_))
        ));
    }

    #[test]
    fn test_idle_threshold_at_least_window() -> Result<(), ConfigError> {
        let config = from_map(&[
            ("RATE_LIMIT_WINDOW_SECS", "120"),
            ("RATE_LIMIT_IDLE_SECS", "30"),
        ])?;
        assert_eq!(config.rate_limit_idle, Duration::from_secs(120));

        let config = from_map(&[("RATE_LIMIT_IDLE_SECS", "900")])?;
        assert_eq!(config.rate_limit_idle, Duration::from_secs(900));
        Ok(())
    }

    #[test]
    fn test_rate_limit_config() {
        let config = ApiConfig::default();
        let rl = config.rate_limit_config();
        assert!(rl.enabled);
        assert_eq!(rl.max_requests, 100);
        assert_eq!(rl.window, Duration::from_secs(60));
    }
}
