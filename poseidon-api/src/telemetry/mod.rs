//! Tracing Subscriber Initialization
//!
//! Structured logs go to stdout, as plain text by default or as JSON lines
//! when `LOG_FORMAT=json`. `RUST_LOG` overrides the default filter.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "poseidon_api=debug,tower_http=debug,info";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Telemetry configuration from environment variables.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub format: LogFormat,
    /// Service name attached to the startup event
    pub service_name: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Pretty,
            service_name: "poseidon-api".to_string(),
        }
    }
}

impl TelemetryConfig {
    /// - `LOG_FORMAT`: `json` for JSON lines, anything else for text
    pub fn from_env() -> Self {
        Self::from_format(std::env::var("LOG_FORMAT").ok().as_deref())
    }

    fn from_format(raw: Option<&str>) -> Self {
        let format = match raw.map(|s| s.trim().to_lowercase()) {
            Some(s) if s == "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        };
        Self {
            format,
            ..Self::default()
        }
    }
}

/// Install the global tracing subscriber.
///
/// Call once at startup, before any tracing occurs. Fails if a global
/// subscriber is already set.
pub fn init_tracing(
    config: &TelemetryConfig,
) -> Result<(), tracing_subscriber::util::TryInitError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?,
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()?,
    }

    tracing::info!(
        service_name = config.service_name,
        format = ?config.format,
        "Telemetry initialized"
    );

    Ok(())
}
