//! Background Jobs for POSEIDON API
//!
//! - `maintenance`: sweeps expired cache entries and idle rate-limit buckets
//!
//! Jobs are spawned by the binary during startup and stopped through a
//! `tokio::sync::watch` shutdown signal.

pub mod maintenance;

pub use maintenance::{
    maintenance_task, run_maintenance_cycle, MaintenanceConfig, MaintenanceMetrics,
    MaintenanceSnapshot,
};
