//! Health Check Endpoint
//!
//! `GET /api/health` reports liveness, the active provider and process uptime.

use axum::{extract::State, routing::get, Json, Router};
use chrono::{SubsecRound, Utc};
use poseidon_core::Timestamp;
use serde::{Deserialize, Serialize};

use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the process serves requests
    pub status: String,
    /// Active provider name
    pub mode: String,
    pub timestamp: Timestamp,
    /// Seconds since startup
    pub uptime: f64,
}

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        mode: state.service.provider_name().to_string(),
        timestamp: Utc::now().trunc_subsecs(3),
        uptime: state.uptime_secs(),
    })
}

pub fn create_router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
