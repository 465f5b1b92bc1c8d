//! REST API Routes Module
//!
//! Includes:
//! - Journal catalog, search and brief routes under `/api/journals`
//! - Deprecated `/api/data` aliases
//! - Health check at `/api/health`
//! - Service info at `/`
//! - CORS support for browser-based clients

pub mod health;
pub mod journal;
pub mod legacy;

use std::any::Any;
use std::time::Duration;

use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as AnyOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::ApiConfig;
use crate::constants::{API_NAME, API_VERSION};
use crate::error::{ApiError, ErrorCode};
use crate::middleware::rate_limit_middleware;
use crate::state::AppState;

// ============================================================================
// ROOT INFO
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointIndex {
    pub health: &'static str,
    pub journals: &'static str,
    pub journal_by_id: &'static str,
    pub search: &'static str,
    pub brief: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub endpoints: EndpointIndex,
}

/// GET /
pub async fn api_info() -> Json<ApiInfo> {
    Json(ApiInfo {
        name: API_NAME,
        version: API_VERSION,
        endpoints: EndpointIndex {
            health: "GET /api/health",
            journals: "GET /api/journals",
            journal_by_id: "GET /api/journals/:id",
            search: "POST /api/journals/search",
            brief: "POST /api/journals/:id/brief",
        },
    })
}

async fn route_not_found() -> ApiError {
    ApiError::route_not_found()
}

// ============================================================================
// LAYERS
// ============================================================================

fn build_cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([
            HeaderName::from_static("x-ratelimit-limit"),
            HeaderName::from_static("retry-after"),
            HeaderName::from_static("deprecation"),
        ])
        .max_age(Duration::from_secs(config.cors_max_age_secs));

    if config.cors_origins.is_empty() {
        tracing::info!("CORS: allowing all origins");
        cors.allow_origin(AnyOrigin)
            .allow_headers(AnyOrigin)
            .expose_headers(AnyOrigin)
    } else {
        tracing::info!("CORS: allowing origins: {:?}", config.cors_origins);
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(origins)
    }
}

/// Turns a handler panic into a 500 envelope. The panic message is only
/// exposed in development.
fn panic_response(development: bool, panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = detail, "Request handler panicked");

    let error = if development {
        ApiError::internal_error(detail)
    } else {
        ApiError::from_code(ErrorCode::InternalError)
    };
    error.into_response()
}

// ============================================================================
// ROUTER
// ============================================================================

/// Create the complete API router.
///
/// - `/api/*` routes, behind the per-client rate limiter
/// - `GET /` service info
/// - JSON 404 fallback for everything else
/// - panic catching, request tracing and CORS on all routes
pub fn create_api_router(state: AppState) -> Router {
    let development = state.config.is_development();

    let api_routes = Router::new()
        .merge(health::create_router())
        .merge(journal::create_router())
        .merge(legacy::create_router())
        .layer(from_fn_with_state(
            state.limiter.clone(),
            rate_limit_middleware,
        ));

    Router::new()
        .route("/", get(api_info))
        .nest("/api", api_routes)
        .fallback(route_not_found)
        .layer(CatchPanicLayer::custom(
            move |panic: Box<dyn Any + Send + 'static>| panic_response(development, panic),
        ))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(&state.config))
        .with_state(state)
}
