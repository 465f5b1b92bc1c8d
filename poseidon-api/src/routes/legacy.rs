//! Deprecated `/api/data` aliases kept for older clients.
//!
//! Every response carries `Deprecation: true`.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderName, HeaderValue},
    middleware::map_response,
    response::Response,
    routing::{get, post},
    Json, Router,
};
use poseidon_core::{JournalDetail, JournalPage, ScoredResult, SearchParams};
use serde::Serialize;
use std::sync::Arc;

use crate::error::{ApiError, ApiResult};
use crate::extractors::JsonBody;
use crate::routes::journal::PageQuery;
use crate::services::JournalService;
use crate::state::AppState;

/// Old search response shape: results plus the request echoed back.
#[derive(Debug, Clone, Serialize)]
pub struct LegacyQueryResponse {
    pub data: Vec<ScoredResult>,
    pub query: serde_json::Value,
}

/// GET /api/data
pub async fn list_data(
    State(service): State<Arc<JournalService>>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<JournalPage>> {
    let page = service.list(&query.to_params()).await?;
    Ok(Json(page))
}

/// GET /api/data/:id
pub async fn get_data(
    State(service): State<Arc<JournalService>>,
    Path(id): Path<String>,
) -> ApiResult<Json<JournalDetail>> {
    service
        .get_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("Data item with id '{}' not found", id)))
}

/// POST /api/data/query
pub async fn query_data(
    State(service): State<Arc<JournalService>>,
    JsonBody(body): JsonBody<serde_json::Value>,
) -> ApiResult<Json<LegacyQueryResponse>> {
    let params: SearchParams = serde_json::from_value(body.clone())?;
    let response = service.search(&params).await?;
    Ok(Json(LegacyQueryResponse {
        data: response.results,
        query: body,
    }))
}

async fn mark_deprecated(mut response: Response) -> Response {
    response.headers_mut().insert(
        HeaderName::from_static("deprecation"),
        HeaderValue::from_static("true"),
    );
    response
}

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/data", get(list_data))
        .route("/data/query", post(query_data))
        .route("/data/:id", get(get_data))
        .layer(map_response(mark_deprecated))
}
