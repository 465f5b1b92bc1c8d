//! Journal REST Routes
//!
//! - `GET  /journals?limit&offset`: one page of the catalog
//! - `GET  /journals/:id`: one journal with its trends
//! - `POST /journals/search`: scored, filtered, paginated search
//! - `POST /journals/:id/brief`: templated briefing for one journal

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use poseidon_core::{Brief, JournalDetail, JournalPage, PageParams, SearchParams, SearchResponse};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{ApiError, ApiResult};
use crate::extractors::JsonBody;
use crate::services::JournalService;
use crate::state::AppState;

// ============================================================================
// REQUEST TYPES
// ============================================================================

/// Raw pagination query. Values that are not non-negative integers are
/// ignored rather than rejected.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl PageQuery {
    pub fn to_params(&self) -> PageParams {
        PageParams::new(parse_count(&self.limit), parse_count(&self.offset))
    }
}

fn parse_count(raw: &Option<String>) -> Option<usize> {
    raw.as_deref().and_then(|s| s.trim().parse().ok())
}

/// Body of `POST /journals/:id/brief`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BriefRequest {
    /// Any JSON value is accepted; only strings are used.
    #[serde(default)]
    pub query: Option<serde_json::Value>,
}

impl BriefRequest {
    pub fn query_text(&self) -> Option<&str> {
        self.query.as_ref().and_then(|q| q.as_str())
    }
}

// ============================================================================
// HANDLERS
// ============================================================================

/// GET /api/journals
pub async fn list_journals(
    State(service): State<Arc<JournalService>>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<JournalPage>> {
    let page = service.list(&query.to_params()).await?;
    Ok(Json(page))
}

/// GET /api/journals/:id
pub async fn get_journal(
    State(service): State<Arc<JournalService>>,
    Path(id): Path<String>,
) -> ApiResult<Json<JournalDetail>> {
    service
        .get_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::journal_not_found(&id))
}

/// POST /api/journals/search
pub async fn search_journals(
    State(service): State<Arc<JournalService>>,
    JsonBody(params): JsonBody<SearchParams>,
) -> ApiResult<Json<SearchResponse>> {
    let response = service.search(&params).await?;
    Ok(Json(response))
}

/// POST /api/journals/:id/brief
pub async fn generate_brief(
    State(service): State<Arc<JournalService>>,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<BriefRequest>,
) -> ApiResult<Json<Brief>> {
    let brief = service.generate_brief(&id, request.query_text()).await?;
    Ok(Json(brief))
}

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/journals", get(list_journals))
        .route("/journals/search", post(search_journals))
        .route("/journals/:id", get(get_journal))
        .route("/journals/:id/brief", post(generate_brief))
}
