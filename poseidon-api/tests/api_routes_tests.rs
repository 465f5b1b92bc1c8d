//! Router-Level Tests for the POSEIDON REST API
//!
//! Drives the fully assembled router (rate limiter, CORS, panic and trace
//! layers included) through `tower::ServiceExt::oneshot`.

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use poseidon_api::{create_api_router, ApiConfig, AppState};
use poseidon_test_utils::{assert_sorted_by_score, mock_provider};
use serde_json::{json, Value};
use tower::ServiceExt;

// ============================================================================
// TEST HELPERS
// ============================================================================

fn test_config() -> ApiConfig {
    ApiConfig {
        rate_limit_max_requests: 1000,
        ..ApiConfig::default()
    }
}

fn test_app_with(config: ApiConfig) -> Result<Router, String> {
    let provider = mock_provider().map_err(|e| e.to_string())?;
    Ok(create_api_router(AppState::new(config, provider)))
}

fn test_app() -> Result<Router, String> {
    test_app_with(test_config())
}

struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Value,
}

async fn send(app: &Router, request: Request<Body>) -> Result<TestResponse, String> {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .map_err(|e| format!("Request failed: {:?}", e))?;
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .map_err(|e| e.to_string())?;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).map_err(|e| e.to_string())?
    };
    Ok(TestResponse {
        status,
        headers,
        body,
    })
}

async fn get(app: &Router, uri: &str) -> Result<TestResponse, String> {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .map_err(|e| e.to_string())?;
    send(app, request).await
}

async fn post(app: &Router, uri: &str, body: impl Into<Body>) -> Result<TestResponse, String> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .map_err(|e| e.to_string())?;
    send(app, request).await
}

fn result_ids(results: &Value) -> Vec<String> {
    results
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item["id"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

// ============================================================================
// ROOT AND HEALTH
// ============================================================================

#[tokio::test]
async fn test_root_info() -> Result<(), String> {
    let app = test_app()?;
    let response = get(&app, "/").await?;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["name"], "POSEIDON API");
    assert_eq!(response.body["endpoints"]["search"], "POST /api/journals/search");
    Ok(())
}

#[tokio::test]
async fn test_health() -> Result<(), String> {
    let app = test_app()?;
    let response = get(&app, "/api/health").await?;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["mode"], "mock");
    assert!(response.body["uptime"].as_f64().is_some());
    assert!(response.body["timestamp"].as_str().is_some());
    Ok(())
}

// ============================================================================
// JOURNALS
// ============================================================================

#[tokio::test]
async fn test_list_journals_default_page() -> Result<(), String> {
    let app = test_app()?;
    let response = get(&app, "/api/journals").await?;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"].as_array().map(Vec::len), Some(12));
    assert_eq!(
        response.body["pagination"],
        json!({"total": 12, "limit": 50, "offset": 0, "hasMore": false})
    );
    assert!(response.body.get("cached").is_none());
    Ok(())
}

#[tokio::test]
async fn test_list_journals_cached_on_repeat() -> Result<(), String> {
    let app = test_app()?;
    get(&app, "/api/journals?limit=3&offset=2").await?;
    let response = get(&app, "/api/journals?limit=3&offset=2").await?;
    assert_eq!(response.body["cached"], true);
    assert_eq!(result_ids(&response.body["data"]), ["etrd", "comped", "bjet"]);
    Ok(())
}

#[tokio::test]
async fn test_list_journals_ignores_bad_numbers() -> Result<(), String> {
    let app = test_app()?;
    let response = get(&app, "/api/journals?limit=abc&offset=-4").await?;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["pagination"]["limit"], 50);
    assert_eq!(response.body["pagination"]["offset"], 0);
    Ok(())
}

#[tokio::test]
async fn test_get_journal_with_trends() -> Result<(), String> {
    let app = test_app()?;
    let response = get(&app, "/api/journals/ijcscl").await?;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["id"], "ijcscl");
    assert!(response.body["trends"]
        .as_array()
        .is_some_and(|trends| !trends.is_empty()));
    Ok(())
}

#[tokio::test]
async fn test_get_unknown_journal_is_404() -> Result<(), String> {
    let app = test_app()?;
    let response = get(&app, "/api/journals/non-existent").await?;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(
        response.body,
        json!({"error": {"code": "NOT_FOUND", "message": "Journal with id 'non-existent' not found"}})
    );
    Ok(())
}

// ============================================================================
// SEARCH
// ============================================================================

#[tokio::test]
async fn test_search_collaborative_learning() -> Result<(), String> {
    let app = test_app()?;
    let response = post(
        &app,
        "/api/journals/search",
        json!({"query": "collaborative learning"}).to_string(),
    )
    .await?;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["cached"], false);

    let results = response.body["results"].as_array().cloned().unwrap_or_default();
    let cscl = results
        .iter()
        .find(|r| r["id"] == "ijcscl")
        .ok_or("ijcscl missing from results")?;
    assert!(cscl["fitScore"].as_u64().is_some_and(|score| score > 20));
    assert!(cscl["matchedTags"]
        .as_array()
        .is_some_and(|tags| tags.iter().any(|t| t == "collaborative learning")));

    let typed: Vec<poseidon_core::ScoredResult> =
        serde_json::from_value(Value::Array(results)).map_err(|e| e.to_string())?;
    assert_sorted_by_score(&typed);
    Ok(())
}

#[tokio::test]
async fn test_search_second_call_cached() -> Result<(), String> {
    let app = test_app()?;
    let body = json!({"query": "learning analytics", "limit": 5}).to_string();
    let first = post(&app, "/api/journals/search", body.clone()).await?;
    let second = post(&app, "/api/journals/search", body).await?;
    assert_eq!(first.body["cached"], false);
    assert_eq!(second.body["cached"], true);
    assert_eq!(first.body["results"], second.body["results"]);
    Ok(())
}

#[tokio::test]
async fn test_search_empty_query_vs_missing_query() -> Result<(), String> {
    let app = test_app()?;

    let empty = post(&app, "/api/journals/search", r#"{"query": ""}"#).await?;
    assert_eq!(empty.body["results"], json!([]));
    assert_eq!(empty.body["pagination"]["total"], 0);

    let missing = post(&app, "/api/journals/search", "").await?;
    assert_eq!(missing.status, StatusCode::OK);
    assert_eq!(missing.body["pagination"]["total"], 12);
    assert!(missing.body["results"][0].get("fitScore").is_none());
    Ok(())
}

#[tokio::test]
async fn test_search_filters() -> Result<(), String> {
    let app = test_app()?;
    let response = post(
        &app,
        "/api/journals/search",
        json!({"filters": {"discipline": ["Learning Sciences"], "minImpactFactor": 4.0}})
            .to_string(),
    )
    .await?;
    let results = response.body["results"].as_array().cloned().unwrap_or_default();
    assert!(!results.is_empty());
    for result in &results {
        assert_eq!(result["discipline"], "Learning Sciences");
        assert!(result["impactFactor"].as_f64().is_some_and(|f| f >= 4.0));
    }
    Ok(())
}

#[tokio::test]
async fn test_search_malformed_json_is_400() -> Result<(), String> {
    let app = test_app()?;
    let response = post(&app, "/api/journals/search", "{not json").await?;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"]["code"], "INVALID_INPUT");
    Ok(())
}

// ============================================================================
// BRIEF
// ============================================================================

#[tokio::test]
async fn test_brief_for_known_journal() -> Result<(), String> {
    let app = test_app()?;
    let response = post(
        &app,
        "/api/journals/ijcscl/brief",
        json!({"query": "AI 협력학습"}).to_string(),
    )
    .await?;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["journalId"], "ijcscl");
    let brief = response.body["brief"].as_str().unwrap_or_default();
    assert!(brief.contains("AI 협력학습"));
    assert!(response.body["generatedAt"].as_str().is_some());
    Ok(())
}

#[tokio::test]
async fn test_brief_ignores_non_string_query() -> Result<(), String> {
    let app = test_app()?;
    let with_number = post(&app, "/api/journals/aied/brief", r#"{"query": 42}"#).await?;
    let without = post(&app, "/api/journals/aied/brief", "{}").await?;
    assert_eq!(with_number.status, StatusCode::OK);
    assert_eq!(with_number.body["brief"], without.body["brief"]);
    Ok(())
}

#[tokio::test]
async fn test_brief_unknown_journal_is_404() -> Result<(), String> {
    let app = test_app()?;
    let response = post(&app, "/api/journals/non-existent/brief", "{}").await?;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"]["code"], "NOT_FOUND");
    Ok(())
}

// ============================================================================
// LEGACY ALIASES
// ============================================================================

#[tokio::test]
async fn test_legacy_data_routes() -> Result<(), String> {
    let app = test_app()?;

    let list = get(&app, "/api/data").await?;
    assert_eq!(list.status, StatusCode::OK);
    assert_eq!(list.body["pagination"]["total"], 12);
    assert_eq!(
        list.headers.get("deprecation").and_then(|v| v.to_str().ok()),
        Some("true")
    );

    let missing = get(&app, "/api/data/nope").await?;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.body["error"]["message"], "Data item with id 'nope' not found");
    assert!(missing.headers.contains_key("deprecation"));

    let query = json!({"query": "collaborative learning", "limit": 2});
    let found = post(&app, "/api/data/query", query.to_string()).await?;
    assert_eq!(found.status, StatusCode::OK);
    assert_eq!(found.body["query"], query);
    assert!(found.body["data"].as_array().is_some_and(|d| d.len() <= 2));
    Ok(())
}

#[tokio::test]
async fn test_current_routes_not_deprecated() -> Result<(), String> {
    let app = test_app()?;
    let response = get(&app, "/api/journals").await?;
    assert!(!response.headers.contains_key("deprecation"));
    Ok(())
}

// ============================================================================
// FALLBACK, RATE LIMITING, CORS
// ============================================================================

#[tokio::test]
async fn test_unknown_route_is_404_envelope() -> Result<(), String> {
    let app = test_app()?;
    for uri in ["/nowhere", "/api/nowhere"] {
        let response = get(&app, uri).await?;
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(
            response.body,
            json!({"error": {"code": "NOT_FOUND", "message": "The requested endpoint does not exist"}})
        );
    }
    Ok(())
}

#[tokio::test]
async fn test_rate_limit_returns_429() -> Result<(), String> {
    let app = test_app_with(ApiConfig {
        rate_limit_max_requests: 3,
        ..ApiConfig::default()
    })?;

    for _ in 0..3 {
        let response = get(&app, "/api/health").await?;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(
            response.headers.get("x-ratelimit-limit").and_then(|v| v.to_str().ok()),
            Some("3")
        );
    }

    let response = get(&app, "/api/health").await?;
    assert_eq!(response.status, StatusCode::TOO_MANY_REQUESTS);
    let retry_after = response
        .headers
        .get(header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .ok_or("missing Retry-After")?;
    assert!(retry_after > 0);
    assert_eq!(response.body["error"], "Too many requests");
    assert_eq!(response.body["retryAfter"], retry_after);

    // The root endpoint is outside /api and not limited
    assert_eq!(get(&app, "/").await?.status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn test_cors_preflight_allows_any_origin_by_default() -> Result<(), String> {
    let app = test_app()?;
    let response = preflight(&app, "https://poseidon.example").await?;
    assert_eq!(
        response
            .headers
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
    Ok(())
}

async fn preflight(app: &Router, origin: &str) -> Result<TestResponse, String> {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/journals")
        .header(header::ORIGIN, origin)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .body(Body::empty())
        .map_err(|e| e.to_string())?;
    send(app, request).await
}

#[tokio::test]
async fn test_cors_preflight_restricted_to_configured_origins() -> Result<(), String> {
    let app = test_app_with(ApiConfig {
        cors_origins: vec!["https://poseidon.example".to_string()],
        ..test_config()
    })?;

    let allowed = preflight(&app, "https://poseidon.example").await?;
    assert_eq!(
        allowed
            .headers
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("https://poseidon.example")
    );
    assert_eq!(
        allowed
            .headers
            .get(header::ACCESS_CONTROL_MAX_AGE)
            .and_then(|v| v.to_str().ok()),
        Some("86400")
    );

    let rejected = preflight(&app, "https://elsewhere.example").await?;
    assert!(rejected
        .headers
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
    Ok(())
}
