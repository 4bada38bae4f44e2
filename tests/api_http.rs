// tests/api_http.rs
//
// HTTP-level tests for the public API Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.
//
// Covered (demo mode, so no live API is touched):
// - GET /health
// - GET /api/narrative
// - GET /api/narratives/all

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value as Json;
use tempfile::TempDir;
use tower::ServiceExt as _; // for `oneshot`

use alpha_radar::api::{create_router, AppState};
use alpha_radar::config::RadarConfig;
use alpha_radar::narratives::default_groups;

const BODY_LIMIT: usize = 1024 * 1024; // 1MB, safe for tests

/// Build the same Router the binary uses, in demo mode with an isolated
/// cache file so tests never touch the repo directory.
fn demo_router() -> (Router, TempDir) {
    let tmp = tempfile::tempdir().expect("tempdir");
    let config = RadarConfig {
        demo_mode: true,
        bearer_token: None,
        cache_path: tmp.path().join("narrative_detected.json"),
    };
    let state = AppState::new(config, default_groups());
    (create_router(state), tmp)
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Json) {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("build request");

    let resp = app.clone().oneshot(req).await.expect("oneshot");
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    let v: Json = serde_json::from_slice(&bytes).expect("parse json body");
    (status, v)
}

#[tokio::test]
async fn health_reports_service_and_demo_mode() {
    let (app, _tmp) = demo_router();

    let (status, v) = get_json(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["status"], serde_json::json!("ok"));
    assert_eq!(v["service"], serde_json::json!("alpha_radar"));
    assert_eq!(v["demo_mode"], serde_json::json!(true));
}

#[tokio::test]
async fn narrative_headline_is_ai_agents_in_demo_mode() {
    let (app, tmp) = demo_router();

    let (status, v) = get_json(&app, "/api/narrative").await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(v["narrative"], serde_json::json!("AI Agents"));
    assert_eq!(v["growth"], serde_json::json!("+201.5%"));
    assert_eq!(v["growth_percent"], serde_json::json!(201.5));
    assert_eq!(v["mentions_24h"], serde_json::json!(67));
    assert_eq!(v["mentions_2h"], serde_json::json!(28));
    assert_eq!(v["stage"], serde_json::json!("Crowded Trade"));
    assert_eq!(v["alignment"], serde_json::json!(100));
    assert!(
        v["summary"]
            .as_str()
            .unwrap()
            .contains("accelerating rapidly"),
        "summary should flag rapid acceleration, got {}",
        v["summary"]
    );
    let ts = v["timestamp"].as_str().expect("timestamp string");
    assert!(ts.ends_with('Z'), "timestamp must be UTC with Z suffix: {ts}");

    // A successful scan must persist the cache file.
    let cache_path = tmp.path().join("narrative_detected.json");
    let raw = std::fs::read_to_string(&cache_path).expect("cache file written");
    let cached: Json = serde_json::from_str(&raw).expect("cache file is json");
    assert_eq!(cached["narrative"], serde_json::json!("AI Agents"));
}

#[tokio::test]
async fn all_narratives_lists_every_group_with_stage() {
    let (app, _tmp) = demo_router();

    let (status, v) = get_json(&app, "/api/narratives/all").await;
    assert_eq!(status, StatusCode::OK);

    let rows = v.as_array().expect("array response");
    assert_eq!(rows.len(), 3, "one row per keyword group");

    for r in rows {
        assert!(r.get("narrative").is_some(), "missing 'narrative'");
        assert!(r.get("stage").is_some(), "missing 'stage'");
        assert!(r.get("growth_str").is_some(), "missing 'growth_str'");
    }

    let btc = rows
        .iter()
        .find(|r| r["narrative"] == serde_json::json!("Bitcoin L2"))
        .expect("Bitcoin L2 row");
    assert_eq!(btc["growth"], serde_json::json!(60.7));
    assert_eq!(btc["stage"], serde_json::json!("Strong Alpha"));
    assert_eq!(btc["growth_str"], serde_json::json!("+60.7%"));
}
