use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::cache::ReportCache;
use crate::config::RadarConfig;
use crate::fetch::{MentionProvider, TwitterMentionProvider};
use crate::growth::classify_stage;
use crate::narratives::KeywordGroup;
use crate::report::format_growth;
use crate::scanner;

pub const SERVICE_NAME: &str = "alpha_radar";

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RadarConfig>,
    pub groups: Arc<Vec<KeywordGroup>>,
    /// Present only when a bearer credential is configured.
    pub provider: Option<Arc<dyn MentionProvider>>,
    pub cache: ReportCache,
}

impl AppState {
    pub fn new(config: RadarConfig, groups: Vec<KeywordGroup>) -> Self {
        let provider: Option<Arc<dyn MentionProvider>> = config
            .bearer_token
            .clone()
            .map(|token| Arc::new(TwitterMentionProvider::new(token)) as Arc<dyn MentionProvider>);
        let cache = ReportCache::new(config.cache_path.clone());
        Self {
            config: Arc::new(config),
            groups: Arc::new(groups),
            provider,
            cache,
        }
    }

    fn provider_ref(&self) -> Option<&dyn MentionProvider> {
        self.provider.as_deref()
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/narrative", get(get_narrative))
        .route("/api/narratives/all", get(get_all_narratives))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": SERVICE_NAME,
        "demo_mode": state.config.demo_mode,
    }))
}

/// Headline narrative: cache file first, then a fresh scan. A successful scan
/// overwrites the cache; a failed one falls back to the in-memory copy, then
/// to a 404.
async fn get_narrative(State(state): State<AppState>) -> Response {
    state.cache.prime_from_disk();

    match scanner::detect_narrative(state.config.demo_mode, state.provider_ref(), &state.groups)
        .await
    {
        Ok(report) => {
            if let Err(e) = state.cache.store(&report) {
                tracing::warn!(error = ?e, "failed to persist narrative cache");
            }
            Json(report).into_response()
        }
        Err(e) => {
            tracing::warn!(error = ?e, "narrative scan failed");
            match state.cache.last() {
                Some(cached) => Json(cached).into_response(),
                None => (
                    StatusCode::NOT_FOUND,
                    Json(json!({"error": "No narrative data available"})),
                )
                    .into_response(),
            }
        }
    }
}

/// All groups with stage and formatted growth, recomputed via the scanner
/// (never the cache).
async fn get_all_narratives(State(state): State<AppState>) -> Response {
    match scanner::scan_all(state.config.demo_mode, state.provider_ref(), &state.groups).await {
        Ok(rows) => {
            let out: Vec<serde_json::Value> = rows
                .into_iter()
                .map(|r| {
                    json!({
                        "narrative": r.narrative,
                        "mentions_24h": r.mentions_24h,
                        "mentions_2h": r.mentions_2h,
                        "growth": r.growth,
                        "stage": classify_stage(r.growth),
                        "growth_str": format_growth(r.growth),
                    })
                })
                .collect();
            Json(out).into_response()
        }
        Err(e) => {
            tracing::warn!(error = ?e, "scan for all narratives failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": e.to_string()})),
            )
                .into_response()
        }
    }
}
