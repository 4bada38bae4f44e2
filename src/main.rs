//! Alpha Radar — Binary Entrypoint
//! Boots the Axum HTTP server, wiring routes, shared state, and middleware.

use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use alpha_radar::api::{create_router, AppState};
use alpha_radar::config::{load_groups_default, RadarConfig};
use alpha_radar::metrics::Metrics;
use alpha_radar::narratives::default_groups;

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - RADAR_DEV_LOG=1
fn enable_dev_tracing() {
    let dev_flag = std::env::var("RADAR_DEV_LOG").ok().is_some_and(|v| v == "1");

    let is_dev_env = cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        );

    if !(dev_flag && is_dev_env) {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("alpha_radar=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    // Initialize dev tracing early (no-op in production).
    enable_dev_tracing();

    let config = RadarConfig::from_env();
    let groups = load_groups_default().unwrap_or_else(|e| {
        tracing::warn!(error = ?e, "narratives config unreadable, using built-in groups");
        default_groups()
    });

    tracing::info!(
        demo_mode = config.demo_mode,
        groups = groups.len(),
        "alpha radar starting"
    );

    let metrics = Metrics::init();
    let state = AppState::new(config, groups);
    let router = create_router(state).merge(metrics.router());

    Ok(router.into())
}
