// HTTP request handlers
// Author: kelexine (https://github.com/kelexine)

use super::routes::AppState;
use crate::metrics;
use crate::usage::UsageSnapshot;
use axum::extract::State;
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub api_configured: bool,
    pub cache_entries: usize,
    pub usage: UsageSnapshot,
    pub config: FeatureReport,
}

#[derive(Debug, Serialize)]
pub struct FeatureReport {
    pub image_generation_enabled: bool,
    pub caching_enabled: bool,
}

/// Status/health query: provider configuration, cache population, usage
/// counters, and feature-flag state.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        api_configured: state.config.provider.has_api_key(),
        cache_entries: state.cache.len(),
        usage: state.usage.snapshot(),
        config: FeatureReport {
            image_generation_enabled: state.config.features.enable_image_generation,
            caching_enabled: state.config.features.enable_caching,
        },
    })
}

/// Prometheus metrics in text exposition format.
pub async fn metrics_handler() -> String {
    metrics::gather_metrics()
}
