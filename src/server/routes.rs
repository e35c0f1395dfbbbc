// HTTP routes configuration
// Author: kelexine (https://github.com/kelexine)

use super::handlers::{health_handler, metrics_handler};
use super::session::ws_handler;
use crate::cache::CacheStore;
use crate::config::AppConfig;
use crate::error::Result;
use crate::generation::Provider;
use crate::usage::UsageTracker;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

/// Shared services handed to every handler and session.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub provider: Arc<dyn Provider>,
    pub cache: Arc<dyn CacheStore>,
    pub usage: Arc<UsageTracker>,
}

pub fn create_router(state: AppState) -> Result<Router> {
    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route("/ws", get(ws_handler))
        // Job submissions are small; anything larger is not a legitimate client
        .layer(tower_http::limit::RequestBodyLimitLayer::new(64 * 1024))
        .layer(TraceLayer::new_for_http())
        // Browser clients connect from arbitrary origins
        .layer(CorsLayer::permissive())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state);

    Ok(app)
}
