// Route table
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    dashboard_page, dashboard_state, describe_action, health_check, open_collection,
    reload_dashboard, stream_dashboard,
};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

// Compression is handled per response in http_response, so no CompressionLayer here.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/", get(dashboard_page))
        .route("/api/dashboard", get(dashboard_state))
        .route("/api/dashboard/reload", post(reload_dashboard))
        .route("/api/dashboard/stream", get(stream_dashboard))
        .route("/api/actions/:collection", get(describe_action))
        .route("/open/:collection", get(open_collection))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
